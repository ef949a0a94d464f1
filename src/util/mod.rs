use uuid::Uuid;

pub mod logging;
pub mod persistence;
pub mod version;

const SHORT_ID_LEN: usize = 10;

/// Short random identifier: lowercase hex taken from a v4 UUID.
pub fn short_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(SHORT_ID_LEN);
    id
}

pub fn generate_id(prefix: &str) -> String {
    format!("{prefix}-{}", short_id())
}
