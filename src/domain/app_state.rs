use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entities::{Package, Route};
use super::settings::{resolve_value, UserSettings};

/// In-memory catalog plus the operator's settings.
#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    pub packages: Vec<Package>,
    pub routes: Vec<Route>,
    pub settings: UserSettings,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
            routes: Vec::new(),
            settings: resolve_value(None),
        }
    }
}

impl AppState {
    /// Rebuild state from a persisted record. Entities are taken verbatim;
    /// settings go through the resolver.
    pub fn from_persisted(persisted: PersistedState) -> Self {
        Self {
            packages: persisted.packages,
            routes: persisted.routes,
            settings: resolve_value(persisted.settings.as_ref()),
        }
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            packages: self.packages.clone(),
            routes: self.routes.clone(),
            settings: serde_json::to_value(&self.settings).ok(),
        }
    }
}

/// The single record written after every mutation.
///
/// Settings stay as raw JSON until resolved so that a partial or outdated
/// settings object can still be merged over the defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub packages: Vec<Package>,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

impl PersistedState {
    /// Decode a stored record. Only malformed JSON or a non-object top level
    /// fails; a route or package that does not decode is skipped on its own
    /// and the settings are kept raw for the resolver.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let Value::Object(mut record) = serde_json::from_str::<Value>(raw)? else {
            return Err(serde_json::Error::custom("persisted state is not an object"));
        };

        Ok(Self {
            packages: decode_entities(record.remove("packages"), "packages"),
            routes: decode_entities(record.remove("routes"), "routes"),
            settings: record.remove("settings").filter(|value| !value.is_null()),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn decode_entities<T: DeserializeOwned>(raw: Option<Value>, collection: &str) -> Vec<T> {
    let items = match raw {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Vec::new(),
        Some(other) => {
            tracing::warn!(collection, value = %other, "ignoring malformed collection");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(entity) => Some(entity),
            Err(err) => {
                tracing::warn!(collection, index, error = %err, "skipping unreadable entry");
                None
            }
        })
        .collect()
}
