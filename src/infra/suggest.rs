//! Seam for the external content-suggestion service.
//!
//! The service itself is out of process; callers plug in a
//! [`ContentSuggester`]. The `apply_*` helpers run one request and, only on
//! success, write the result into the entity through the ordinary store
//! update path. A failed request leaves the entity exactly as it was.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::non_negative;
use crate::domain::{Language, Package, Quantities, ResourceCategory, Route, TourStore};
use crate::util::persistence::StateBackend;

#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("suggestion service failed: {0}")]
    Service(String),
    #[error("at least two named stops and one traveller are needed for an estimate")]
    NotEnoughStops,
    #[error("{0} is required to ask for a suggestion")]
    MissingInput(&'static str),
    #[error("no {kind} with id {id}")]
    UnknownEntity { kind: &'static str, id: String },
}

/// Distance, duration and resource estimate for an ordered stop list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEstimate {
    pub kilometers: f64,
    pub duration_hours: f64,
    pub quantities: Quantities,
}

#[allow(async_fn_in_trait)]
pub trait ContentSuggester {
    async fn suggest_title(
        &self,
        description: &str,
        language: Language,
    ) -> Result<String, SuggestionError>;

    async fn generate_description(
        &self,
        name: &str,
        language: Language,
    ) -> Result<String, SuggestionError>;

    /// Free-text list of places worth visiting.
    async fn find_points_of_interest(&self, query: &str) -> Result<String, SuggestionError>;

    async fn estimate_route(
        &self,
        stop_names: &[String],
        person_count: u32,
    ) -> Result<RouteEstimate, SuggestionError>;

    /// Returns an image URL or data URI.
    async fn generate_image(&self, prompt: &str) -> Result<String, SuggestionError>;

    async fn edit_image(&self, image_url: &str, prompt: &str) -> Result<String, SuggestionError>;
}

fn logged<T>(
    result: Result<T, SuggestionError>,
    request: &str,
    id: &str,
) -> Result<T, SuggestionError> {
    if let Err(err) = &result {
        tracing::warn!(request, entity_id = id, error = %err, "suggestion request failed");
    }
    result
}

fn route_of<B: StateBackend>(store: &TourStore<B>, id: &str) -> Result<Route, SuggestionError> {
    store
        .route(id)
        .cloned()
        .ok_or_else(|| SuggestionError::UnknownEntity {
            kind: "route",
            id: id.to_string(),
        })
}

fn package_of<B: StateBackend>(store: &TourStore<B>, id: &str) -> Result<Package, SuggestionError> {
    store
        .package(id)
        .cloned()
        .ok_or_else(|| SuggestionError::UnknownEntity {
            kind: "package",
            id: id.to_string(),
        })
}

/// Ask for a distance/duration/quantity estimate and store it on the route.
pub async fn apply_route_estimate<B, S>(
    store: &mut TourStore<B>,
    suggester: &S,
    route_id: &str,
) -> Result<RouteEstimate, SuggestionError>
where
    B: StateBackend,
    S: ContentSuggester,
{
    let mut route = route_of(store, route_id)?;
    let stop_names: Vec<String> = route.named_stops().map(str::to_string).collect();
    if stop_names.len() < 2 || route.person_count == 0 {
        return Err(SuggestionError::NotEnoughStops);
    }

    let estimate = logged(
        suggester.estimate_route(&stop_names, route.person_count).await,
        "estimate_route",
        route_id,
    )?;

    // Only the estimated fields are clamped; the rest of the route is the
    // operator's and goes back unchanged.
    route.kilometers = non_negative(estimate.kilometers);
    route.duration_hours = non_negative(estimate.duration_hours);
    for category in ResourceCategory::ALL {
        let value = non_negative(estimate.quantities.get(category));
        route.quantities.set(category, value);
    }
    store.update_route(route);
    Ok(estimate)
}

/// Replace the package name with one suggested from its description.
pub async fn apply_suggested_title<B, S>(
    store: &mut TourStore<B>,
    suggester: &S,
    package_id: &str,
) -> Result<String, SuggestionError>
where
    B: StateBackend,
    S: ContentSuggester,
{
    let mut pkg = package_of(store, package_id)?;
    if pkg.description.trim().is_empty() {
        return Err(SuggestionError::MissingInput("description"));
    }

    let language = store.settings().language;
    let title = logged(
        suggester.suggest_title(&pkg.description, language).await,
        "suggest_title",
        package_id,
    )?;

    pkg.name = title.clone();
    store.update_package(pkg);
    Ok(title)
}

pub async fn apply_generated_description<B, S>(
    store: &mut TourStore<B>,
    suggester: &S,
    package_id: &str,
) -> Result<String, SuggestionError>
where
    B: StateBackend,
    S: ContentSuggester,
{
    let mut pkg = package_of(store, package_id)?;
    if pkg.name.trim().is_empty() {
        return Err(SuggestionError::MissingInput("name"));
    }

    let language = store.settings().language;
    let description = logged(
        suggester.generate_description(&pkg.name, language).await,
        "generate_description",
        package_id,
    )?;

    pkg.description = description.clone();
    store.update_package(pkg);
    Ok(description)
}

/// Generate a promotional image from the description, or the name when the
/// description is blank.
pub async fn apply_generated_image<B, S>(
    store: &mut TourStore<B>,
    suggester: &S,
    package_id: &str,
) -> Result<String, SuggestionError>
where
    B: StateBackend,
    S: ContentSuggester,
{
    let pkg = package_of(store, package_id)?;
    let prompt = [pkg.description.trim(), pkg.name.trim()]
        .into_iter()
        .find(|text| !text.is_empty())
        .ok_or(SuggestionError::MissingInput("description or name"))?;

    let image_url = logged(
        suggester.generate_image(prompt).await,
        "generate_image",
        package_id,
    )?;

    store.set_package_image(package_id, image_url.clone());
    Ok(image_url)
}

pub async fn apply_edited_image<B, S>(
    store: &mut TourStore<B>,
    suggester: &S,
    package_id: &str,
    prompt: &str,
) -> Result<String, SuggestionError>
where
    B: StateBackend,
    S: ContentSuggester,
{
    let pkg = package_of(store, package_id)?;
    let current = pkg
        .image_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .ok_or(SuggestionError::MissingInput("image"))?;
    if prompt.trim().is_empty() {
        return Err(SuggestionError::MissingInput("prompt"));
    }

    let image_url = logged(
        suggester.edit_image(current, prompt).await,
        "edit_image",
        package_id,
    )?;

    store.set_package_image(package_id, image_url.clone());
    Ok(image_url)
}
