use serde::{Deserialize, Deserializer, Serialize};

use crate::util::{generate_id, short_id};

/// Identifier shared by routes, packages and stops.
pub type EntityId = String;

/// Resource categories a route can require.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceCategory {
    Guide,
    Medical,
    Transport,
    Logistics,
}

/// Whether a resource is paid once per route or once per traveller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CostScope {
    Group,
    PerPerson,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 4] = [
        ResourceCategory::Guide,
        ResourceCategory::Medical,
        ResourceCategory::Transport,
        ResourceCategory::Logistics,
    ];

    pub fn scope(&self) -> CostScope {
        match self {
            ResourceCategory::Guide | ResourceCategory::Transport => CostScope::Group,
            ResourceCategory::Medical | ResourceCategory::Logistics => CostScope::PerPerson,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResourceCategory::Guide => "guide",
            ResourceCategory::Medical => "medical",
            ResourceCategory::Transport => "transport",
            ResourceCategory::Logistics => "logistics",
        }
    }

    /// Categories of the given scope, in declaration order.
    pub fn in_scope(scope: CostScope) -> impl Iterator<Item = ResourceCategory> {
        Self::ALL
            .into_iter()
            .filter(move |category| category.scope() == scope)
    }
}

/// One visited location on a route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Stop {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: short_id(),
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn is_named(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Resource counts required by a route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quantities {
    pub guide: f64,
    pub medical: f64,
    pub transport: f64,
    pub logistics: f64,
}

impl Quantities {
    pub fn get(&self, category: ResourceCategory) -> f64 {
        match category {
            ResourceCategory::Guide => self.guide,
            ResourceCategory::Medical => self.medical,
            ResourceCategory::Transport => self.transport,
            ResourceCategory::Logistics => self.logistics,
        }
    }

    pub fn set(&mut self, category: ResourceCategory, value: f64) {
        match category {
            ResourceCategory::Guide => self.guide = value,
            ResourceCategory::Medical => self.medical = value,
            ResourceCategory::Transport => self.transport = value,
            ResourceCategory::Logistics => self.logistics = value,
        }
    }
}

impl Default for Quantities {
    fn default() -> Self {
        Self {
            guide: 1.0,
            medical: 1.0,
            transport: 1.0,
            logistics: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stops: Vec<Stop>,
    pub kilometers: f64,
    pub duration_hours: f64,
    #[serde(deserialize_with = "lenient_person_count")]
    pub person_count: u32,
    pub quantities: Quantities,
    pub photographer_cost: f64,
    pub is_photographer_optional: bool,
}

/// Problems that keep a route from being saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteIssue {
    NameRequired,
    StopNameRequired { index: usize },
}

impl Route {
    /// A blank route with the editor defaults and a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id("route"),
            name: name.into(),
            description: String::new(),
            stops: Vec::new(),
            kilometers: 0.0,
            duration_hours: 0.0,
            person_count: 1,
            quantities: Quantities::default(),
            photographer_cost: 0.0,
            is_photographer_optional: false,
        }
    }

    pub fn add_stop(&mut self, name: impl Into<String>, description: impl Into<String>) -> &Stop {
        self.stops.push(Stop::new(name, description));
        &self.stops[self.stops.len() - 1]
    }

    pub fn remove_stop(&mut self, index: usize) -> Option<Stop> {
        (index < self.stops.len()).then(|| self.stops.remove(index))
    }

    /// Trimmed, non-empty stop names in visiting order.
    pub fn named_stops(&self) -> impl Iterator<Item = &str> {
        self.stops
            .iter()
            .map(|stop| stop.name.trim())
            .filter(|name| !name.is_empty())
    }

    pub fn validate(&self) -> Result<(), Vec<RouteIssue>> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(RouteIssue::NameRequired);
        }
        issues.extend(
            self.stops
                .iter()
                .enumerate()
                .filter(|(_, stop)| !stop.is_named())
                .map(|(index, _)| RouteIssue::StopNameRequired { index }),
        );

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    /// Clamp operator input to the numeric invariants: at least one traveller
    /// and no negative amounts.
    pub fn sanitize(&mut self) {
        self.person_count = self.person_count.max(1);
        self.kilometers = non_negative(self.kilometers);
        self.duration_hours = non_negative(self.duration_hours);
        self.photographer_cost = non_negative(self.photographer_cost);
        for category in ResourceCategory::ALL {
            let value = non_negative(self.quantities.get(category));
            self.quantities.set(category, value);
        }
    }
}

/// Flat per-traveller costs of a package.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageCosts {
    pub transport: f64,
    pub lodging: f64,
    pub services: f64,
}

impl PackageCosts {
    pub fn per_person(&self) -> f64 {
        self.transport + self.lodging + self.services
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "lenient_person_count")]
    pub person_count: u32,
    pub costs: PackageCosts,
    /// Soft references; a route deleted later simply stops contributing.
    #[serde(default)]
    pub route_ids: Vec<EntityId>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id("pkg"),
            name: name.into(),
            description: String::new(),
            image_url: None,
            person_count: 1,
            costs: PackageCosts::default(),
            route_ids: Vec::new(),
        }
    }

    pub fn includes_route(&self, route_id: &str) -> bool {
        self.route_ids.iter().any(|id| id == route_id)
    }

    /// Adds the route when missing, removes it when present.
    pub fn toggle_route(&mut self, route_id: &str) {
        if self.includes_route(route_id) {
            self.route_ids.retain(|id| id != route_id);
        } else {
            self.route_ids.push(route_id.to_string());
        }
    }

    pub fn sanitize(&mut self) {
        self.person_count = self.person_count.max(1);
        self.costs.transport = non_negative(self.costs.transport);
        self.costs.lodging = non_negative(self.costs.lodging);
        self.costs.services = non_negative(self.costs.services);
    }
}

/// Accepts any JSON number for a traveller count. Fractions are truncated;
/// zero, negative and non-finite counts become 1.
fn lenient_person_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    Ok(if raw.is_finite() && raw >= 1.0 {
        raw.min(u32::MAX as f64) as u32
    } else {
        1
    })
}

pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_split_into_group_and_per_person() {
        let group: Vec<_> = ResourceCategory::in_scope(CostScope::Group).collect();
        let per_person: Vec<_> = ResourceCategory::in_scope(CostScope::PerPerson).collect();

        assert_eq!(group, vec![ResourceCategory::Guide, ResourceCategory::Transport]);
        assert_eq!(
            per_person,
            vec![ResourceCategory::Medical, ResourceCategory::Logistics]
        );
    }

    #[test]
    fn new_route_uses_editor_defaults() {
        let route = Route::new("Old Town");
        assert!(route.id.starts_with("route-"));
        assert_eq!(route.person_count, 1);
        assert_eq!(route.quantities, Quantities::default());
        assert!(!route.is_photographer_optional);
        assert!(route.validate().is_ok());
    }

    #[test]
    fn validate_reports_missing_names() {
        let mut route = Route::new("   ");
        route.add_stop("Main Square", "");
        route.add_stop("", "unnamed");

        let issues = route.validate().unwrap_err();
        assert_eq!(
            issues,
            vec![
                RouteIssue::NameRequired,
                RouteIssue::StopNameRequired { index: 1 }
            ]
        );
    }

    #[test]
    fn named_stops_skips_blank_names() {
        let mut route = Route::new("Loop");
        route.add_stop(" Cathedral ", "");
        route.add_stop("  ", "");
        route.add_stop("Museum", "");

        let names: Vec<_> = route.named_stops().collect();
        assert_eq!(names, vec!["Cathedral", "Museum"]);
    }

    #[test]
    fn remove_stop_out_of_range_is_noop() {
        let mut route = Route::new("Loop");
        route.add_stop("A", "");
        assert!(route.remove_stop(3).is_none());
        assert_eq!(route.stops.len(), 1);
        assert_eq!(route.remove_stop(0).map(|stop| stop.name), Some("A".into()));
    }

    #[test]
    fn sanitize_clamps_invalid_input() {
        let mut route = Route::new("Loop");
        route.person_count = 0;
        route.kilometers = -3.0;
        route.photographer_cost = f64::NAN;
        route.quantities.medical = -1.0;
        route.sanitize();

        assert_eq!(route.person_count, 1);
        assert_eq!(route.kilometers, 0.0);
        assert_eq!(route.photographer_cost, 0.0);
        assert_eq!(route.quantities.medical, 0.0);
        assert_eq!(route.quantities.guide, 1.0);

        let mut pkg = Package::new("Weekend");
        pkg.person_count = 0;
        pkg.costs.lodging = -20.0;
        pkg.sanitize();
        assert_eq!(pkg.person_count, 1);
        assert_eq!(pkg.costs.lodging, 0.0);
    }

    #[test]
    fn toggle_route_adds_then_removes() {
        let mut pkg = Package::new("Weekend");
        pkg.toggle_route("route-a");
        pkg.toggle_route("route-b");
        pkg.toggle_route("route-a");
        assert_eq!(pkg.route_ids, vec!["route-b".to_string()]);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let mut route = Route::new("Loop");
        route.id = "route-1".into();
        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(json["durationHours"], 0.0);
        assert_eq!(json["personCount"], 1);
        assert_eq!(json["isPhotographerOptional"], false);

        let pkg = Package::new("Weekend");
        let json = serde_json::to_value(&pkg).unwrap();
        assert_eq!(json["personCount"], 1);
        assert!(json.get("imageUrl").is_none());
        assert!(json["routeIds"].as_array().unwrap().is_empty());
    }

    #[test]
    fn out_of_range_person_counts_load_as_one() {
        let mut json = serde_json::to_value(Package::new("Weekend")).unwrap();
        for (raw, expected) in [(-3.0, 1), (0.0, 1), (2.7, 2), (12.0, 12)] {
            json["personCount"] = serde_json::json!(raw);
            let pkg: Package = serde_json::from_value(json.clone()).unwrap();
            assert_eq!(pkg.person_count, expected);
        }
    }
}
