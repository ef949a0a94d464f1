//! Catalog entities, settings resolution, pricing and the entity store.

pub mod app_state;
pub mod entities;
pub mod pricing;
pub mod sample;
pub mod settings;
pub mod store;

pub use app_state::{AppState, PersistedState};
pub use entities::{
    CostScope, EntityId, Package, PackageCosts, Quantities, ResourceCategory, Route, RouteIssue,
    Stop,
};
pub use pricing::{
    display_amount, package_breakdown, package_price, per_person_price, quote_package,
    quote_route, route_cost, route_cost_with_unit_costs, PackageBreakdown, Quote,
};
pub use settings::{
    resolve, resolve_value, Language, SettingsPatch, Theme, UnitCosts, UnitCostsPatch,
    UserSettings,
};
pub use store::TourStore;
