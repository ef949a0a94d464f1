//! Cost and price derivation for routes and packages.
//!
//! Everything here is a pure function of its inputs. Amounts are USD and
//! never rounded; formatting belongs to whoever displays them.

use super::entities::{CostScope, Package, Quantities, ResourceCategory, Route};
use super::settings::{UnitCosts, UserSettings};

/// Total operating cost of a route.
pub fn route_cost(route: &Route, settings: &UserSettings) -> f64 {
    route_cost_with_unit_costs(route, Some(&settings.unit_costs))
}

/// Route cost against optional unit costs; no unit costs means no cost.
pub fn route_cost_with_unit_costs(route: &Route, unit_costs: Option<&UnitCosts>) -> f64 {
    let Some(unit_costs) = unit_costs else {
        return 0.0;
    };

    let group_cost = scoped_cost(&route.quantities, unit_costs, CostScope::Group);
    let per_person_unit_cost = scoped_cost(&route.quantities, unit_costs, CostScope::PerPerson);
    let photographer_cost = if route.is_photographer_optional {
        0.0
    } else {
        route.photographer_cost
    };

    group_cost + photographer_cost + per_person_unit_cost * route.person_count as f64
}

fn scoped_cost(quantities: &Quantities, unit_costs: &UnitCosts, scope: CostScope) -> f64 {
    ResourceCategory::in_scope(scope).fold(0.0, |total, category| {
        total + quantities.get(category) * unit_costs.get(category)
    })
}

/// Intermediate figures behind a package price.
#[derive(Clone, Debug, PartialEq)]
pub struct PackageBreakdown {
    /// Flat per-person costs times travellers.
    pub flat_cost: f64,
    /// Sum of the referenced routes that still exist.
    pub route_costs: f64,
    pub base_cost: f64,
    pub margin: f64,
    pub price: f64,
}

pub fn package_breakdown(
    pkg: &Package,
    all_routes: &[Route],
    settings: &UserSettings,
) -> PackageBreakdown {
    let route_costs = pkg.route_ids.iter().fold(0.0, |total, route_id| {
        let cost = all_routes
            .iter()
            .find(|route| &route.id == route_id)
            .map(|route| route_cost(route, settings))
            .unwrap_or(0.0);
        total + cost
    });

    let flat_cost = (pkg.costs.transport + pkg.costs.lodging + pkg.costs.services)
        * pkg.person_count.max(1) as f64;
    let base_cost = flat_cost + route_costs;
    let price = base_cost * (1.0 + settings.profit_margin / 100.0);

    PackageBreakdown {
        flat_cost,
        route_costs,
        base_cost,
        margin: price - base_cost,
        price,
    }
}

/// Sell price of a package including the profit margin.
pub fn package_price(pkg: &Package, all_routes: &[Route], settings: &UserSettings) -> f64 {
    package_breakdown(pkg, all_routes, settings).price
}

/// Per-traveller share of `total`; an empty group gets the whole total.
pub fn per_person_price(total: f64, person_count: u32) -> f64 {
    if person_count > 0 {
        total / person_count as f64
    } else {
        total
    }
}

pub fn display_amount(usd_amount: f64, exchange_rate: f64) -> f64 {
    usd_amount * exchange_rate
}

/// Figures shown next to a route or package.
#[derive(Clone, Debug, PartialEq)]
pub struct Quote {
    pub total: f64,
    pub per_person: f64,
    /// `total` in the secondary display currency.
    pub display_total: f64,
}

impl Quote {
    fn new(total: f64, person_count: u32, settings: &UserSettings) -> Self {
        Self {
            total,
            per_person: per_person_price(total, person_count),
            display_total: display_amount(total, settings.exchange_rate),
        }
    }
}

pub fn quote_route(route: &Route, settings: &UserSettings) -> Quote {
    Quote::new(route_cost(route, settings), route.person_count, settings)
}

pub fn quote_package(pkg: &Package, all_routes: &[Route], settings: &UserSettings) -> Quote {
    Quote::new(
        package_price(pkg, all_routes, settings),
        pkg.person_count,
        settings,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PackageCosts;
    use crate::domain::settings::resolve;

    fn walking_tour() -> Route {
        Route {
            id: "route-1".into(),
            name: "Historic Center".into(),
            description: String::new(),
            stops: Vec::new(),
            kilometers: 5.0,
            duration_hours: 3.0,
            person_count: 15,
            quantities: Quantities {
                guide: 1.0,
                medical: 15.0,
                transport: 0.0,
                logistics: 15.0,
            },
            photographer_cost: 150.0,
            is_photographer_optional: true,
        }
    }

    fn settings() -> UserSettings {
        let mut settings = resolve(None);
        settings.unit_costs = UnitCosts {
            guide: 150.0,
            medical: 20.0,
            transport: 200.0,
            logistics: 15.0,
        };
        settings.profit_margin = 25.0;
        settings
    }

    #[test]
    fn group_costs_are_not_multiplied_by_travellers() {
        let mut route = walking_tour();
        route.quantities = Quantities {
            guide: 2.0,
            medical: 0.0,
            transport: 1.0,
            logistics: 0.0,
        };
        assert_eq!(route_cost(&route, &settings()), 2.0 * 150.0 + 200.0);
    }

    #[test]
    fn per_person_costs_scale_with_travellers() {
        let mut route = walking_tour();
        route.quantities = Quantities {
            guide: 0.0,
            medical: 1.0,
            transport: 0.0,
            logistics: 2.0,
        };
        route.person_count = 4;
        assert_eq!(route_cost(&route, &settings()), (20.0 + 30.0) * 4.0);
    }

    #[test]
    fn missing_unit_costs_cost_nothing() {
        let mut route = walking_tour();
        route.is_photographer_optional = false;
        assert_eq!(route_cost_with_unit_costs(&route, None), 0.0);
    }

    #[test]
    fn breakdown_adds_up() {
        let pkg = Package {
            id: "pkg-1".into(),
            name: "Capital".into(),
            description: String::new(),
            image_url: None,
            person_count: 15,
            costs: PackageCosts {
                transport: 80.0,
                lodging: 200.0,
                services: 50.0,
            },
            route_ids: vec!["route-1".into()],
        };
        let breakdown = package_breakdown(&pkg, &[walking_tour()], &settings());

        assert_eq!(breakdown.flat_cost, 4950.0);
        assert_eq!(breakdown.route_costs, 675.0);
        assert_eq!(breakdown.base_cost, 5625.0);
        assert_eq!(breakdown.price, 7031.25);
        assert_eq!(breakdown.margin, 1406.25);
    }

    #[test]
    fn zero_travellers_still_pay_flat_costs_once() {
        let mut pkg = Package::new("Solo");
        pkg.person_count = 0;
        pkg.costs.lodging = 100.0;
        let mut settings = settings();
        settings.profit_margin = 0.0;
        assert_eq!(package_price(&pkg, &[], &settings), 100.0);
    }

    #[test]
    fn quotes_carry_per_person_and_display_figures() {
        let mut settings = settings();
        settings.exchange_rate = 2.0;
        let quote = quote_route(&walking_tour(), &settings);

        assert_eq!(quote.total, 675.0);
        assert_eq!(quote.per_person, 45.0);
        assert_eq!(quote.display_total, 1350.0);
    }
}
