//! First-run example data so a new install has something to price.

use super::entities::{Package, PackageCosts, Quantities, Route};

pub fn example_route() -> Route {
    let mut route = Route::new("Historic Center Walking Tour");
    route.description =
        "A 3-hour guided walk through the most iconic landmarks of the city center.".into();
    route.add_stop("Main Square", "The heart of the city's history.");
    route.add_stop("National Cathedral", "A masterpiece of colonial architecture.");
    route.add_stop("Founder's Museum", "Learn about the origins of the city.");
    route.kilometers = 5.0;
    route.duration_hours = 3.0;
    route.person_count = 15;
    route.quantities = Quantities {
        guide: 1.0,
        medical: 15.0,
        transport: 0.0,
        logistics: 15.0,
    };
    route.photographer_cost = 150.0;
    route.is_photographer_optional = true;
    route
}

/// The example route plus a package that includes it.
pub fn example_catalog() -> (Route, Package) {
    let route = example_route();

    let mut pkg = Package::new("Capital City Discovery");
    pkg.description = "Experience the best of the capital with our comprehensive package, \
        including a historic tour and all necessary services."
        .into();
    pkg.image_url = Some(
        "https://images.unsplash.com/photo-1549877452-9c3e87a42e47?q=80&w=2070&auto=format&fit=crop"
            .into(),
    );
    pkg.person_count = 15;
    pkg.costs = PackageCosts {
        transport: 80.0,
        lodging: 200.0,
        services: 50.0,
    };
    pkg.route_ids.push(route.id.clone());

    (route, pkg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::{package_price, route_cost};
    use crate::domain::settings::resolve;

    #[test]
    fn example_prices_match_default_settings() {
        let settings = resolve(None);
        let (route, pkg) = example_catalog();

        assert_eq!(route_cost(&route, &settings), 675.0);
        assert_eq!(package_price(&pkg, &[route], &settings), 7031.25);
    }
}
