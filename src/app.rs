use tour_planner::domain::{quote_package, quote_route, Quote, TourStore, UserSettings};
use tour_planner::util::persistence::{JsonFileBackend, MemoryBackend, StateBackend};
use tour_planner::util::version::{version_label, APP_NAME};

pub fn run() {
    tracing::info!("{APP_NAME} {}", version_label());

    match JsonFileBackend::from_env() {
        Ok(backend) => show_dashboard(TourStore::open(backend)),
        Err(err) => {
            tracing::warn!(error = %err, "no state file location; changes will not be saved");
            show_dashboard(TourStore::open(MemoryBackend::new()));
        }
    }
}

fn show_dashboard<B: StateBackend>(mut store: TourStore<B>) {
    if !store.opened_from_persisted() && store.is_empty() {
        tracing::info!(location = %store.backend().describe(), "first run; adding example catalog");
        store.seed_example_catalog();
    }

    let settings = store.settings();

    println!("Packages");
    for pkg in store.packages() {
        let quote = quote_package(pkg, store.routes(), settings);
        println!("  {}", pkg.name);
        print_quote(&quote, pkg.person_count, settings);
    }

    println!("Routes");
    for route in store.routes() {
        let quote = quote_route(route, settings);
        println!("  {} ({} stops, {} km)", route.name, route.stops.len(), route.kilometers);
        print_quote(&quote, route.person_count, settings);
    }
}

fn print_quote(quote: &Quote, person_count: u32, settings: &UserSettings) {
    println!(
        "    USD {:.2} | display {:.2} (rate {})",
        quote.total, quote.display_total, settings.exchange_rate
    );
    if person_count > 1 {
        println!("    USD {:.2} per person", quote.per_person);
    }
}
