mod app;

use tour_planner::util::logging::init_tracing;

fn main() {
    init_tracing();
    app::run();
}
