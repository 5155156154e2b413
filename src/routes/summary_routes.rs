use axum::{Router, routing::get};

use crate::{AppState, controllers::summary_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/summary", get(summary_controller::get_summary))
}
