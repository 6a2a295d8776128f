//! Router construction.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the axum router for the given state, honoring the mount path.
pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(handlers::root))
        .route("/lookup", get(handlers::lookup::lookup))
        .route("/dictionaries", get(handlers::dictionaries::dictionaries))
        .route("/slob", get(handlers::content::list_info))
        .route("/slob/:dict", get(handlers::content::dict_info))
        .route("/slob/:dict/*key", get(handlers::content::content));

    let mount = state.mount.clone();
    let app = if mount.is_empty() {
        routes.with_state(state)
    } else {
        Router::new().nest(&mount, routes.with_state(state))
    };

    app.layer(TraceLayer::new_for_http())
}
