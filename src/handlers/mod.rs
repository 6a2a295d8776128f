//! HTTP handlers, one module per surface.

pub mod content;
pub mod dictionaries;
pub mod lookup;

use axum::extract::State;
use axum::response::Redirect;

use crate::state::AppState;

/// `GET /` — send the browser to the lookup page.
pub async fn root(State(state): State<AppState>) -> Redirect {
    Redirect::to(&format!("{}/lookup", state.mount))
}
