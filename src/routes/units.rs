//! Storage-unit catalog listing for the presentation layer.

use axum::{extract::State, response::IntoResponse, response::Response, routing::get, Json, Router};
use serde_json::json;
use tracing::error;

use super::AppState;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/storage-units", get(list_units))
}

async fn list_units(State(state): State<AppState>) -> Response {
    // ---
    match state.units.list_units().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => {
            error!("storage-units query failed: {e}");
            Json(json!([])).into_response()
        }
    }
}
