//! Recent-alerts projection for the presentation layer.

use axum::{extract::State, response::IntoResponse, response::Response, routing::get, Json, Router};
use serde_json::json;
use tracing::error;

use super::AppState;

// ---

/// How many alerts the dashboard panel shows at most.
const RECENT_ALERT_LIMIT: i64 = 50;

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/alerts", get(recent_alerts))
}

async fn recent_alerts(State(state): State<AppState>) -> Response {
    // ---
    match state.alerts.recent_alerts(RECENT_ALERT_LIMIT).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => {
            // Fail soft so a store hiccup never breaks the dashboard.
            error!("alerts query failed: {e}");
            Json(json!([])).into_response()
        }
    }
}
