//! Read-side reading projections for the presentation layer.
//!
//! `GET /api/readings/latest` seeds the dashboard with the most recent
//! reading per unit; `GET /api/readings/history?unit_id=&hours=` feeds the
//! trailing-window charts. Both fail soft: a store error is logged and an
//! empty collection returned, never a hard failure.

use axum::{
    extract::Query, extract::State, http::StatusCode, response::IntoResponse, response::Response,
    routing::get, Json, Router,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::AppState;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/readings/latest", get(latest))
        .route("/api/readings/history", get(history))
}

async fn latest(State(state): State<AppState>) -> Response {
    // ---
    match state.readings.latest_readings_by_unit().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => {
            error!("latest readings query failed: {e}");
            Json(json!([])).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    // ---
    unit_id: Option<i32>,
    hours: Option<i64>,
}

async fn history(State(state): State<AppState>, Query(params): Query<HistoryQuery>) -> Response {
    // ---
    let Some(unit_id) = params.unit_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing unit_id" })),
        )
            .into_response();
    };

    let since = Utc::now() - Duration::hours(params.hours.unwrap_or(24));

    match state.readings.readings_for_unit_since(unit_id, since).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => {
            error!(unit_id, "history query failed: {e}");
            Json(json!([])).into_response()
        }
    }
}
