//! HTTP channel adapter: synchronous reading submission.
//!
//! `POST /api/readings/log` accepts `{unit_id, temperature, humidity,
//! timestamp?}`, validates field presence (zero is a valid value and must
//! not be rejected), and runs the shared ingestion pipeline with
//! `source = http`. The result is returned synchronously; this adapter has
//! no persistent connection, so live visibility of any generated alert
//! depends on the presentation layer polling the alert store.

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, response::Response, routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::error::IngestError;
use crate::models::{NewReading, Source};

use super::AppState;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/readings/log", post(log_reading))
}

/// Request body. Every numeric field is optional at the wire level so
/// missing fields produce a 400 rather than a deserialization failure.
#[derive(Debug, Deserialize)]
struct LogReadingBody {
    // ---
    unit_id: Option<i32>,
    temperature: Option<f64>,
    humidity: Option<f64>,
    timestamp: Option<DateTime<Utc>>,
}

impl LogReadingBody {
    /// Validate presence of the required fields and assemble the canonical
    /// reading; a missing timestamp gets arrival time.
    fn into_reading(self) -> Result<NewReading, IngestError> {
        // ---
        match (self.unit_id, self.temperature, self.humidity) {
            (Some(unit_id), Some(temperature), Some(humidity)) => Ok(NewReading {
                unit_id,
                ts: self.timestamp.unwrap_or_else(Utc::now),
                temperature,
                humidity,
                source: Source::Http,
            }),
            _ => Err(IngestError::Validation(
                "Missing required fields: unit_id, temperature, humidity".to_string(),
            )),
        }
    }
}

async fn log_reading(State(state): State<AppState>, Json(body): Json<LogReadingBody>) -> Response {
    // ---
    let reading = match body.into_reading() {
        Ok(reading) => reading,
        Err(e) => {
            // Client error, no side effects performed.
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })))
                .into_response();
        }
    };

    let echo = json!({
        "unit_id": reading.unit_id,
        "temperature": reading.temperature,
        "humidity": reading.humidity,
        "timestamp": reading.ts,
    });

    match state.pipeline.ingest(reading).await {
        Ok(_result) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Reading logged successfully",
                "data": echo,
            })),
        )
            .into_response(),
        Err(e) => {
            error!("failed to log reading: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Database error",
                    "details": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
