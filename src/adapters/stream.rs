//! Streaming channel adapter.
//!
//! Holds one long-lived subscription to the per-unit reading topics
//! (`{namespace}/+/readings`), feeds each decoded sample through the
//! ingestion pipeline with `source = stream`, and re-announces any created
//! alert on `{namespace}/alerts` so live subscribers observe it without
//! polling. Stateless per message; one message's failure never stops the
//! subscription.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use crate::bus::{topic_matches, Bus, Message};
use crate::models::{NewReading, Source};
use crate::pipeline::IngestionPipeline;

// ---

/// Wire form of a reading message. `ts` is accepted as an alias for
/// `timestamp`; a missing timestamp falls back to arrival time.
#[derive(Debug, Deserialize)]
struct ReadingPayload {
    // ---
    unit_id: i32,
    temperature: f64,
    humidity: f64,
    #[serde(default, alias = "ts")]
    timestamp: Option<DateTime<Utc>>,
}

/// Long-lived adapter between the live bus and the ingestion pipeline.
pub struct StreamAdapter {
    // ---
    pipeline: Arc<IngestionPipeline>,
    bus: Arc<Bus>,
    reading_filter: String,
    alert_topic: String,
}

impl StreamAdapter {
    // ---
    pub fn new(pipeline: Arc<IngestionPipeline>, bus: Arc<Bus>, namespace: &str) -> Self {
        Self {
            pipeline,
            bus,
            reading_filter: format!("{namespace}/+/readings"),
            alert_topic: format!("{namespace}/alerts"),
        }
    }

    /// Consume reading messages until the bus closes.
    ///
    /// Run as a background task: `tokio::spawn(adapter.run())`.
    pub async fn run(self) {
        // ---
        let mut rx = self.bus.subscribe();
        info!("streaming adapter subscribed to {}", self.reading_filter);

        loop {
            let message = match rx.recv().await {
                Ok(message) => message,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("streaming adapter lagged, {skipped} messages dropped");
                    continue;
                }
                Err(RecvError::Closed) => {
                    info!("live bus closed, streaming adapter stopping");
                    return;
                }
            };

            if !topic_matches(&self.reading_filter, &message.topic) {
                continue;
            }

            self.handle_reading(message).await;
        }
    }

    async fn handle_reading(&self, message: Message) {
        // ---
        let payload: ReadingPayload = match serde_json::from_value(message.payload) {
            Ok(payload) => payload,
            Err(e) => {
                // Malformed messages are dropped; the subscription lives on.
                warn!(topic = %message.topic, "dropping malformed reading: {e}");
                return;
            }
        };

        debug!(
            "received: unit {} | {}C | {}%",
            payload.unit_id, payload.temperature, payload.humidity
        );

        let reading = NewReading {
            unit_id: payload.unit_id,
            ts: payload.timestamp.unwrap_or_else(Utc::now),
            temperature: payload.temperature,
            humidity: payload.humidity,
            source: Source::Stream,
        };

        match self.pipeline.ingest(reading).await {
            Ok(result) => {
                if let Some(alert) = result.alert {
                    // Best-effort announcement; the alert row is already
                    // durable and remains the source of truth.
                    self.bus.publish(
                        &self.alert_topic,
                        json!({
                            "unit_id": alert.unit_id,
                            "severity": alert.severity,
                            "message": alert.message,
                            "ts": alert.ts,
                            "resolved": false,
                        }),
                    );
                    info!(
                        unit_id = alert.unit_id,
                        severity = alert.severity.as_str(),
                        "alert generated and published"
                    );
                }
            }
            Err(e) => {
                error!(topic = %message.topic, "failed to ingest stream reading: {e}");
            }
        }
    }
}
