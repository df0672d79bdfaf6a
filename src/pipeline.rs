//! Ingestion pipeline: persist a reading, evaluate it against the unit's
//! active threshold, and conditionally persist a derived alert.
//!
//! Both channel adapters call [`IngestionPipeline::ingest`] concurrently
//! with no mutual exclusion; every step relies only on single-row insert
//! atomicity in the stores. Partial-failure policy: readings are
//! authoritative, alerts are best-effort derivations. A reading-write
//! failure aborts the call; an alert-write failure after the reading is
//! down merely loses the alert (logged for operator reconciliation).
//!
//! No deduplication is attempted across channels: two readings carrying the
//! same violation each spawn their own alert row.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, error, warn};

use crate::error::{IngestError, StoreError};
use crate::evaluate::evaluate;
use crate::models::{Alert, NewReading};
use crate::store::{AlertStore, ReadingStore, ThresholdStore};

// ---

/// Outcome of one `ingest` call.
#[derive(Debug)]
pub struct IngestResult {
    /// True whenever the call returned `Ok`: the reading is durable.
    pub stored: bool,

    /// The persisted alert, if the reading violated the active threshold
    /// and the alert row was written. Callers that can announce (the
    /// streaming adapter) act on `Some`.
    pub alert: Option<Alert>,
}

/// Shared orchestration for both ingestion channels.
///
/// Holds injected store handles; constructed once at startup.
pub struct IngestionPipeline {
    // ---
    readings: Arc<dyn ReadingStore>,
    thresholds: Arc<dyn ThresholdStore>,
    alerts: Arc<dyn AlertStore>,
    step_timeout: Duration,
}

impl IngestionPipeline {
    // ---
    pub fn new(
        readings: Arc<dyn ReadingStore>,
        thresholds: Arc<dyn ThresholdStore>,
        alerts: Arc<dyn AlertStore>,
        step_timeout: Duration,
    ) -> Self {
        Self {
            readings,
            thresholds,
            alerts,
            step_timeout,
        }
    }

    /// Ingest one canonical reading from either channel.
    ///
    /// Each suspending step is individually bounded by the configured
    /// timeout so one slow store cannot stall a channel indefinitely.
    pub async fn ingest(&self, reading: NewReading) -> Result<IngestResult, IngestError> {
        // ---
        // Step 1: the reading write. Fatal on failure; an unpersisted
        // reading must never generate an alert.
        match timeout(self.step_timeout, self.readings.insert_reading(&reading)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(IngestError::Storage(e)),
            Err(_) => return Err(IngestError::Timeout("persisting reading")),
        }

        debug!(
            unit_id = reading.unit_id,
            temperature = reading.temperature,
            humidity = reading.humidity,
            source = reading.source.as_str(),
            "reading persisted"
        );

        // Step 2: threshold lookup. Fails open: a reading that cannot be
        // evaluated is stored but unaudited for violations.
        let threshold = match timeout(
            self.step_timeout,
            self.thresholds.active_threshold_for(reading.unit_id),
        )
        .await
        {
            Ok(Ok(t)) => t,
            Ok(Err(e)) => {
                warn!(
                    unit_id = reading.unit_id,
                    "threshold lookup failed, treating unit as unmonitored: {e}"
                );
                None
            }
            Err(_) => {
                warn!(
                    unit_id = reading.unit_id,
                    "threshold lookup timed out, treating unit as unmonitored"
                );
                None
            }
        };

        let Some(threshold) = threshold else {
            return Ok(IngestResult {
                stored: true,
                alert: None,
            });
        };

        // Step 3: pure evaluation, never suspends.
        let Some(candidate) = evaluate(&reading, &threshold) else {
            return Ok(IngestResult {
                stored: true,
                alert: None,
            });
        };

        // Step 4: alert write. Best-effort relative to the reading.
        let alert = match timeout(
            self.step_timeout,
            self.alerts.insert_alert(
                reading.unit_id,
                candidate.severity,
                &candidate.message,
                reading.ts,
            ),
        )
        .await
        {
            Ok(Ok(alert)) => Some(alert),
            Ok(Err(e)) => {
                self.report_lost_alert(&reading, &candidate.message, &e);
                None
            }
            Err(_) => {
                error!(
                    unit_id = reading.unit_id,
                    alert_message = %candidate.message,
                    "alert insert timed out; reading kept, alert lost"
                );
                None
            }
        };

        Ok(IngestResult {
            stored: true,
            alert,
        })
    }

    fn report_lost_alert(&self, reading: &NewReading, message: &str, err: &StoreError) {
        // ---
        error!(
            unit_id = reading.unit_id,
            ts = %reading.ts,
            alert_message = message,
            "failed to persist alert; reading kept, alert lost: {err}"
        );
    }
}
