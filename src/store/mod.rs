//! Durable store seams for the ingestion core.
//!
//! The pipeline and routes depend on these traits, never on a concrete
//! backend, so the same orchestration runs against Postgres in production
//! ([`PgStore`]) and against the in-process backend ([`MemStore`]) in the
//! test suite. Handles are constructed once at startup and injected; there
//! is no lazily-initialized global state.
//!
//! The stores are externally synchronized: the core relies on single-row
//! insert atomicity and performs no read-modify-write on shared state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{Alert, NewReading, Reading, Severity, Threshold, Unit};

mod memory;
mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

// ---

/// Append-only log of sensor readings.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Persist one reading, tagged with its source channel.
    async fn insert_reading(&self, reading: &NewReading) -> Result<(), StoreError>;

    /// The most recent reading per unit, for UI seeding.
    async fn latest_readings_by_unit(&self) -> Result<Vec<Reading>, StoreError>;

    /// All readings for a unit since `since`, ordered by timestamp ascending.
    async fn readings_for_unit_since(
        &self,
        unit_id: i32,
        since: DateTime<Utc>,
    ) -> Result<Vec<Reading>, StoreError>;
}

/// Read-only accessor for per-unit safe bounds.
#[async_trait]
pub trait ThresholdStore: Send + Sync {
    /// The active threshold for a unit, or `None` if the unit is unmonitored.
    async fn active_threshold_for(&self, unit_id: i32) -> Result<Option<Threshold>, StoreError>;
}

/// Durable log of alert records.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Insert an alert with `resolved = false`; the store assigns the id.
    async fn insert_alert(
        &self,
        unit_id: i32,
        severity: Severity,
        message: &str,
        ts: DateTime<Utc>,
    ) -> Result<Alert, StoreError>;

    /// The `limit` most recent alerts, ordered by timestamp descending.
    async fn recent_alerts(&self, limit: i64) -> Result<Vec<Alert>, StoreError>;
}

/// Read-only accessor for the storage-unit catalog.
#[async_trait]
pub trait UnitStore: Send + Sync {
    /// All known units, ordered by id.
    async fn list_units(&self) -> Result<Vec<Unit>, StoreError>;
}
