//! Error taxonomy for the ingestion core.
//!
//! Store backends surface [`StoreError`]; the ingestion pipeline folds those
//! into [`IngestError`] so every call site (HTTP handler, streaming adapter)
//! can decide locally whether to retry, log, or surface. Malformed inbound
//! stream payloads never reach this layer; the streaming adapter logs and
//! drops them before the pipeline is involved.

use thiserror::Error;

// ---

/// Failure reported by a durable store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying database rejected or failed the operation.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store could not be reached at all.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a single `ingest` call.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The submission is missing required fields. No side effects occurred.
    #[error("{0}")]
    Validation(String),

    /// The reading could not be persisted. Fatal to the call: an
    /// unpersisted reading must never generate an alert.
    #[error("failed to persist reading: {0}")]
    Storage(#[source] StoreError),

    /// A suspending step exceeded its time bound.
    #[error("timed out while {0}")]
    Timeout(&'static str),
}
