//! Domain models for the cold-storage monitoring core.
//!
//! `NewReading` is the canonical form both channel adapters produce before
//! handing off to the ingestion pipeline; `Reading` and `Alert` are the
//! persisted rows the read-side endpoints serve back out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---

/// A physical storage unit from the external catalog.
///
/// Reference data only: the core reads these rows, never writes them.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Unit {
    // ---
    pub unit_id: i32,
    pub name: String,
    pub product_type: String,
    pub location: String,
}

/// Which channel produced a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Stream,
    Http,
}

impl Source {
    // ---
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Stream => "stream",
            Source::Http => "http",
        }
    }
}

impl TryFrom<String> for Source {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "stream" => Ok(Source::Stream),
            "http" => Ok(Source::Http),
            other => Err(format!("unknown reading source '{other}'")),
        }
    }
}

/// Alert severity, ordered by operator urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    // ---
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "critical" => Ok(Severity::Critical),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(format!("unknown alert severity '{other}'")),
        }
    }
}

// ---

/// A sensor sample as produced by a channel adapter, before persistence.
///
/// `ts` is source-supplied when present, otherwise assigned on arrival by
/// the adapter. Ordering for a unit is by `ts`, not arrival order.
#[derive(Debug, Clone)]
pub struct NewReading {
    // ---
    pub unit_id: i32,
    pub ts: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
    pub source: Source,
}

/// A persisted reading row. Append-only; never mutated or deleted.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Reading {
    // ---
    pub id: i32,
    pub unit_id: i32,
    pub ts: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
    #[sqlx(try_from = "String")]
    pub source: Source,
}

/// Active safe bounds for a unit. Externally administered; read-only here.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Threshold {
    // ---
    pub unit_id: i32,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity_min: f64,
    pub humidity_max: f64,
    pub active: bool,
}

/// A threshold violation the evaluator wants recorded.
///
/// Becomes an [`Alert`] once the store assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertCandidate {
    // ---
    pub severity: Severity,
    pub message: String,
}

/// A persisted alert row.
///
/// `ts` is copied from the triggering reading so alerts and readings can be
/// correlated exactly. `resolved` is only ever flipped by an external
/// operation, never by the ingestion path.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Alert {
    // ---
    pub id: i32,
    pub unit_id: i32,
    #[sqlx(try_from = "String")]
    pub severity: Severity,
    pub message: String,
    pub ts: DateTime<Utc>,
    pub resolved: bool,
}
