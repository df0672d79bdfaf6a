//! Cold-storage environmental monitoring backend.
//!
//! The core is the reading-ingestion and threshold-alerting pipeline:
//! readings arrive from two independent channels (a streaming bus
//! subscription and a synchronous HTTP submission), are persisted, are
//! evaluated against the unit's active threshold, and at most one alert
//! per violation is recorded and announced.
//!
//! Module map:
//! - [`models`] - canonical domain types shared by every layer
//! - [`store`] - durable store traits plus Postgres and in-memory backends
//! - [`evaluate`] - the pure threshold evaluator
//! - [`pipeline`] - the shared ingestion orchestration
//! - [`bus`] - topic-routed live announcement hub
//! - [`adapters`] - the streaming channel adapter
//! - [`routes`] - HTTP adapter and read-side query endpoints
//! - [`config`], [`schema`], [`error`] - ambient plumbing

pub mod adapters;
pub mod bus;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod schema;
pub mod store;

pub use config::Config;
