//! Route gateway for the `coldwatch` API.
//!
//! Each endpoint lives in its own sibling module exporting a subrouter;
//! this gateway merges them and attaches the shared state so `main.rs`
//! never needs to know about individual endpoints.

use std::sync::Arc;

use axum::Router;

use crate::pipeline::IngestionPipeline;
use crate::store::{AlertStore, ReadingStore, UnitStore};

mod alerts;
mod health;
mod ingest;
mod readings;
mod units;

// ---

/// Shared state handed to every route handler.
///
/// Store handles are trait objects so the same router runs over Postgres in
/// production and over the in-memory backend in tests.
#[derive(Clone)]
pub struct AppState {
    // ---
    pub pipeline: Arc<IngestionPipeline>,
    pub readings: Arc<dyn ReadingStore>,
    pub alerts: Arc<dyn AlertStore>,
    pub units: Arc<dyn UnitStore>,
}

pub fn router(state: AppState) -> Router {
    // ---
    Router::new()
        .merge(ingest::router())
        .merge(readings::router())
        .merge(alerts::router())
        .merge(units::router())
        .merge(health::router())
        .with_state(state)
}
