//! In-process store backend.
//!
//! Backs the test suite and local development without a database. Failure
//! injection flags let tests exercise the pipeline's partial-failure policy
//! (reading writes fatal, alert writes best-effort).

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{Alert, NewReading, Reading, Severity, Threshold, Unit};

use super::{AlertStore, ReadingStore, ThresholdStore, UnitStore};

// ---

/// Shared in-memory tables. Clone-free: share via `Arc`.
#[derive(Default)]
pub struct MemStore {
    // ---
    units: Mutex<Vec<Unit>>,
    readings: Mutex<Vec<Reading>>,
    thresholds: Mutex<Vec<Threshold>>,
    alerts: Mutex<Vec<Alert>>,
    next_reading_id: AtomicI32,
    next_alert_id: AtomicI32,
    fail_readings: AtomicBool,
    fail_thresholds: AtomicBool,
    fail_alerts: AtomicBool,
}

impl MemStore {
    // ---
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_unit(&self, unit: Unit) {
        self.units.lock().unwrap().push(unit);
    }

    pub fn add_threshold(&self, threshold: Threshold) {
        self.thresholds.lock().unwrap().push(threshold);
    }

    /// Make subsequent reading inserts fail, as if the store were down.
    pub fn fail_readings(&self, fail: bool) {
        self.fail_readings.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent threshold lookups fail.
    pub fn fail_thresholds(&self, fail: bool) {
        self.fail_thresholds.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent alert inserts fail.
    pub fn fail_alerts(&self, fail: bool) {
        self.fail_alerts.store(fail, Ordering::SeqCst);
    }

    pub fn readings(&self) -> Vec<Reading> {
        self.readings.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }

    fn check(&self, flag: &AtomicBool, what: &str) -> Result<(), StoreError> {
        // ---
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable(format!("{what} store is down")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ReadingStore for MemStore {
    // ---
    async fn insert_reading(&self, reading: &NewReading) -> Result<(), StoreError> {
        // ---
        self.check(&self.fail_readings, "reading")?;

        let id = self.next_reading_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.readings.lock().unwrap().push(Reading {
            id,
            unit_id: reading.unit_id,
            ts: reading.ts,
            temperature: reading.temperature,
            humidity: reading.humidity,
            source: reading.source,
        });
        Ok(())
    }

    async fn latest_readings_by_unit(&self) -> Result<Vec<Reading>, StoreError> {
        // ---
        self.check(&self.fail_readings, "reading")?;

        let readings = self.readings.lock().unwrap();
        let mut latest: Vec<Reading> = Vec::new();
        for reading in readings.iter() {
            match latest.iter_mut().find(|r| r.unit_id == reading.unit_id) {
                Some(existing) if existing.ts < reading.ts => *existing = reading.clone(),
                Some(_) => {}
                None => latest.push(reading.clone()),
            }
        }
        latest.sort_by_key(|r| r.unit_id);
        Ok(latest)
    }

    async fn readings_for_unit_since(
        &self,
        unit_id: i32,
        since: DateTime<Utc>,
    ) -> Result<Vec<Reading>, StoreError> {
        // ---
        self.check(&self.fail_readings, "reading")?;

        let mut rows: Vec<Reading> = self
            .readings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.unit_id == unit_id && r.ts > since)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.ts);
        Ok(rows)
    }
}

#[async_trait]
impl ThresholdStore for MemStore {
    // ---
    async fn active_threshold_for(&self, unit_id: i32) -> Result<Option<Threshold>, StoreError> {
        // ---
        self.check(&self.fail_thresholds, "threshold")?;

        Ok(self
            .thresholds
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.unit_id == unit_id && t.active)
            .cloned())
    }
}

#[async_trait]
impl AlertStore for MemStore {
    // ---
    async fn insert_alert(
        &self,
        unit_id: i32,
        severity: Severity,
        message: &str,
        ts: DateTime<Utc>,
    ) -> Result<Alert, StoreError> {
        // ---
        self.check(&self.fail_alerts, "alert")?;

        let id = self.next_alert_id.fetch_add(1, Ordering::SeqCst) + 1;
        let alert = Alert {
            id,
            unit_id,
            severity,
            message: message.to_string(),
            ts,
            resolved: false,
        };
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(alert)
    }

    async fn recent_alerts(&self, limit: i64) -> Result<Vec<Alert>, StoreError> {
        // ---
        self.check(&self.fail_alerts, "alert")?;

        let mut rows = self.alerts.lock().unwrap().clone();
        rows.sort_by(|a, b| b.ts.cmp(&a.ts));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}

#[async_trait]
impl UnitStore for MemStore {
    // ---
    async fn list_units(&self) -> Result<Vec<Unit>, StoreError> {
        // ---
        let mut units = self.units.lock().unwrap().clone();
        units.sort_by_key(|u| u.unit_id);
        Ok(units)
    }
}
