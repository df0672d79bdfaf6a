//! Postgres-backed stores over a shared connection pool.
//!
//! One handle implements every store trait; connections are acquired per
//! query from the pool and released when the future completes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::{Alert, NewReading, Reading, Severity, Threshold, Unit};

use super::{AlertStore, ReadingStore, ThresholdStore, UnitStore};

// ---

/// Store handle backed by a [`PgPool`], constructed once at startup.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    // ---
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadingStore for PgStore {
    // ---
    async fn insert_reading(&self, reading: &NewReading) -> Result<(), StoreError> {
        // ---
        sqlx::query(
            r#"
            INSERT INTO reading (unit_id, ts, temperature, humidity, source)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(reading.unit_id)
        .bind(reading.ts)
        .bind(reading.temperature)
        .bind(reading.humidity)
        .bind(reading.source.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn latest_readings_by_unit(&self) -> Result<Vec<Reading>, StoreError> {
        // ---
        let rows = sqlx::query_as::<_, Reading>(
            r#"
            SELECT DISTINCT ON (unit_id)
                id, unit_id, ts, temperature, humidity, source
            FROM reading
            ORDER BY unit_id, ts DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn readings_for_unit_since(
        &self,
        unit_id: i32,
        since: DateTime<Utc>,
    ) -> Result<Vec<Reading>, StoreError> {
        // ---
        let rows = sqlx::query_as::<_, Reading>(
            r#"
            SELECT id, unit_id, ts, temperature, humidity, source
            FROM reading
            WHERE unit_id = $1 AND ts > $2
            ORDER BY ts ASC
            "#,
        )
        .bind(unit_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl ThresholdStore for PgStore {
    // ---
    async fn active_threshold_for(&self, unit_id: i32) -> Result<Option<Threshold>, StoreError> {
        // ---
        let row = sqlx::query_as::<_, Threshold>(
            r#"
            SELECT unit_id, temp_min, temp_max, humidity_min, humidity_max, active
            FROM threshold
            WHERE unit_id = $1 AND active = true
            LIMIT 1
            "#,
        )
        .bind(unit_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

#[async_trait]
impl AlertStore for PgStore {
    // ---
    async fn insert_alert(
        &self,
        unit_id: i32,
        severity: Severity,
        message: &str,
        ts: DateTime<Utc>,
    ) -> Result<Alert, StoreError> {
        // ---
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alert (unit_id, severity, message, ts, resolved)
            VALUES ($1, $2, $3, $4, false)
            RETURNING id, unit_id, severity, message, ts, resolved
            "#,
        )
        .bind(unit_id)
        .bind(severity.as_str())
        .bind(message)
        .bind(ts)
        .fetch_one(&self.pool)
        .await?;

        Ok(alert)
    }

    async fn recent_alerts(&self, limit: i64) -> Result<Vec<Alert>, StoreError> {
        // ---
        let rows = sqlx::query_as::<_, Alert>(
            r#"
            SELECT id, unit_id, severity, message, ts, resolved
            FROM alert
            ORDER BY ts DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl UnitStore for PgStore {
    // ---
    async fn list_units(&self) -> Result<Vec<Unit>, StoreError> {
        // ---
        let rows = sqlx::query_as::<_, Unit>(
            r#"
            SELECT unit_id, name, product_type, location
            FROM storage_unit
            ORDER BY unit_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
