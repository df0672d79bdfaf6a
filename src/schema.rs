//! Database schema management for `coldwatch`.
//!
//! Ensures required tables and indexes exist before serving requests.
//! Applied once on startup from `main.rs`.

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create or update the database schema (idempotent).
///
/// Creates the storage-unit catalog, the append-only `reading` log, the
/// externally administered `threshold` table, and the `alert` log. Safe to
/// call on every startup; no-op if objects already exist.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    // Catalog of physical storage units (reference data, read-only here)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS storage_unit (
            unit_id      SERIAL PRIMARY KEY,
            name         TEXT NOT NULL,
            product_type TEXT NOT NULL,
            location     TEXT NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Append-only log of sensor readings from both channels
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reading (
            id          SERIAL PRIMARY KEY,
            unit_id     INTEGER          NOT NULL,
            ts          TIMESTAMPTZ      NOT NULL,
            temperature DOUBLE PRECISION NOT NULL,
            humidity    DOUBLE PRECISION NOT NULL,
            source      TEXT             NOT NULL
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Safe bounds per unit; at most one active row per unit matters
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS threshold (
            id           SERIAL PRIMARY KEY,
            unit_id      INTEGER          NOT NULL,
            temp_min     DOUBLE PRECISION NOT NULL,
            temp_max     DOUBLE PRECISION NOT NULL,
            humidity_min DOUBLE PRECISION NOT NULL,
            humidity_max DOUBLE PRECISION NOT NULL,
            active       BOOLEAN          NOT NULL DEFAULT true
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Derived alert records; `resolved` is flipped externally, never here
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS alert (
            id       SERIAL PRIMARY KEY,
            unit_id  INTEGER     NOT NULL,
            severity TEXT        NOT NULL,
            message  TEXT        NOT NULL,
            ts       TIMESTAMPTZ NOT NULL,
            resolved BOOLEAN     NOT NULL DEFAULT false
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Indexes for the hot queries: history per unit, recent alerts
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_reading_unit_ts
            ON reading (unit_id, ts);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_threshold_active_unit
            ON threshold (unit_id) WHERE active;
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_alert_ts
            ON alert (ts DESC);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
