//! Database layer — migrations, queries, and cursor management.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::Result;
use crate::events::{AlertRecord, DeliveryAlert};

/// Establish a SQLite connection pool and run pending migrations.
///
/// The database file is created if it doesn't exist yet, so a fresh
/// deployment starts from an empty store instead of failing to connect.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Cursor helpers
// ─────────────────────────────────────────────────────────

/// Read the resume position for one watched contract.
/// Returns `(0, None)` when the contract has never been scanned.
pub async fn get_cursor(pool: &SqlitePool, contract_id: &str) -> Result<(i64, Option<String>)> {
    let row: Option<(i64, Option<String>)> = sqlx::query_as(
        "SELECT last_ledger, last_cursor FROM watcher_cursor WHERE contract_id = ?1",
    )
    .bind(contract_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.unwrap_or((0, None)))
}

/// Persist the resume position for one watched contract, creating the row
/// on first save.
pub async fn save_cursor(
    pool: &SqlitePool,
    contract_id: &str,
    last_ledger: i64,
    last_cursor: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO watcher_cursor (contract_id, last_ledger, last_cursor)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (contract_id)
        DO UPDATE SET last_ledger = ?2, last_cursor = ?3
        "#,
    )
    .bind(contract_id)
    .bind(last_ledger)
    .bind(last_cursor)
    .execute(pool)
    .await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Alert writes
// ─────────────────────────────────────────────────────────

/// Persist a batch of decoded alerts. Alerts that share the same
/// `(ledger, tx_hash, contract_id, event_type)` tuple are silently ignored
/// to make the watcher idempotent across re-polled pages; a missing
/// tx_hash dedupes as the empty string.
pub async fn insert_alerts(pool: &SqlitePool, alerts: &[DeliveryAlert]) -> Result<usize> {
    let mut count = 0usize;
    for alert in alerts {
        let rows_affected = sqlx::query(
            r#"
            INSERT OR IGNORE INTO alerts
                (event_type, message, ledger, timestamp, contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&alert.event_type)
        .bind(&alert.message)
        .bind(alert.ledger)
        .bind(alert.timestamp)
        .bind(&alert.contract_id)
        .bind(&alert.tx_hash)
        .execute(pool)
        .await?
        .rows_affected();

        count += rows_affected as usize;
    }
    Ok(count)
}

// ─────────────────────────────────────────────────────────
// Alert reads
// ─────────────────────────────────────────────────────────

/// Fetch all alerts for one contract instance, ordered by ledger ascending.
pub async fn get_alerts_for_contract(
    pool: &SqlitePool,
    contract_id: &str,
) -> Result<Vec<AlertRecord>> {
    let rows = sqlx::query_as::<_, AlertRecord>(
        r#"
        SELECT id, event_type, message, ledger, timestamp,
               contract_id, tx_hash, created_at
        FROM   alerts
        WHERE  contract_id = ?1
        ORDER  BY ledger ASC, id ASC
        "#,
    )
    .bind(contract_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch all alerts across all watched contracts, ordered by ledger
/// ascending.
pub async fn get_all_alerts(pool: &SqlitePool) -> Result<Vec<AlertRecord>> {
    let rows = sqlx::query_as::<_, AlertRecord>(
        r#"
        SELECT id, event_type, message, ledger, timestamp,
               contract_id, tx_hash, created_at
        FROM   alerts
        ORDER  BY ledger ASC, id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
