//! Long-running background task that polls the Soroban RPC and records the
//! delivery alerts each watched contract emits.
//!
//! Every order-status contract is an independent instance with its own
//! lifecycle, so each one scans on its own resume position: a slow or
//! erroring instance never stalls the others, and a restart picks each
//! instance up exactly where its own scan stopped.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tracing::{error, info};

use crate::config::Config;
use crate::db;
use crate::rpc;

pub struct WatcherState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Per-contract scan position, mirrored in the `watcher_cursor` table.
struct ScanPosition {
    contract_id: String,
    start_ledger: u32,
    cursor: Option<String>,
}

impl ScanPosition {
    /// Restore a contract's position from the database, falling back to the
    /// configured start ledger for a never-scanned instance.
    async fn restore(pool: &SqlitePool, contract_id: &str, default_start: u32) -> Self {
        let (last_ledger, cursor) = db::get_cursor(pool, contract_id).await.unwrap_or((0, None));
        let start_ledger = if last_ledger > 0 {
            last_ledger as u32
        } else {
            default_start
        };
        ScanPosition {
            contract_id: contract_id.to_string(),
            start_ledger,
            cursor,
        }
    }
}

/// Spawn the watcher loop as a background [`tokio`] task.
pub async fn run(state: Arc<WatcherState>) {
    info!(
        "Watcher starting — {} contract(s) to scan",
        state.config.contract_ids.len()
    );

    let mut positions = Vec::with_capacity(state.config.contract_ids.len());
    for contract_id in &state.config.contract_ids {
        let position =
            ScanPosition::restore(&state.pool, contract_id, state.config.start_ledger).await;
        info!(
            "{}: resuming from ledger {}",
            position.contract_id, position.start_ledger
        );
        positions.push(position);
    }

    loop {
        for position in &mut positions {
            if let Err(e) = poll_contract(&state, position).await {
                error!("{}: poll error: {e}", position.contract_id);
            }
        }

        tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)).await;
    }
}

/// Poll one contract's event stream and advance its scan position.
async fn poll_contract(
    state: &WatcherState,
    position: &mut ScanPosition,
) -> crate::errors::Result<()> {
    let (raw_events, next_cursor, latest_ledger) = rpc::fetch_events(
        &state.client,
        &state.config.rpc_url,
        std::slice::from_ref(&position.contract_id),
        position.start_ledger,
        position.cursor.as_deref(),
        state.config.events_per_page,
    )
    .await?;

    if !raw_events.is_empty() {
        let alerts = rpc::decode_events(&raw_events);
        let inserted = db::insert_alerts(&state.pool, &alerts).await?;
        if inserted > 0 {
            for alert in &alerts {
                if let Some(message) = &alert.message {
                    info!("{}: \"{message}\"", alert.contract_id);
                }
            }
            info!("{}: {inserted} new alert(s) stored", position.contract_id);
        }
    }

    // A returned cursor means more pages remain in the current range: keep
    // the start ledger until pagination drains, then jump to the latest
    // known ledger.
    if next_cursor.is_none() {
        if let Some(latest) = latest_ledger {
            position.start_ledger = (latest as u32).max(position.start_ledger);
        }
    }
    position.cursor = next_cursor;

    // Persist this contract's position so restarts are deterministic.
    db::save_cursor(
        &state.pool,
        &position.contract_id,
        position.start_ledger as i64,
        position.cursor.as_deref(),
    )
    .await?;

    Ok(())
}
