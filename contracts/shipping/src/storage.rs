//! # Storage
//!
//! The contract keeps a single instance-tier entry:
//!
//! | Key      | Type          | Description                       |
//! |----------|---------------|-----------------------------------|
//! | `Status` | `OrderStatus` | Current stage of the one shipment |
//!
//! A missing entry reads as [`OrderStatus::Pending`], so a freshly deployed
//! instance starts in the first stage without any constructor call.
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day
//! remaining, on every read and write.

use soroban_sdk::{contracttype, Env};

use crate::types::OrderStatus;

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// All contract storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Current shipment stage (Instance).
    Status,
}

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Read the current status, defaulting to `Pending` for a fresh instance.
pub fn load_status(env: &Env) -> OrderStatus {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Status)
        .unwrap_or(OrderStatus::Pending)
}

/// Overwrite the stored status.
pub fn save_status(env: &Env, status: &OrderStatus) {
    env.storage().instance().set(&DataKey::Status, status);
    bump_instance(env);
}
