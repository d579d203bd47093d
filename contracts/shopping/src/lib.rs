//! # Shopping Contract
//!
//! Tracks the delivery lifecycle of a single food order. Same strict
//! forward-only machine as the shipping contract, with the variant's own
//! second-stage label and alert message:
//!
//! ```text
//! Pending ──► Shopped ──► Delivered
//! ```
//!
//! Small enough to live in one file; the shipping crate shows the factored
//! layout.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, symbol_short, Env,
    String,
};


/// Message published with the arrival alert.
const ARRIVAL_ALERT: &str = "Your food order has arrived";

const DAY_IN_LEDGERS: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Lifecycle status of the order tracked by a contract instance.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OrderStatus {
    /// Awaiting fulfilment.
    Pending,
    /// Items picked and packed.
    Shopped,
    /// Arrived at the recipient; terminal.
    Delivered,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Current order stage (Instance).
    Status,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// The instance is not in the stage immediately preceding the
    /// requested one.
    InvalidTransition = 1,
}

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn load_status(env: &Env) -> OrderStatus {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Status)
        .unwrap_or(OrderStatus::Pending)
}

fn save_status(env: &Env, status: &OrderStatus) {
    env.storage().instance().set(&DataKey::Status, status);
    bump_instance(env);
}

#[contract]
pub struct Shopping;

#[contractimpl]
impl Shopping {
    /// Return the current order stage.
    ///
    /// Pure read; a freshly deployed instance reports
    /// [`OrderStatus::Pending`].
    pub fn status(env: Env) -> OrderStatus {
        load_status(&env)
    }

    /// Mark the order as picked and packed.
    ///
    /// Requires the instance to be `Pending`.
    pub fn shopped(env: Env) {
        let status = load_status(&env);
        if status != OrderStatus::Pending {
            panic_with_error!(&env, Error::InvalidTransition);
        }
        save_status(&env, &OrderStatus::Shopped);
    }

    /// Mark the order as arrived and publish the alert event.
    ///
    /// Requires the instance to be `Shopped`. Emits exactly one `alert`
    /// event carrying [`ARRIVAL_ALERT`].
    pub fn delivered(env: Env) {
        let status = load_status(&env);
        if status != OrderStatus::Shopped {
            panic_with_error!(&env, Error::InvalidTransition);
        }
        save_status(&env, &OrderStatus::Delivered);

        env.events().publish(
            (symbol_short!("alert"),),
            String::from_str(&env, ARRIVAL_ALERT),
        );
    }
}
