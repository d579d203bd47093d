//! # Shipping Contract
//!
//! Tracks the delivery lifecycle of a single shipment. Each deployed
//! instance represents exactly one order; there is no order collection and
//! no identifier beyond the instance address itself.
//!
//! | Phase    | Entry Point(s)             |
//! |----------|----------------------------|
//! | Query    | [`Shipping::status`]       |
//! | Dispatch | [`Shipping::shipped`]      |
//! | Arrival  | [`Shipping::delivered`]    |
//!
//! ## Architecture
//!
//! The status lifecycle lives in [`types`]; storage access is fully
//! delegated to [`storage`]. This file contains only the public entry
//! points, the transition gates, and the arrival event emission.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, symbol_short, Env, String,
};

mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

use storage::{load_status, save_status};
pub use types::OrderStatus;

/// Message published with the arrival alert.
const ARRIVAL_ALERT: &str = "Your package has arrived";

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// The instance is not in the stage immediately preceding the
    /// requested one.
    InvalidTransition = 1,
}

#[contract]
pub struct Shipping;

#[contractimpl]
impl Shipping {
    /// Return the current shipment stage.
    ///
    /// Pure read; a freshly deployed instance reports
    /// [`OrderStatus::Pending`].
    pub fn status(env: Env) -> OrderStatus {
        load_status(&env)
    }

    /// Mark the shipment as handed to the carrier.
    ///
    /// Requires the instance to be `Pending`; anything else panics with
    /// `Error::InvalidTransition`.
    pub fn shipped(env: Env) {
        let status = load_status(&env);
        if status != OrderStatus::Pending {
            panic_with_error!(&env, Error::InvalidTransition);
        }
        save_status(&env, &OrderStatus::Shipped);
    }

    /// Mark the shipment as arrived and publish the alert event.
    ///
    /// Requires the instance to be `Shipped`; skipping straight from
    /// `Pending` or re-delivering panics with `Error::InvalidTransition`.
    /// Emits exactly one `alert` event carrying [`ARRIVAL_ALERT`].
    pub fn delivered(env: Env) {
        let status = load_status(&env);
        if status != OrderStatus::Shipped {
            panic_with_error!(&env, Error::InvalidTransition);
        }
        save_status(&env, &OrderStatus::Delivered);

        env.events().publish(
            (symbol_short!("alert"),),
            String::from_str(&env, ARRIVAL_ALERT),
        );
    }
}
