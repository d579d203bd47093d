//! # Types
//!
//! ## Status as a Finite-State Machine
//!
//! [`OrderStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Pending ──► Shipped ──► Delivered
//! ```
//!
//! Each advancing entry point requires the instance to sit in the
//! immediately preceding stage; backward transitions, stage skips, and
//! transitions out of the terminal `Delivered` state are rejected with
//! `Error::InvalidTransition`.

use soroban_sdk::contracttype;

/// Lifecycle status of the shipment tracked by a contract instance.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OrderStatus {
    /// Awaiting dispatch.
    Pending,
    /// Handed to the carrier.
    Shipped,
    /// Arrived at the recipient; terminal.
    Delivered,
}

impl OrderStatus {
    /// The stage that must follow `self`, or `None` once terminal.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }
}
