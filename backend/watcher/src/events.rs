//! Canonical event types emitted by the order-status contracts.
//!
//! Both the shipping and shopping contracts publish the same event shape:
//! topic `("alert",)` with a string message as data. Everything else coming
//! out of a watched contract is kept as [`EventKind::Unknown`] so it still
//! lands in the database for inspection.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the order-status contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// An order reached its terminal stage (`alert` topic).
    NewAlert,
    /// An event from a watched contract that we don't recognise.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an
    /// [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "alert" => Self::NewAlert,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewAlert => "new_alert",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded delivery alert, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryAlert {
    pub event_type: String,
    /// The human-readable message published with the alert, e.g.
    /// "Your package has arrived".
    pub message: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// An alert row as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AlertRecord {
    pub id: i64,
    pub event_type: String,
    pub message: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
