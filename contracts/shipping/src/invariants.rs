#![allow(dead_code)]

extern crate std;

use crate::types::OrderStatus;

/// INV-1: Status transition validity. Only single forward steps are allowed:
///   Pending -> Shipped
///   Shipped -> Delivered
///   Delivered -> (none)
pub fn assert_valid_status_transition(from: &OrderStatus, to: &OrderStatus) {
    let valid = matches!(
        (from, to),
        (OrderStatus::Pending, OrderStatus::Shipped)
            | (OrderStatus::Shipped, OrderStatus::Delivered)
    );

    assert!(
        valid,
        "INV-1 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// INV-2: `Delivered` is terminal — it has no successor stage.
pub fn assert_terminal_is_absorbing() {
    assert_eq!(
        OrderStatus::Delivered.next(),
        None,
        "INV-2 violated: Delivered must have no successor"
    );
}

/// INV-3: the `next()` chain visits every stage exactly once, in order.
pub fn assert_stage_chain_complete() {
    assert_eq!(OrderStatus::Pending.next(), Some(OrderStatus::Shipped));
    assert_eq!(OrderStatus::Shipped.next(), Some(OrderStatus::Delivered));
    assert_eq!(OrderStatus::Delivered.next(), None);
}
