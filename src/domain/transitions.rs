//! Single source of truth for which role may drive which order-status edge.

use super::order::OrderStatus;
use super::user::Role;

/// Capability table over the four roles.
///
/// Couriers claim unassigned orders (PAID -> ACCEPTED) and then walk them to
/// completion, directly or via DELIVERING. Admins may force any edge of the
/// state machine, including cancellation, for oversight and dispute
/// resolution. Buyers and sellers never advance an order themselves: checkout
/// creates it already PAID, and seller preparation has no status of its own.
/// The PICKED_UP branch is admin-driven only.
pub fn role_may_drive(role: Role, from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    match role {
        Role::Admin => true,
        Role::Delivery => matches!(
            (from, to),
            (Paid, Accepted)
                | (Accepted, Delivering)
                | (Accepted, Completed)
                | (Delivering, Completed)
        ),
        Role::Buyer | Role::Seller => false,
    }
}

/// A claim is the exclusive PAID -> ACCEPTED grab by a courier.
pub fn is_claim(from: OrderStatus, to: OrderStatus) -> bool {
    from == OrderStatus::Paid && to == OrderStatus::Accepted
}
