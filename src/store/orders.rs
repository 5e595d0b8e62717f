//! Order book: owns every order ever created and drives its state machine.
//!
//! Orders are never deleted, only transitioned; the book is the audit record.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{GeoPoint, Order, OrderStatus};
use crate::domain::transitions;
use crate::domain::user::Role;

use super::{read_guard, write_guard};

#[derive(Default)]
struct Book {
    orders: HashMap<Uuid, Order>,
    // Insertion sequence, oldest first; listing walks it backwards.
    sequence: Vec<Uuid>,
}

#[derive(Default)]
pub struct OrderStore {
    inner: RwLock<Book>,
}

pub struct OrderPage {
    pub items: Vec<Order>,
    pub total: i64,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole book, used when loading a persisted snapshot.
    /// `orders` is expected newest first, as `list` produces it.
    pub fn replace_all(&self, orders: Vec<Order>) -> Result<(), DomainError> {
        let mut book = write_guard(&self.inner)?;
        book.sequence = orders.iter().rev().map(|o| o.id).collect();
        book.orders = orders.into_iter().map(|o| (o.id, o)).collect();
        Ok(())
    }

    pub fn insert(&self, order: Order) -> Result<(), DomainError> {
        let mut book = write_guard(&self.inner)?;
        book.sequence.push(order.id);
        book.orders.insert(order.id, order);
        Ok(())
    }

    pub fn get(&self, order_id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(read_guard(&self.inner)?.orders.get(&order_id).cloned())
    }

    /// Newest first, `page` 1-based.
    pub fn list(&self, page: i64, limit: i64) -> Result<OrderPage, DomainError> {
        let book = read_guard(&self.inner)?;
        // Saturate: a huge requested page is an empty page, not an overflow.
        let offset = page.saturating_sub(1).saturating_mul(limit).max(0) as usize;
        let items = book
            .sequence
            .iter()
            .rev()
            .skip(offset)
            .take(limit.max(0) as usize)
            .filter_map(|id| book.orders.get(id).cloned())
            .collect();
        Ok(OrderPage {
            items,
            total: book.sequence.len() as i64,
        })
    }

    /// Move an order along one edge of the state machine on behalf of
    /// `requester`. Edge legality is checked first, then the role capability
    /// table, all under the book's write lock so a claim is a single
    /// compare-and-swap on `(status, delivery_id)`.
    pub fn advance(
        &self,
        order_id: Uuid,
        requester_id: Uuid,
        requester_role: Role,
        new_status: OrderStatus,
    ) -> Result<Order, DomainError> {
        let mut book = write_guard(&self.inner)?;
        let order = book.orders.get_mut(&order_id).ok_or(DomainError::NotFound)?;
        let from = order.status;

        if !from.can_transition_to(new_status) {
            // A courier racing for an order that was just claimed sees it
            // already ACCEPTED; surface that as the race outcome, not a bug.
            if requester_role == Role::Delivery
                && new_status == OrderStatus::Accepted
                && from == OrderStatus::Accepted
                && order.delivery_id.is_some()
            {
                return Err(DomainError::AlreadyClaimed);
            }
            return Err(DomainError::IllegalTransition {
                from,
                to: new_status,
            });
        }

        if !transitions::role_may_drive(requester_role, from, new_status) {
            return Err(DomainError::Authorization(format!(
                "role {:?} may not move an order from {:?} to {:?}",
                requester_role, from, new_status
            )));
        }

        if transitions::is_claim(from, new_status) {
            if order.delivery_id.is_some() {
                return Err(DomainError::AlreadyClaimed);
            }
            if requester_role == Role::Delivery {
                order.delivery_id = Some(requester_id);
            }
        } else if requester_role == Role::Delivery && order.delivery_id != Some(requester_id) {
            return Err(DomainError::Authorization(
                "order is assigned to another courier".to_string(),
            ));
        }

        order.status = new_status;
        Ok(order.clone())
    }

    /// Live telemetry write, last-write-wins. Only the assigned courier may
    /// report, and only while the order is in transit.
    pub fn update_driver_location(
        &self,
        order_id: Uuid,
        requester_id: Uuid,
        position: GeoPoint,
    ) -> Result<Order, DomainError> {
        let mut book = write_guard(&self.inner)?;
        let order = book.orders.get_mut(&order_id).ok_or(DomainError::NotFound)?;
        if order.delivery_id != Some(requester_id) {
            return Err(DomainError::Authorization(
                "only the assigned courier may report a position".to_string(),
            ));
        }
        if !matches!(order.status, OrderStatus::Accepted | OrderStatus::Delivering) {
            return Err(DomainError::Validation(
                "order is not in transit".to_string(),
            ));
        }
        order.driver_location = Some(position);
        Ok(order.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::domain::order::{DeliveryLocation, DeliveryType, PaymentMethod};

    fn paid_order() -> Order {
        Order {
            id: Uuid::new_v4(),
            buyer_id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            product_price: 1000,
            delivery_fee: 450,
            platform_sale_fee: 30,
            platform_delivery_fee: 5,
            status: OrderStatus::Paid,
            payment_method: PaymentMethod::OrangeMoney,
            delivery_type: DeliveryType::Delivery,
            transaction_id: "TX-1".to_string(),
            delivery_location: DeliveryLocation {
                lat: 12.3,
                lng: -1.5,
                address: "Campus U-AUBEN".to_string(),
                distance_km: 1.5,
            },
            delivery_id: None,
            driver_location: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn claim_sets_courier_and_status() {
        let store = OrderStore::new();
        let order = paid_order();
        let courier = Uuid::new_v4();
        store.insert(order.clone()).expect("insert");

        let claimed = store
            .advance(order.id, courier, Role::Delivery, OrderStatus::Accepted)
            .expect("claim failed");
        assert_eq!(claimed.status, OrderStatus::Accepted);
        assert_eq!(claimed.delivery_id, Some(courier));
    }

    #[test]
    fn second_claim_is_rejected() {
        let store = OrderStore::new();
        let order = paid_order();
        store.insert(order.clone()).expect("insert");

        let first = Uuid::new_v4();
        store
            .advance(order.id, first, Role::Delivery, OrderStatus::Accepted)
            .expect("first claim");
        let err = store
            .advance(order.id, Uuid::new_v4(), Role::Delivery, OrderStatus::Accepted)
            .expect_err("second claim must fail");
        assert!(matches!(err, DomainError::AlreadyClaimed));

        let after = store.get(order.id).expect("get").expect("exists");
        assert_eq!(after.delivery_id, Some(first));
    }

    #[test]
    fn concurrent_claims_have_exactly_one_winner() {
        let store = Arc::new(OrderStore::new());
        let order = paid_order();
        store.insert(order.clone()).expect("insert");

        let couriers: Vec<Uuid> = (0..8).map(|_| Uuid::new_v4()).collect();
        let handles: Vec<_> = couriers
            .iter()
            .map(|&courier| {
                let store = Arc::clone(&store);
                let id = order.id;
                std::thread::spawn(move || {
                    store
                        .advance(id, courier, Role::Delivery, OrderStatus::Accepted)
                        .map(|o| (courier, o))
                })
            })
            .collect();

        let mut winners = Vec::new();
        let mut already_claimed = 0;
        for h in handles {
            match h.join().expect("thread panicked") {
                Ok(win) => winners.push(win),
                Err(DomainError::AlreadyClaimed) => already_claimed += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(winners.len(), 1);
        assert_eq!(already_claimed, couriers.len() - 1);
        let (winner, _) = winners[0];
        let after = store.get(order.id).expect("get").expect("exists");
        assert_eq!(after.delivery_id, Some(winner));
        assert_eq!(after.status, OrderStatus::Accepted);
    }

    #[test]
    fn buyer_cannot_advance() {
        let store = OrderStore::new();
        let order = paid_order();
        store.insert(order.clone()).expect("insert");

        let err = store
            .advance(order.id, order.buyer_id, Role::Buyer, OrderStatus::Accepted)
            .expect_err("buyer must be rejected");
        assert!(matches!(err, DomainError::Authorization(_)));
    }

    #[test]
    fn terminal_orders_are_frozen() {
        let store = OrderStore::new();
        let order = paid_order();
        let courier = Uuid::new_v4();
        store.insert(order.clone()).expect("insert");
        store
            .advance(order.id, courier, Role::Delivery, OrderStatus::Accepted)
            .expect("claim");
        store
            .advance(order.id, courier, Role::Delivery, OrderStatus::Completed)
            .expect("complete");

        let err = store
            .advance(order.id, Uuid::new_v4(), Role::Admin, OrderStatus::Cancelled)
            .expect_err("completed orders are frozen");
        assert!(matches!(err, DomainError::IllegalTransition { .. }));

        // Even a courier poking at a finished order gets the transition error,
        // not a claim rejection.
        let err = store
            .advance(order.id, Uuid::new_v4(), Role::Delivery, OrderStatus::Accepted)
            .expect_err("no claims on finished orders");
        assert!(matches!(err, DomainError::IllegalTransition { .. }));
    }

    #[test]
    fn only_assigned_courier_may_finish_or_report() {
        let store = OrderStore::new();
        let order = paid_order();
        let courier = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        store.insert(order.clone()).expect("insert");
        store
            .advance(order.id, courier, Role::Delivery, OrderStatus::Accepted)
            .expect("claim");

        let err = store
            .advance(order.id, stranger, Role::Delivery, OrderStatus::Completed)
            .expect_err("stranger must not complete");
        assert!(matches!(err, DomainError::Authorization(_)));

        let err = store
            .update_driver_location(order.id, stranger, GeoPoint { lat: 0.0, lng: 0.0 })
            .expect_err("stranger must not report");
        assert!(matches!(err, DomainError::Authorization(_)));

        store
            .update_driver_location(order.id, courier, GeoPoint { lat: 12.31, lng: -1.49 })
            .expect("assigned courier reports");
    }

    #[test]
    fn driver_location_rejected_outside_transit() {
        let store = OrderStore::new();
        let order = paid_order();
        let courier = Uuid::new_v4();
        store.insert(order.clone()).expect("insert");
        store
            .advance(order.id, courier, Role::Delivery, OrderStatus::Accepted)
            .expect("claim");
        store
            .advance(order.id, courier, Role::Delivery, OrderStatus::Completed)
            .expect("complete");

        let err = store
            .update_driver_location(order.id, courier, GeoPoint { lat: 0.0, lng: 0.0 })
            .expect_err("completed order takes no telemetry");
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn list_is_newest_first_and_paginated() {
        let store = OrderStore::new();
        let mut ids = Vec::new();
        for _ in 0..5 {
            let order = paid_order();
            ids.push(order.id);
            store.insert(order).expect("insert");
        }

        let page1 = store.list(1, 3).expect("page 1");
        assert_eq!(page1.total, 5);
        assert_eq!(
            page1.items.iter().map(|o| o.id).collect::<Vec<_>>(),
            vec![ids[4], ids[3], ids[2]]
        );

        let page2 = store.list(2, 3).expect("page 2");
        assert_eq!(page2.items.len(), 2);
        assert_eq!(page2.items[0].id, ids[1]);
    }

    #[test]
    fn absurd_page_numbers_yield_an_empty_page() {
        let store = OrderStore::new();
        store.insert(paid_order()).expect("insert");

        let page = store.list(i64::MAX, i64::MAX).expect("list");
        assert_eq!(page.total, 1);
        assert!(page.items.is_empty());

        let page = store.list(i64::MAX, 20).expect("list");
        assert!(page.items.is_empty());
    }
}
