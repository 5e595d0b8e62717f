//! Orchestration of the catalog, order book and user registry.
//!
//! Every state-changing operation goes through here: it enforces who may do
//! what, computes fees at checkout, bumps the actor's activity counter and
//! writes the touched collections back to the persistence collaborator.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::fees;
use crate::domain::order::{
    DeliveryLocation, DeliveryType, GeoPoint, Order, OrderStatus, PaymentMethod,
};
use crate::domain::product::{NewProduct, Product};
use crate::domain::user::{Role, Schedule, User};
use crate::persistence::{KeyValueStore, ORDERS_KEY, PRODUCTS_KEY, SESSION_KEY, USERS_KEY};
use crate::store::catalog::{CatalogStore, ProductEdit};
use crate::store::orders::{OrderPage, OrderStore};
use crate::store::users::UserStore;

/// Fallback drop-off when the buyer gives no location: the main campus, at
/// the average on-campus delivery distance.
fn default_delivery_location() -> DeliveryLocation {
    DeliveryLocation {
        lat: 12.3,
        lng: -1.5,
        address: "Campus U-AUBEN".to_string(),
        distance_km: 1.5,
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub phone_number: Option<String>,
    pub student_id_card: Option<String>,
    pub avatar: Option<String>,
    pub location_address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Checkout {
    pub buyer_id: Uuid,
    pub product_id: Uuid,
    pub payment_method: PaymentMethod,
    pub delivery_type: DeliveryType,
    pub transaction_id: String,
    pub delivery_location: Option<DeliveryLocation>,
}

pub struct CommerceService {
    catalog: CatalogStore,
    orders: OrderStore,
    users: UserStore,
    persistence: Arc<dyn KeyValueStore>,
}

impl CommerceService {
    /// Build the service on top of a persistence backend, loading whatever
    /// collections it already holds.
    pub fn new(persistence: Arc<dyn KeyValueStore>) -> Result<Self, DomainError> {
        let service = Self {
            catalog: CatalogStore::new(),
            orders: OrderStore::new(),
            users: UserStore::new(),
            persistence,
        };
        service
            .users
            .replace_all(service.load_collection::<User>(USERS_KEY)?)?;
        service
            .catalog
            .replace_all(service.load_collection::<Product>(PRODUCTS_KEY)?)?;
        service
            .orders
            .replace_all(service.load_collection::<Order>(ORDERS_KEY)?)?;
        Ok(service)
    }

    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, DomainError> {
        match self.persistence.load(key)? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| DomainError::Internal(format!("corrupt collection {key}: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    /// Write one collection back. A failed write-back is logged, not raised:
    /// the in-memory stores stay the source of truth for the session and the
    /// next successful write catches the state up.
    fn write_back<T: Serialize>(&self, key: &str, collection: Result<Vec<T>, DomainError>) {
        let result = collection
            .and_then(|c| {
                serde_json::to_value(c).map_err(|e| DomainError::Internal(e.to_string()))
            })
            .and_then(|v| self.persistence.save(key, &v));
        if let Err(e) = result {
            log::warn!("write-back of {key} failed: {e}");
        }
    }

    fn persist_users(&self) {
        self.write_back(USERS_KEY, self.users.list());
    }

    fn persist_products(&self) {
        self.write_back(PRODUCTS_KEY, self.catalog.list());
    }

    fn persist_orders(&self) {
        self.write_back(ORDERS_KEY, self.orders.list(1, i64::MAX).map(|p| p.items));
    }

    // ── Users ────────────────────────────────────────────────────────────────

    /// Register an already-verified account and make it the session user.
    /// Identity verification happened upstream; the core never re-validates.
    pub fn register_user(&self, fields: NewUser) -> Result<User, DomainError> {
        if fields.name.trim().is_empty() {
            return Err(DomainError::Validation("name is required".to_string()));
        }
        if fields.email.trim().is_empty() {
            return Err(DomainError::Validation("email is required".to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: fields.name,
            email: fields.email,
            role: fields.role,
            is_verified: fields.is_verified,
            phone_number: fields.phone_number,
            student_id_card: fields.student_id_card,
            avatar: fields.avatar,
            schedule: None,
            location_address: fields.location_address,
            preferred_zone: None,
            activity_count: 0,
        };
        self.users.insert(user.clone())?;
        self.persist_users();
        if let Err(e) = self
            .persistence
            .save(SESSION_KEY, &serde_json::json!(user.id))
        {
            log::warn!("session write-back failed: {e}");
        }
        Ok(user)
    }

    pub fn user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users.require(user_id)
    }

    /// The persisted session user, if any. A stale id pointing at a deleted
    /// account reads as no session.
    pub fn session_user(&self) -> Result<Option<User>, DomainError> {
        let Some(value) = self.persistence.load(SESSION_KEY)? else {
            return Ok(None);
        };
        let id: Uuid = serde_json::from_value(value)
            .map_err(|e| DomainError::Internal(format!("corrupt session entry: {e}")))?;
        self.users.get(id)
    }

    pub fn list_users(&self) -> Result<Vec<User>, DomainError> {
        self.users.list()
    }

    /// Account deletion cascades the user's listings. Orders are left alone:
    /// they are audit records holding their own snapshots.
    pub fn delete_account(&self, user_id: Uuid) -> Result<(), DomainError> {
        let user = self.users.remove(user_id)?.ok_or(DomainError::NotFound)?;
        self.catalog.delete_all_by_seller(user.id)?;
        self.persist_users();
        self.persist_products();
        if let Err(e) = self.persistence.remove(SESSION_KEY) {
            log::warn!("session write-back failed: {e}");
        }
        Ok(())
    }

    /// A seller closing shop: all their listings go, and the account drops
    /// back to BUYER.
    pub fn delete_store(&self, user_id: Uuid) -> Result<User, DomainError> {
        let user = self.users.demote_to_buyer(user_id)?;
        self.catalog.delete_all_by_seller(user_id)?;
        self.persist_users();
        self.persist_products();
        Ok(user)
    }

    pub fn set_schedule(&self, user_id: Uuid, schedule: Schedule) -> Result<User, DomainError> {
        let user = self.users.set_schedule(user_id, schedule)?;
        self.persist_users();
        Ok(user)
    }

    pub fn set_preferred_zone(
        &self,
        user_id: Uuid,
        zone: Option<String>,
    ) -> Result<User, DomainError> {
        let user = self.users.set_preferred_zone(user_id, zone)?;
        self.persist_users();
        Ok(user)
    }

    // ── Catalog ──────────────────────────────────────────────────────────────

    pub fn add_product(&self, seller_id: Uuid, fields: NewProduct) -> Result<Product, DomainError> {
        let seller = self.users.require(seller_id)?;
        if seller.role != Role::Seller {
            return Err(DomainError::Authorization(
                "only sellers may list products".to_string(),
            ));
        }
        let product = self.catalog.add_product(seller.id, &seller.name, fields)?;
        self.users.track_activity(seller.id)?;
        self.persist_products();
        self.persist_users();
        Ok(product)
    }

    pub fn update_product(
        &self,
        product_id: Uuid,
        requester_id: Uuid,
        edit: ProductEdit,
    ) -> Result<Product, DomainError> {
        let product = self.catalog.update_product(product_id, requester_id, edit)?;
        self.users.track_activity(requester_id)?;
        self.persist_products();
        self.persist_users();
        Ok(product)
    }

    pub fn delete_product(&self, product_id: Uuid, requester_id: Uuid) -> Result<(), DomainError> {
        self.catalog.delete_product(product_id, requester_id)?;
        self.persist_products();
        Ok(())
    }

    pub fn product(&self, product_id: Uuid) -> Result<Product, DomainError> {
        self.catalog.get(product_id)?.ok_or(DomainError::NotFound)
    }

    pub fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        self.catalog.list()
    }

    // ── Orders ───────────────────────────────────────────────────────────────

    /// Checkout: the purchase intent becomes a priced, PAID order.
    ///
    /// The stock check and decrement are one atomic catalog operation, and
    /// nothing after it can fail, so the order is created if and only if a
    /// unit was taken. Cancellation later does NOT restore the unit; that
    /// matches the platform's anti-double-booking policy.
    pub fn checkout(&self, request: Checkout) -> Result<Order, DomainError> {
        let buyer = self.users.require(request.buyer_id)?;

        // The distance feeds straight into the fee formula; a hostile value
        // must be rejected before any stock is taken.
        if let Some(location) = &request.delivery_location {
            if !location.distance_km.is_finite() || location.distance_km < 0.0 {
                return Err(DomainError::Validation(
                    "distance_km must be a non-negative number".to_string(),
                ));
            }
        }

        let product = self.catalog.decrement_stock(request.product_id)?;

        let delivery_location = request
            .delivery_location
            .unwrap_or_else(default_delivery_location);
        let delivery_fee = match request.delivery_type {
            DeliveryType::Delivery => fees::delivery_fee(delivery_location.distance_km),
            DeliveryType::Pickup => 0,
        };

        let order = Order {
            id: Uuid::new_v4(),
            buyer_id: buyer.id,
            seller_id: product.seller_id,
            product_id: product.id,
            product_price: product.price,
            delivery_fee,
            platform_sale_fee: fees::commission(product.price, fees::SALE_COMMISSION_BP),
            platform_delivery_fee: fees::commission(delivery_fee, fees::DELIVERY_COMMISSION_BP),
            status: OrderStatus::Paid,
            payment_method: request.payment_method,
            delivery_type: request.delivery_type,
            transaction_id: request.transaction_id,
            delivery_location,
            delivery_id: None,
            driver_location: None,
            created_at: Utc::now(),
        };
        self.orders.insert(order.clone())?;
        self.users.track_activity(buyer.id)?;
        self.persist_products();
        self.persist_orders();
        self.persist_users();
        Ok(order)
    }

    pub fn advance_status(
        &self,
        order_id: Uuid,
        requester_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<Order, DomainError> {
        let requester = self.users.require(requester_id)?;
        let order = self
            .orders
            .advance(order_id, requester.id, requester.role, new_status)?;
        self.users.track_activity(requester.id)?;
        self.persist_orders();
        self.persist_users();
        Ok(order)
    }

    pub fn update_driver_location(
        &self,
        order_id: Uuid,
        requester_id: Uuid,
        position: GeoPoint,
    ) -> Result<Order, DomainError> {
        let order = self
            .orders
            .update_driver_location(order_id, requester_id, position)?;
        self.persist_orders();
        Ok(order)
    }

    pub fn order(&self, order_id: Uuid) -> Result<Order, DomainError> {
        self.orders.get(order_id)?.ok_or(DomainError::NotFound)
    }

    pub fn list_orders(&self, page: i64, limit: i64) -> Result<OrderPage, DomainError> {
        self.orders.list(page, limit)
    }
}
