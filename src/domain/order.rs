use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Reserved for a future asynchronous-payment flow; never assigned today.
    Pending,
    Paid,
    Accepted,
    PickedUp,
    Delivering,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Whether `self -> next` is an edge of the order state machine.
    ///
    /// ```text
    /// PENDING -> PAID -> ACCEPTED -> {PICKED_UP | DELIVERING} -> COMPLETED
    ///              \-> CANCELLED (from PAID or ACCEPTED only)
    /// ```
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Paid)
                | (Paid, Accepted)
                | (Paid, Cancelled)
                | (Accepted, PickedUp)
                | (Accepted, Delivering)
                | (Accepted, Completed)
                | (Accepted, Cancelled)
                | (PickedUp, Completed)
                | (Delivering, Completed)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    OrangeMoney,
    MoovMoney,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    Pickup,
    Delivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Drop-off point captured at checkout, including the distance estimate the
/// delivery fee was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryLocation {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub distance_km: f64,
}

/// A priced, stateful purchase. Everything except `status`, `delivery_id` and
/// `driver_location` is a point-in-time snapshot taken at checkout: the order
/// is the durable audit record and is never deleted, only transitioned.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub product_id: Uuid,
    /// Unit price at purchase time, smallest currency unit. Never re-read
    /// from the catalog after creation.
    pub product_price: i64,
    pub delivery_fee: i64,
    pub platform_sale_fee: i64,
    pub platform_delivery_fee: i64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub delivery_type: DeliveryType,
    pub transaction_id: String,
    pub delivery_location: DeliveryLocation,
    /// Courier that claimed the order, set exactly once at claim time.
    pub delivery_id: Option<Uuid>,
    /// Live courier telemetry, last-write-wins.
    pub driver_location: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
}
