use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Fixed set of marketplace categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Food,
    Services,
    Supplies,
    Fashion,
    Electronics,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub seller_name: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    /// Unit price in the smallest currency unit.
    pub price: i64,
    pub image: String,
    pub rating: f32,
    pub review_count: u32,
    pub stock: u32,
    pub allow_pre_order: bool,
    pub created_at: DateTime<Utc>,
}

/// Seller-supplied fields for a new listing; the store fills in identity,
/// rating seed and timestamps.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub price: i64,
    pub image: String,
    pub stock: u32,
    pub allow_pre_order: bool,
}
