use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Buyer,
    Seller,
    Delivery,
    Admin,
}

/// One lecture slot extracted from a timetable image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BusySlot {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

/// Advisory timetable data attached to a courier. The order logic never reads
/// it; it only exists or doesn't.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Schedule {
    pub busy_slots: Vec<BusySlot>,
    #[serde(default, alias = "ai_advice")]
    pub advice: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Fixed at account creation. The only in-place change is the delete-store
    /// demotion from SELLER back to BUYER.
    pub role: Role,
    pub is_verified: bool,
    pub phone_number: Option<String>,
    pub student_id_card: Option<String>,
    pub avatar: Option<String>,
    pub schedule: Option<Schedule>,
    pub location_address: Option<String>,
    pub preferred_zone: Option<String>,
    /// Incremented on each state-changing action this user performs.
    pub activity_count: u64,
}
