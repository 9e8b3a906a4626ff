use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Approved => "approved",
            PurchaseStatus::Rejected => "rejected",
        };
        write!(f, "{s}")
    }
}

/// A cook's request to buy kitchen supplies. Created pending, reviewed
/// exactly once by an admin, immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PurchaseRequest {
    pub id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit: String,
    pub status: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Admin listing row — joined with the creator's username.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseRequestWithCreator {
    pub id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit: String,
    pub status: String,
    pub created_by_username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePurchaseRequest {
    pub product_name: Option<String>,
    pub quantity: Option<i32>,
    pub unit: Option<String>,
}

/// Body for POST /admin/approve-request/{id}. Absent means approve.
#[derive(Debug, Deserialize)]
pub struct ReviewDecisionRequest {
    pub approved: Option<bool>,
}
