use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::purchase::{
        CreatePurchaseRequest, PurchaseRequest, PurchaseRequestWithCreator, PurchaseStatus,
    },
};

pub struct PurchaseService;

impl PurchaseService {
    /// A cook files a supply request; it starts pending.
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        req: &CreatePurchaseRequest,
    ) -> Result<PurchaseRequest, ApiError> {
        let product_name = req
            .product_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ApiError::Validation("field \"product_name\" is required".into()))?;
        let quantity = req
            .quantity
            .ok_or_else(|| ApiError::Validation("field \"quantity\" is required".into()))?;
        if quantity <= 0 {
            return Err(ApiError::Validation("quantity must be positive".into()));
        }
        let unit = req
            .unit
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ApiError::Validation("field \"unit\" is required".into()))?;

        let request = sqlx::query_as::<_, PurchaseRequest>(
            "INSERT INTO purchase_requests (product_name, quantity, unit, status, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, product_name, quantity, unit, status, created_by, created_at",
        )
        .bind(product_name)
        .bind(quantity)
        .bind(unit)
        .bind(PurchaseStatus::Pending.to_string())
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(request)
    }

    /// The caller's own requests, newest first (cook dashboard).
    pub async fn list_mine(pool: &PgPool, user_id: Uuid) -> Result<Vec<PurchaseRequest>, ApiError> {
        let requests = sqlx::query_as::<_, PurchaseRequest>(
            "SELECT id, product_name, quantity, unit, status, created_by, created_at
             FROM purchase_requests
             WHERE created_by = $1
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(requests)
    }

    /// Every request with its creator's username (admin review queue).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<PurchaseRequestWithCreator>, ApiError> {
        let requests = sqlx::query_as::<_, PurchaseRequestWithCreator>(
            "SELECT r.id, r.product_name, r.quantity, r.unit, r.status,
                    u.username AS created_by_username, r.created_at
             FROM purchase_requests r
             JOIN users u ON u.id = r.created_by
             ORDER BY r.created_at DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(requests)
    }

    /// One-shot transition pending → approved/rejected. A request that has
    /// already been reviewed stays as it is.
    pub async fn review(pool: &PgPool, id: Uuid, approved: bool) -> Result<(), ApiError> {
        let status = if approved {
            PurchaseStatus::Approved
        } else {
            PurchaseStatus::Rejected
        };

        let updated: Option<Uuid> = sqlx::query_scalar(
            "UPDATE purchase_requests
             SET status = $2
             WHERE id = $1 AND status = 'pending'
             RETURNING id",
        )
        .bind(id)
        .bind(status.to_string())
        .fetch_optional(pool)
        .await?;

        if updated.is_some() {
            return Ok(());
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM purchase_requests WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;
        if exists {
            Err(ApiError::Conflict("request has already been reviewed".into()))
        } else {
            Err(ApiError::NotFound("purchase request not found".into()))
        }
    }
}
