use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::review::{CreateReviewRequest, Review},
};

pub struct ReviewService;

impl ReviewService {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        req: &CreateReviewRequest,
    ) -> Result<Review, ApiError> {
        let (date, meal_type, rating, comment) = req.validate()?;

        let review = sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (user_id, date, meal_type, rating, comment)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, user_id, date, meal_type, rating, comment, created_at",
        )
        .bind(user_id)
        .bind(date)
        .bind(meal_type.to_string())
        .bind(rating)
        .bind(comment)
        .fetch_one(pool)
        .await?;
        Ok(review)
    }

    pub async fn list_mine(pool: &PgPool, user_id: Uuid) -> Result<Vec<Review>, ApiError> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT id, user_id, date, meal_type, rating, comment, created_at
             FROM reviews
             WHERE user_id = $1
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(reviews)
    }
}
