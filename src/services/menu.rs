use std::collections::BTreeMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        meal::MealType,
        menu::{group_week, DayMenu, MenuItem, UpsertMenuItemRequest},
    },
};

pub struct MenuService;

impl MenuService {
    /// The public weekly menu: day 1..7 → {breakfast, lunch}.
    pub async fn list_week(pool: &PgPool) -> Result<BTreeMap<i32, DayMenu>, ApiError> {
        let items = Self::list_all(pool).await?;
        Ok(group_week(items))
    }

    /// Flat listing for the cook dashboard.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<MenuItem>, ApiError> {
        let items = sqlx::query_as::<_, MenuItem>(
            "SELECT id, day_of_week, meal_type, dishes, price_cents, available_quantity
             FROM menu_items
             ORDER BY day_of_week, meal_type",
        )
        .fetch_all(pool)
        .await?;
        Ok(items)
    }

    /// Create or replace the slot for a (day_of_week, meal_type) pair.
    pub async fn upsert(pool: &PgPool, req: &UpsertMenuItemRequest) -> Result<MenuItem, ApiError> {
        let day = req
            .day_of_week
            .ok_or_else(|| ApiError::Validation("field \"day_of_week\" is required".into()))?;
        if !(1..=7).contains(&day) {
            return Err(ApiError::Validation(
                "day_of_week must be between 1 and 7".into(),
            ));
        }

        let meal_type: MealType = req
            .meal_type
            .as_deref()
            .ok_or_else(|| ApiError::Validation("field \"meal_type\" is required".into()))?
            .parse()
            .map_err(|_| ApiError::Validation("meal_type must be breakfast or lunch".into()))?;
        if !meal_type.is_menu_type() {
            return Err(ApiError::Validation(
                "meal_type must be breakfast or lunch".into(),
            ));
        }

        let dishes = req
            .dishes
            .as_deref()
            .ok_or_else(|| ApiError::Validation("field \"dishes\" is required".into()))?;
        let price_cents = req
            .price_cents
            .ok_or_else(|| ApiError::Validation("field \"price_cents\" is required".into()))?;
        if price_cents < 0 {
            return Err(ApiError::Validation("price_cents must not be negative".into()));
        }
        let available_quantity = req.available_quantity.unwrap_or(0);
        if available_quantity < 0 {
            return Err(ApiError::Validation(
                "available_quantity must not be negative".into(),
            ));
        }

        let item = sqlx::query_as::<_, MenuItem>(
            "INSERT INTO menu_items (day_of_week, meal_type, dishes, price_cents, available_quantity)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (day_of_week, meal_type) DO UPDATE SET
                 dishes = EXCLUDED.dishes,
                 price_cents = EXCLUDED.price_cents,
                 available_quantity = EXCLUDED.available_quantity
             RETURNING id, day_of_week, meal_type, dishes, price_cents, available_quantity",
        )
        .bind(day)
        .bind(meal_type.to_string())
        .bind(dishes)
        .bind(price_cents)
        .bind(available_quantity)
        .fetch_one(pool)
        .await?;
        Ok(item)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
        let deleted: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM menu_items WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        deleted
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound("menu item not found".into()))
    }

    /// Hand out `quantity` physical portions of a menu item.
    ///
    /// The availability check and the subtraction are one conditional UPDATE,
    /// so concurrent issuances cannot drive the counter negative. This
    /// counter tracks physical portions, not entitlement; the two ledgers
    /// are not linked.
    pub async fn decrement(pool: &PgPool, id: Uuid, quantity: i32) -> Result<i32, ApiError> {
        if quantity <= 0 {
            return Err(ApiError::Validation("quantity must be positive".into()));
        }

        let remaining: Option<i32> = sqlx::query_scalar(
            "UPDATE menu_items
             SET available_quantity = available_quantity - $2
             WHERE id = $1 AND available_quantity >= $2
             RETURNING available_quantity",
        )
        .bind(id)
        .bind(quantity)
        .fetch_optional(pool)
        .await?;

        match remaining {
            Some(q) => Ok(q),
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM menu_items WHERE id = $1)")
                        .bind(id)
                        .fetch_one(pool)
                        .await?;
                if exists {
                    Err(ApiError::Conflict("not enough portions available".into()))
                } else {
                    Err(ApiError::NotFound("menu item not found".into()))
                }
            }
        }
    }
}
