use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::meal::{subscription_end, MealIssued, MealPayment, MealType, PaidStudent, Subscription},
    services::metrics,
};

pub struct EntitlementService;

impl EntitlementService {
    /// A user is owed a meal when a one-off payment exists for exactly
    /// (user, date, meal_type), or when a subscription window contains the
    /// date. Subscriptions are meal-type-agnostic.
    pub async fn is_entitled(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
        meal_type: MealType,
    ) -> Result<bool, ApiError> {
        let paid: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM meal_payments
                 WHERE user_id = $1 AND date = $2 AND meal_type = $3
             )",
        )
        .bind(user_id)
        .bind(date)
        .bind(meal_type.to_string())
        .fetch_one(pool)
        .await?;
        if paid {
            return Ok(true);
        }

        let subscribed: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM subscriptions
                 WHERE user_id = $1 AND start_date <= $2 AND end_date >= $2
             )",
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(pool)
        .await?;
        Ok(subscribed)
    }

    /// Record that a meal was handed out, exactly once per triple.
    ///
    /// Insert and observe the conflict rather than check-then-insert: under
    /// two concurrent calls the unique index lets exactly one row in, and
    /// the loser gets `created = false` with the existing record.
    pub async fn issue_meal(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
        meal_type: MealType,
    ) -> Result<(bool, MealIssued), ApiError> {
        if !Self::is_entitled(pool, user_id, date, meal_type).await? {
            return Err(ApiError::NotEntitled(
                "user has not paid for this date and meal type".into(),
            ));
        }

        let inserted = sqlx::query_as::<_, MealIssued>(
            "INSERT INTO meals_issued (user_id, date, meal_type)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, date, meal_type) DO NOTHING
             RETURNING id, user_id, date, meal_type, issued_at",
        )
        .bind(user_id)
        .bind(date)
        .bind(meal_type.to_string())
        .fetch_optional(pool)
        .await?;

        match inserted {
            Some(record) => {
                metrics::MEALS_ISSUED_COUNTER
                    .with_label_values(&[&meal_type.to_string()])
                    .inc();
                Ok((true, record))
            }
            None => {
                let existing = sqlx::query_as::<_, MealIssued>(
                    "SELECT id, user_id, date, meal_type, issued_at
                     FROM meals_issued
                     WHERE user_id = $1 AND date = $2 AND meal_type = $3",
                )
                .bind(user_id)
                .bind(date)
                .bind(meal_type.to_string())
                .fetch_one(pool)
                .await?;
                Ok((false, existing))
            }
        }
    }

    /// Record a one-off payment. Write-once per (user, date, meal_type).
    pub async fn pay_meal(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
        meal_type: MealType,
    ) -> Result<MealPayment, ApiError> {
        let inserted = sqlx::query_as::<_, MealPayment>(
            "INSERT INTO meal_payments (user_id, date, meal_type)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, date, meal_type) DO NOTHING
             RETURNING id, user_id, date, meal_type, paid_at",
        )
        .bind(user_id)
        .bind(date)
        .bind(meal_type.to_string())
        .fetch_optional(pool)
        .await?;

        match inserted {
            Some(payment) => {
                metrics::MEAL_PAYMENTS_COUNTER
                    .with_label_values(&[&meal_type.to_string()])
                    .inc();
                Ok(payment)
            }
            None => Err(ApiError::Conflict(
                "meal already paid for this date and meal type".into(),
            )),
        }
    }

    /// Open a 30-day subscription window starting today.
    ///
    /// The window check and the insert are a single statement so two
    /// simultaneous purchases cannot both slip past the check.
    pub async fn buy_subscription(
        pool: &PgPool,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<Subscription, ApiError> {
        let end_date = subscription_end(today);

        let created = sqlx::query_as::<_, Subscription>(
            "INSERT INTO subscriptions (user_id, start_date, end_date)
             SELECT $1, $2, $3
             WHERE NOT EXISTS (
                 SELECT 1 FROM subscriptions
                 WHERE user_id = $1 AND start_date <= $2 AND end_date >= $2
             )
             RETURNING id, user_id, start_date, end_date, created_at",
        )
        .bind(user_id)
        .bind(today)
        .bind(end_date)
        .fetch_optional(pool)
        .await?;

        match created {
            Some(subscription) => {
                metrics::SUBSCRIPTIONS_COUNTER.inc();
                Ok(subscription)
            }
            None => Err(ApiError::Conflict(
                "an active subscription already exists".into(),
            )),
        }
    }

    /// Users entitled on `date` for `meal_type` via either ledger path.
    pub async fn paid_students(
        pool: &PgPool,
        date: NaiveDate,
        meal_type: MealType,
    ) -> Result<Vec<PaidStudent>, ApiError> {
        let students = sqlx::query_as::<_, PaidStudent>(
            "SELECT u.id, u.username, u.role
             FROM users u
             WHERE EXISTS(
                       SELECT 1 FROM meal_payments p
                       WHERE p.user_id = u.id AND p.date = $1 AND p.meal_type = $2
                   )
                OR EXISTS(
                       SELECT 1 FROM subscriptions s
                       WHERE s.user_id = u.id AND s.start_date <= $1 AND s.end_date >= $1
                   )
             ORDER BY u.username",
        )
        .bind(date)
        .bind(meal_type.to_string())
        .fetch_all(pool)
        .await?;
        Ok(students)
    }
}
