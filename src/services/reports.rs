use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{
    error::ApiError,
    models::report::{AdminStats, DailyReport},
};

pub struct ReportService;

impl ReportService {
    /// Today's headline numbers for the admin dashboard. Pure read-side
    /// counts; nothing here mutates the ledger.
    pub async fn admin_stats(pool: &PgPool, today: NaiveDate) -> Result<AdminStats, ApiError> {
        let today_payments: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM meal_payments WHERE date = $1")
                .bind(today)
                .fetch_one(pool)
                .await?;

        let active_subscriptions: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM subscriptions WHERE start_date <= $1 AND end_date >= $1",
        )
        .bind(today)
        .fetch_one(pool)
        .await?;

        let unique_students_today: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT user_id) FROM meals_issued WHERE date = $1")
                .bind(today)
                .fetch_one(pool)
                .await?;

        let meals_issued_today: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM meals_issued WHERE date = $1")
                .bind(today)
                .fetch_one(pool)
                .await?;

        Ok(AdminStats {
            today_payments,
            active_subscriptions,
            unique_students_today,
            meals_issued_today,
        })
    }

    /// Per-date breakdown for GET /admin/reports/daily.
    pub async fn daily_report(pool: &PgPool, date: NaiveDate) -> Result<DailyReport, ApiError> {
        let breakfast_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM meals_issued WHERE date = $1 AND meal_type = 'breakfast'",
        )
        .bind(date)
        .fetch_one(pool)
        .await?;

        let lunch_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM meals_issued WHERE date = $1 AND meal_type = 'lunch'",
        )
        .bind(date)
        .fetch_one(pool)
        .await?;

        let subscriptions_used: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM subscriptions WHERE start_date <= $1 AND end_date >= $1",
        )
        .bind(date)
        .fetch_one(pool)
        .await?;

        let one_time_payments: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM meal_payments WHERE date = $1")
                .bind(date)
                .fetch_one(pool)
                .await?;

        let meals_issued: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM meals_issued WHERE date = $1")
                .bind(date)
                .fetch_one(pool)
                .await?;

        Ok(DailyReport {
            date,
            breakfast_count,
            lunch_count,
            subscriptions_used,
            one_time_payments,
            meals_issued,
        })
    }
}
