use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// GET /admin/stats — today's headline numbers.
#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub today_payments: i64,
    pub active_subscriptions: i64,
    pub unique_students_today: i64,
    pub meals_issued_today: i64,
}

/// GET /admin/reports/daily — per-date breakdown.
#[derive(Debug, Serialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub breakfast_count: i64,
    pub lunch_count: i64,
    pub subscriptions_used: i64,
    pub one_time_payments: i64,
    pub meals_issued: i64,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}
