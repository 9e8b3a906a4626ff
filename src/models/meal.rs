use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;

/// Number of days a subscription covers, inclusive of the start date.
pub const SUBSCRIPTION_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    /// Breakfast + lunch paid as a single ledger entry. Entitles exactly the
    /// `combined` triple; it is not expanded into the two single meals.
    Combined,
}

impl MealType {
    /// Menu slots and reviews only exist for the two physical servings.
    pub fn is_menu_type(self) -> bool {
        matches!(self, MealType::Breakfast | MealType::Lunch)
    }
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Combined => "combined",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for MealType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "combined" => Ok(MealType::Combined),
            _ => Err(anyhow::anyhow!("Unknown meal type: {s}")),
        }
    }
}

/// Parse a wire-format `YYYY-MM-DD` date, surfacing a 400 on anything else.
pub fn parse_date(s: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ApiError::Validation("invalid date format, expected YYYY-MM-DD".into()))
}

/// Last covered date of a subscription starting on `start`.
pub fn subscription_end(start: NaiveDate) -> NaiveDate {
    start + Duration::days(SUBSCRIPTION_DAYS)
}

/// One-off entitlement for exactly (user, date, meal_type).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealPayment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub meal_type: String,
    pub paid_at: DateTime<Utc>,
}

/// Continuous entitlement window covering every date in
/// [start_date, end_date], any meal type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// "Meal already handed out" — write-once per (user, date, meal_type),
/// enforced by the unique constraint rather than application logic.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealIssued {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub meal_type: String,
    pub issued_at: DateTime<Utc>,
}

/// Row for GET /paid-students — a user entitled via either ledger path.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PaidStudent {
    pub id: Uuid,
    pub username: String,
    pub role: String,
}

// Request/query DTOs. Fields are optional so a missing field yields a 400
// with a named error instead of a framework rejection.
#[derive(Debug, Deserialize)]
pub struct PayMealRequest {
    pub date: Option<String>,
    pub meal_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IssueMealForUserRequest {
    pub user_id: Option<String>,
    pub meal_type: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaidStudentsQuery {
    pub date: Option<String>,
    pub meal_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_types_parse_and_round_trip() {
        for mt in [MealType::Breakfast, MealType::Lunch, MealType::Combined] {
            assert_eq!(mt.to_string().parse::<MealType>().unwrap(), mt);
        }
        assert!("dinner".parse::<MealType>().is_err());
    }

    #[test]
    fn combined_is_not_a_menu_type() {
        assert!(MealType::Breakfast.is_menu_type());
        assert!(MealType::Lunch.is_menu_type());
        assert!(!MealType::Combined.is_menu_type());
    }

    #[test]
    fn wire_dates_parse_strictly() {
        assert_eq!(
            parse_date("2026-02-07").unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 7).unwrap()
        );
        assert!(parse_date("07.02.2026").is_err());
        assert!(parse_date("2026-2-7x").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn subscription_window_spans_thirty_days() {
        let start = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let end = subscription_end(start);
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
        // Inclusive on both bounds
        assert!(start <= start && start <= end);
        assert!(end >= NaiveDate::from_ymd_opt(2026, 2, 15).unwrap());
    }
}
