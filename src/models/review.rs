use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::meal::{parse_date, MealType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub meal_type: String,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub date: Option<String>,
    pub meal_type: Option<String>,
    pub rating: Option<i16>,
    pub comment: Option<String>,
}

impl CreateReviewRequest {
    /// Validate and parse the wire fields. Reviews only exist for the two
    /// physical servings and ratings are a 1..=5 scale.
    pub fn validate(&self) -> Result<(NaiveDate, MealType, i16, &str), ApiError> {
        let date = self
            .date
            .as_deref()
            .ok_or_else(|| ApiError::Validation("field \"date\" is required".into()))?;
        let date = parse_date(date)?;

        let meal_type: MealType = self
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

        let rating = self
            .rating
            .ok_or_else(|| ApiError::Validation("field \"rating\" is required".into()))?;
        if !(1..=5).contains(&rating) {
            return Err(ApiError::Validation("rating must be between 1 and 5".into()));
        }

        let comment = self
            .comment
            .as_deref()
            .ok_or_else(|| ApiError::Validation("field \"comment\" is required".into()))?;

        Ok((date, meal_type, rating, comment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(date: &str, meal_type: &str, rating: i16) -> CreateReviewRequest {
        CreateReviewRequest {
            date: Some(date.to_string()),
            meal_type: Some(meal_type.to_string()),
            rating: Some(rating),
            comment: Some("tasty".to_string()),
        }
    }

    #[test]
    fn a_well_formed_review_validates() {
        let req = request("2026-02-07", "lunch", 4);
        let (date, meal_type, rating, comment) = req.validate().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 2, 7).unwrap());
        assert_eq!(meal_type, MealType::Lunch);
        assert_eq!(rating, 4);
        assert_eq!(comment, "tasty");
    }

    #[test]
    fn rating_outside_the_scale_is_rejected() {
        assert!(request("2026-02-07", "lunch", 0).validate().is_err());
        assert!(request("2026-02-07", "lunch", 6).validate().is_err());
    }

    #[test]
    fn combined_meals_cannot_be_reviewed() {
        assert!(request("2026-02-07", "combined", 3).validate().is_err());
    }

    #[test]
    fn missing_fields_are_rejected() {
        let req = CreateReviewRequest {
            date: None,
            meal_type: Some("lunch".into()),
            rating: Some(3),
            comment: Some("ok".into()),
        };
        assert!(req.validate().is_err());
    }
}
