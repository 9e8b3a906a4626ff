use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    middleware::auth::require_staff,
    models::{
        auth::AuthenticatedUser,
        meal::{parse_date, MealType, PaidStudentsQuery, PayMealRequest},
    },
    services::entitlement::EntitlementService,
    AppState,
};

/// POST /pay-meal — record a one-off payment for (caller, date, meal_type).
pub async fn pay_meal(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<PayMealRequest>,
) -> Result<Json<Value>, ApiError> {
    let date = body
        .date
        .as_deref()
        .ok_or_else(|| ApiError::Validation("fields \"date\" and \"meal_type\" are required".into()))?;
    let meal_type = body
        .meal_type
        .as_deref()
        .ok_or_else(|| ApiError::Validation("fields \"date\" and \"meal_type\" are required".into()))?;

    let date = parse_date(date)?;
    let meal_type: MealType = meal_type
        .parse()
        .map_err(|_| ApiError::Validation("unknown meal type".into()))?;

    EntitlementService::pay_meal(&state.db, user.user_id, date, meal_type).await?;
    Ok(Json(json!({ "message": "payment recorded" })))
}

/// POST /buy-subscription — open a 30-day window starting today.
pub async fn buy_subscription(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, ApiError> {
    let today = Utc::now().date_naive();
    let subscription = EntitlementService::buy_subscription(&state.db, user.user_id, today).await?;
    Ok(Json(json!({
        "message": "subscription purchased",
        "end_date": subscription.end_date,
    })))
}

/// GET /paid-students?date=YYYY-MM-DD&meal_type=... — users entitled via
/// either ledger path (staff only).
pub async fn paid_students(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<PaidStudentsQuery>,
) -> Result<Json<Value>, ApiError> {
    require_staff(&user)?;

    let date = params
        .date
        .as_deref()
        .ok_or_else(|| ApiError::Validation("query params \"date\" and \"meal_type\" are required".into()))?;
    let meal_type = params
        .meal_type
        .as_deref()
        .ok_or_else(|| ApiError::Validation("query params \"date\" and \"meal_type\" are required".into()))?;

    let date = parse_date(date)?;
    let meal_type: MealType = meal_type
        .parse()
        .map_err(|_| ApiError::Validation("unknown meal type".into()))?;

    let students = EntitlementService::paid_students(&state.db, date, meal_type).await?;
    Ok(Json(serde_json::to_value(students).unwrap()))
}
