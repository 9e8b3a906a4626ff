use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::auth::require_staff,
    models::{
        auth::AuthenticatedUser,
        meal::{parse_date, IssueMealForUserRequest, MealType},
        menu::IssueMealRequest,
        purchase::CreatePurchaseRequest,
    },
    services::{
        auth::AuthService, entitlement::EntitlementService, menu::MenuService,
        purchases::PurchaseService,
    },
    AppState,
};

/// GET /cook/dashboard — full menu plus the caller's purchase requests.
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, ApiError> {
    require_staff(&user)?;

    let menu_items = MenuService::list_all(&state.db).await?;
    let purchase_requests = PurchaseService::list_mine(&state.db, user.user_id).await?;

    Ok(Json(json!({
        "menu_items": menu_items,
        "purchase_requests": purchase_requests,
    })))
}

/// POST /cook/issue-meal — hand out physical portions of a menu item.
pub async fn issue_meal(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<IssueMealRequest>,
) -> Result<Json<Value>, ApiError> {
    require_staff(&user)?;

    let meal_id = body
        .meal_id
        .as_deref()
        .ok_or_else(|| ApiError::Validation("field \"meal_id\" is required".into()))?;
    let meal_id = Uuid::parse_str(meal_id)
        .map_err(|_| ApiError::Validation("meal_id must be a valid UUID".into()))?;
    let quantity = body.quantity.unwrap_or(1);

    let new_quantity = MenuService::decrement(&state.db, meal_id, quantity).await?;
    Ok(Json(json!({
        "message": "issued",
        "new_quantity": new_quantity,
    })))
}

/// POST /cook/issue-meal-for-user — record an entitled issuance, exactly
/// once per (user, date, meal_type). A repeat is a 200 with
/// status=already_issued, not an error.
pub async fn issue_meal_for_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<IssueMealForUserRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_staff(&user)?;

    let (user_id, meal_type, date) = match (&body.user_id, &body.meal_type, &body.date) {
        (Some(u), Some(m), Some(d)) => (u.as_str(), m.as_str(), d.as_str()),
        _ => {
            return Err(ApiError::Validation(
                "fields \"user_id\", \"meal_type\" and \"date\" are required".into(),
            ))
        }
    };

    let user_id = Uuid::parse_str(user_id)
        .map_err(|_| ApiError::Validation("user_id must be a valid UUID".into()))?;
    let date = parse_date(date)?;
    let meal_type: MealType = meal_type
        .parse()
        .map_err(|_| ApiError::Validation("unknown meal type".into()))?;

    let target = AuthService::find_user(&state.db, user_id).await?;

    let (created, _record) =
        EntitlementService::issue_meal(&state.db, target.id, date, meal_type).await?;

    if !created {
        return Ok((
            StatusCode::OK,
            Json(json!({
                "message": "meal already issued",
                "status": "already_issued",
            })),
        ));
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "meal issued",
            "issued": {
                "user_id": target.id,
                "username": target.username,
                "meal_type": meal_type.to_string(),
                "date": date,
            },
        })),
    ))
}

/// POST /cook/purchase-requests — file a pending supply request.
pub async fn create_purchase_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreatePurchaseRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_staff(&user)?;

    let request = PurchaseService::create(&state.db, user.user_id, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::to_value(request).unwrap()),
    ))
}
