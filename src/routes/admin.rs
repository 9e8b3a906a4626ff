use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::auth::require_admin,
    models::{
        auth::AuthenticatedUser,
        meal::parse_date,
        menu::UpsertMenuItemRequest,
        purchase::ReviewDecisionRequest,
        report::DateQuery,
    },
    services::{menu::MenuService, purchases::PurchaseService, reports::ReportService},
    AppState,
};

/// GET /admin/stats — today's headline numbers.
pub async fn stats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, ApiError> {
    require_admin(&user)?;

    let today = Utc::now().date_naive();
    let stats = ReportService::admin_stats(&state.db, today).await?;
    Ok(Json(serde_json::to_value(stats).unwrap()))
}

/// GET /admin/reports/daily?date=YYYY-MM-DD
pub async fn daily_report(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<DateQuery>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&user)?;

    let date = params
        .date
        .as_deref()
        .ok_or_else(|| ApiError::Validation("query param \"date\" is required".into()))?;
    let date = parse_date(date)?;

    let report = ReportService::daily_report(&state.db, date).await?;
    Ok(Json(serde_json::to_value(report).unwrap()))
}

/// GET /admin/purchase-requests — the full review queue.
pub async fn list_purchase_requests(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, ApiError> {
    require_admin(&user)?;

    let requests = PurchaseService::list_all(&state.db).await?;
    Ok(Json(serde_json::to_value(requests).unwrap()))
}

/// POST /admin/approve-request/{id} — one-shot approve/reject.
pub async fn approve_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ReviewDecisionRequest>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&user)?;

    let approved = body.approved.unwrap_or(true);
    PurchaseService::review(&state.db, id, approved).await?;
    Ok(Json(json!({ "message": "status updated" })))
}

/// PUT /admin/menu — create or replace a (day, meal_type) menu slot.
pub async fn upsert_menu_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpsertMenuItemRequest>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&user)?;

    let item = MenuService::upsert(&state.db, &body).await?;
    Ok(Json(serde_json::to_value(item).unwrap()))
}

/// DELETE /admin/menu/{id}
pub async fn delete_menu_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&user)?;

    MenuService::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "menu item deleted" })))
}
