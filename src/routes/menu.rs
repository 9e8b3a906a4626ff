use axum::{extract::State, Json};
use serde_json::Value;

use crate::{error::ApiError, services::menu::MenuService, AppState};

/// GET /menu/weekly — no auth required. Day 1..7 → {breakfast, lunch}.
pub async fn weekly_menu(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let week = MenuService::list_week(&state.db).await?;
    Ok(Json(serde_json::to_value(week).unwrap()))
}
