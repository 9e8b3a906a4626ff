use axum::{extract::State, http::StatusCode, Extension, Json};
use serde_json::Value;

use crate::{
    error::ApiError,
    middleware::auth::JwtSecret,
    models::{
        auth::AuthenticatedUser,
        user::{LoginRequest, RegisterRequest, UpdateProfileRequest},
    },
    services::{auth::AuthService, metrics},
    AppState,
};

/// POST /auth/register — open self-registration.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let profile = AuthService::register(&state.db, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::to_value(profile).unwrap()),
    ))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Extension(secret): Extension<JwtSecret>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let username = body
        .username
        .as_deref()
        .ok_or_else(|| ApiError::Validation("field \"username\" is required".into()))?;
    let password = body
        .password
        .as_deref()
        .ok_or_else(|| ApiError::Validation("field \"password\" is required".into()))?;

    match AuthService::login(
        &state.db,
        username,
        password,
        &secret.0,
        state.config.jwt_expiry_seconds,
    )
    .await
    {
        Ok(response) => {
            metrics::LOGINS_COUNTER.with_label_values(&["success"]).inc();
            Ok(Json(serde_json::to_value(response).unwrap()))
        }
        Err(e) => {
            metrics::LOGINS_COUNTER.with_label_values(&["failure"]).inc();
            Err(e)
        }
    }
}

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, ApiError> {
    let profile = AuthService::profile(&state.db, user.user_id).await?;
    Ok(Json(serde_json::to_value(profile).unwrap()))
}

/// PUT /user/me — keep allergy notes current.
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, ApiError> {
    let allergies = body
        .allergies
        .as_deref()
        .ok_or_else(|| ApiError::Validation("no changes provided".into()))?;
    let profile = AuthService::update_allergies(&state.db, user.user_id, allergies).await?;
    Ok(Json(serde_json::to_value(profile).unwrap()))
}
