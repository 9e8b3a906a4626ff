use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;

use crate::{
    error::ApiError,
    models::{auth::AuthenticatedUser, review::CreateReviewRequest},
    services::reviews::ReviewService,
    AppState,
};

/// POST /reviews — rate a served meal.
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let review = ReviewService::create(&state.db, user.user_id, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::to_value(review).unwrap()),
    ))
}

/// GET /user/reviews — the caller's reviews, newest first.
pub async fn my_reviews(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, ApiError> {
    let reviews = ReviewService::list_mine(&state.db, user.user_id).await?;
    Ok(Json(serde_json::to_value(reviews).unwrap()))
}
