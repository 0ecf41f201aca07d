//! Handlers for reviewing annotations.
//!
//! `approve` and `reject` are shorthands for `submit_review` with the
//! decision fixed by the route.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use labelflow_db::models::review::{ApproveRequest, RejectRequest, SubmitReviewRequest};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/reviews
///
/// Approve or reject the live annotation of a sample. Rejections require
/// non-blank feedback.
pub async fn submit_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitReviewRequest>,
) -> AppResult<impl IntoResponse> {
    let review = state
        .engine
        .submit_review(
            input.annotation_id,
            &auth.caller(),
            input.decision,
            input.feedback.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// POST /api/v1/reviews/approve
pub async fn approve(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ApproveRequest>,
) -> AppResult<impl IntoResponse> {
    let review = state
        .engine
        .approve(input.annotation_id, &auth.caller(), input.feedback.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// POST /api/v1/reviews/reject
pub async fn reject(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RejectRequest>,
) -> AppResult<impl IntoResponse> {
    let review = state
        .engine
        .reject(input.annotation_id, &auth.caller(), &input.feedback)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}
