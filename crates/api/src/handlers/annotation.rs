//! Handlers for submitting annotations.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use labelflow_db::models::annotation::SubmitAnnotationRequest;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/annotations
///
/// Label a pending sample. Requires the `submit_annotation` capability.
pub async fn submit_annotation(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitAnnotationRequest>,
) -> AppResult<impl IntoResponse> {
    let annotation = state
        .engine
        .submit_annotation(input.sample_id, &auth.caller(), input.label)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: annotation })))
}
