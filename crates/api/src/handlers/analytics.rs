//! Read-only workflow analytics.

use axum::extract::{Path, State};
use axum::Json;
use labelflow_core::error::CoreError;
use labelflow_core::types::DbId;
use labelflow_db::models::analytics::{AnnotatorContribution, WorkflowAnalytics};
use labelflow_db::repositories::{AnalyticsRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAnalyticsViewer;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/analytics
pub async fn global_summary(
    RequireAnalyticsViewer(_actor): RequireAnalyticsViewer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<WorkflowAnalytics>>> {
    let summary = AnalyticsRepo::summary(&state.pool, None).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/analytics/projects/{project_id}
pub async fn project_summary(
    RequireAnalyticsViewer(_actor): RequireAnalyticsViewer,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkflowAnalytics>>> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let summary = AnalyticsRepo::summary(&state.pool, Some(project_id)).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/analytics/annotators
///
/// Annotation counts per annotator, busiest first.
pub async fn annotator_contributions(
    RequireAnalyticsViewer(_actor): RequireAnalyticsViewer,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AnnotatorContribution>>>> {
    let contributions = AnalyticsRepo::annotator_contributions(&state.pool).await?;
    Ok(Json(DataResponse { data: contributions }))
}
