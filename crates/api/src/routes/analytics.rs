use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Analytics routes, nested under `/analytics`. All require `view_analytics`.
///
/// ```text
/// GET    /                          global_summary
/// GET    /projects/{project_id}     project_summary
/// GET    /annotators                annotator_contributions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(analytics::global_summary))
        .route("/projects/{project_id}", get(analytics::project_summary))
        .route("/annotators", get(analytics::annotator_contributions))
}
