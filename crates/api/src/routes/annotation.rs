use axum::routing::post;
use axum::Router;

use crate::handlers::annotation;
use crate::state::AppState;

/// Annotation routes, nested under `/annotations`.
///
/// ```text
/// POST   /                          submit_annotation
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(annotation::submit_annotation))
}
