pub mod analytics;
pub mod annotation;
pub mod health;
pub mod review;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /annotations                                     submit annotation
/// /reviews                                         submit, approve, reject
/// /analytics                                       global, per project, per annotator
/// ```
///
/// Every route requires a bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/annotations", annotation::router())
        .nest("/reviews", review::router())
        .nest("/analytics", analytics::router())
}
