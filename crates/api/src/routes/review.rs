//! Review routes. The fixed-decision shorthands sit beside the general
//! endpoint so clients can post just an annotation id.

use axum::routing::post;
use axum::Router;

use crate::handlers::review;
use crate::state::AppState;

/// Review routes, nested under `/reviews`.
///
/// ```text
/// POST   /                          submit_review
/// POST   /approve                   approve
/// POST   /reject                    reject
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(review::submit_review))
        .route("/approve", post(review::approve))
        .route("/reject", post(review::reject))
}
