//! Capability-based access extractors.
//!
//! These wrap [`AuthUser`] and resolve the caller through the workflow
//! engine's directory, so the token's role claim never grants anything on
//! its own.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use labelflow_core::capabilities::Capability;

use super::auth::AuthUser;
use crate::engine::Actor;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `view_analytics` capability. Rejects with 401 for unknown
/// users and 403 for roles without it.
///
/// ```ignore
/// async fn summary(RequireAnalyticsViewer(actor): RequireAnalyticsViewer) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAnalyticsViewer(pub Actor);

impl FromRequestParts<AppState> for RequireAnalyticsViewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let actor = state
            .engine
            .authorize(&user.caller(), Capability::ViewAnalytics)
            .await?;
        Ok(RequireAnalyticsViewer(actor))
    }
}
