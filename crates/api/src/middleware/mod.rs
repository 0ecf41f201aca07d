//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAnalyticsViewer`] -- Requires the `view_analytics` capability
//!   of the caller's directory role.

pub mod auth;
pub mod rbac;
