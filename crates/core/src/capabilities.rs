//! Role to capability mapping.
//!
//! Authorization is decided in one place: a role grants a fixed set of
//! capabilities, and every guarded operation names the capability it needs.

use crate::error::CoreError;
use crate::roles::Role;

/// A named permission granted to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    SubmitAnnotation,
    SubmitReview,
    CreateProject,
    AddSamples,
    ViewAnalytics,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::SubmitAnnotation => "submit_annotation",
            Capability::SubmitReview => "submit_review",
            Capability::CreateProject => "create_project",
            Capability::AddSamples => "add_samples",
            Capability::ViewAnalytics => "view_analytics",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::CreateProject,
    Capability::AddSamples,
    Capability::ViewAnalytics,
];

const ANNOTATOR_CAPABILITIES: &[Capability] = &[Capability::SubmitAnnotation];

const REVIEWER_CAPABILITIES: &[Capability] = &[Capability::SubmitReview];

/// The capability set granted to `role`.
pub fn capabilities(role: Role) -> &'static [Capability] {
    match role {
        Role::Admin => ADMIN_CAPABILITIES,
        Role::Annotator => ANNOTATOR_CAPABILITIES,
        Role::Reviewer => REVIEWER_CAPABILITIES,
    }
}

pub fn has_capability(role: Role, capability: Capability) -> bool {
    capabilities(role).contains(&capability)
}

/// Fail with [`CoreError::Forbidden`] unless `role` grants `capability`.
pub fn require_capability(role: Role, capability: Capability) -> Result<(), CoreError> {
    if has_capability(role, capability) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role '{role}' lacks the '{capability}' capability"
        )))
    }
}
