//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Pool-level methods accept `&PgPool`; methods meant to run inside a
//! caller's transaction accept `&mut PgConnection`.

pub mod analytics_repo;
pub mod annotation_repo;
pub mod data_sample_repo;
pub mod project_repo;
pub mod review_repo;
pub mod user_repo;
pub mod workflow_repo;

pub use analytics_repo::AnalyticsRepo;
pub use annotation_repo::AnnotationRepo;
pub use data_sample_repo::DataSampleRepo;
pub use project_repo::ProjectRepo;
pub use review_repo::ReviewRepo;
pub use user_repo::UserRepo;
pub use workflow_repo::{TransitionOutcome, WorkflowRepo};
