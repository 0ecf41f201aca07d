//! Persistence seams consumed by the workflow engine, and their PostgreSQL
//! implementations.

use std::time::Duration;

use async_trait::async_trait;
use labelflow_core::error::CoreError;
use labelflow_core::roles::Role;
use labelflow_core::status::SampleStatus;
use labelflow_core::types::DbId;
use labelflow_db::models::annotation::{Annotation, CreateAnnotation};
use labelflow_db::models::data_sample::DataSample;
use labelflow_db::models::review::{CreateReview, Review};
use labelflow_db::repositories::{
    AnnotationRepo, DataSampleRepo, TransitionOutcome, UserRepo, WorkflowRepo,
};
use labelflow_db::DbPool;

// PostgreSQL SQLSTATE codes treated as retryable contention.
const LOCK_NOT_AVAILABLE: &str = "55P03";
const DEADLOCK_DETECTED: &str = "40P01";
const SERIALIZATION_FAILURE: &str = "40001";
const QUERY_CANCELED: &str = "57014";

/// A resolved caller: who they are and the role the directory holds for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: DbId,
    pub role: Role,
}

/// Source of truth for actor roles.
#[async_trait]
pub trait ActorDirectory: Send + Sync {
    /// Look up an actor. `None` when the id no longer resolves.
    async fn get_actor(&self, actor_id: DbId) -> Result<Option<Actor>, CoreError>;
}

/// Load and atomically commit workflow records.
///
/// The `commit_*` methods lock the sample, compare its status against
/// `expected` and only then write; any other outcome leaves the store
/// unchanged.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    async fn find_sample(&self, id: DbId) -> Result<Option<DataSample>, CoreError>;

    async fn find_annotation(&self, id: DbId) -> Result<Option<Annotation>, CoreError>;

    async fn commit_annotation(
        &self,
        expected: SampleStatus,
        next: SampleStatus,
        input: &CreateAnnotation,
    ) -> Result<TransitionOutcome<Annotation>, CoreError>;

    /// Like [`commit_annotation`](Self::commit_annotation), additionally
    /// requiring `input.annotation_id` to be the sample's live annotation.
    async fn commit_review(
        &self,
        sample_id: DbId,
        expected: SampleStatus,
        next: SampleStatus,
        input: &CreateReview,
    ) -> Result<TransitionOutcome<Review>, CoreError>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// [`WorkflowStore`] backed by the workflow tables.
#[derive(Clone)]
pub struct PgWorkflowStore {
    pool: DbPool,
    lock_timeout: Duration,
}

impl PgWorkflowStore {
    pub fn new(pool: DbPool, lock_timeout: Duration) -> Self {
        Self { pool, lock_timeout }
    }
}

#[async_trait]
impl WorkflowStore for PgWorkflowStore {
    async fn find_sample(&self, id: DbId) -> Result<Option<DataSample>, CoreError> {
        DataSampleRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)
    }

    async fn find_annotation(&self, id: DbId) -> Result<Option<Annotation>, CoreError> {
        AnnotationRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)
    }

    async fn commit_annotation(
        &self,
        expected: SampleStatus,
        next: SampleStatus,
        input: &CreateAnnotation,
    ) -> Result<TransitionOutcome<Annotation>, CoreError> {
        WorkflowRepo::apply_annotation(&self.pool, self.lock_timeout, expected, next, input)
            .await
            .map_err(store_error)
    }

    async fn commit_review(
        &self,
        sample_id: DbId,
        expected: SampleStatus,
        next: SampleStatus,
        input: &CreateReview,
    ) -> Result<TransitionOutcome<Review>, CoreError> {
        WorkflowRepo::apply_review(
            &self.pool,
            self.lock_timeout,
            sample_id,
            expected,
            next,
            input,
        )
        .await
        .map_err(store_error)
    }
}

/// [`ActorDirectory`] backed by the `users` table.
#[derive(Clone)]
pub struct PgActorDirectory {
    pool: DbPool,
}

impl PgActorDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActorDirectory for PgActorDirectory {
    async fn get_actor(&self, actor_id: DbId) -> Result<Option<Actor>, CoreError> {
        let Some(user) = UserRepo::find_by_id(&self.pool, actor_id)
            .await
            .map_err(store_error)?
        else {
            return Ok(None);
        };
        // users.role is CHECK-constrained, so a parse failure is corruption.
        let role = user
            .role()
            .map_err(|e| CoreError::Internal(format!("user {actor_id}: {e}")))?;
        Ok(Some(Actor { id: user.id, role }))
    }
}

/// Map a sqlx error from the workflow path into a [`CoreError`].
pub fn store_error(err: sqlx::Error) -> CoreError {
    if is_transient(&err) {
        CoreError::Transient(err.to_string())
    } else {
        CoreError::Internal(err.to_string())
    }
}

/// Whether `err` is contention or connectivity that a retry may clear.
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => true,
        sqlx::Error::Database(db_err) => matches!(
            db_err.code().as_deref(),
            Some(LOCK_NOT_AVAILABLE | DEADLOCK_DETECTED | SERIALIZATION_FAILURE | QUERY_CANCELED)
        ),
        _ => false,
    }
}
