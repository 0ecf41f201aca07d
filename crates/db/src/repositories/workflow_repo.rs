//! Atomic compare-and-store for sample status transitions.
//!
//! Each method runs one transaction: lock the sample row, compare its status
//! against what the caller expects, then insert the history row and store
//! the new status. The caller decides *which* transition is legal; this
//! module only makes sure the decision still holds when it is written.

use std::time::Duration;

use labelflow_core::status::{SampleStatus, StatusId};
use labelflow_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::annotation::{Annotation, CreateAnnotation};
use crate::models::review::{CreateReview, Review};
use crate::repositories::{AnnotationRepo, DataSampleRepo, ReviewRepo};

/// Result of a compare-and-store attempt. Anything but `Applied` means the
/// transaction was rolled back and nothing was written.
#[derive(Debug)]
pub enum TransitionOutcome<T> {
    /// The compare held and the writes were committed.
    Applied(T),
    /// The sample row does not exist.
    SampleMissing,
    /// The sample's status differs from the expected one.
    StatusChanged { current: StatusId },
    /// The annotation under review is no longer the sample's live one.
    Superseded { live_annotation_id: Option<DbId> },
}

pub struct WorkflowRepo;

impl WorkflowRepo {
    /// Insert `input` and move its sample from `expected` to `next`.
    pub async fn apply_annotation(
        pool: &PgPool,
        lock_timeout: Duration,
        expected: SampleStatus,
        next: SampleStatus,
        input: &CreateAnnotation,
    ) -> Result<TransitionOutcome<Annotation>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        set_lock_timeout(&mut tx, lock_timeout).await?;

        let Some(current) = DataSampleRepo::lock_status(&mut tx, input.sample_id).await? else {
            return Ok(TransitionOutcome::SampleMissing);
        };
        if current != expected.id() {
            return Ok(TransitionOutcome::StatusChanged { current });
        }

        let annotation = AnnotationRepo::create(&mut tx, input).await?;
        DataSampleRepo::set_status(&mut tx, input.sample_id, next).await?;

        tx.commit().await?;
        Ok(TransitionOutcome::Applied(annotation))
    }

    /// Insert `input` and move `sample_id` from `expected` to `next`,
    /// provided the reviewed annotation is still the sample's live one.
    pub async fn apply_review(
        pool: &PgPool,
        lock_timeout: Duration,
        sample_id: DbId,
        expected: SampleStatus,
        next: SampleStatus,
        input: &CreateReview,
    ) -> Result<TransitionOutcome<Review>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        set_lock_timeout(&mut tx, lock_timeout).await?;

        let Some(current) = DataSampleRepo::lock_status(&mut tx, sample_id).await? else {
            return Ok(TransitionOutcome::SampleMissing);
        };
        if current != expected.id() {
            return Ok(TransitionOutcome::StatusChanged { current });
        }

        let live = AnnotationRepo::live_id_for_sample(&mut tx, sample_id).await?;
        if live != Some(input.annotation_id) {
            return Ok(TransitionOutcome::Superseded {
                live_annotation_id: live,
            });
        }

        let review = ReviewRepo::create(&mut tx, input).await?;
        DataSampleRepo::set_status(&mut tx, sample_id, next).await?;

        tx.commit().await?;
        Ok(TransitionOutcome::Applied(review))
    }
}

/// Bound how long this transaction waits for row locks.
async fn set_lock_timeout(conn: &mut PgConnection, timeout: Duration) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT set_config('lock_timeout', $1, true)")
        .bind(format!("{}ms", timeout.as_millis()))
        .execute(conn)
        .await?;
    Ok(())
}
