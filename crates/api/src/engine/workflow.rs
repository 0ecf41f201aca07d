//! Workflow operations: submit an annotation, submit a review.
//!
//! Check order for every operation:
//!
//! 1. resolve the actor through the directory (token role is only a hint),
//! 2. require the capability,
//! 3. validate input that needs no I/O (feedback),
//! 4. load the sample (and annotation),
//! 5. compute the transition,
//! 6. compare-and-store.
//!
//! A compare failure at step 6 means another request moved the sample first;
//! it is reported exactly like a failed transition at step 5.

use std::sync::Arc;

use labelflow_core::capabilities::{require_capability, Capability};
use labelflow_core::error::CoreError;
use labelflow_core::status::SampleStatus;
use labelflow_core::types::DbId;
use labelflow_core::workflow::{
    normalize_feedback, transition, AnnotationLabel, ReviewDecision, WorkflowEvent,
};
use labelflow_db::models::annotation::{Annotation, CreateAnnotation};
use labelflow_db::models::data_sample::DataSample;
use labelflow_db::models::review::{CreateReview, Review};
use labelflow_db::repositories::TransitionOutcome;

use super::store::{Actor, ActorDirectory, WorkflowStore};

/// The caller as asserted by its bearer token.
#[derive(Debug, Clone)]
pub struct Caller {
    pub actor_id: DbId,
    /// Role claimed by the token, compared against the directory for audit.
    pub claimed_role: Option<String>,
}

impl Caller {
    pub fn new(actor_id: DbId, claimed_role: impl Into<String>) -> Self {
        Self {
            actor_id,
            claimed_role: Some(claimed_role.into()),
        }
    }
}

pub struct WorkflowEngine {
    store: Arc<dyn WorkflowStore>,
    directory: Arc<dyn ActorDirectory>,
}

impl WorkflowEngine {
    pub fn new(store: Arc<dyn WorkflowStore>, directory: Arc<dyn ActorDirectory>) -> Self {
        Self { store, directory }
    }

    /// Resolve `caller` and require `capability` of its directory role.
    ///
    /// Unknown actors are `Unauthorized`; a role lacking the capability is
    /// `Forbidden`.
    pub async fn authorize(
        &self,
        caller: &Caller,
        capability: Capability,
    ) -> Result<Actor, CoreError> {
        let actor_id = caller.actor_id;
        let Some(actor) = self.directory.get_actor(actor_id).await? else {
            tracing::warn!(actor_id, %capability, "Token subject is not a known user");
            return Err(CoreError::Unauthorized(format!(
                "User {actor_id} is not known"
            )));
        };

        if let Some(claimed) = caller.claimed_role.as_deref() {
            if claimed != actor.role.as_str() {
                tracing::warn!(
                    actor_id,
                    claimed_role = claimed,
                    directory_role = %actor.role,
                    "Token role differs from directory role, using directory role"
                );
            }
        }

        if let Err(err) = require_capability(actor.role, capability) {
            tracing::warn!(
                actor_id,
                role = %actor.role,
                %capability,
                "Capability denied"
            );
            return Err(err);
        }

        Ok(actor)
    }

    /// Label a pending sample, moving it to `annotated`.
    pub async fn submit_annotation(
        &self,
        sample_id: DbId,
        caller: &Caller,
        label: AnnotationLabel,
    ) -> Result<Annotation, CoreError> {
        let actor = self.authorize(caller, Capability::SubmitAnnotation).await?;

        let sample = self.load_sample(sample_id).await?;
        let from = sample.status()?;
        let to = transition(from, WorkflowEvent::Annotate)?;

        let input = CreateAnnotation {
            sample_id,
            annotator_id: actor.id,
            label,
        };
        let outcome = self.store.commit_annotation(from, to, &input).await?;
        let annotation = settle(outcome, sample_id, WorkflowEvent::Annotate)?;

        tracing::info!(
            actor_id = actor.id,
            sample_id,
            annotation_id = annotation.id,
            label = label.as_str(),
            from = %from,
            to = %to,
            "Annotation submitted"
        );
        Ok(annotation)
    }

    /// Review the live annotation of an annotated sample.
    ///
    /// `Approved` moves the sample to `reviewed`; `Rejected` (which needs
    /// non-blank feedback) returns it to `pending`.
    pub async fn submit_review(
        &self,
        annotation_id: DbId,
        caller: &Caller,
        decision: ReviewDecision,
        feedback: Option<&str>,
    ) -> Result<Review, CoreError> {
        let actor = self.authorize(caller, Capability::SubmitReview).await?;
        let feedback = normalize_feedback(decision, feedback)?;

        let annotation = self
            .store
            .find_annotation(annotation_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Annotation",
                id: annotation_id,
            })?;
        let sample = self.load_sample(annotation.sample_id).await?;

        let event = decision.event();
        let from = sample.status()?;
        let to = transition(from, event)?;

        let input = CreateReview {
            annotation_id,
            reviewer_id: actor.id,
            decision,
            feedback,
        };
        let outcome = self.store.commit_review(sample.id, from, to, &input).await?;
        let review = match outcome {
            TransitionOutcome::Superseded { live_annotation_id } => {
                return Err(CoreError::InvalidState(format!(
                    "Annotation {annotation_id} is not the current annotation of sample {} \
                     (current: {})",
                    sample.id,
                    live_annotation_id.map_or_else(|| "none".to_string(), |id| id.to_string()),
                )));
            }
            other => settle(other, sample.id, event)?,
        };

        tracing::info!(
            actor_id = actor.id,
            sample_id = sample.id,
            annotation_id,
            review_id = review.id,
            decision = decision.as_str(),
            from = %from,
            to = %to,
            "Review submitted"
        );
        Ok(review)
    }

    pub async fn approve(
        &self,
        annotation_id: DbId,
        caller: &Caller,
        feedback: Option<&str>,
    ) -> Result<Review, CoreError> {
        self.submit_review(annotation_id, caller, ReviewDecision::Approved, feedback)
            .await
    }

    pub async fn reject(
        &self,
        annotation_id: DbId,
        caller: &Caller,
        feedback: &str,
    ) -> Result<Review, CoreError> {
        self.submit_review(annotation_id, caller, ReviewDecision::Rejected, Some(feedback))
            .await
    }

    async fn load_sample(&self, sample_id: DbId) -> Result<DataSample, CoreError> {
        self.store
            .find_sample(sample_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "DataSample",
                id: sample_id,
            })
    }
}

/// Turn a compare-and-store outcome into the engine's result.
fn settle<T>(
    outcome: TransitionOutcome<T>,
    sample_id: DbId,
    event: WorkflowEvent,
) -> Result<T, CoreError> {
    match outcome {
        TransitionOutcome::Applied(record) => Ok(record),
        TransitionOutcome::SampleMissing => Err(CoreError::NotFound {
            entity: "DataSample",
            id: sample_id,
        }),
        TransitionOutcome::StatusChanged { current } => {
            let current = SampleStatus::from_id(current)?;
            tracing::debug!(sample_id, %current, ?event, "Lost a concurrent transition");
            match transition(current, event) {
                Err(err) => Err(err),
                Ok(_) => Err(CoreError::InvalidState(format!(
                    "Sample {sample_id} changed status concurrently"
                ))),
            }
        }
        TransitionOutcome::Superseded { .. } => Err(CoreError::InvalidState(format!(
            "Sample {sample_id} has a newer annotation"
        ))),
    }
}
