//! In-memory [`WorkflowStore`] and [`ActorDirectory`] for engine unit tests.
//!
//! Commits hold a single mutex, which gives them the same all-or-nothing
//! compare-and-store semantics as the PostgreSQL transaction.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use labelflow_core::error::CoreError;
use labelflow_core::roles::Role;
use labelflow_core::status::SampleStatus;
use labelflow_core::types::DbId;
use labelflow_db::models::annotation::{Annotation, CreateAnnotation};
use labelflow_db::models::data_sample::DataSample;
use labelflow_db::models::review::{CreateReview, Review};
use labelflow_db::repositories::TransitionOutcome;
use tokio::sync::Barrier;

use super::store::{Actor, ActorDirectory, WorkflowStore};

#[derive(Default)]
struct Tables {
    samples: HashMap<DbId, DataSample>,
    annotations: Vec<Annotation>,
    reviews: Vec<Review>,
    next_id: DbId,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn live_annotation_id(&self, sample_id: DbId) -> Option<DbId> {
        self.annotations
            .iter()
            .filter(|a| a.sample_id == sample_id)
            .map(|a| a.id)
            .max()
    }
}

pub struct MemoryStore {
    tables: Mutex<Tables>,
    /// When set, every `find_sample` waits here, forcing concurrent
    /// operations to load before any of them commits.
    load_barrier: Option<Barrier>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            load_barrier: None,
        }
    }

    pub fn with_load_barrier(parties: usize) -> Self {
        Self {
            load_barrier: Some(Barrier::new(parties)),
            ..Self::new()
        }
    }

    /// Insert a pending sample and return its id.
    pub fn add_sample(&self) -> DbId {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let now = Utc::now();
        tables.samples.insert(
            id,
            DataSample {
                id,
                project_id: 1,
                text_content: format!("sample {id}"),
                status_id: SampleStatus::Pending.id(),
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    pub fn status(&self, sample_id: DbId) -> SampleStatus {
        let tables = self.tables.lock().unwrap();
        tables.samples[&sample_id].status().unwrap()
    }

    pub fn annotation_count(&self, sample_id: DbId) -> usize {
        let tables = self.tables.lock().unwrap();
        tables
            .annotations
            .iter()
            .filter(|a| a.sample_id == sample_id)
            .count()
    }

    pub fn review_count(&self) -> usize {
        self.tables.lock().unwrap().reviews.len()
    }
}

#[async_trait]
impl WorkflowStore for MemoryStore {
    async fn find_sample(&self, id: DbId) -> Result<Option<DataSample>, CoreError> {
        let sample = self.tables.lock().unwrap().samples.get(&id).cloned();
        if let Some(barrier) = &self.load_barrier {
            barrier.wait().await;
        }
        Ok(sample)
    }

    async fn find_annotation(&self, id: DbId) -> Result<Option<Annotation>, CoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.annotations.iter().find(|a| a.id == id).cloned())
    }

    async fn commit_annotation(
        &self,
        expected: SampleStatus,
        next: SampleStatus,
        input: &CreateAnnotation,
    ) -> Result<TransitionOutcome<Annotation>, CoreError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(current) = tables.samples.get(&input.sample_id).map(|s| s.status_id) else {
            return Ok(TransitionOutcome::SampleMissing);
        };
        if current != expected.id() {
            return Ok(TransitionOutcome::StatusChanged { current });
        }

        let annotation = Annotation {
            id: tables.next_id(),
            sample_id: input.sample_id,
            annotator_id: input.annotator_id,
            label: input.label,
            created_at: Utc::now(),
        };
        tables.annotations.push(annotation.clone());
        if let Some(sample) = tables.samples.get_mut(&input.sample_id) {
            sample.status_id = next.id();
        }
        Ok(TransitionOutcome::Applied(annotation))
    }

    async fn commit_review(
        &self,
        sample_id: DbId,
        expected: SampleStatus,
        next: SampleStatus,
        input: &CreateReview,
    ) -> Result<TransitionOutcome<Review>, CoreError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(current) = tables.samples.get(&sample_id).map(|s| s.status_id) else {
            return Ok(TransitionOutcome::SampleMissing);
        };
        if current != expected.id() {
            return Ok(TransitionOutcome::StatusChanged { current });
        }
        let live = tables.live_annotation_id(sample_id);
        if live != Some(input.annotation_id) {
            return Ok(TransitionOutcome::Superseded {
                live_annotation_id: live,
            });
        }

        let review = Review {
            id: tables.next_id(),
            annotation_id: input.annotation_id,
            reviewer_id: input.reviewer_id,
            decision: input.decision,
            feedback: input.feedback.clone(),
            created_at: Utc::now(),
        };
        tables.reviews.push(review.clone());
        if let Some(sample) = tables.samples.get_mut(&sample_id) {
            sample.status_id = next.id();
        }
        Ok(TransitionOutcome::Applied(review))
    }
}

pub struct MemoryDirectory {
    roles: HashMap<DbId, Role>,
}

impl MemoryDirectory {
    pub fn new(entries: impl IntoIterator<Item = (DbId, Role)>) -> Self {
        Self {
            roles: entries.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ActorDirectory for MemoryDirectory {
    async fn get_actor(&self, actor_id: DbId) -> Result<Option<Actor>, CoreError> {
        Ok(self
            .roles
            .get(&actor_id)
            .map(|&role| Actor { id: actor_id, role }))
    }
}
