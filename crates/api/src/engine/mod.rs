//! Annotation workflow engine.
//!
//! The engine is the only writer of sample status, annotations and reviews.
//! It resolves the caller through an [`store::ActorDirectory`], checks the
//! capability, runs the pure transition from `labelflow_core::workflow`, and
//! hands the result to a [`store::WorkflowStore`] for an atomic
//! compare-and-store.

pub mod store;
pub mod workflow;

#[cfg(test)]
pub(crate) mod memory;

pub use store::{Actor, ActorDirectory, PgActorDirectory, PgWorkflowStore, WorkflowStore};
pub use workflow::{Caller, WorkflowEngine};
