use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::{PgActorDirectory, PgWorkflowStore, WorkflowEngine};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (read-only analytics and health).
    pub pool: labelflow_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// The only writer of workflow state.
    pub engine: Arc<WorkflowEngine>,
}

impl AppState {
    /// Wire the PostgreSQL-backed engine onto `pool`.
    pub fn new(pool: labelflow_db::DbPool, config: ServerConfig) -> Self {
        let store = PgWorkflowStore::new(pool.clone(), config.workflow_lock_timeout());
        let directory = PgActorDirectory::new(pool.clone());
        let engine = WorkflowEngine::new(Arc::new(store), Arc::new(directory));

        Self {
            pool,
            config: Arc::new(config),
            engine: Arc::new(engine),
        }
    }
}
