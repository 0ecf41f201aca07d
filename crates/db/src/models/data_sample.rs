//! Data sample models.

use labelflow_core::error::CoreError;
use labelflow_core::status::{SampleStatus, StatusId};
use labelflow_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `data_samples` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DataSample {
    pub id: DbId,
    pub project_id: DbId,
    pub text_content: String,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DataSample {
    /// Decode the workflow status.
    pub fn status(&self) -> Result<SampleStatus, CoreError> {
        SampleStatus::from_id(self.status_id)
    }
}

/// DTO for creating a sample. New samples always start `pending`.
#[derive(Debug, Clone)]
pub struct CreateDataSample {
    pub project_id: DbId,
    pub text_content: String,
}
