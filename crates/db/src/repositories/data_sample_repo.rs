//! Repository for the `data_samples` table.

use labelflow_core::status::{SampleStatus, StatusId};
use labelflow_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::data_sample::{CreateDataSample, DataSample};

/// Column list for data_samples queries.
const COLUMNS: &str = "id, project_id, text_content, status_id, created_at, updated_at";

/// Provides CRUD operations for data samples.
pub struct DataSampleRepo;

impl DataSampleRepo {
    /// Insert a new sample in `pending` status, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateDataSample) -> Result<DataSample, sqlx::Error> {
        let query = format!(
            "INSERT INTO data_samples (project_id, text_content, status_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DataSample>(&query)
            .bind(input.project_id)
            .bind(&input.text_content)
            .bind(SampleStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    /// Find a sample by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DataSample>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM data_samples WHERE id = $1");
        sqlx::query_as::<_, DataSample>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Read a sample's status while taking a row lock held until the
    /// surrounding transaction ends.
    ///
    /// Concurrent callers for the same sample block here, so the status
    /// returned stays valid for the rest of the transaction.
    pub async fn lock_status(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<StatusId>, sqlx::Error> {
        let row: Option<(StatusId,)> =
            sqlx::query_as("SELECT status_id FROM data_samples WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(conn)
                .await?;
        Ok(row.map(|r| r.0))
    }

    /// Overwrite a sample's status. Call only with the row lock held.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        status: SampleStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE data_samples SET status_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.id())
            .execute(conn)
            .await?;
        Ok(())
    }
}
