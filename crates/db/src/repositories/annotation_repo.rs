//! Repository for the `annotations` table.

use labelflow_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::annotation::{Annotation, CreateAnnotation};

/// Column list for annotations queries.
const COLUMNS: &str = "id, sample_id, annotator_id, label, created_at";

/// Provides insert and read operations for annotations.
pub struct AnnotationRepo;

impl AnnotationRepo {
    /// Insert an annotation inside the caller's transaction.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateAnnotation,
    ) -> Result<Annotation, sqlx::Error> {
        let query = format!(
            "INSERT INTO annotations (sample_id, annotator_id, label)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Annotation>(&query)
            .bind(input.sample_id)
            .bind(input.annotator_id)
            .bind(input.label.as_str())
            .fetch_one(conn)
            .await
    }

    /// Find an annotation by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Annotation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM annotations WHERE id = $1");
        sqlx::query_as::<_, Annotation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// ID of the live (most recent) annotation for a sample, if any.
    pub async fn live_id_for_sample(
        conn: &mut PgConnection,
        sample_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM annotations WHERE sample_id = $1 ORDER BY id DESC LIMIT 1",
        )
        .bind(sample_id)
        .fetch_optional(conn)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Full annotation history for a sample, oldest first.
    pub async fn list_for_sample(
        pool: &PgPool,
        sample_id: DbId,
    ) -> Result<Vec<Annotation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM annotations
             WHERE sample_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Annotation>(&query)
            .bind(sample_id)
            .fetch_all(pool)
            .await
    }
}
