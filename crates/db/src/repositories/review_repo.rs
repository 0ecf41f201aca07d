//! Repository for the `reviews` table.

use labelflow_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::review::{CreateReview, Review};

/// Column list for reviews queries.
const COLUMNS: &str = "id, annotation_id, reviewer_id, decision, feedback, created_at";

/// Provides insert and read operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review inside the caller's transaction.
    pub async fn create(conn: &mut PgConnection, input: &CreateReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (annotation_id, reviewer_id, decision, feedback)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.annotation_id)
            .bind(input.reviewer_id)
            .bind(input.decision.as_str())
            .bind(&input.feedback)
            .fetch_one(conn)
            .await
    }

    /// All reviews recorded against a sample's annotations, oldest first.
    pub async fn list_for_sample(pool: &PgPool, sample_id: DbId) -> Result<Vec<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            "SELECT r.id, r.annotation_id, r.reviewer_id, r.decision, r.feedback, r.created_at
             FROM reviews r
             JOIN annotations a ON a.id = r.annotation_id
             WHERE a.sample_id = $1
             ORDER BY r.id ASC",
        )
        .bind(sample_id)
        .fetch_all(pool)
        .await
    }
}
