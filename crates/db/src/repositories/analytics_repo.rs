//! Read-only aggregate queries for the analytics endpoints.
//!
//! Every query accepts an optional project filter; `None` aggregates across
//! all projects.

use labelflow_core::status::SampleStatus;
use labelflow_core::types::DbId;
use labelflow_core::workflow::ReviewDecision;
use sqlx::PgPool;

use crate::models::analytics::{
    AnnotatorContribution, ReviewDecisionCounts, SampleStatusCounts, WorkflowAnalytics,
};

pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Count samples by status.
    pub async fn sample_counts(
        pool: &PgPool,
        project_id: Option<DbId>,
    ) -> Result<SampleStatusCounts, sqlx::Error> {
        sqlx::query_as::<_, SampleStatusCounts>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status_id = $2) AS pending,
                COUNT(*) FILTER (WHERE status_id = $3) AS annotated,
                COUNT(*) FILTER (WHERE status_id = $4) AS reviewed
             FROM data_samples
             WHERE ($1::BIGINT IS NULL OR project_id = $1)",
        )
        .bind(project_id)
        .bind(SampleStatus::Pending.id())
        .bind(SampleStatus::Annotated.id())
        .bind(SampleStatus::Reviewed.id())
        .fetch_one(pool)
        .await
    }

    /// Count reviews by decision.
    pub async fn review_counts(
        pool: &PgPool,
        project_id: Option<DbId>,
    ) -> Result<ReviewDecisionCounts, sqlx::Error> {
        sqlx::query_as::<_, ReviewDecisionCounts>(
            "SELECT
                COUNT(*) FILTER (WHERE r.decision = $2) AS approved,
                COUNT(*) FILTER (WHERE r.decision = $3) AS rejected
             FROM reviews r
             JOIN annotations a ON a.id = r.annotation_id
             JOIN data_samples s ON s.id = a.sample_id
             WHERE ($1::BIGINT IS NULL OR s.project_id = $1)",
        )
        .bind(project_id)
        .bind(ReviewDecision::Approved.as_str())
        .bind(ReviewDecision::Rejected.as_str())
        .fetch_one(pool)
        .await
    }

    /// Number of distinct annotators with at least one annotation.
    pub async fn annotator_count(
        pool: &PgPool,
        project_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(DISTINCT a.annotator_id)
             FROM annotations a
             JOIN data_samples s ON s.id = a.sample_id
             WHERE ($1::BIGINT IS NULL OR s.project_id = $1)",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Assemble the full summary.
    pub async fn summary(
        pool: &PgPool,
        project_id: Option<DbId>,
    ) -> Result<WorkflowAnalytics, sqlx::Error> {
        let samples = Self::sample_counts(pool, project_id).await?;
        let reviews = Self::review_counts(pool, project_id).await?;
        let annotators = Self::annotator_count(pool, project_id).await?;

        tracing::debug!(
            project_id = ?project_id,
            total_samples = samples.total,
            approved = reviews.approved,
            rejected = reviews.rejected,
            annotators,
            "Analytics summary computed"
        );

        Ok(WorkflowAnalytics::from_counts(&samples, &reviews, annotators))
    }

    /// Annotation counts per annotator, busiest first.
    pub async fn annotator_contributions(
        pool: &PgPool,
    ) -> Result<Vec<AnnotatorContribution>, sqlx::Error> {
        sqlx::query_as::<_, AnnotatorContribution>(
            "SELECT u.id AS annotator_id, u.email, COUNT(a.id) AS annotation_count
             FROM annotations a
             JOIN users u ON u.id = a.annotator_id
             GROUP BY u.id, u.email
             ORDER BY annotation_count DESC, u.id ASC",
        )
        .fetch_all(pool)
        .await
    }
}
