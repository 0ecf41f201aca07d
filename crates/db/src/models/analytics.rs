//! Read-only analytics projections over the workflow tables.

use labelflow_core::analytics::ReviewRates;
use labelflow_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// Sample counts grouped by status.
#[derive(Debug, Clone, Default, FromRow)]
pub struct SampleStatusCounts {
    pub total: i64,
    pub pending: i64,
    pub annotated: i64,
    pub reviewed: i64,
}

/// Review counts grouped by decision.
#[derive(Debug, Clone, Default, FromRow)]
pub struct ReviewDecisionCounts {
    pub approved: i64,
    pub rejected: i64,
}

/// Summary returned by the analytics endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowAnalytics {
    pub total_samples: i64,
    pub pending_samples: i64,
    pub annotated_samples: i64,
    pub reviewed_samples: i64,
    pub approval_rate: f64,
    pub rejection_rate: f64,
    pub annotator_contribution_count: i64,
}

impl WorkflowAnalytics {
    pub fn from_counts(
        samples: &SampleStatusCounts,
        reviews: &ReviewDecisionCounts,
        annotator_count: i64,
    ) -> Self {
        let rates = ReviewRates::from_counts(reviews.approved, reviews.rejected);
        Self {
            total_samples: samples.total,
            pending_samples: samples.pending,
            annotated_samples: samples.annotated,
            reviewed_samples: samples.reviewed,
            approval_rate: rates.approval_rate,
            rejection_rate: rates.rejection_rate,
            annotator_contribution_count: annotator_count,
        }
    }
}

/// Number of annotations submitted by one annotator.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnnotatorContribution {
    pub annotator_id: DbId,
    pub email: String,
    pub annotation_count: i64,
}
