//! Review models and request bodies.

use labelflow_core::types::{DbId, Timestamp};
use labelflow_core::workflow::ReviewDecision;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub annotation_id: DbId,
    pub reviewer_id: DbId,
    #[sqlx(try_from = "String")]
    pub decision: ReviewDecision,
    pub feedback: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting a review. `feedback` is already normalized.
#[derive(Debug, Clone)]
pub struct CreateReview {
    pub annotation_id: DbId,
    pub reviewer_id: DbId,
    pub decision: ReviewDecision,
    pub feedback: Option<String>,
}

/// Request body for `POST /reviews`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitReviewRequest {
    pub annotation_id: DbId,
    pub decision: ReviewDecision,
    pub feedback: Option<String>,
}

/// Request body for `POST /reviews/approve`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveRequest {
    pub annotation_id: DbId,
    pub feedback: Option<String>,
}

/// Request body for `POST /reviews/reject`. Feedback is mandatory.
#[derive(Debug, Clone, Deserialize)]
pub struct RejectRequest {
    pub annotation_id: DbId,
    pub feedback: String,
}
