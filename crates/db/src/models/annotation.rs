//! Annotation models.

use labelflow_core::types::{DbId, Timestamp};
use labelflow_core::workflow::AnnotationLabel;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `annotations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Annotation {
    pub id: DbId,
    pub sample_id: DbId,
    pub annotator_id: DbId,
    #[sqlx(try_from = "String")]
    pub label: AnnotationLabel,
    pub created_at: Timestamp,
}

/// DTO for inserting an annotation.
#[derive(Debug, Clone)]
pub struct CreateAnnotation {
    pub sample_id: DbId,
    pub annotator_id: DbId,
    pub label: AnnotationLabel,
}

/// Request body for `POST /annotations`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnnotationRequest {
    pub sample_id: DbId,
    pub label: AnnotationLabel,
}
