//! Sample lifecycle state machine.
//!
//! ```text
//! Pending --annotate--> Annotated --approve--> Reviewed
//!    ^                      |
//!    +-------reject---------+
//! ```
//!
//! [`transition`] is the single source of truth for which events are legal
//! in which status. The persistence layer only loads the current status and
//! atomically stores the result.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::SampleStatus;

/// Maximum length of review feedback, in characters.
pub const MAX_FEEDBACK_LENGTH: usize = 10_000;

// ---------------------------------------------------------------------------
// Labels and decisions
// ---------------------------------------------------------------------------

/// Sentiment label an annotator attaches to a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationLabel {
    Positive,
    Negative,
    Neutral,
}

impl AnnotationLabel {
    pub const ALL: &'static [AnnotationLabel] = &[
        AnnotationLabel::Positive,
        AnnotationLabel::Negative,
        AnnotationLabel::Neutral,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationLabel::Positive => "positive",
            AnnotationLabel::Negative => "negative",
            AnnotationLabel::Neutral => "neutral",
        }
    }
}

impl FromStr for AnnotationLabel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(AnnotationLabel::Positive),
            "negative" => Ok(AnnotationLabel::Negative),
            "neutral" => Ok(AnnotationLabel::Neutral),
            other => Err(CoreError::Validation(format!(
                "Invalid label '{other}'. Must be one of: positive, negative, neutral"
            ))),
        }
    }
}

impl TryFrom<String> for AnnotationLabel {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A reviewer's judgment on an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewDecision::Approved => "approved",
            ReviewDecision::Rejected => "rejected",
        }
    }

    /// The workflow event this decision triggers.
    pub fn event(self) -> WorkflowEvent {
        match self {
            ReviewDecision::Approved => WorkflowEvent::Approve,
            ReviewDecision::Rejected => WorkflowEvent::Reject,
        }
    }
}

impl FromStr for ReviewDecision {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(ReviewDecision::Approved),
            "rejected" => Ok(ReviewDecision::Rejected),
            other => Err(CoreError::Validation(format!(
                "Invalid decision '{other}'. Must be one of: approved, rejected"
            ))),
        }
    }
}

impl TryFrom<String> for ReviewDecision {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Something that happens to a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// An annotator submitted a label.
    Annotate,
    /// A reviewer approved the live annotation.
    Approve,
    /// A reviewer rejected the live annotation.
    Reject,
}

/// Apply `event` to a sample in `current` status, returning the next status.
///
/// Fails with [`CoreError::InvalidState`] when the event is not accepted in
/// `current`. `Reviewed` accepts nothing.
pub fn transition(current: SampleStatus, event: WorkflowEvent) -> Result<SampleStatus, CoreError> {
    match (current, event) {
        (SampleStatus::Pending, WorkflowEvent::Annotate) => Ok(SampleStatus::Annotated),
        (SampleStatus::Annotated, WorkflowEvent::Approve) => Ok(SampleStatus::Reviewed),
        (SampleStatus::Annotated, WorkflowEvent::Reject) => Ok(SampleStatus::Pending),
        (current, WorkflowEvent::Annotate) => Err(CoreError::InvalidState(format!(
            "Sample is not awaiting annotation (status '{current}', expected 'pending')"
        ))),
        (current, _) => Err(CoreError::InvalidState(format!(
            "Sample is not awaiting review (status '{current}', expected 'annotated')"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// Validate and normalize review feedback for `decision`.
///
/// Feedback is trimmed. Rejections require non-blank feedback; approvals
/// accept none, and blank approval feedback is normalized to `None`.
pub fn normalize_feedback(
    decision: ReviewDecision,
    feedback: Option<&str>,
) -> Result<Option<String>, CoreError> {
    let trimmed = feedback.map(str::trim).filter(|f| !f.is_empty());

    if decision == ReviewDecision::Rejected && trimmed.is_none() {
        return Err(CoreError::Validation(
            "Feedback is required when rejecting an annotation".to_string(),
        ));
    }

    if let Some(f) = trimmed {
        if f.chars().count() > MAX_FEEDBACK_LENGTH {
            return Err(CoreError::Validation(format!(
                "Feedback exceeds maximum length of {MAX_FEEDBACK_LENGTH} characters"
            )));
        }
    }

    Ok(trimmed.map(str::to_string))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
