//! Review rate arithmetic shared by the analytics queries.

/// Percentage of `part` in `total`, rounded to two decimals.
///
/// Returns `0.0` when `total` is zero.
pub fn percentage(part: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Approval and rejection rates for a set of reviews.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewRates {
    pub approval_rate: f64,
    pub rejection_rate: f64,
}

impl ReviewRates {
    pub fn from_counts(approved: i64, rejected: i64) -> Self {
        let total = approved + rejected;
        Self {
            approval_rate: percentage(approved, total),
            rejection_rate: percentage(rejected, total),
        }
    }
}
