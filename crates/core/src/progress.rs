//! Project completion percentage.
//!
//! A project's progress is the share of its template's required steps that
//! have a completed response, truncated to a whole percent.

/// Lower bound of a progress percentage.
pub const MIN_PROGRESS: i16 = 0;

/// Upper bound of a progress percentage.
pub const MAX_PROGRESS: i16 = 100;

/// Compute `floor(100 * completed / total_required)`.
///
/// Returns `0` when the template has no required steps. The result is
/// clamped to `[MIN_PROGRESS, MAX_PROGRESS]` so stray counts (negative or
/// larger than the total) never escape the column's CHECK constraint.
pub fn progress_percentage(completed: i64, total_required: i64) -> i16 {
    if total_required <= 0 || completed <= 0 {
        return MIN_PROGRESS;
    }
    let pct = completed.saturating_mul(100) / total_required;
    pct.clamp(i64::from(MIN_PROGRESS), i64::from(MAX_PROGRESS)) as i16
}

/// Whether a percentage represents a fully answered checklist.
pub fn is_complete(percentage: i16) -> bool {
    percentage >= MAX_PROGRESS
}
