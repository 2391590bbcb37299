//! Project lifecycle status and its transition table.
//!
//! Discriminants match the seed rows of the `project_statuses` lookup table
//! (1-based, SMALLINT).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

/// Project lifecycle status.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft = 1,
    InProgress = 2,
    Completed = 3,
    Archived = 4,
}

impl ProjectStatus {
    /// Every status, in seed order.
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Draft,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::Archived,
    ];

    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Resolve a database status ID. Returns `None` for unknown IDs.
    pub fn from_id(id: StatusId) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Wire name (`"draft"`, `"in_progress"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
        }
    }

    /// Parse a wire name.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == name)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
                CoreError::Validation(format!(
                    "Invalid project status '{name}'. Must be one of: {valid:?}"
                ))
            })
    }

    /// Statuses reachable from `self` in one update.
    pub fn allowed_targets(self) -> &'static [ProjectStatus] {
        use ProjectStatus::*;
        match self {
            Draft => &[InProgress, Archived],
            InProgress => &[Draft, Completed, Archived],
            Completed => &[InProgress, Archived],
            Archived => &[Draft, InProgress],
        }
    }

    /// Whether moving from `self` to `next` is permitted. Staying put is
    /// always permitted.
    pub fn can_transition_to(self, next: ProjectStatus) -> bool {
        self == next || self.allowed_targets().contains(&next)
    }
}

impl From<ProjectStatus> for StatusId {
    fn from(value: ProjectStatus) -> Self {
        value as StatusId
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a status change, returning a descriptive error for forbidden
/// transitions.
pub fn validate_transition(from: ProjectStatus, to: ProjectStatus) -> Result<(), CoreError> {
    if from.can_transition_to(to) {
        return Ok(());
    }
    let allowed: Vec<&str> = from.allowed_targets().iter().map(|s| s.as_str()).collect();
    Err(CoreError::Validation(format!(
        "Cannot change project status from '{from}' to '{to}'. Allowed: {allowed:?}"
    )))
}

/// Whether a transition marks the project as newly completed.
pub fn is_completion(from: ProjectStatus, to: ProjectStatus) -> bool {
    from != ProjectStatus::Completed && to == ProjectStatus::Completed
}
