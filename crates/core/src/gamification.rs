//! Per-technology level and badge bookkeeping.
//!
//! `user_progress` rows are a derived cache: the numbers here are
//! recomputed from project state whenever a project is completed.

/// Completed projects needed per level.
pub const PROJECTS_PER_LEVEL: i32 = 3;

/// Awarded for the first completed project on a technology.
pub const BADGE_FIRST_PROJECT: &str = "first_project";
/// Awarded for three completed projects on a technology.
pub const BADGE_HAT_TRICK: &str = "hat_trick";
/// Awarded for ten completed projects on a technology.
pub const BADGE_VETERAN: &str = "veteran";

/// Milestone badges and the completed-project count that unlocks each.
pub const MILESTONE_BADGES: &[(i32, &str)] = &[
    (1, BADGE_FIRST_PROJECT),
    (3, BADGE_HAT_TRICK),
    (10, BADGE_VETERAN),
];

/// Maximum hours that may be logged in a single request.
pub const MAX_HOURS_PER_ENTRY: i32 = 24 * 7;

/// `projects_completed / 3 + 1`. Negative counts are treated as zero.
pub fn calculate_level(projects_completed: i32) -> i32 {
    projects_completed.max(0) / PROJECTS_PER_LEVEL + 1
}

/// Append `badge` unless it is already present. Returns `true` if added.
pub fn add_badge(badges: &mut Vec<String>, badge: &str) -> bool {
    if badges.iter().any(|b| b == badge) {
        return false;
    }
    badges.push(badge.to_string());
    true
}

/// Milestone badges unlocked at the given completed-project count.
pub fn earned_badges(projects_completed: i32) -> Vec<&'static str> {
    MILESTONE_BADGES
        .iter()
        .filter(|(threshold, _)| projects_completed >= *threshold)
        .map(|(_, badge)| *badge)
        .collect()
}

/// Merge newly earned milestones into an existing badge list, keeping
/// any badges already held. Returns the badges that were added.
pub fn merge_earned_badges(badges: &mut Vec<String>, projects_completed: i32) -> Vec<String> {
    earned_badges(projects_completed)
        .into_iter()
        .filter(|badge| add_badge(badges, badge))
        .map(str::to_string)
        .collect()
}
