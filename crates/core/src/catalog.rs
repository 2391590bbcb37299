//! Field limits and validation for catalog rows (technologies, templates,
//! steps, snippets) and projects.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits (mirror the VARCHAR sizes in the migrations)
// ---------------------------------------------------------------------------

pub const MAX_TECHNOLOGY_NAME_LENGTH: usize = 100;
pub const MAX_ICON_LENGTH: usize = 10;
pub const MAX_TEMPLATE_NAME_LENGTH: usize = 200;
pub const MAX_VERSION_LENGTH: usize = 20;
pub const MAX_QUESTION_LENGTH: usize = 500;
pub const MAX_CONDITION_VALUE_LENGTH: usize = 200;
pub const MAX_LANGUAGE_LENGTH: usize = 50;
pub const MAX_PROJECT_NAME_LENGTH: usize = 200;

/// Version assigned to templates created without one.
pub const DEFAULT_TEMPLATE_VERSION: &str = "1.0";

static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid regex"));

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z][0-9A-Za-z.\-]*$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a required text field: non-blank and at most `max` characters.
pub fn validate_required_text(label: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{label} must not be empty")));
    }
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{label} must not exceed {max} characters, got {len}"
        )));
    }
    Ok(())
}

/// Validate a hex color of the form `#RRGGBB`.
pub fn validate_color(color: &str) -> Result<(), CoreError> {
    if COLOR_RE.is_match(color) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Color must be a hex value like '#FF0000', got '{color}'"
        )))
    }
}

/// Validate a template version label (e.g. `1.0`, `2.1-beta`).
pub fn validate_version(version: &str) -> Result<(), CoreError> {
    if version.len() > MAX_VERSION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Version must not exceed {MAX_VERSION_LENGTH} characters"
        )));
    }
    if !VERSION_RE.is_match(version) {
        return Err(CoreError::Validation(format!(
            "Version '{version}' may only contain letters, digits, '.' and '-'"
        )));
    }
    Ok(())
}

/// Validate a step position. Orders are 1-based.
pub fn validate_step_order(order: i32) -> Result<(), CoreError> {
    if order < 1 {
        return Err(CoreError::Validation(format!(
            "Step order must be at least 1, got {order}"
        )));
    }
    Ok(())
}
