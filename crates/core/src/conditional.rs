//! Conditional step rules.
//!
//! A step may name a `parent_step` within the same template plus a
//! `condition_value`; it is only shown once the parent's answer matches.
//! Parent links must form a forest: a step can never be its own ancestor.

use std::collections::{HashMap, HashSet};

use crate::error::CoreError;
use crate::types::DbId;

/// Validate assigning `new_parent` as the parent of `step_id`.
///
/// `parents` maps every step of the template to its current parent. When
/// `step_id` is `None` the step is being created and cannot yet be anyone's
/// ancestor, so only membership is checked.
pub fn validate_parent_chain(
    step_id: Option<DbId>,
    new_parent: Option<DbId>,
    parents: &HashMap<DbId, Option<DbId>>,
) -> Result<(), CoreError> {
    let Some(parent_id) = new_parent else {
        return Ok(());
    };

    if !parents.contains_key(&parent_id) {
        return Err(CoreError::Validation(format!(
            "Parent step {parent_id} does not belong to this template"
        )));
    }

    let Some(step_id) = step_id else {
        return Ok(());
    };

    if parent_id == step_id {
        return Err(CoreError::Validation(
            "A step cannot be its own parent".to_string(),
        ));
    }

    let mut visited = HashSet::new();
    let mut cursor = Some(parent_id);
    while let Some(current) = cursor {
        if current == step_id {
            return Err(CoreError::Validation(format!(
                "Setting parent {parent_id} on step {step_id} would create a cycle"
            )));
        }
        if !visited.insert(current) {
            // Pre-existing loop that does not involve `step_id`.
            return Err(CoreError::Validation(format!(
                "Step {current} is already part of a parent cycle"
            )));
        }
        cursor = parents.get(&current).copied().flatten();
    }
    Ok(())
}

/// Whether a step should be displayed given its parent's answer.
///
/// - Steps without a parent are always visible.
/// - With a parent but an empty condition, the step appears once the parent
///   has any answer.
/// - Otherwise the parent answer must equal the condition, ignoring case
///   and surrounding whitespace.
pub fn is_step_visible(
    has_parent: bool,
    condition_value: &str,
    parent_answer: Option<&str>,
) -> bool {
    if !has_parent {
        return true;
    }
    let Some(answer) = parent_answer else {
        return false;
    };
    let condition = condition_value.trim();
    if condition.is_empty() {
        return !answer.trim().is_empty();
    }
    answer.trim().eq_ignore_ascii_case(condition)
}
