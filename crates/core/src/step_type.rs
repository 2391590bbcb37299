//! Template step kinds and choice-list validation.

use crate::error::CoreError;

/// Yes/no question.
pub const STEP_TYPE_BOOLEAN: &str = "boolean";
/// Free-text answer.
pub const STEP_TYPE_TEXT: &str = "text";
/// One answer picked from `choices`.
pub const STEP_TYPE_CHOICE: &str = "choice";
/// Code answer.
pub const STEP_TYPE_CODE: &str = "code";
/// Numeric answer.
pub const STEP_TYPE_NUMBER: &str = "number";

/// All valid step types. Must match the CHECK constraint on
/// `template_steps.step_type`.
pub const VALID_STEP_TYPES: &[&str] = &[
    STEP_TYPE_BOOLEAN,
    STEP_TYPE_TEXT,
    STEP_TYPE_CHOICE,
    STEP_TYPE_CODE,
    STEP_TYPE_NUMBER,
];

/// Step type used when a request omits it.
pub const DEFAULT_STEP_TYPE: &str = STEP_TYPE_BOOLEAN;

/// Maximum number of options on a `choice` step.
pub const MAX_CHOICES: usize = 50;

/// Validate that a step type string is one of the known types.
pub fn validate_step_type(step_type: &str) -> Result<(), CoreError> {
    if VALID_STEP_TYPES.contains(&step_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid step type '{step_type}'. Must be one of: {VALID_STEP_TYPES:?}"
        )))
    }
}

/// Validate the `choices` payload against the step type.
///
/// `choice` steps need a non-empty JSON array of non-empty strings; every
/// other type must leave `choices` unset (JSON `null` counts as unset).
pub fn validate_choices(
    step_type: &str,
    choices: Option<&serde_json::Value>,
) -> Result<(), CoreError> {
    let choices = choices.filter(|c| !c.is_null());

    if step_type != STEP_TYPE_CHOICE {
        return match choices {
            None => Ok(()),
            Some(_) => Err(CoreError::Validation(format!(
                "Only '{STEP_TYPE_CHOICE}' steps accept choices, got step type '{step_type}'"
            ))),
        };
    }

    let items = choices
        .and_then(|c| c.as_array())
        .ok_or_else(|| {
            CoreError::Validation("Choice steps require a 'choices' array".to_string())
        })?;

    if items.is_empty() {
        return Err(CoreError::Validation(
            "Choice steps require at least one option".to_string(),
        ));
    }
    if items.len() > MAX_CHOICES {
        return Err(CoreError::Validation(format!(
            "Choice steps accept at most {MAX_CHOICES} options, got {}",
            items.len()
        )));
    }
    for item in items {
        match item.as_str() {
            Some(s) if !s.trim().is_empty() => {}
            _ => {
                return Err(CoreError::Validation(
                    "Every choice must be a non-empty string".to_string(),
                ))
            }
        }
    }
    Ok(())
}
