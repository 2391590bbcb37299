//! Template step model and DTOs.

use checkforge_core::error::CoreError;
use checkforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `template_steps` table.
///
/// The position column is `step_order` in SQL and `order` on the wire.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TemplateStep {
    pub id: DbId,
    pub template_id: DbId,
    pub question: String,
    pub description: String,
    pub step_type: String,
    pub is_required: bool,
    #[serde(rename = "order")]
    pub step_order: i32,
    pub parent_step_id: Option<DbId>,
    pub condition_value: String,
    pub choices: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a step.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTemplateStep {
    pub question: String,
    #[serde(default)]
    pub description: String,
    pub step_type: Option<String>,
    pub is_required: Option<bool>,
    pub order: i32,
    pub parent_step_id: Option<DbId>,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub condition_value: String,
    pub choices: Option<serde_json::Value>,
}

/// DTO for updating a step. All fields are optional.
///
/// `parent_step_id` and `choices` are double options so a client can
/// clear them with an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTemplateStep {
    pub question: Option<String>,
    pub description: Option<String>,
    pub step_type: Option<String>,
    pub is_required: Option<bool>,
    pub order: Option<i32>,
    #[serde(default, with = "double_option")]
    pub parent_step_id: Option<Option<DbId>>,
    #[validate(length(max = 200))]
    pub condition_value: Option<String>,
    #[serde(default, with = "double_option")]
    pub choices: Option<Option<serde_json::Value>>,
}

/// Result of `TemplateStepRepo::update`.
#[derive(Debug)]
pub enum StepUpdate {
    Applied(TemplateStep),
    /// The step is not part of the template.
    NotFound,
    /// The new parent would leave the template or close a cycle.
    Rejected(CoreError),
}

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
