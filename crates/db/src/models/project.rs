//! Project entity model and DTOs.

use checkforge_core::error::CoreError;
use checkforge_core::project_status::{ProjectStatus, StatusId};
use checkforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub user_id: DbId,
    pub template_id: DbId,
    pub name: String,
    pub description: String,
    pub status_id: StatusId,
    pub progress_percentage: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project joined with its status name, template and technology.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub status: String,
    pub template_name: String,
    pub technology_id: DbId,
    pub technology_name: String,
    pub technology_color: String,
}

/// Request body for creating a project. The status is a name such as
/// `"draft"`; it defaults to draft.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectRequest {
    pub template_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<String>,
}

/// Request body for `start_project`. The name defaults to the template name.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StartProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// DTO for inserting a project once the status has been resolved.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub user_id: DbId,
    pub template_id: DbId,
    pub name: String,
    pub description: String,
    pub status_id: StatusId,
}

/// Request body for updating a project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// DTO for updating a project. A requested status is checked against the
/// row's current status while it is locked.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

/// Result of `ProjectRepo::update`.
#[derive(Debug)]
pub enum ProjectUpdate {
    Applied(Project),
    NotFound,
    /// The requested status is not reachable from the current one.
    Rejected(CoreError),
}

/// Sort orders accepted by the project list endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ProjectOrdering {
    #[serde(rename = "name")]
    NameAsc,
    #[serde(rename = "-name")]
    NameDesc,
    #[serde(rename = "created_at")]
    CreatedAsc,
    #[serde(rename = "-created_at")]
    CreatedDesc,
    #[serde(rename = "updated_at")]
    UpdatedAsc,
    #[default]
    #[serde(rename = "-updated_at")]
    UpdatedDesc,
    #[serde(rename = "progress_percentage")]
    ProgressAsc,
    #[serde(rename = "-progress_percentage")]
    ProgressDesc,
}

impl ProjectOrdering {
    pub fn order_by(self) -> &'static str {
        match self {
            Self::NameAsc => "p.name ASC, p.id ASC",
            Self::NameDesc => "p.name DESC, p.id DESC",
            Self::CreatedAsc => "p.created_at ASC, p.id ASC",
            Self::CreatedDesc => "p.created_at DESC, p.id DESC",
            Self::UpdatedAsc => "p.updated_at ASC, p.id ASC",
            Self::UpdatedDesc => "p.updated_at DESC, p.id DESC",
            Self::ProgressAsc => "p.progress_percentage ASC, p.id ASC",
            Self::ProgressDesc => "p.progress_percentage DESC, p.id DESC",
        }
    }
}

/// Query parameters for listing a user's projects.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectListParams {
    pub status: Option<String>,
    pub technology_id: Option<DbId>,
    pub search: Option<String>,
    #[serde(default)]
    pub ordering: ProjectOrdering,
}

/// Resolved project list filter.
#[derive(Debug, Clone, Default)]
pub struct ProjectListFilter {
    pub status_id: Option<StatusId>,
    pub technology_id: Option<DbId>,
    pub search: Option<String>,
    pub ordering: ProjectOrdering,
}
