//! Repository layer: one zero-sized `XxxRepo` per table, with async
//! functions taking a pool (or an open transaction where atomicity matters).

pub mod code_snippet_repo;
pub mod dashboard_repo;
pub mod favorite_repo;
pub mod project_repo;
pub mod project_response_repo;
pub mod session_repo;
pub mod technology_repo;
pub mod template_repo;
pub mod template_step_repo;
pub mod user_progress_repo;
pub mod user_repo;

pub use code_snippet_repo::CodeSnippetRepo;
pub use dashboard_repo::DashboardRepo;
pub use favorite_repo::FavoriteRepo;
pub use project_repo::ProjectRepo;
pub use project_response_repo::ProjectResponseRepo;
pub use session_repo::SessionRepo;
pub use technology_repo::TechnologyRepo;
pub use template_repo::TemplateRepo;
pub use template_step_repo::TemplateStepRepo;
pub use user_progress_repo::UserProgressRepo;
pub use user_repo::UserRepo;
