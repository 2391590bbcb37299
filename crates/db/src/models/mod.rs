//! Row models (`FromRow`) and request DTOs, one module per table.

pub mod code_snippet;
pub mod dashboard;
pub mod favorite;
pub mod project;
pub mod project_response;
pub mod session;
pub mod technology;
pub mod template;
pub mod template_step;
pub mod user;
pub mod user_progress;
