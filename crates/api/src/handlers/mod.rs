//! Request handlers, one module per resource.

pub mod auth;
pub mod favorite;
pub mod progress;
pub mod project;
pub mod technology;
pub mod template;
pub mod template_step;
pub mod user;
