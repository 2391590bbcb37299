//! Domain types and pure logic for the checklist service.
//!
//! Nothing in this crate performs I/O; the `db` and `api` crates call into
//! these helpers for validation, progress arithmetic, and export rendering.

pub mod catalog;
pub mod conditional;
pub mod error;
pub mod gamification;
pub mod markdown;
pub mod progress;
pub mod project_status;
pub mod step_type;
pub mod types;
