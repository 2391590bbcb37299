//! Authentication extractors.

pub mod auth;
