//! Credentials and tokens.
//!
//! - [`password`]: Argon2id hashing.
//! - [`jwt`]: access tokens and opaque refresh tokens.

pub mod jwt;
pub mod password;
