//! Refresh-token sessions.

use checkforge_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from `refresh_sessions`. The plaintext token is never stored;
/// `revoked_at` is set the moment the token is redeemed or the user logs
/// out, so each token works once.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshSession {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct NewRefreshSession {
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
}
