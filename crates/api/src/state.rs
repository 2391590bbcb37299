use std::sync::Arc;

use crate::config::ServerConfig;

/// State handed to every handler through `State<AppState>`. Clones share
/// the pool and config.
#[derive(Clone)]
pub struct AppState {
    pub pool: checkforge_db::DbPool,
    pub config: Arc<ServerConfig>,
}
