use axum::routing::{get, post};
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/progress`.
///
/// ```text
/// GET  /           -> list
/// POST /hours      -> log_hours
/// GET  /dashboard  -> dashboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(progress::list))
        .route("/hours", post(progress::log_hours))
        .route("/dashboard", get(progress::dashboard))
}
