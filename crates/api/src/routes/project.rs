//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`. All require auth.
///
/// ```text
/// GET    /                      -> list
/// POST   /                      -> create
/// GET    /{id}                  -> get_by_id
/// PUT    /{id}                  -> update
/// DELETE /{id}                  -> delete
/// POST   /{id}/add_response     -> add_response
/// GET    /{id}/generate_guide   -> generate_guide
/// GET    /{id}/export_guide     -> export_guide
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/add_response", post(project::add_response))
        .route("/{id}/generate_guide", get(project::generate_guide))
        .route("/{id}/export_guide", get(project::export_guide))
}
