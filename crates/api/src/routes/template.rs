//! Route definitions for the `/templates` resource, including nested steps
//! and code snippets.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{template, template_step};
use crate::state::AppState;

/// Routes mounted at `/templates`.
///
/// ```text
/// GET    /                                              -> list
/// POST   /                                              -> create
/// GET    /{id}                                          -> get_by_id
/// DELETE /{id}                                          -> delete
/// POST   /{id}/favorite                                 -> toggle_favorite
/// POST   /{id}/start_project                            -> start_project
/// GET    /{id}/export_markdown                          -> export_markdown
///
/// GET    /{id}/steps                                    -> list_steps
/// POST   /{id}/steps                                    -> create_step
/// PUT    /{id}/steps/{step_id}                          -> update_step
/// DELETE /{id}/steps/{step_id}                          -> delete_step
/// POST   /{id}/steps/{step_id}/snippets                 -> create_snippet
/// DELETE /{id}/steps/{step_id}/snippets/{snippet_id}    -> delete_snippet
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(template::list).post(template::create))
        .route("/{id}", get(template::get_by_id).delete(template::delete))
        .route("/{id}/favorite", post(template::toggle_favorite))
        .route("/{id}/start_project", post(template::start_project))
        .route("/{id}/export_markdown", get(template::export_markdown))
        .route(
            "/{id}/steps",
            get(template_step::list_steps).post(template_step::create_step),
        )
        .route(
            "/{id}/steps/{step_id}",
            put(template_step::update_step).delete(template_step::delete_step),
        )
        .route(
            "/{id}/steps/{step_id}/snippets",
            post(template_step::create_snippet),
        )
        .route(
            "/{id}/steps/{step_id}/snippets/{snippet_id}",
            delete(template_step::delete_snippet),
        )
}
