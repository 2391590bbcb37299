pub mod auth;
pub mod favorite;
pub mod health;
pub mod progress;
pub mod project;
pub mod technology;
pub mod template;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register, /auth/login, /auth/refresh, /auth/logout
/// /users/me
///
/// /technologies                                   list, create
/// /technologies/{id}                              get, update, delete
/// /technologies/{id}/templates                    public templates
/// /technologies/{id}/roadmap                      roadmap
///
/// /templates                                      list, create
/// /templates/{id}                                 get, delete
/// /templates/{id}/steps                           list, create
/// /templates/{id}/steps/{step_id}                 update, delete
/// /templates/{id}/steps/{step_id}/snippets        create
/// /templates/{id}/steps/{step_id}/snippets/{sid}  delete
/// /templates/{id}/favorite                        toggle (POST)
/// /templates/{id}/start_project                   start project (POST)
/// /templates/{id}/export_markdown                 markdown download
///
/// /projects                                       list, create
/// /projects/{id}                                  get, update, delete
/// /projects/{id}/add_response                     answer a step (POST)
/// /projects/{id}/generate_guide                   guide as JSON
/// /projects/{id}/export_guide                     guide download
///
/// /favorites                                      list, add
/// /favorites/{id}                                 remove
///
/// /progress                                       per-technology progress
/// /progress/hours                                 log study hours (POST)
/// /progress/dashboard                             dashboard
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", user::router())
        .nest("/technologies", technology::router())
        .nest("/templates", template::router())
        .nest("/projects", project::router())
        .nest("/favorites", favorite::router())
        .nest("/progress", progress::router())
}
