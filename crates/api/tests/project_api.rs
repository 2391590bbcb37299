//! Projects: creation, responses, progress, status transitions and guides.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, body_text, create_step, create_technology, create_template, delete_auth, get_auth,
    post_auth, post_json_auth, put_json_auth, register,
};
use serde_json::{json, Value};
use sqlx::PgPool;

struct Fixture {
    app: axum::Router,
    token: String,
    technology: i64,
    template: i64,
    steps: Vec<i64>,
}

/// A Django template with two required steps and one optional one.
async fn fixture(pool: PgPool) -> Fixture {
    let app = common::build_test_app(pool);
    let token = register(app.clone(), "ana").await;
    let technology = create_technology(app.clone(), &token, "Django").await;
    let template = create_template(app.clone(), &token, technology, "Deploy", true).await;
    let steps = vec![
        create_step(app.clone(), &token, template, 1, "DEBUG disabled?", true).await,
        create_step(app.clone(), &token, template, 2, "Static files collected?", true).await,
        create_step(app.clone(), &token, template, 3, "CDN configured?", false).await,
    ];
    Fixture {
        app,
        token,
        technology,
        template,
        steps,
    }
}

async fn start(f: &Fixture) -> Value {
    let response = post_auth(
        f.app.clone(),
        &format!("/api/v1/templates/{}/start_project", f.template),
        &f.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn answer(f: &Fixture, project: i64, step: i64, answer: &str) -> axum::response::Response {
    post_json_auth(
        f.app.clone(),
        &format!("/api/v1/projects/{project}/add_response"),
        json!({ "template_step_id": step, "answer": answer }),
        &f.token,
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn start_project_defaults(pool: PgPool) {
    let f = fixture(pool).await;
    let project = start(&f).await;

    assert_eq!(project["name"], "Deploy");
    assert_eq!(project["status"], "in_progress");
    assert_eq!(project["progress_percentage"], 0);
    assert_eq!(project["technology_name"], "Django");
    assert_eq!(project["technology_id"], f.technology);

    let named = post_json_auth(
        f.app.clone(),
        &format!("/api/v1/templates/{}/start_project", f.template),
        json!({ "name": "Shop launch" }),
        &f.token,
    )
    .await;
    assert_eq!(named.status(), StatusCode::CREATED);
    assert_eq!(body_json(named).await["name"], "Shop launch");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_project_defaults_to_draft(pool: PgPool) {
    let f = fixture(pool).await;
    let response = post_json_auth(
        f.app.clone(),
        "/api/v1/projects",
        json!({ "template_id": f.template, "name": "Shop" }),
        &f.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["status"], "draft");

    let completed = post_json_auth(
        f.app.clone(),
        "/api/v1/projects",
        json!({ "template_id": f.template, "name": "Shop", "status": "completed" }),
        &f.token,
    )
    .await;
    assert_eq!(completed.status(), StatusCode::BAD_REQUEST);

    let unknown = post_json_auth(
        f.app.clone(),
        "/api/v1/projects",
        json!({ "template_id": f.template, "name": "Shop", "status": "paused" }),
        &f.token,
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn answering_required_steps_drives_progress(pool: PgPool) {
    let f = fixture(pool).await;
    let project = start(&f).await["id"].as_i64().unwrap();

    let first = answer(&f, project, f.steps[0], "yes").await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;
    assert_eq!(first["progress_percentage"], 50);
    assert_eq!(first["response"]["is_completed"], true);

    // Optional steps do not move the needle.
    let optional = body_json(answer(&f, project, f.steps[2], "later").await).await;
    assert_eq!(optional["progress_percentage"], 50);

    // Re-answering updates in place.
    let again = body_json(answer(&f, project, f.steps[0], "definitely").await).await;
    assert_eq!(again["progress_percentage"], 50);
    assert_eq!(again["response"]["answer"], "definitely");

    let done = body_json(answer(&f, project, f.steps[1], "yes").await).await;
    assert_eq!(done["progress_percentage"], 100);

    let detail = body_json(
        get_auth(f.app.clone(), &format!("/api/v1/projects/{project}"), &f.token).await,
    )
    .await;
    assert_eq!(detail["progress_percentage"], 100);
    assert_eq!(detail["steps"].as_array().unwrap().len(), 3);
    assert_eq!(detail["steps"][0]["response"]["answer"], "definitely");
    assert_eq!(detail["steps"][0]["visible"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn adding_a_required_step_lowers_progress(pool: PgPool) {
    let f = fixture(pool).await;
    let project = start(&f).await["id"].as_i64().unwrap();
    answer(&f, project, f.steps[0], "yes").await;
    answer(&f, project, f.steps[1], "yes").await;

    create_step(f.app.clone(), &f.token, f.template, 4, "Backups?", true).await;

    let detail = body_json(
        get_auth(f.app.clone(), &format!("/api/v1/projects/{project}"), &f.token).await,
    )
    .await;
    assert_eq!(detail["progress_percentage"], 66);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn step_from_another_template_is_rejected(pool: PgPool) {
    let f = fixture(pool).await;
    let project = start(&f).await["id"].as_i64().unwrap();
    let other_template = create_template(f.app.clone(), &f.token, f.technology, "Other", true).await;
    let foreign = create_step(f.app.clone(), &f.token, other_template, 1, "Foreign?", true).await;

    let response = answer(&f, project, foreign, "yes").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_users_projects_are_invisible(pool: PgPool) {
    let f = fixture(pool).await;
    let project = start(&f).await["id"].as_i64().unwrap();
    let intruder = register(f.app.clone(), "mallory").await;

    let read = get_auth(f.app.clone(), &format!("/api/v1/projects/{project}"), &intruder).await;
    assert_eq!(read.status(), StatusCode::NOT_FOUND);

    let write = post_json_auth(
        f.app.clone(),
        &format!("/api/v1/projects/{project}/add_response"),
        json!({ "template_step_id": f.steps[0], "answer": "yes" }),
        &intruder,
    )
    .await;
    assert_eq!(write.status(), StatusCode::NOT_FOUND);

    let list = body_json(get_auth(f.app.clone(), "/api/v1/projects", &intruder).await).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_transitions_are_validated(pool: PgPool) {
    let f = fixture(pool).await;
    let draft = post_json_auth(
        f.app.clone(),
        "/api/v1/projects",
        json!({ "template_id": f.template, "name": "Shop" }),
        &f.token,
    )
    .await;
    let project = body_json(draft).await["id"].as_i64().unwrap();
    let uri = format!("/api/v1/projects/{project}");

    let skip = put_json_auth(f.app.clone(), &uri, json!({ "status": "completed" }), &f.token).await;
    assert_eq!(skip.status(), StatusCode::BAD_REQUEST);

    let begin = put_json_auth(f.app.clone(), &uri, json!({ "status": "in_progress" }), &f.token).await;
    assert_eq!(begin.status(), StatusCode::OK);
    assert_eq!(body_json(begin).await["status"], "in_progress");

    let renamed = put_json_auth(f.app.clone(), &uri, json!({ "name": "Shop v2" }), &f.token).await;
    assert_eq!(body_json(renamed).await["name"], "Shop v2");

    let archived = put_json_auth(f.app.clone(), &uri, json!({ "status": "archived" }), &f.token).await;
    assert_eq!(archived.status(), StatusCode::OK);
    let finish = put_json_auth(f.app.clone(), &uri, json!({ "status": "completed" }), &f.token).await;
    assert_eq!(finish.status(), StatusCode::BAD_REQUEST);
    let current = body_json(get_auth(f.app.clone(), &uri, &f.token).await).await;
    assert_eq!(current["status"], "archived");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completing_a_project_updates_progress(pool: PgPool) {
    let f = fixture(pool).await;
    let project = start(&f).await["id"].as_i64().unwrap();

    let response = put_json_auth(
        f.app.clone(),
        &format!("/api/v1/projects/{project}"),
        json!({ "status": "completed" }),
        &f.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let progress = body_json(get_auth(f.app.clone(), "/api/v1/progress", &f.token).await).await;
    assert_eq!(progress[0]["technology_name"], "Django");
    assert_eq!(progress[0]["projects_completed"], 1);
    assert_eq!(progress[0]["level"], 1);
    assert_eq!(progress[0]["badges"], json!(["first_project"]));

    let filtered = body_json(
        get_auth(f.app.clone(), "/api/v1/projects?status=completed", &f.token).await,
    )
    .await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);

    let bad_filter = get_auth(f.app.clone(), "/api/v1/projects?status=paused", &f.token).await;
    assert_eq!(bad_filter.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn guide_generation_and_export(pool: PgPool) {
    let f = fixture(pool).await;
    let project = start(&f).await["id"].as_i64().unwrap();
    post_json_auth(
        f.app.clone(),
        &format!("/api/v1/templates/{}/steps/{}/snippets", f.template, f.steps[0]),
        json!({ "language": "python", "code": "DEBUG = False" }),
        &f.token,
    )
    .await;
    post_json_auth(
        f.app.clone(),
        &format!("/api/v1/projects/{project}/add_response"),
        json!({ "template_step_id": f.steps[0], "answer": "yes", "comment": "checked in prod" }),
        &f.token,
    )
    .await;

    let guide = body_json(
        get_auth(
            f.app.clone(),
            &format!("/api/v1/projects/{project}/generate_guide"),
            &f.token,
        )
        .await,
    )
    .await;
    assert_eq!(guide["project"]["id"], project);
    let markdown = guide["guide_markdown"].as_str().unwrap();
    assert!(markdown.starts_with("# Guide: Deploy\n\n"));
    assert!(markdown.contains("**Progress:** 50%"));
    assert!(markdown.contains("**Answer:** yes\n\n**Comment:** checked in prod"));
    assert!(markdown.contains("**Example in Python:**"));
    assert!(!markdown.contains("Static files collected?"));

    let export = get_auth(
        f.app.clone(),
        &format!("/api/v1/projects/{project}/export_guide"),
        &f.token,
    )
    .await;
    assert_eq!(export.status(), StatusCode::OK);
    assert_eq!(
        export.headers()["content-disposition"],
        "attachment; filename=\"guide_Deploy.md\""
    );
    assert_eq!(body_text(export).await, markdown);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_project(pool: PgPool) {
    let f = fixture(pool).await;
    let project = start(&f).await["id"].as_i64().unwrap();
    let uri = format!("/api/v1/projects/{project}");

    let deleted = delete_auth(f.app.clone(), &uri, &f.token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    let gone = get_auth(f.app.clone(), &uri, &f.token).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}
