//! Technologies, templates, steps and snippets over HTTP.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, body_text, create_step, create_technology, create_template, delete_auth, get,
    get_auth, post_json_auth, put_json_auth, register,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn technology_crud_and_search(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register(app.clone(), "ana").await;
    let django = create_technology(app.clone(), &token, "Django").await;
    create_technology(app.clone(), &token, "React").await;

    let found = body_json(get(app.clone(), "/api/v1/technologies?search=djan").await).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["name"], "Django");
    assert_eq!(found[0]["templates_count"], 0);

    let desc = body_json(get(app.clone(), "/api/v1/technologies?ordering=-name").await).await;
    assert_eq!(desc[0]["name"], "React");

    let update = put_json_auth(
        app.clone(),
        &format!("/api/v1/technologies/{django}"),
        json!({ "color": "#0C4B33" }),
        &token,
    )
    .await;
    assert_eq!(update.status(), StatusCode::METHOD_NOT_ALLOWED);

    let deleted = delete_auth(app.clone(), &format!("/api/v1/technologies/{django}"), &token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    let gone = get(app, &format!("/api/v1/technologies/{django}")).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn technology_in_use_cannot_be_deleted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = register(app.clone(), "ana").await;
    let other = register(app.clone(), "bob").await;
    let tech = create_technology(app.clone(), &owner, "Django").await;
    let template = create_template(app.clone(), &owner, tech, "Deploy", true).await;

    let uri = format!("/api/v1/technologies/{tech}");
    let refused = delete_auth(app.clone(), &uri, &other).await;
    assert_eq!(refused.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(refused).await["code"], "CONFLICT");

    let still_there = get(app.clone(), &format!("/api/v1/templates/{template}")).await;
    assert_eq!(still_there.status(), StatusCode::OK);
    assert_eq!(get(app, &uri).await.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn technology_validation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register(app.clone(), "ana").await;

    let bad_color = post_json_auth(
        app.clone(),
        "/api/v1/technologies",
        json!({ "name": "Go", "color": "blue" }),
        &token,
    )
    .await;
    assert_eq!(bad_color.status(), StatusCode::BAD_REQUEST);

    let long_icon = post_json_auth(
        app.clone(),
        "/api/v1/technologies",
        json!({ "name": "Go", "color": "#00ADD8", "icon": "x".repeat(11) }),
        &token,
    )
    .await;
    assert_eq!(long_icon.status(), StatusCode::BAD_REQUEST);

    create_technology(app.clone(), &token, "Go").await;
    let duplicate = post_json_auth(
        app,
        "/api/v1/technologies",
        json!({ "name": "Go", "color": "#00ADD8" }),
        &token,
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn private_templates_are_hidden_from_others(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = register(app.clone(), "owner").await;
    let other = register(app.clone(), "other").await;
    let tech = create_technology(app.clone(), &owner, "Django").await;
    let public = create_template(app.clone(), &owner, tech, "Deploy", true).await;
    let private = create_template(app.clone(), &owner, tech, "Secret", false).await;

    let own_list = body_json(get_auth(app.clone(), "/api/v1/templates", &owner).await).await;
    assert_eq!(own_list.as_array().unwrap().len(), 2);

    let other_list = body_json(get_auth(app.clone(), "/api/v1/templates", &other).await).await;
    assert_eq!(other_list.as_array().unwrap().len(), 1);
    assert_eq!(other_list[0]["id"], public);

    let anonymous = get(app.clone(), &format!("/api/v1/templates/{private}")).await;
    assert_eq!(anonymous.status(), StatusCode::NOT_FOUND);

    let by_tech = body_json(get(app.clone(), &format!("/api/v1/technologies/{tech}/templates")).await).await;
    assert_eq!(by_tech.as_array().unwrap().len(), 1);

    let roadmap = body_json(get(app, &format!("/api/v1/technologies/{tech}/roadmap")).await).await;
    assert_eq!(roadmap["technology"]["name"], "Django");
    assert_eq!(roadmap["templates"][0]["name"], "Deploy");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn template_defaults_and_duplicate_version(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register(app.clone(), "ana").await;
    let tech = create_technology(app.clone(), &token, "Django").await;

    let created = post_json_auth(
        app.clone(),
        "/api/v1/templates",
        json!({ "technology_id": tech, "name": "Deploy" }),
        &token,
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let json = body_json(created).await;
    assert_eq!(json["version"], "1.0");
    assert_eq!(json["is_public"], true);
    assert_eq!(json["technology_name"], "Django");
    assert_eq!(json["created_by_username"], "ana");
    assert_eq!(json["steps_count"], 0);

    let again = post_json_auth(
        app.clone(),
        "/api/v1/templates",
        json!({ "technology_id": tech, "name": "Deploy" }),
        &token,
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let unknown_tech = post_json_auth(
        app,
        "/api/v1/templates",
        json!({ "technology_id": 9999, "name": "Ghost" }),
        &token,
    )
    .await;
    assert_eq!(unknown_tech.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_owner_may_change_steps(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = register(app.clone(), "owner").await;
    let other = register(app.clone(), "other").await;
    let tech = create_technology(app.clone(), &owner, "Django").await;
    let template = create_template(app.clone(), &owner, tech, "Deploy", true).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/templates/{template}/steps"),
        json!({ "question": "DEBUG off?", "order": 1 }),
        &other,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let delete = delete_auth(app, &format!("/api/v1/templates/{template}"), &other).await;
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn step_rules(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register(app.clone(), "ana").await;
    let tech = create_technology(app.clone(), &token, "Django").await;
    let template = create_template(app.clone(), &token, tech, "Deploy", true).await;
    let steps_uri = format!("/api/v1/templates/{template}/steps");

    let first = create_step(app.clone(), &token, template, 1, "Database?", true).await;

    let duplicate_order = post_json_auth(
        app.clone(),
        &steps_uri,
        json!({ "question": "Again?", "order": 1 }),
        &token,
    )
    .await;
    assert_eq!(duplicate_order.status(), StatusCode::CONFLICT);

    let zero_order = post_json_auth(
        app.clone(),
        &steps_uri,
        json!({ "question": "Zero?", "order": 0 }),
        &token,
    )
    .await;
    assert_eq!(zero_order.status(), StatusCode::BAD_REQUEST);

    let choice_without_options = post_json_auth(
        app.clone(),
        &steps_uri,
        json!({ "question": "Which?", "order": 2, "step_type": "choice" }),
        &token,
    )
    .await;
    assert_eq!(choice_without_options.status(), StatusCode::BAD_REQUEST);

    let child = post_json_auth(
        app.clone(),
        &steps_uri,
        json!({
            "question": "Which engine?",
            "order": 2,
            "step_type": "choice",
            "choices": ["postgres", "mysql"],
            "parent_step_id": first,
            "condition_value": "yes",
        }),
        &token,
    )
    .await;
    assert_eq!(child.status(), StatusCode::CREATED);
    let child = body_json(child).await;
    assert_eq!(child["order"], 2);
    assert_eq!(child["parent_step_id"], first);
    let child_id = child["id"].as_i64().unwrap();

    // Making the parent a child of its own child is a cycle.
    let cycle = put_json_auth(
        app.clone(),
        &format!("{steps_uri}/{first}"),
        json!({ "parent_step_id": child_id }),
        &token,
    )
    .await;
    assert_eq!(cycle.status(), StatusCode::BAD_REQUEST);

    // Switching away from `choice` requires clearing the options.
    let keep_choices = put_json_auth(
        app.clone(),
        &format!("{steps_uri}/{child_id}"),
        json!({ "step_type": "text" }),
        &token,
    )
    .await;
    assert_eq!(keep_choices.status(), StatusCode::BAD_REQUEST);

    let cleared = put_json_auth(
        app.clone(),
        &format!("{steps_uri}/{child_id}"),
        json!({ "step_type": "text", "choices": null, "parent_step_id": null }),
        &token,
    )
    .await;
    assert_eq!(cleared.status(), StatusCode::OK);
    let cleared = body_json(cleared).await;
    assert!(cleared["choices"].is_null());
    assert!(cleared["parent_step_id"].is_null());

    let listed = body_json(get(app, &steps_uri).await).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);
    assert_eq!(listed[0]["id"], first);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn snippets_and_markdown_export(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register(app.clone(), "ana").await;
    let tech = create_technology(app.clone(), &token, "Django").await;
    let template = create_template(app.clone(), &token, tech, "Deploy Checklist", true).await;
    let step = create_step(app.clone(), &token, template, 1, "DEBUG disabled?", true).await;

    let snippet = post_json_auth(
        app.clone(),
        &format!("/api/v1/templates/{template}/steps/{step}/snippets"),
        json!({ "language": "Python", "code": "DEBUG = False" }),
        &token,
    )
    .await;
    assert_eq!(snippet.status(), StatusCode::CREATED);
    let snippet = body_json(snippet).await;
    assert_eq!(snippet["language"], "python");
    assert_eq!(snippet["is_example"], true);

    let detail = body_json(get(app.clone(), &format!("/api/v1/templates/{template}")).await).await;
    assert_eq!(detail["steps"][0]["snippets"][0]["code"], "DEBUG = False");

    let export = get(app.clone(), &format!("/api/v1/templates/{template}/export_markdown")).await;
    assert_eq!(export.status(), StatusCode::OK);
    assert_eq!(
        export.headers()["content-type"],
        "text/markdown; charset=utf-8"
    );
    assert_eq!(
        export.headers()["content-disposition"],
        "attachment; filename=\"Deploy_Checklist.md\""
    );
    let markdown = body_text(export).await;
    assert!(markdown.starts_with("# Deploy Checklist\n\n**Technology:** Django"));
    assert!(markdown.contains("### 1. DEBUG disabled?"));
    assert!(markdown.contains("**Python:**\n```python\nDEBUG = False\n```"));

    let snippet_id = snippet["id"].as_i64().unwrap();
    let removed = delete_auth(
        app.clone(),
        &format!("/api/v1/templates/{template}/steps/{step}/snippets/{snippet_id}"),
        &token,
    )
    .await;
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);

    let again = delete_auth(
        app,
        &format!("/api/v1/templates/{template}/steps/{step}/snippets/{snippet_id}"),
        &token,
    )
    .await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}
