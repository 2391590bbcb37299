//! Seed helpers shared by the repository integration tests.

#![allow(dead_code)]

use checkforge_core::project_status::ProjectStatus;
use checkforge_db::models::project::{CreateProject, Project};
use checkforge_db::models::technology::{CreateTechnology, Technology};
use checkforge_db::models::template::{CreateTemplate, Template};
use checkforge_db::models::template_step::{CreateTemplateStep, TemplateStep};
use checkforge_db::models::user::{CreateUser, User};
use checkforge_db::repositories::{
    ProjectRepo, TechnologyRepo, TemplateRepo, TemplateStepRepo, UserRepo,
};
use sqlx::PgPool;

pub async fn user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn technology(pool: &PgPool, name: &str) -> Technology {
    TechnologyRepo::create(
        pool,
        &CreateTechnology {
            name: name.to_string(),
            description: format!("{name} framework"),
            icon: "🐍".to_string(),
            color: "#092E20".to_string(),
            documentation_url: None,
        },
    )
    .await
    .unwrap()
}

pub async fn template(pool: &PgPool, technology_id: i64, owner: i64, name: &str) -> Template {
    TemplateRepo::create(
        pool,
        owner,
        &CreateTemplate {
            technology_id,
            name: name.to_string(),
            description: String::new(),
            version: None,
            is_public: None,
        },
    )
    .await
    .unwrap()
}

pub fn step_input(order: i32, question: &str, is_required: bool) -> CreateTemplateStep {
    CreateTemplateStep {
        question: question.to_string(),
        description: String::new(),
        step_type: None,
        is_required: Some(is_required),
        order,
        parent_step_id: None,
        condition_value: String::new(),
        choices: None,
    }
}

pub async fn step(pool: &PgPool, template_id: i64, order: i32, required: bool) -> TemplateStep {
    TemplateStepRepo::create(
        pool,
        template_id,
        &step_input(order, &format!("Step {order}?"), required),
    )
    .await
    .unwrap()
}

pub async fn project(pool: &PgPool, user_id: i64, template_id: i64) -> Project {
    ProjectRepo::create(
        pool,
        &CreateProject {
            user_id,
            template_id,
            name: "My project".to_string(),
            description: String::new(),
            status_id: ProjectStatus::InProgress.id(),
        },
    )
    .await
    .unwrap()
}
