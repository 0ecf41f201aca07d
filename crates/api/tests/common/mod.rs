#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use labelflow_api::auth::jwt::{generate_access_token, JwtConfig};
use labelflow_api::config::{LogFormat, ServerConfig};
use labelflow_api::router::build_app_router;
use labelflow_api::state::AppState;
use labelflow_core::roles::Role;
use labelflow_core::types::DbId;
use labelflow_db::models::data_sample::CreateDataSample;
use labelflow_db::models::project::CreateProject;
use labelflow_db::models::user::CreateUser;
use labelflow_db::repositories::{DataSampleRepo, ProjectRepo, UserRepo};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret-long-enough-for-hmac";

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        workflow_lock_timeout_ms: 5000,
        log_format: LogFormat::Text,
        db_max_connections: 5,
        jwt: jwt_config(),
    }
}

/// Build the full application router, with the production middleware stack,
/// on the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState::new(pool, test_config()))
}

/// Mint an access token for `user_id` claiming `role`.
pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &jwt_config()).expect("token generation")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the decoded body.
pub async fn expect_status(response: Response<Body>, status: StatusCode) -> Value {
    let actual = response.status();
    let body = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {body}");
    body
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub struct Member {
    pub id: DbId,
    pub token: String,
}

/// One user per role, a project and a pending sample.
pub struct World {
    pub admin: Member,
    pub annotator: Member,
    pub reviewer: Member,
    pub project_id: DbId,
    pub sample_id: DbId,
}

pub async fn member(pool: &PgPool, email: &str, role: Role) -> Member {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            role,
        },
    )
    .await
    .unwrap();
    Member {
        id: user.id,
        token: token_for(user.id, role.as_str()),
    }
}

pub async fn add_sample(pool: &PgPool, project_id: DbId, text: &str) -> DbId {
    DataSampleRepo::create(
        pool,
        &CreateDataSample {
            project_id,
            text_content: text.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_world(pool: &PgPool) -> World {
    let admin = member(pool, "admin@example.com", Role::Admin).await;
    let annotator = member(pool, "annotator@example.com", Role::Annotator).await;
    let reviewer = member(pool, "reviewer@example.com", Role::Reviewer).await;

    let project_id = ProjectRepo::create(
        pool,
        &CreateProject {
            name: "Sentiment".to_string(),
            description: None,
            created_by: admin.id,
        },
    )
    .await
    .unwrap()
    .id;
    let sample_id = add_sample(pool, project_id, "The service was slow but friendly").await;

    World {
        admin,
        annotator,
        reviewer,
        project_id,
        sample_id,
    }
}
