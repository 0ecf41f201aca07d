//! End-to-end tests for the annotation workflow over HTTP.

mod common;

use axum::http::StatusCode;
use futures::future::join_all;
use labelflow_core::roles::Role;
use labelflow_core::status::SampleStatus;
use labelflow_db::repositories::{AnnotationRepo, DataSampleRepo, ReviewRepo};
use serde_json::{json, Value};
use sqlx::PgPool;

use common::{build_test_app, expect_status, get, member, post_json, seed_world, token_for};

async fn sample_status(pool: &PgPool, sample_id: i64) -> SampleStatus {
    DataSampleRepo::find_by_id(pool, sample_id)
        .await
        .unwrap()
        .unwrap()
        .status()
        .unwrap()
}

fn error_code(body: &Value) -> &str {
    body["code"].as_str().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reject_then_approve_round_trip(pool: PgPool) {
    let world = seed_world(&pool).await;
    let app = build_test_app(pool.clone());

    let first = expect_status(
        post_json(
            &app,
            "/api/v1/annotations",
            Some(&world.annotator.token),
            json!({ "sample_id": world.sample_id, "label": "positive" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(first["data"]["label"], "positive");
    assert_eq!(first["data"]["annotator_id"], world.annotator.id);
    let first_id = first["data"]["id"].as_i64().unwrap();

    let rejection = expect_status(
        post_json(
            &app,
            "/api/v1/reviews/reject",
            Some(&world.reviewer.token),
            json!({ "annotation_id": first_id, "feedback": "needs rework" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(rejection["data"]["decision"], "rejected");
    assert_eq!(rejection["data"]["feedback"], "needs rework");
    assert_eq!(sample_status(&pool, world.sample_id).await, SampleStatus::Pending);

    let second = expect_status(
        post_json(
            &app,
            "/api/v1/annotations",
            Some(&world.annotator.token),
            json!({ "sample_id": world.sample_id, "label": "neutral" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let second_id = second["data"]["id"].as_i64().unwrap();

    let approval = expect_status(
        post_json(
            &app,
            "/api/v1/reviews",
            Some(&world.reviewer.token),
            json!({ "annotation_id": second_id, "decision": "approved" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(approval["data"]["decision"], "approved");
    assert_eq!(approval["data"]["feedback"], Value::Null);

    assert_eq!(sample_status(&pool, world.sample_id).await, SampleStatus::Reviewed);
    assert_eq!(
        AnnotationRepo::list_for_sample(&pool, world.sample_id)
            .await
            .unwrap()
            .len(),
        2
    );
    assert_eq!(
        ReviewRepo::list_for_sample(&pool, world.sample_id)
            .await
            .unwrap()
            .len(),
        2
    );

    // Analytics reflect one approval and one rejection.
    let analytics = expect_status(
        get(&app, "/api/v1/analytics", Some(&world.admin.token)).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(analytics["data"]["total_samples"], 1);
    assert_eq!(analytics["data"]["reviewed_samples"], 1);
    assert_eq!(analytics["data"]["approval_rate"], 50.0);
    assert_eq!(analytics["data"]["rejection_rate"], 50.0);
    assert_eq!(analytics["data"]["annotator_contribution_count"], 1);

    let project = expect_status(
        get(
            &app,
            &format!("/api/v1/analytics/projects/{}", world.project_id),
            Some(&world.admin.token),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(project["data"]["approval_rate"], 50.0);

    let annotators = expect_status(
        get(&app, "/api/v1/analytics/annotators", Some(&world.admin.token)).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(annotators["data"][0]["annotator_id"], world.annotator.id);
    assert_eq!(annotators["data"][0]["annotation_count"], 2);
}

// ---------------------------------------------------------------------------
// State errors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_annotating_twice_is_conflict(pool: PgPool) {
    let world = seed_world(&pool).await;
    let app = build_test_app(pool.clone());
    let body = json!({ "sample_id": world.sample_id, "label": "negative" });

    expect_status(
        post_json(&app, "/api/v1/annotations", Some(&world.annotator.token), body.clone()).await,
        StatusCode::CREATED,
    )
    .await;
    let err = expect_status(
        post_json(&app, "/api/v1/annotations", Some(&world.annotator.token), body).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(error_code(&err), "INVALID_STATE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reviewed_sample_rejects_everything(pool: PgPool) {
    let world = seed_world(&pool).await;
    let app = build_test_app(pool.clone());

    let created = expect_status(
        post_json(
            &app,
            "/api/v1/annotations",
            Some(&world.annotator.token),
            json!({ "sample_id": world.sample_id, "label": "positive" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let annotation_id = created["data"]["id"].as_i64().unwrap();
    expect_status(
        post_json(
            &app,
            "/api/v1/reviews/approve",
            Some(&world.reviewer.token),
            json!({ "annotation_id": annotation_id, "feedback": "looks right" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;

    let again = expect_status(
        post_json(
            &app,
            "/api/v1/reviews/reject",
            Some(&world.reviewer.token),
            json!({ "annotation_id": annotation_id, "feedback": "changed my mind" }),
        )
        .await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(error_code(&again), "INVALID_STATE");
    assert_eq!(sample_status(&pool, world.sample_id).await, SampleStatus::Reviewed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approving_a_rejected_annotation_is_conflict(pool: PgPool) {
    let world = seed_world(&pool).await;
    let app = build_test_app(pool.clone());

    let created = expect_status(
        post_json(
            &app,
            "/api/v1/annotations",
            Some(&world.annotator.token),
            json!({ "sample_id": world.sample_id, "label": "neutral" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let annotation_id = created["data"]["id"].as_i64().unwrap();
    expect_status(
        post_json(
            &app,
            "/api/v1/reviews/reject",
            Some(&world.reviewer.token),
            json!({ "annotation_id": annotation_id, "feedback": "wrong label" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;

    let err = expect_status(
        post_json(
            &app,
            "/api/v1/reviews/approve",
            Some(&world.reviewer.token),
            json!({ "annotation_id": annotation_id }),
        )
        .await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(error_code(&err), "INVALID_STATE");

    let reviews = ReviewRepo::list_for_sample(&pool, world.sample_id).await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(sample_status(&pool, world.sample_id).await, SampleStatus::Pending);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_entities_are_not_found(pool: PgPool) {
    let world = seed_world(&pool).await;
    let app = build_test_app(pool);

    let sample = expect_status(
        post_json(
            &app,
            "/api/v1/annotations",
            Some(&world.annotator.token),
            json!({ "sample_id": world.sample_id + 1000, "label": "positive" }),
        )
        .await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(error_code(&sample), "NOT_FOUND");

    expect_status(
        post_json(
            &app,
            "/api/v1/reviews/approve",
            Some(&world.reviewer.token),
            json!({ "annotation_id": 424242 }),
        )
        .await,
        StatusCode::NOT_FOUND,
    )
    .await;

    expect_status(
        get(
            &app,
            &format!("/api/v1/analytics/projects/{}", world.project_id + 1000),
            Some(&world.admin.token),
        )
        .await,
        StatusCode::NOT_FOUND,
    )
    .await;
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rejection_requires_feedback(pool: PgPool) {
    let world = seed_world(&pool).await;
    let app = build_test_app(pool.clone());

    let created = expect_status(
        post_json(
            &app,
            "/api/v1/annotations",
            Some(&world.annotator.token),
            json!({ "sample_id": world.sample_id, "label": "positive" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let annotation_id = created["data"]["id"].as_i64().unwrap();

    let blank = expect_status(
        post_json(
            &app,
            "/api/v1/reviews/reject",
            Some(&world.reviewer.token),
            json!({ "annotation_id": annotation_id, "feedback": "   " }),
        )
        .await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(error_code(&blank), "VALIDATION_ERROR");

    let missing = expect_status(
        post_json(
            &app,
            "/api/v1/reviews",
            Some(&world.reviewer.token),
            json!({ "annotation_id": annotation_id, "decision": "rejected" }),
        )
        .await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(error_code(&missing), "VALIDATION_ERROR");

    assert_eq!(sample_status(&pool, world.sample_id).await, SampleStatus::Annotated);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_bodies_are_rejected(pool: PgPool) {
    let world = seed_world(&pool).await;
    let app = build_test_app(pool.clone());

    let zero_id = expect_status(
        post_json(
            &app,
            "/api/v1/annotations",
            Some(&world.annotator.token),
            json!({ "sample_id": 0, "label": "positive" }),
        )
        .await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(error_code(&zero_id), "NOT_FOUND");

    let response = post_json(
        &app,
        "/api/v1/annotations",
        Some(&world.annotator.token),
        json!({ "sample_id": world.sample_id, "label": "ecstatic" }),
    )
    .await;
    assert!(response.status().is_client_error());

    assert_eq!(sample_status(&pool, world.sample_id).await, SampleStatus::Pending);
}

// ---------------------------------------------------------------------------
// Authentication and authorization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_or_unknown_token_is_unauthorized(pool: PgPool) {
    let world = seed_world(&pool).await;
    let app = build_test_app(pool);
    let body = json!({ "sample_id": world.sample_id, "label": "positive" });

    let missing = expect_status(
        post_json(&app, "/api/v1/annotations", None, body.clone()).await,
        StatusCode::UNAUTHORIZED,
    )
    .await;
    assert_eq!(error_code(&missing), "UNAUTHORIZED");

    expect_status(
        post_json(&app, "/api/v1/annotations", Some("not-a-jwt"), body.clone()).await,
        StatusCode::UNAUTHORIZED,
    )
    .await;

    let ghost = token_for(world.admin.id + 1000, "annotator");
    expect_status(
        post_json(&app, "/api/v1/annotations", Some(&ghost), body).await,
        StatusCode::UNAUTHORIZED,
    )
    .await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_roles_are_enforced(pool: PgPool) {
    let world = seed_world(&pool).await;
    let app = build_test_app(pool.clone());

    let as_reviewer = expect_status(
        post_json(
            &app,
            "/api/v1/annotations",
            Some(&world.reviewer.token),
            json!({ "sample_id": world.sample_id, "label": "positive" }),
        )
        .await,
        StatusCode::FORBIDDEN,
    )
    .await;
    assert_eq!(error_code(&as_reviewer), "FORBIDDEN");

    expect_status(
        get(&app, "/api/v1/analytics", Some(&world.annotator.token)).await,
        StatusCode::FORBIDDEN,
    )
    .await;

    assert_eq!(sample_status(&pool, world.sample_id).await, SampleStatus::Pending);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_capability_is_checked_before_feedback(pool: PgPool) {
    let world = seed_world(&pool).await;
    let app = build_test_app(pool.clone());

    let created = expect_status(
        post_json(
            &app,
            "/api/v1/annotations",
            Some(&world.annotator.token),
            json!({ "sample_id": world.sample_id, "label": "positive" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let annotation_id = created["data"]["id"].as_i64().unwrap();
    let overlong = "x".repeat(10_001);

    let as_annotator = expect_status(
        post_json(
            &app,
            "/api/v1/reviews/reject",
            Some(&world.annotator.token),
            json!({ "annotation_id": annotation_id, "feedback": overlong }),
        )
        .await,
        StatusCode::FORBIDDEN,
    )
    .await;
    assert_eq!(error_code(&as_annotator), "FORBIDDEN");

    let as_reviewer = expect_status(
        post_json(
            &app,
            "/api/v1/reviews/reject",
            Some(&world.reviewer.token),
            json!({ "annotation_id": annotation_id, "feedback": overlong }),
        )
        .await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(error_code(&as_reviewer), "VALIDATION_ERROR");

    assert_eq!(sample_status(&pool, world.sample_id).await, SampleStatus::Annotated);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_role_claim_is_not_trusted(pool: PgPool) {
    let world = seed_world(&pool).await;
    let app = build_test_app(pool.clone());

    let created = expect_status(
        post_json(
            &app,
            "/api/v1/annotations",
            Some(&world.annotator.token),
            json!({ "sample_id": world.sample_id, "label": "positive" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let annotation_id = created["data"]["id"].as_i64().unwrap();

    // The annotator's own id, but a token claiming the reviewer role.
    let forged = token_for(world.annotator.id, "reviewer");
    expect_status(
        post_json(
            &app,
            "/api/v1/reviews/approve",
            Some(&forged),
            json!({ "annotation_id": annotation_id }),
        )
        .await,
        StatusCode::FORBIDDEN,
    )
    .await;

    assert_eq!(sample_status(&pool, world.sample_id).await, SampleStatus::Annotated);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_annotations_one_wins(pool: PgPool) {
    let world = seed_world(&pool).await;
    let second = member(&pool, "second@example.com", Role::Annotator).await;
    let app = build_test_app(pool.clone());

    let requests = [
        (&world.annotator.token, "positive"),
        (&second.token, "negative"),
    ]
    .into_iter()
    .map(|(token, label)| {
        let app = app.clone();
        let body = json!({ "sample_id": world.sample_id, "label": label });
        async move { post_json(&app, "/api/v1/annotations", Some(token.as_str()), body).await }
    });

    let statuses: Vec<StatusCode> = join_all(requests)
        .await
        .into_iter()
        .map(|r| r.status())
        .collect();

    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::CREATED).count(),
        1,
        "statuses: {statuses:?}"
    );
    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(),
        1,
        "statuses: {statuses:?}"
    );
    assert_eq!(
        AnnotationRepo::list_for_sample(&pool, world.sample_id)
            .await
            .unwrap()
            .len(),
        1
    );
}
