//! HTTP-level integration tests for the `/incident` endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    delete_auth, expect_status, get_auth, post_json_auth, put_json_auth, seed_admin, seed_client,
    seed_staff,
};
use serde_json::json;
use sqlx::PgPool;

fn report(client_id: i64) -> serde_json::Value {
    json!({
        "client_id": client_id,
        "occurred_at": "2026-03-02T14:30:00Z",
        "location": "Kitchen",
        "incident_type_id": 1,
        "severity_id": 2,
        "description": "Slipped on a wet floor",
    })
}

async fn set_status(
    pool: &PgPool,
    id: &serde_json::Value,
    status: i16,
    token: &str,
) -> serde_json::Value {
    expect_status(
        put_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/incident/{id}/status"),
            json!({ "status": status }),
            token,
        )
        .await,
        StatusCode::OK,
    )
    .await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_staff_reports_incident(pool: PgPool) {
    let (staff, token) = seed_staff(&pool, "carer").await;
    let client = seed_client(&pool, "Jones", Some(staff.id)).await;

    let json = expect_status(
        post_json_auth(common::build_test_app(pool), "/api/incident", report(client.id), &token).await,
        StatusCode::CREATED,
    )
    .await;

    assert_eq!(json["reported_by_id"], staff.id);
    assert_eq!(json["status_id"], 1);
    assert!(json["resolved_at"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_report_validation(pool: PgPool) {
    let (staff, token) = seed_staff(&pool, "carer").await;
    let mine = seed_client(&pool, "Mine", Some(staff.id)).await;
    let other = seed_client(&pool, "Other", None).await;

    let mut bad_severity = report(mine.id);
    bad_severity["severity_id"] = json!(5);
    let mut empty_description = report(mine.id);
    empty_description["description"] = json!("");

    for body in [bad_severity, empty_description] {
        let response =
            post_json_auth(common::build_test_app(pool.clone()), "/api/incident", body.clone(), &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }

    let response =
        post_json_auth(common::build_test_app(pool), "/api/incident", report(other.id), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_status_transitions_stamp_resolved_at(pool: PgPool) {
    let (_admin, admin_token) = seed_admin(&pool).await;
    let (staff, staff_token) = seed_staff(&pool, "carer").await;
    let client = seed_client(&pool, "Jones", Some(staff.id)).await;

    let created = expect_status(
        post_json_auth(common::build_test_app(pool.clone()), "/api/incident", report(client.id), &staff_token).await,
        StatusCode::CREATED,
    )
    .await;
    let id = &created["id"];

    // Staff may not change status.
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/incident/{id}/status"),
        json!({ "status": 3 }),
        &staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let under_review = set_status(&pool, id, 2, &admin_token).await;
    assert!(under_review["resolved_at"].is_null());

    let resolved = set_status(&pool, id, 3, &admin_token).await;
    assert!(resolved["resolved_at"].is_string());

    // Closing keeps the original resolution time.
    let closed = set_status(&pool, id, 4, &admin_token).await;
    assert_eq!(closed["resolved_at"], resolved["resolved_at"]);

    let reopened = set_status(&pool, id, 1, &admin_token).await;
    assert!(reopened["resolved_at"].is_null());

    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/incident/{id}/status"),
        json!({ "status": 7 }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_incident_visibility(pool: PgPool) {
    let (_admin, admin_token) = seed_admin(&pool).await;
    let (staff, staff_token) = seed_staff(&pool, "carer").await;
    let (_other, other_token) = seed_staff(&pool, "other").await;
    let client = seed_client(&pool, "Jones", Some(staff.id)).await;

    let created = expect_status(
        post_json_auth(common::build_test_app(pool.clone()), "/api/incident", report(client.id), &admin_token).await,
        StatusCode::CREATED,
    )
    .await;
    let uri = format!("/api/incident/{}", created["id"]);

    // Assigned staff see it even though an admin reported it.
    let json = expect_status(
        get_auth(common::build_test_app(pool.clone()), "/api/incident", &staff_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["total"], 1);

    let json = expect_status(
        get_auth(common::build_test_app(pool.clone()), "/api/incident", &other_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["total"], 0);

    let response = get_auth(common::build_test_app(pool.clone()), &uri, &other_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = expect_status(
        get_auth(common::build_test_app(pool.clone()), "/api/incident?status=1&severity=2", &admin_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["total"], 1);

    let response = get_auth(common::build_test_app(pool), "/api/incident?status=9", &admin_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_only_reporter_or_admin_may_edit(pool: PgPool) {
    let (_admin, admin_token) = seed_admin(&pool).await;
    let (staff, staff_token) = seed_staff(&pool, "carer").await;
    let client = seed_client(&pool, "Jones", Some(staff.id)).await;

    let created = expect_status(
        post_json_auth(common::build_test_app(pool.clone()), "/api/incident", report(client.id), &admin_token).await,
        StatusCode::CREATED,
    )
    .await;
    let uri = format!("/api/incident/{}", created["id"]);

    // Visible to the assigned carer, but they did not report it.
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "action_taken": "Called GP" }),
        &staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = expect_status(
        put_json_auth(
            common::build_test_app(pool.clone()),
            &uri,
            json!({ "action_taken": "Called GP", "severity_id": 3 }),
            &admin_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["action_taken"], "Called GP");
    assert_eq!(json["severity_id"], 3);

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &staff_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(common::build_test_app(pool), &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
