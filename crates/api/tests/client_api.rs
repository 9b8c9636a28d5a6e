//! HTTP-level integration tests for the `/client` endpoints and staff
//! visibility.

mod common;

use axum::http::StatusCode;
use common::{
    delete_auth, expect_status, get_auth, post_json_auth, put_json_auth, seed_admin, seed_client,
    seed_staff,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_creates_client_with_defaults(pool: PgPool) {
    let (_admin, token) = seed_admin(&pool).await;
    let (staff, _) = seed_staff(&pool, "carer").await;

    let json = expect_status(
        post_json_auth(
            common::build_test_app(pool),
            "/api/client",
            json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "assigned_staff_id": staff.id,
            }),
            &token,
        )
        .await,
        StatusCode::CREATED,
    )
    .await;

    assert_eq!(json["gender_id"], 4);
    assert_eq!(json["care_level_id"], 1);
    assert_eq!(json["assigned_staff_id"], staff.id);
    assert_eq!(json["assigned_staff_name"], "carer Tester");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_client_rejects_bad_input(pool: PgPool) {
    let (_admin, token) = seed_admin(&pool).await;
    let (_staff, staff_token) = seed_staff(&pool, "carer").await;

    let cases = [
        json!({ "first_name": "", "last_name": "Lovelace" }),
        json!({ "first_name": "Ada", "last_name": "Lovelace", "care_level_id": 9 }),
        json!({ "first_name": "Ada", "last_name": "Lovelace", "gender_id": 0 }),
        json!({ "first_name": "Ada", "last_name": "Lovelace", "email": "nope" }),
        json!({ "first_name": "Ada", "last_name": "Lovelace", "assigned_staff_id": 9999 }),
    ];
    for body in cases {
        let response =
            post_json_auth(common::build_test_app(pool.clone()), "/api/client", body.clone(), &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/client",
        json!({ "first_name": "Ada", "last_name": "Lovelace" }),
        &staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_staff_see_only_assigned_clients(pool: PgPool) {
    let (_admin, admin_token) = seed_admin(&pool).await;
    let (staff, staff_token) = seed_staff(&pool, "carer").await;
    let (other, _) = seed_staff(&pool, "other").await;

    let mine = seed_client(&pool, "Mine", Some(staff.id)).await;
    let theirs = seed_client(&pool, "Theirs", Some(other.id)).await;
    let unassigned = seed_client(&pool, "Nobody", None).await;

    let json = expect_status(
        get_auth(common::build_test_app(pool.clone()), "/api/client", &staff_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["items"][0]["id"], mine.id);

    for hidden in [theirs.id, unassigned.id] {
        let response = get_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/client/{hidden}"),
            &staff_token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    let json = expect_status(
        get_auth(common::build_test_app(pool), "/api/client", &admin_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["total"], 3);
    // Ordered by last name.
    assert_eq!(json["items"][0]["last_name"], "Mine");
    assert_eq!(json["items"][1]["last_name"], "Nobody");
    assert_eq!(json["items"][2]["last_name"], "Theirs");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_paging_and_search(pool: PgPool) {
    let (_admin, token) = seed_admin(&pool).await;
    for name in ["Adams", "Baker", "Clark", "Davis"] {
        seed_client(&pool, name, None).await;
    }

    let json = expect_status(
        get_auth(common::build_test_app(pool.clone()), "/api/client?limit=2&offset=1", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["total"], 4);
    assert_eq!(json["limit"], 2);
    assert_eq!(json["offset"], 1);
    assert_eq!(json["items"][0]["last_name"], "Baker");
    assert_eq!(json["items"].as_array().unwrap().len(), 2);

    let json = expect_status(
        get_auth(common::build_test_app(pool), "/api/client?search=cla", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["items"][0]["last_name"], "Clark");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_assign_and_unassign(pool: PgPool) {
    let (_admin, token) = seed_admin(&pool).await;
    let (staff, staff_token) = seed_staff(&pool, "carer").await;
    let client = seed_client(&pool, "Jones", None).await;
    let assign_uri = format!("/api/client/{}/assign", client.id);
    let client_uri = format!("/api/client/{}", client.id);

    let json = expect_status(
        put_json_auth(common::build_test_app(pool.clone()), &assign_uri, json!({ "staff_id": staff.id }), &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["assigned_staff_id"], staff.id);

    let response = get_auth(common::build_test_app(pool.clone()), &client_uri, &staff_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = expect_status(
        put_json_auth(common::build_test_app(pool.clone()), &assign_uri, json!({ "staff_id": null }), &token).await,
        StatusCode::OK,
    )
    .await;
    assert!(json["assigned_staff_id"].is_null());

    let response = get_auth(common::build_test_app(pool), &client_uri, &staff_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_and_soft_delete(pool: PgPool) {
    let (_admin, token) = seed_admin(&pool).await;
    let client = seed_client(&pool, "Jones", None).await;
    let uri = format!("/api/client/{}", client.id);

    let json = expect_status(
        put_json_auth(
            common::build_test_app(pool.clone()),
            &uri,
            json!({ "care_level_id": 3, "address": "1 High St" }),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["care_level_id"], 3);
    assert_eq!(json["address"], "1 High St");
    assert_eq!(json["last_name"], "Jones");

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(common::build_test_app(pool), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
