//! `AppError` to HTTP response mapping, exercised directly and through the
//! router for rejected request input.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use careoffice_api::error::AppError;
use careoffice_core::error::CoreError;
use common::{expect_status, get_auth, post_json, post_json_auth, seed_admin};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use validator::Validate;

async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn core_not_found_names_entity_and_id() {
    let (status, json) = render(AppError::Core(CoreError::NotFound {
        entity: "Client",
        id: 42,
    }))
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Client with id 42 not found");
}

#[tokio::test]
async fn named_not_found_keeps_message() {
    let (status, json) =
        render(AppError::NotFound("Unknown metadata category 'planets'".into())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Unknown metadata category 'planets'");
}

#[tokio::test]
async fn bad_request_and_validation_are_400() {
    let (status, json) = render(AppError::BadRequest("Unknown status filter".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");

    let (status, json) =
        render(AppError::Core(CoreError::Validation("Title is required".into()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Title is required");
}

#[tokio::test]
async fn auth_errors_map_to_401_and_403() {
    let (status, json) = render(AppError::Core(CoreError::Unauthorized("Invalid token".into()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, json) = render(AppError::Core(CoreError::Forbidden("Admins only".into()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(json["error"], "Admins only");
}

#[tokio::test]
async fn conflict_is_409() {
    let (status, json) = render(AppError::Core(CoreError::Conflict("Username taken".into()))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let (status, json) = render(AppError::InternalError("disk path /srv/uploads".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");

    let (status, json) = render(AppError::Core(CoreError::Internal("hash failure".into()))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_is_404() {
    let (status, json) = render(AppError::Database(sqlx::Error::RowNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[derive(Validate)]
struct Form {
    #[validate(length(min = 1, message = "Title is required"))]
    title: String,
    #[validate(email)]
    email: String,
}

#[tokio::test]
async fn validation_errors_flatten_sorted_by_field() {
    let form = Form {
        title: String::new(),
        email: "nope".into(),
    };
    let err: AppError = form.validate().unwrap_err().into();

    let (status, json) = render(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(
        json["error"],
        "email: invalid value (email); title: Title is required"
    );
}

// ---------------------------------------------------------------------------
// Extractor rejections render as JSON errors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_body_fields_are_400_json(pool: PgPool) {
    let response = post_json(common::build_test_app(pool.clone()), "/api/auth/login", json!({})).await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("username"));

    let (_admin, token) = seed_admin(&pool).await;
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/client",
        json!({ "last_name": "X" }),
        &token,
    )
    .await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("first_name"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unparseable_body_is_400_json(pool: PgPool) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();
    let response = common::build_test_app(pool).oneshot(request).await.unwrap();
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn bad_query_and_path_params_are_400_json(pool: PgPool) {
    let (_admin, token) = seed_admin(&pool).await;

    let response = get_auth(common::build_test_app(pool.clone()), "/api/client?limit=abc", &token).await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "BAD_REQUEST");

    let response = get_auth(common::build_test_app(pool), "/api/client/abc", &token).await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}
