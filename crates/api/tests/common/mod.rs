#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use careoffice_api::auth::jwt::{generate_access_token, JwtConfig};
use careoffice_api::auth::password::hash_password;
use careoffice_api::config::ServerConfig;
use careoffice_api::router::build_app_router;
use careoffice_api::state::AppState;
use careoffice_core::roles::{ROLE_ADMIN, ROLE_STAFF};
use careoffice_core::types::DbId;
use careoffice_db::models::client::{Client, CreateClient};
use careoffice_db::models::user::{CreateUser, User};
use careoffice_db::repositories::{ClientRepo, RoleRepo, UserRepo};

/// Plaintext password of every user created through [`create_user`].
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults, storing uploads under
/// `upload_dir`.
pub fn test_config(upload_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![HeaderValue::from_static("http://localhost:5173")],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 7,
        },
        upload_dir,
        max_upload_bytes: 1024,
        metadata_cache_ttl_secs: 300,
        bootstrap_admin: None,
    }
}

fn default_upload_dir() -> PathBuf {
    std::env::temp_dir().join("careoffice-api-tests")
}

/// Build the full application router, exactly as `main.rs` does.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config(default_upload_dir());
    build_app_router(AppState::new(pool, config.clone()), &config)
}

/// Like [`build_test_app`] but with uploads stored under `dir`.
pub fn build_test_app_with_uploads(pool: PgPool, dir: &Path) -> Router {
    let config = test_config(dir.to_path_buf());
    build_app_router(AppState::new(pool, config.clone()), &config)
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

/// Insert a user with the given role name and [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    let role_id = RoleRepo::id_for_name(pool, role)
        .await
        .unwrap()
        .expect("role should be seeded");
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        first_name: username.to_string(),
        last_name: "Tester".to_string(),
        phone_number: None,
        role_id,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Mint an access token for `user` without going through `/auth/login`.
pub fn token_for(user: &User, role: &str) -> String {
    let config = test_config(default_upload_dir());
    generate_access_token(user.id, role, &config.jwt).expect("token generation should succeed")
}

pub async fn seed_admin(pool: &PgPool) -> (User, String) {
    let user = create_user(pool, "admin", ROLE_ADMIN).await;
    let token = token_for(&user, ROLE_ADMIN);
    (user, token)
}

pub async fn seed_staff(pool: &PgPool, username: &str) -> (User, String) {
    let user = create_user(pool, username, ROLE_STAFF).await;
    let token = token_for(&user, ROLE_STAFF);
    (user, token)
}

/// Insert a client with only the required fields set.
pub async fn seed_client(pool: &PgPool, last_name: &str, staff_id: Option<DbId>) -> Client {
    ClientRepo::create(
        pool,
        &CreateClient {
            first_name: "Client".to_string(),
            last_name: last_name.to_string(),
            date_of_birth: None,
            gender_id: None,
            email: None,
            phone_number: None,
            address: None,
            care_level_id: None,
            medical_notes: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            assigned_staff_id: staff_id,
        },
    )
    .await
    .expect("client creation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::POST, uri, Some(token))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

/// POST a single-file multipart form with the file under the `file` field.
pub async fn upload_auth(
    app: Router,
    uri: &str,
    file_name: &str,
    contents: &[u8],
    token: &str,
) -> Response {
    const BOUNDARY: &str = "careoffice-test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Assert a response's status, printing the body on mismatch.
pub async fn expect_status(response: Response, expected: StatusCode) -> serde_json::Value {
    let status = response.status();
    let bytes = body_bytes(response).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    assert_eq!(status, expected, "unexpected status; body: {json}");
    json
}
