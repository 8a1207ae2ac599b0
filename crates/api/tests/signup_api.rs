//! HTTP-level integration tests for the `/api/signup` endpoints.

mod common;

use axum::body::Body;
use axum::http::header::{
    CONTENT_SECURITY_POLICY, CONTENT_TYPE, STRICT_TRANSPORT_SECURITY, X_FRAME_OPTIONS,
};
use axum::http::{Method, Request, StatusCode};
use axum::response::IntoResponse;
use chrono::{Duration, Utc};
use common::{body_json, delete_auth, get, get_auth, post_json};
use flower_api::auth::jwt::generate_token_at;
use flower_api::handlers::signup::{create_account, MSG_ACCOUNT_EXISTS, MSG_INVALID_CREDENTIALS};
use flower_core::registration::{MSG_EMAIL_INVALID, MSG_PASSWORD_MISMATCH};
use flower_db::models::user::CreateUser;
use flower_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

fn ann() -> serde_json::Value {
    json!({
        "name": "Ann",
        "username": "ann1",
        "email": "ann@example.com",
        "password": "Secret123",
        "repeatPassword": "Secret123",
    })
}

async fn register(app: axum::Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = post_json(app, "/api/signup/register", body).await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn login(
    app: axum::Router,
    identifier: &str,
    password: &str,
) -> (StatusCode, serde_json::Value) {
    let body = json!({ "identifier": identifier, "password": password });
    let response = post_json(app, "/api/signup/login", body).await;
    let status = response.status();
    (status, body_json(response).await)
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_returns_token_and_public_user(pool: PgPool) {
    let app = common::build_test_app(pool);

    let (status, json) = register(app, ann()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Account created successfully");
    assert_eq!(json["alert"], "");
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["username"], "ann1");
    assert_eq!(json["user"]["email"], "ann@example.com");
    assert!(json["user"].get("passwordHash").is_none());
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_registration_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (status, _) = register(app.clone(), ann()).await;
    assert_eq!(status, StatusCode::OK);

    // Same email, different username.
    let mut again = ann();
    again["username"] = json!("ann2");
    let (status, json) = register(app.clone(), again).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["message"], MSG_ACCOUNT_EXISTS);
    assert_eq!(json["alert"], "error");

    // Same username, different email.
    let mut again = ann();
    again["email"] = json!("other@example.com");
    let (status, _) = register(app, again).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_registrations_admit_exactly_one(pool: PgPool) {
    let app = common::build_test_app(pool);

    let mut twin = ann();
    twin["username"] = json!("ann2");
    let (first, second) = tokio::join!(register(app.clone(), ann()), register(app, twin));

    let mut outcomes = [first, second];
    outcomes.sort_by_key(|(status, _)| status.as_u16());
    assert_eq!(outcomes[0].0, StatusCode::OK);
    assert_eq!(outcomes[1].0, StatusCode::CONFLICT);
    assert_eq!(outcomes[1].1["message"], MSG_ACCOUNT_EXISTS);
    assert_eq!(outcomes[1].1["alert"], "error");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_after_passed_precheck_maps_unique_violation_to_conflict(pool: PgPool) {
    let existing = CreateUser {
        name: "Ann".into(),
        username: "ann1".into(),
        email: "ann@example.com".into(),
        password_hash: "$argon2id$placeholder".into(),
    };
    UserRepo::create(&pool, &existing).await.unwrap();

    // The row lands after the existence check would have passed.
    let racing = CreateUser {
        username: "ann2".into(),
        ..existing
    };
    let err = create_account(&pool, &racing).await.unwrap_err();

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["message"], MSG_ACCOUNT_EXISTS);
    assert_eq!(json["alert"], "error");
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn registration_validation_renders_inline_alert(pool: PgPool) {
    let app = common::build_test_app(pool);

    let mut bad_email = ann();
    bad_email["email"] = json!("not-an-email");
    let (status, json) = register(app.clone(), bad_email).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["alert"], "error");
    assert_eq!(json["message"], MSG_EMAIL_INVALID);
    assert!(json.get("token").is_none());

    let mut mismatch = ann();
    mismatch["repeatPassword"] = json!("Secret124");
    let (status, json) = register(app.clone(), mismatch).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], MSG_PASSWORD_MISMATCH);

    // Nothing was stored: the valid form still registers.
    let (status, _) = register(app, ann()).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_is_rate_limited_per_client(pool: PgPool) {
    let app = common::build_test_app(pool);

    let mut invalid = ann();
    invalid["email"] = json!("");
    for _ in 0..6 {
        let (status, _) = register(app.clone(), invalid.clone()).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, json) = register(app, ann()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["alert"], "error");
    assert_eq!(json["code"], "RATE_LIMITED");
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_by_email_or_username(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(app.clone(), ann()).await;

    let (status, json) = login(app.clone(), "ann@example.com", "Secret123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Login successful");
    assert!(json["token"].is_string());

    let (status, json) = login(app.clone(), "ann1", "Secret123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["name"], "Ann");

    // Field aliases from older clients.
    let body = json!({ "emailOrUsername": "ann1", "pass": "Secret123" });
    let response = post_json(app, "/api/signup/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_password_and_unknown_user_are_indistinguishable(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(app.clone(), ann()).await;

    let (wrong_status, wrong_json) = login(app.clone(), "ann1", "nope").await;
    let (ghost_status, ghost_json) = login(app, "ghost", "Secret123").await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_json, ghost_json);
    assert_eq!(ghost_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_json["message"], MSG_INVALID_CREDENTIALS);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_requires_both_fields(pool: PgPool) {
    let app = common::build_test_app(pool);

    let (status, json) = login(app, "ann1", "").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["alert"], "error");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn twenty_first_login_attempt_is_rate_limited(pool: PgPool) {
    let app = common::build_test_app(pool);

    for _ in 0..20 {
        let (status, _) = login(app.clone(), "ghost", "whatever").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, json) = login(app, "ghost", "whatever").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["code"], "RATE_LIMITED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_limit_ignores_rotating_forwarded_for(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({ "identifier": "ghost", "password": "whatever" }).to_string();

    let mut statuses = Vec::new();
    for i in 0..21 {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/signup/login")
            .header(CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", format!("198.51.100.{i}"))
            .body(Body::from(body.clone()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        statuses.push(response.status());
    }

    assert!(statuses[..20].iter().all(|s| *s == StatusCode::UNAUTHORIZED));
    assert_eq!(statuses[20], StatusCode::TOO_MANY_REQUESTS);
}

// ---------------------------------------------------------------------------
// Me / account / logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_returns_current_user(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, json) = register(app.clone(), ann()).await;
    let token = json["token"].as_str().unwrap();

    let response = get_auth(app, "/api/signup/me", token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let me = body_json(response).await;
    assert_eq!(me["username"], "ann1");
    assert_eq!(me["id"], json["user"]["id"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_rejects_missing_garbage_and_expired_tokens(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/signup/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["alert"], "error");

    let response = get_auth(app.clone(), "/api/signup/me", "not-a-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let issued = Utc::now() - Duration::days(8);
    let jwt = common::test_config().jwt;
    let expired = generate_token_at(1, "ann@example.com", issued, &jwt).unwrap();
    let response = get_auth(app, "/api/signup/me", &expired).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleted_account_cannot_log_in_and_token_user_is_gone(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, json) = register(app.clone(), ann()).await;
    let token = json["token"].as_str().unwrap().to_string();

    let response = delete_auth(app.clone(), "/api/signup/account", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Account deleted");

    let (status, _) = login(app.clone(), "ann1", "Secret123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The token still verifies but its user no longer exists.
    let response = get_auth(app.clone(), "/api/signup/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Deleting again is still a success.
    let response = delete_auth(app, "/api/signup/account", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_is_advisory(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/signup/logout", json!({})).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Logged out successfully");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_responses_carry_security_headers(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/signup/logout", json!({})).await;

    let headers = response.headers();
    assert_eq!(
        headers[CONTENT_SECURITY_POLICY],
        "default-src 'self'; frame-ancestors 'none'"
    );
    assert!(headers[STRICT_TRANSPORT_SECURITY]
        .to_str()
        .unwrap()
        .starts_with("max-age=15768000"));
    assert_eq!(headers[X_FRAME_OPTIONS], "DENY");
}
