#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use flower_api::auth::jwt::{generate_token, JwtConfig};
use flower_api::auth::password::PasswordConfig;
use flower_api::config::{RateLimitSettings, ServerConfig, SimulatorConfig};
use flower_api::router::build_app_router;
use flower_api::state::AppState;
use flower_api::ws::WsManager;
use flower_core::types::DbId;

pub const TEST_JWT_SECRET: &str = "test-secret-for-integration-tests";

/// Build a test `ServerConfig` with safe defaults.
///
/// Password hashing runs at the minimum Argon2 time cost and the simulator
/// is off.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            expiry_days: 7,
        },
        password: PasswordConfig::with_time_cost(1),
        rate_limit: RateLimitSettings::default(),
        simulator: SimulatorConfig {
            enabled: false,
            interval_ms: 2000,
        },
    }
}

/// Build the full application router through the same builder `main.rs`
/// uses, so tests exercise the production middleware stack.
///
/// Clones of the returned router share limiter state.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone(), Arc::new(WsManager::new()));
    build_app_router(state, &config)
}

/// A bearer token for `user_id` signed with the test secret.
pub fn token_for(user_id: DbId, email: &str) -> String {
    generate_token(user_id, email, &test_config().jwt).expect("token generation should succeed")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("body should be UTF-8")
}

// ---------------------------------------------------------------------------
// Traffic fixtures
// ---------------------------------------------------------------------------

pub mod fixtures {
    use flower_core::types::{DbId, Timestamp};
    use flower_db::models::event::{CreateColorChange, CreateCrossing};
    use flower_db::models::intersection::{CreateIntersection, CreateSemaphore};
    use flower_db::models::user::CreateUser;
    use flower_db::repositories::{
        ColorChangeRepo, CrossingRepo, IntersectionRepo, SemaphoreRepo, UserRepo,
    };
    use sqlx::PgPool;

    /// Insert a user directly and return a bearer token for it.
    pub async fn user_token(pool: &PgPool) -> String {
        let user = UserRepo::create(
            pool,
            &CreateUser {
                name: "Test".into(),
                username: "tester".into(),
                email: "tester@example.com".into(),
                password_hash: "unused".into(),
            },
        )
        .await
        .expect("user creation should succeed");
        super::token_for(user.id, &user.email)
    }

    pub async fn intersection(pool: &PgPool, name: &str, sector: i32) -> DbId {
        IntersectionRepo::create(
            pool,
            &CreateIntersection {
                name: name.to_string(),
                sector,
                lat: 44.43,
                lng: 26.10,
            },
        )
        .await
        .expect("intersection creation should succeed")
        .id
    }

    pub async fn semaphore(pool: &PgPool, intersection_id: DbId, street: &str) -> DbId {
        SemaphoreRepo::create(
            pool,
            &CreateSemaphore {
                intersection_id,
                kind: "VEHICLE".to_string(),
                street: street.to_string(),
                sense: "NORTH".to_string(),
            },
        )
        .await
        .expect("semaphore creation should succeed")
        .id
    }

    pub async fn cross(pool: &PgPool, semaphore_id: DbId, class: &str, at: Timestamp) {
        CrossingRepo::create(
            pool,
            &CreateCrossing {
                semaphore_id,
                vehicle_class: class.to_string(),
                vehicle_id: None,
                speed: Some(42.0),
                crossed_at: at,
            },
        )
        .await
        .expect("crossing creation should succeed");
    }

    pub async fn color(pool: &PgPool, semaphore_id: DbId, color: &str, at: Timestamp) {
        ColorChangeRepo::create(
            pool,
            &CreateColorChange {
                semaphore_id,
                color: color.to_string(),
                changed_at: at,
            },
        )
        .await
        .expect("color change creation should succeed");
    }
}
