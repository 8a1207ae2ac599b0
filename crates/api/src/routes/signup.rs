//! Route definitions for the `/signup` resource.

use axum::http::header::{CONTENT_SECURITY_POLICY, STRICT_TRANSPORT_SECURITY, X_FRAME_OPTIONS};
use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::handlers::signup;
use crate::state::AppState;

/// Routes mounted at `/signup`, every response carrying the security headers.
///
/// ```text
/// POST   /register  -> register
/// POST   /login     -> login
/// GET    /me        -> me
/// DELETE /account   -> delete_account
/// POST   /logout    -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(signup::register))
        .route("/login", post(signup::login))
        .route("/me", get(signup::me))
        .route("/account", delete(signup::delete_account))
        .route("/logout", post(signup::logout))
        .layer(SetResponseHeaderLayer::overriding(
            CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'self'; frame-ancestors 'none'"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=15768000; includeSubDomains; preload"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}
