//! Tests for `AppError` and `FormError` response mapping.
//!
//! These call `IntoResponse` directly and need no server or database.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use flower_api::error::AppError;
use flower_api::handlers::signup::FormError;
use flower_core::error::CoreError;
use http_body_util::BodyExt;

async fn to_parts(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn not_found_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Intersection",
        id: 42,
    });

    let (status, json) = to_parts(err.into_response()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Intersection with id 42 not found");
}

#[tokio::test]
async fn bad_request_returns_400() {
    let err = AppError::BadRequest("Invalid intersection id".into());

    let (status, json) = to_parts(err.into_response()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "Invalid intersection id");
}

#[tokio::test]
async fn rate_limited_returns_429() {
    let err = AppError::Core(CoreError::RateLimited("slow down".into()));

    let (status, json) = to_parts(err.into_response()).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["code"], "RATE_LIMITED");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let err = AppError::InternalError("connection string postgres://secret".into());

    let (status, json) = to_parts(err.into_response()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_maps_to_404() {
    let err = AppError::Database(sqlx::Error::RowNotFound);

    let (status, _) = to_parts(err.into_response()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn form_error_uses_alert_body_with_same_status() {
    let err = FormError::from(CoreError::Conflict("The account already exists.".into()));

    let (status, json) = to_parts(err.into_response()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        json,
        serde_json::json!({
            "message": "The account already exists.",
            "alert": "error",
            "code": "CONFLICT"
        })
    );
}

#[tokio::test]
async fn form_error_sanitizes_storage_failures() {
    let err = FormError::from(sqlx::Error::PoolTimedOut);

    let (status, json) = to_parts(err.into_response()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "An internal error occurred");
    assert_eq!(json["alert"], "error");
}
