//! Handlers for the `/signup` resource: register, login, me, account
//! deletion and logout.
//!
//! These endpoints speak the signup-form contract: failures render as
//! `{ "message", "alert": "error", "code" }` rather than the default
//! `{ "error", "code" }` body, and registration validation failures are
//! returned with status 200 so the form can show them inline.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use flower_core::error::CoreError;
use flower_core::registration::{self, RegistrationForm};
use flower_db::models::user::{CreateUser, PublicUser, User};
use flower_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::middleware::rate_limit::ClientKey;
use crate::state::AppState;

pub const MSG_ACCOUNT_EXISTS: &str = "The account already exists.";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid email/username or password";
pub const MSG_REGISTER_RATE_LIMITED: &str = "Too many requests, please try again later";
pub const MSG_LOGIN_RATE_LIMITED: &str = "Too many login attempts, please try again later";

// ---------------------------------------------------------------------------
// Form error body
// ---------------------------------------------------------------------------

/// An [`AppError`] rendered with the signup-form body.
#[derive(Debug)]
pub struct FormError(pub AppError);

impl From<AppError> for FormError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<CoreError> for FormError {
    fn from(err: CoreError) -> Self {
        Self(AppError::Core(err))
    }
}

impl From<sqlx::Error> for FormError {
    fn from(err: sqlx::Error) -> Self {
        Self(AppError::Database(err))
    }
}

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.0.parts();
        form_alert(status, code, &message)
    }
}

fn form_alert(status: StatusCode, code: &str, message: &str) -> Response {
    let body = json!({
        "message": message,
        "alert": "error",
        "code": code,
    });
    (status, Json(body)).into_response()
}

pub type FormResult<T> = Result<T, FormError>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /signup/register`. Missing fields read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(alias = "repeat_password")]
    pub repeat_password: String,
}

/// Request body for `POST /signup/login`.
///
/// The identifier may be sent as `identifier`, `emailOrUsername`, `email`
/// or `username`; the password as `password` or `pass`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    #[serde(alias = "emailOrUsername", alias = "email", alias = "username")]
    pub identifier: String,
    #[serde(alias = "pass")]
    pub password: String,
}

/// Successful register/login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    /// Always empty on success; the form treats a non-empty alert as failure.
    pub alert: &'static str,
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Insert the account row. A concurrent registration that slipped past the
/// pre-flight check surfaces here as a unique violation and maps to 409.
pub async fn create_account(pool: &flower_db::DbPool, input: &CreateUser) -> FormResult<User> {
    match UserRepo::create(pool, input).await {
        Ok(user) => Ok(user),
        Err(err) if flower_db::is_unique_violation(&err) => {
            Err(CoreError::Conflict(MSG_ACCOUNT_EXISTS.into()).into())
        }
        Err(err) => Err(err.into()),
    }
}

/// POST /api/signup/register
///
/// Validate the form, reject duplicates, store the Argon2id hash and return a
/// fresh session token.
pub async fn register(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    Json(input): Json<RegisterRequest>,
) -> FormResult<Response> {
    if !state.register_limiter.check(&client).await {
        tracing::warn!(client = %client, "Registration rate limit exceeded");
        return Err(CoreError::RateLimited(MSG_REGISTER_RATE_LIMITED.into()).into());
    }

    let form = RegistrationForm {
        name: &input.name,
        username: &input.username,
        email: &input.email,
        password: &input.password,
        repeat_password: &input.repeat_password,
    };
    match registration::validate_registration(&form) {
        Ok(()) => {}
        Err(CoreError::Validation(msg)) => {
            return Ok(form_alert(StatusCode::OK, "VALIDATION_ERROR", &msg));
        }
        Err(other) => return Err(other.into()),
    }

    // Pre-flight for a friendly message; the unique constraints are authoritative.
    if UserRepo::exists_by_email_or_username(&state.pool, &input.email, &input.username).await? {
        return Err(CoreError::Conflict(MSG_ACCOUNT_EXISTS.into()).into());
    }

    let password = input.password.clone();
    let config = state.config.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, &config))
        .await
        .map_err(|e| AppError::InternalError(format!("Hashing task failed: {e}")))?
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        name: input.name.trim().to_string(),
        username: input.username.trim().to_string(),
        email: input.email.clone(),
        password_hash,
    };
    let user = create_account(&state.pool, &create).await?;

    let token = generate_token(user.id, &user.email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User registered");

    Ok(Json(AuthResponse {
        message: "Account created successfully",
        alert: "",
        token,
        user: PublicUser::from(&user),
    })
    .into_response())
}

/// POST /api/signup/login
///
/// Unknown identifiers and wrong passwords produce the identical 401.
pub async fn login(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    Json(input): Json<LoginRequest>,
) -> FormResult<Json<AuthResponse>> {
    if !state.login_limiter.check(&client).await {
        tracing::warn!(client = %client, "Login rate limit exceeded");
        return Err(CoreError::RateLimited(MSG_LOGIN_RATE_LIMITED.into()).into());
    }

    let identifier = input.identifier.trim();
    registration::validate_login(identifier, &input.password)?;

    let invalid = || FormError::from(CoreError::Unauthorized(MSG_INVALID_CREDENTIALS.into()));

    let user = UserRepo::find_by_identifier(&state.pool, identifier)
        .await?
        .ok_or_else(invalid)?;

    let password = input.password;
    let stored_hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AppError::InternalError(format!("Verification task failed: {e}")))?
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !valid {
        tracing::debug!(user_id = user.id, "Password mismatch");
        return Err(invalid());
    }

    let token = generate_token(user.id, &user.email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        message: "Login successful",
        alert: "",
        token,
        user: PublicUser::from(&user),
    }))
}

/// GET /api/signup/me
///
/// A valid token whose user has since been deleted is treated as unauthorized.
pub async fn me(
    State(state): State<AppState>,
    auth: Result<AuthUser, AppError>,
) -> FormResult<Json<PublicUser>> {
    let auth = auth?;
    let user = UserRepo::find_public(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("User no longer exists".into()))?;
    Ok(Json(user))
}

/// DELETE /api/signup/account
///
/// Hard-deletes the caller's account. Already-issued tokens stay valid until
/// they expire.
pub async fn delete_account(
    State(state): State<AppState>,
    auth: Result<AuthUser, AppError>,
) -> FormResult<Json<MessageResponse>> {
    let auth = auth?;
    let removed = UserRepo::delete(&state.pool, auth.user_id).await?;
    if removed {
        tracing::info!(user_id = auth.user_id, "Account deleted");
    } else {
        tracing::debug!(user_id = auth.user_id, "Account already absent");
    }
    Ok(Json(MessageResponse {
        message: "Account deleted",
    }))
}

/// POST /api/signup/logout
///
/// Advisory only: tokens are stateless, the client discards its own copy.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logged out successfully",
    })
}
