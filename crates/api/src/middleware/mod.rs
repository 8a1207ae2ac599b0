//! Request extractors shared by handlers.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a Bearer token.
//! - [`rate_limit::ClientKey`] -- Identifies the calling client for rate limiting.

pub mod auth;
pub mod rate_limit;
