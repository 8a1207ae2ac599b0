//! Session Context and Route Guard for dashboard clients.
//!
//! The session keeps the signed-in user and bearer token, persists them
//! through an injected [`SessionStore`], and talks to the server through the
//! [`AuthApi`] seam. The route guard turns session state into a navigation
//! decision.

pub mod api;
pub mod calendar;
pub mod error;
pub mod guard;
pub mod session;
pub mod store;

pub use api::{AuthApi, AuthSession, HttpAuthApi, RegisterForm, SessionUser};
pub use error::ClientError;
pub use guard::{GuardConfig, GuardDecision, RouteGuard};
pub use session::{SessionContext, SessionState};
pub use store::{FileStore, MemoryStore, SessionStore};
