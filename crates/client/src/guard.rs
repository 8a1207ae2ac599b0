//! Navigation gate for protected views.

use crate::session::SessionState;

/// Where unauthenticated navigation is sent.
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Default)]
pub struct GuardConfig {
    /// Debug-only escape hatch: let every navigation through.
    pub bypass_auth: bool,
}

impl GuardConfig {
    /// | Env Var              | Default |
    /// |----------------------|---------|
    /// | `FLOWER_BYPASS_AUTH` | `false` |
    pub fn from_env() -> Self {
        let bypass_auth = std::env::var("FLOWER_BYPASS_AUTH")
            .is_ok_and(|v| v.trim().eq_ignore_ascii_case("true"));
        if bypass_auth {
            tracing::warn!("Route guard bypass is enabled");
        }
        Self { bypass_auth }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving: render nothing yet.
    Pending,
    Allow,
    /// Go to [`LOGIN_PATH`]; the attempted path is not remembered.
    RedirectToLogin,
}

#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    config: GuardConfig,
}

impl RouteGuard {
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    pub fn decide(&self, state: &SessionState) -> GuardDecision {
        if state.loading {
            GuardDecision::Pending
        } else if self.config.bypass_auth || state.is_authenticated() {
            GuardDecision::Allow
        } else {
            GuardDecision::RedirectToLogin
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SessionUser;

    fn signed_in() -> SessionState {
        SessionState {
            user: Some(SessionUser {
                id: 1,
                name: "Ann".into(),
                username: "ann1".into(),
                email: "ann@example.com".into(),
            }),
            token: Some("t".into()),
            loading: false,
        }
    }

    #[test]
    fn loading_suspends_the_decision() {
        let guard = RouteGuard::new(GuardConfig { bypass_auth: true });
        let state = SessionState {
            loading: true,
            ..signed_in()
        };
        assert_eq!(guard.decide(&state), GuardDecision::Pending);
    }

    #[test]
    fn signed_in_is_allowed() {
        assert_eq!(RouteGuard::default().decide(&signed_in()), GuardDecision::Allow);
    }

    #[test]
    fn missing_user_or_token_redirects() {
        let guard = RouteGuard::default();
        let no_token = SessionState {
            token: None,
            ..signed_in()
        };
        let no_user = SessionState {
            user: None,
            ..signed_in()
        };
        assert_eq!(guard.decide(&no_token), GuardDecision::RedirectToLogin);
        assert_eq!(guard.decide(&no_user), GuardDecision::RedirectToLogin);
        assert_eq!(guard.decide(&SessionState::default()), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn bypass_allows_anonymous() {
        let guard = RouteGuard::new(GuardConfig { bypass_auth: true });
        assert_eq!(guard.decide(&SessionState::default()), GuardDecision::Allow);
    }
}
