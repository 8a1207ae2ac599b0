//! The signed-in user, their bearer token and the loading flag.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::{AuthApi, AuthSession, RegisterForm, SessionUser};
use crate::error::ClientError;
use crate::store::{SessionStore, TOKEN_KEY, USER_KEY};

/// Point-in-time view of the session, consumed by the route guard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<SessionUser>,
    pub token: Option<String>,
    /// True until [`SessionContext::initialize`] has resolved the stored token.
    pub loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }
}

/// Session context shared by the UI.
///
/// Construct one per client with [`SessionContext::new`], then call
/// [`initialize`](Self::initialize) once to validate whatever was persisted.
pub struct SessionContext {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn SessionStore>,
    state: RwLock<SessionState>,
}

impl SessionContext {
    /// Load any persisted user and token optimistically; `loading` starts true.
    ///
    /// A stored user that no longer parses is dropped.
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn SessionStore>) -> Self {
        let token = store.get(TOKEN_KEY);
        let user = store
            .get(USER_KEY)
            .and_then(|raw| serde_json::from_str::<SessionUser>(&raw).ok());

        Self {
            api,
            store,
            state: RwLock::new(SessionState {
                user,
                token,
                loading: true,
            }),
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// `Authorization` header value for outgoing requests, if signed in.
    pub async fn bearer(&self) -> Option<String> {
        self.state
            .read()
            .await
            .token
            .as_ref()
            .map(|token| format!("Bearer {token}"))
    }

    /// Resolve the persisted token against the server.
    ///
    /// An authorization failure clears the session. Any other failure keeps
    /// the optimistically loaded user. Loading ends either way.
    pub async fn initialize(&self) {
        let token = self.state.read().await.token.clone();

        let Some(token) = token else {
            self.clear().await;
            return;
        };

        match self.api.me(&token).await {
            Ok(user) => {
                self.persist_user(&user);
                let mut state = self.state.write().await;
                state.user = Some(user);
                state.loading = false;
            }
            Err(e) if e.is_auth() => {
                tracing::info!(error = %e, "Stored session rejected, clearing");
                self.clear().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not verify stored session, keeping it");
                self.state.write().await.loading = false;
            }
        }
    }

    /// Adopt a session returned by register or login and persist it.
    pub async fn login(&self, session: AuthSession) -> Result<(), ClientError> {
        self.store.set(TOKEN_KEY, &session.token)?;
        let user_json = serde_json::to_string(&session.user)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        self.store.set(USER_KEY, &user_json)?;

        let mut state = self.state.write().await;
        state.user = Some(session.user);
        state.token = Some(session.token);
        state.loading = false;
        Ok(())
    }

    /// Log in with an email address or username.
    pub async fn sign_in(&self, identifier: &str, password: &str) -> Result<(), ClientError> {
        let session = self.api.login(identifier, password).await?;
        self.login(session).await
    }

    /// Create an account and sign into it.
    pub async fn register(&self, form: &RegisterForm) -> Result<(), ClientError> {
        let session = self.api.register(form).await?;
        self.login(session).await
    }

    /// Tell the server, ignoring the outcome, then clear local state.
    pub async fn logout(&self) {
        let token = self.state.read().await.token.clone();
        if let Err(e) = self.api.logout(token.as_deref()).await {
            tracing::debug!(error = %e, "Logout call failed, clearing anyway");
        }
        self.clear().await;
    }

    /// Delete the account server-side. Local state is cleared only on success.
    pub async fn delete_account(&self) -> Result<(), ClientError> {
        let token = self
            .state
            .read()
            .await
            .token
            .clone()
            .ok_or(ClientError::NotLoggedIn)?;
        self.api.delete_account(&token).await?;
        self.clear().await;
        Ok(())
    }

    fn persist_user(&self, user: &SessionUser) {
        let result = serde_json::to_string(user)
            .map_err(|e| ClientError::Storage(e.to_string()))
            .and_then(|json| self.store.set(USER_KEY, &json));
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist user");
        }
    }

    async fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key, error = %e, "Failed to remove stored session value");
            }
        }
        let mut state = self.state.write().await;
        state.user = None;
        state.token = None;
        state.loading = false;
    }
}
