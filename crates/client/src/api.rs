//! The client's view of the `/api/signup` contract.

use async_trait::async_trait;
use flower_core::types::DbId;
use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ClientError;

/// Default server base, overridable with `FLOWER_API_URL`.
pub const DEFAULT_API_URL: &str = "http://localhost:5001/api";

/// Public user projection as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: DbId,
    pub name: String,
    pub username: String,
    pub email: String,
}

/// Result of a successful register or login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub repeat_password: String,
}

/// Server operations the session depends on.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, form: &RegisterForm) -> Result<AuthSession, ClientError>;
    /// `identifier` is an email address or a username.
    async fn login(&self, identifier: &str, password: &str) -> Result<AuthSession, ClientError>;
    async fn me(&self, token: &str) -> Result<SessionUser, ClientError>;
    async fn logout(&self, token: Option<&str>) -> Result<(), ClientError>;
    async fn delete_account(&self, token: &str) -> Result<(), ClientError>;
}

/// [`AuthApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL from `FLOWER_API_URL`, else [`DEFAULT_API_URL`].
    pub fn from_env() -> Self {
        Self::new(std::env::var("FLOWER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/signup{path}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ClientError> {
        let response = request.send().await?;
        decode(response).await
    }
}

/// Turn a response into its JSON body, mapping failures to [`ClientError`].
///
/// Both error bodies are understood: `{message, alert}` from the signup
/// form contract and `{error, code}` from everything else. A 200 carrying
/// `"alert": "error"` is a rejected form.
async fn decode(response: Response) -> Result<Value, ClientError> {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);
    let message = body
        .get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    if !status.is_success() {
        let message = if message.is_empty() {
            status.canonical_reason().unwrap_or("Request failed").to_string()
        } else {
            message
        };
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }
    if body.get("alert").and_then(Value::as_str) == Some("error") {
        return Err(ClientError::Rejected(message));
    }
    Ok(body)
}

fn parse<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ClientError> {
    serde_json::from_value(body).map_err(|e| ClientError::Api {
        status: 200,
        message: format!("Unexpected response body: {e}"),
    })
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn register(&self, form: &RegisterForm) -> Result<AuthSession, ClientError> {
        let body = self
            .send(self.client.post(self.url("/register")).json(form))
            .await?;
        parse(body)
    }

    async fn login(&self, identifier: &str, password: &str) -> Result<AuthSession, ClientError> {
        let payload = json!({ "identifier": identifier, "password": password });
        let body = self
            .send(self.client.post(self.url("/login")).json(&payload))
            .await?;
        parse(body)
    }

    async fn me(&self, token: &str) -> Result<SessionUser, ClientError> {
        let body = self
            .send(self.client.get(self.url("/me")).bearer_auth(token))
            .await?;
        parse(body)
    }

    async fn logout(&self, token: Option<&str>) -> Result<(), ClientError> {
        let mut request = self.client.post(self.url("/logout"));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        self.send(request).await.map(|_| ())
    }

    async fn delete_account(&self, token: &str) -> Result<(), ClientError> {
        self.send(self.client.delete(self.url("/account")).bearer_auth(token))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let api = HttpAuthApi::new("http://example.test/api/");
        assert_eq!(api.url("/me"), "http://example.test/api/signup/me");
    }

    #[test]
    fn register_form_serializes_camel_case() {
        let form = RegisterForm {
            repeat_password: "pw".into(),
            ..RegisterForm::default()
        };
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["repeatPassword"], "pw");
    }

    #[test]
    fn auth_session_reads_server_response() {
        let body = json!({
            "message": "Login successful",
            "alert": "",
            "token": "t",
            "user": { "id": 1, "name": "Ann", "username": "ann1", "email": "ann@example.com" }
        });
        let session: AuthSession = parse(body).unwrap();
        assert_eq!(session.token, "t");
        assert_eq!(session.user.username, "ann1");
    }
}
