/// Errors surfaced by the client crate.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("Request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// The server accepted the request but the form was rejected
    /// (`"alert": "error"` in a 200 response).
    #[error("{0}")]
    Rejected(String),

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    /// An authenticated call was attempted without a token.
    #[error("Not logged in")]
    NotLoggedIn,
}

impl ClientError {
    /// Authorization-class failures: the stored credentials are no good.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ClientError::Api {
                status: 401 | 403,
                ..
            } | ClientError::NotLoggedIn
        )
    }
}
