//! Errors surfaced by the auth and task clients.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Credentials or registration refused; the message is shown verbatim.
    #[error("{0}")]
    Rejected(String),

    /// Non-2xx reply to a task call. `message` may be empty.
    #[error("request failed with status {status}{}", detail(.message))]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("network error: {0}")]
    Transport(String),

    #[error("not signed in")]
    MissingToken,

    /// The session store could not persist or clear the token.
    #[error("session storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// True when the server refused the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

fn detail(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {message}")
    }
}
