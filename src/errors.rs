use std::fmt;

use crate::stats::Role;

#[derive(Debug)]
pub enum ClientError {
    /// The transport itself failed (DNS, refused connection, timeout).
    Network(String),
    /// The server answered with a non-success status.
    Request {
        status: u16,
        status_text: String,
        body: Option<serde_json::Value>,
    },
    /// Rejected on the client before any network call.
    Validation(String),
    Decode(serde_json::Error),
    NoDashboard(Role),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Server-provided `message` field of a rejected request, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Request { body: Some(body), .. } => {
                body.get("message").and_then(|m| m.as_str())
            }
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(e) => write!(f, "Network error: {e}"),
            ClientError::Request { status, status_text, .. } => {
                write!(f, "API call failed: {status} {status_text}")
            }
            ClientError::Validation(msg) => write!(f, "Validation error: {msg}"),
            ClientError::Decode(e) => write!(f, "Invalid JSON response: {e}"),
            ClientError::NoDashboard(role) => write!(f, "No dashboard for role {role}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Network(e.to_string())
    }
}
