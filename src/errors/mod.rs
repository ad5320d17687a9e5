use std::fmt;

use thiserror::Error;

/// Common trait for the error types surfaced to the host application
pub trait AppError: std::error::Error + Send + Sync + 'static {
    /// Get the error code for host-side handling
    fn error_code(&self) -> &'static str;

    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Whether the caller can recover by retrying with different input
    fn is_recoverable(&self) -> bool {
        false
    }

    /// Get optional suggested action for the user
    fn suggested_action(&self) -> Option<String> {
        None
    }
}

/// Operations the WebDAV backend does not provide.
///
/// Editorial workflow (draft/review/publish) has no WebDAV counterpart, and
/// the token/cursor operations belong to git-hosted backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedOperation {
    GetToken,
    TraverseCursor,
    UnpublishedEntries,
    UnpublishedEntry,
    DeleteUnpublishedEntry,
    UpdateUnpublishedEntryStatus,
    PublishUnpublishedEntry,
}

impl UnsupportedOperation {
    pub fn name(&self) -> &'static str {
        match self {
            UnsupportedOperation::GetToken => "getToken",
            UnsupportedOperation::TraverseCursor => "traverseCursor",
            UnsupportedOperation::UnpublishedEntries => "unpublishedEntries",
            UnsupportedOperation::UnpublishedEntry => "unpublishedEntry",
            UnsupportedOperation::DeleteUnpublishedEntry => "deleteUnpublishedEntry",
            UnsupportedOperation::UpdateUnpublishedEntryStatus => "updateUnpublishedEntryStatus",
            UnsupportedOperation::PublishUnpublishedEntry => "publishUnpublishedEntry",
        }
    }
}

impl fmt::Display for UnsupportedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised by the WebDAV repository
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Invalid repository configuration: {details}")]
    Configuration { details: String },

    #[error("Incorrect username or password")]
    AuthenticationFailed,

    #[error("{method} problem on {path}: {}", format_status(.status, .message))]
    Transport {
        method: String,
        path: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Operation '{operation}' is not supported by the WebDAV backend")]
    Unsupported { operation: UnsupportedOperation },

    #[error("Malformed multistatus response: {details}")]
    Parse { details: String },
}

fn format_status(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("{} {}", code, message),
        None => message.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

impl AppError for RepositoryError {
    fn error_code(&self) -> &'static str {
        match self {
            RepositoryError::Configuration { .. } => "CONFIGURATION_INVALID",
            RepositoryError::AuthenticationFailed => "AUTHENTICATION_FAILED",
            RepositoryError::Transport { status: Some(404), .. } => "NOT_FOUND",
            RepositoryError::Transport { status: Some(_), .. } => "HTTP_ERROR",
            RepositoryError::Transport { status: None, .. } => "NETWORK_ERROR",
            RepositoryError::Unsupported { .. } => "UNSUPPORTED_OPERATION",
            RepositoryError::Parse { .. } => "MALFORMED_RESPONSE",
        }
    }

    fn user_message(&self) -> String {
        match self {
            RepositoryError::Configuration { details } => {
                format!("The WebDAV backend is misconfigured: {}", details)
            }
            RepositoryError::AuthenticationFailed => "Incorrect username or password".to_string(),
            RepositoryError::Transport { path, status: Some(404), .. } => {
                format!("'{}' was not found on the server", path)
            }
            RepositoryError::Transport { path, .. } => {
                format!("The server could not complete the request for '{}'", path)
            }
            RepositoryError::Unsupported { operation } => {
                format!("'{}' is not available with the WebDAV backend", operation)
            }
            RepositoryError::Parse { .. } => "The server returned an unreadable listing".to_string(),
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, RepositoryError::AuthenticationFailed)
    }

    fn suggested_action(&self) -> Option<String> {
        match self {
            RepositoryError::Configuration { .. } => {
                Some("Set the backend url and media folder in the host configuration".to_string())
            }
            RepositoryError::AuthenticationFailed => Some("Check your credentials and log in again".to_string()),
            RepositoryError::Transport { status: None, .. } => {
                Some("Verify the server is reachable".to_string())
            }
            _ => None,
        }
    }
}

/// Utility functions for common error creation patterns
impl RepositoryError {
    pub fn configuration<S: Into<String>>(details: S) -> Self {
        Self::Configuration { details: details.into() }
    }

    pub fn parse<S: Into<String>>(details: S) -> Self {
        Self::Parse { details: details.into() }
    }

    pub fn unsupported(operation: UnsupportedOperation) -> Self {
        Self::Unsupported { operation }
    }

    /// Builds a transport error from a non-success HTTP response status
    pub fn http_status(method: &reqwest::Method, path: &str, status: reqwest::StatusCode) -> Self {
        Self::Transport {
            method: method.to_string(),
            path: path.to_string(),
            status: Some(status.as_u16()),
            message: status.canonical_reason().unwrap_or("").to_string(),
        }
    }

    /// Builds a transport error from a network-level failure
    pub fn network(method: &reqwest::Method, path: &str, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else {
            err.to_string()
        };
        Self::Transport {
            method: method.to_string(),
            path: path.to_string(),
            status: None,
            message,
        }
    }

    /// HTTP status carried by a transport error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            RepositoryError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}
