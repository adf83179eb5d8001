//! Error types for the Retouch client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the image-editing service
#[derive(Debug, Error)]
pub enum ClientError {
    /// Service answered with a non-success status code
    #[error("transport: {status}")]
    Transport {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        message: String,
    },

    /// Request never produced a response (DNS, TLS, connection reset, ...)
    #[error("transport: {0}")]
    Network(#[from] reqwest::Error),

    /// Success status but the body lacks what we need
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Base URL cannot carry an endpoint path
    #[error("invalid service URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Create a transport error from status code and body
    pub fn transport(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// HTTP status, when the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::MalformedResponse(_) | Self::InvalidUrl(_) => None,
        }
    }

    /// Failure of the HTTP exchange itself, as opposed to its content
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Network(_))
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Transport { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Transport { status, .. } if *status >= 500)
    }
}
