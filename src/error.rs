//! Error types
//!
//! Failures surfaced to the caller of a conference intent.

/// Error reported by the real-time client for a publish, unpublish or subscribe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Capture device access was denied
    PermissionDenied(String),
    /// Transport or signaling failure
    Network(String),
    /// The media server refused the request
    Rejected(String),
    /// The client connection is gone
    Closed,
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::PermissionDenied(reason) => write!(f, "Permission denied: {}", reason),
            ClientError::Network(reason) => write!(f, "Network error: {}", reason),
            ClientError::Rejected(reason) => write!(f, "Request rejected: {}", reason),
            ClientError::Closed => write!(f, "Client closed"),
        }
    }
}

impl std::error::Error for ClientError {}

/// Error type for conference operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Publish or subscribe rejected by the client
    Client(ClientError),
    /// Track toggle requested without an active local stream
    NoLocalStream,
    /// The conference has been closed
    Closed,
}

impl Error {
    /// Whether the client refused a capability (device denied, network failure)
    pub fn is_capability_unavailable(&self) -> bool {
        matches!(self, Error::Client(_))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Client(e) => write!(f, "Capability unavailable: {}", e),
            Error::NoLocalStream => write!(f, "No local stream is active"),
            Error::Closed => write!(f, "Conference closed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Client(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ClientError> for Error {
    fn from(e: ClientError) -> Self {
        Error::Client(e)
    }
}

/// Result alias for conference operations
pub type Result<T> = std::result::Result<T, Error>;
