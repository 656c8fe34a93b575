//! Error handling for the layer push pipeline

use std::fmt;

pub type Result<T> = std::result::Result<T, PushError>;

#[derive(Debug, Clone)]
pub enum PushError {
    /// The initiate call failed; the session never became usable
    Negotiation(String),
    /// Transport failure while talking to the registry
    Network(String),
    /// The registry rejected a part upload or a complete call
    Upload(String),
    /// The content is already stored under its digest. Commit translates
    /// this to success because storage is content-addressed.
    LayerAlreadyExists,
    /// The digest returned on complete does not match the expected descriptor
    DigestMismatch { expected: String, actual: String },
    /// Local validation errors (malformed digests, size mismatches)
    Validation(String),
    /// The cancellation token fired before a blocking call was issued
    Cancelled,
    /// Operation on a session that already reached a terminal state
    SessionClosed(String),
    /// File IO errors
    Io(String),
    /// Request/response body errors
    Serialization(String),
}

impl fmt::Display for PushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushError::Negotiation(msg) => write!(f, "Upload negotiation error: {}", msg),
            PushError::Network(msg) => write!(f, "Network error: {}", msg),
            PushError::Upload(msg) => write!(f, "Upload error: {}", msg),
            PushError::LayerAlreadyExists => write!(f, "Layer already exists in the registry"),
            PushError::DigestMismatch { expected, actual } => write!(
                f,
                "Digest mismatch: expected {}, registry returned {}",
                expected, actual
            ),
            PushError::Validation(msg) => write!(f, "Validation error: {}", msg),
            PushError::Cancelled => write!(f, "Operation cancelled"),
            PushError::SessionClosed(msg) => write!(f, "Session no longer usable: {}", msg),
            PushError::Io(msg) => write!(f, "IO error: {}", msg),
            PushError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for PushError {}

impl From<std::io::Error> for PushError {
    fn from(err: std::io::Error) -> Self {
        PushError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for PushError {
    fn from(err: reqwest::Error) -> Self {
        PushError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for PushError {
    fn from(err: serde_json::Error) -> Self {
        PushError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for PushError {
    fn from(err: url::ParseError) -> Self {
        PushError::Validation(err.to_string())
    }
}
