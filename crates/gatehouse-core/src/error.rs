//! Error types for Gatehouse

use crate::config::ConfigError;
use thiserror::Error;

/// Result type alias for Gatehouse operations
pub type Result<T, E = AuthError> = std::result::Result<T, E>;

/// Boxed error returned by external collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that escape a strategy and reach the host's generic error handling.
///
/// Recoverable authentication failures (a forged callback, an expired code)
/// are not errors: strategies report them as [`Outcome::Failure`].
///
/// [`Outcome::Failure`]: crate::Outcome::Failure
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request lacks information a strategy needs (e.g. no host).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A redirect target cannot be used as a `Location` header.
    #[error("Invalid redirect location: {0}")]
    InvalidRedirect(String),

    /// Host configuration is incomplete or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Session data could not be encoded.
    #[error("Session error: {0}")]
    Session(String),

    /// An external collaborator failed (network, malformed response, ...).
    #[error("Collaborator error: {0}")]
    Collaborator(#[source] BoxError),
}

impl AuthError {
    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Wrap a collaborator failure
    pub fn collaborator(err: impl Into<BoxError>) -> Self {
        Self::Collaborator(err.into())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::Session(err.to_string())
    }
}
