//! Reasons a flow is aborted

use thiserror::Error;

/// Recoverable failures that end a callback with [`Outcome::Failure`].
///
/// The `Display` text is the message reported to the host.
///
/// [`Outcome::Failure`]: gatehouse_core::Outcome::Failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// The callback's `state` does not match the stored one.
    #[error("State mismatch")]
    StateMismatch,

    /// The provider rejected or expired the authorization code.
    #[error("{0}")]
    InvalidAuthorizationCode(String),
}
