//! The contract every authentication strategy implements
//!
//! A strategy is created for one request, asked to [`authenticate`] it, and
//! reports back with an [`Outcome`]. Every outcome ends strategy processing
//! for that request. After the host accepts a [`Outcome::Success`] it calls
//! [`finalize`], the only place a strategy may redirect a signed-in user.
//!
//! [`authenticate`]: Strategy::authenticate
//! [`finalize`]: Strategy::finalize

use crate::context::AuthContext;
use crate::error::Result;
use crate::response::Redirect;
use async_trait::async_trait;

/// What a strategy decided for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<U> {
    /// Send the user agent elsewhere and stop.
    Redirect(Redirect),
    /// Authentication succeeded with this identity.
    Success(U),
    /// Authentication failed; the message is safe to show to the user.
    Failure(String),
}

impl<U> Outcome<U> {
    /// Failure with a message
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// Whether this is a success
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The identity, for a success
    pub fn into_user(self) -> Option<U> {
        match self {
            Self::Success(user) => Some(user),
            _ => None,
        }
    }
}

/// An authentication strategy
///
/// Instances are per request: the host builds one, runs it, and drops it.
/// State cached on `self` therefore never leaks between callers.
#[async_trait]
pub trait Strategy: Send {
    /// Identity produced on success
    type User: Send;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether the strategy applies to this request at all.
    fn valid(&self, _ctx: &AuthContext<'_>) -> bool {
        true
    }

    /// Run the strategy for the current request.
    ///
    /// Errors are reserved for faults the host should treat as server errors;
    /// rejected credentials are an [`Outcome::Failure`].
    async fn authenticate(&mut self, ctx: &mut AuthContext<'_>) -> Result<Outcome<Self::User>>;

    /// Post-success hook, invoked after the host accepted the identity.
    fn finalize(&mut self, _ctx: &mut AuthContext<'_>) -> Result<Option<Redirect>> {
        Ok(None)
    }
}
