//! Runs one strategy for one request and translates its outcome
//!
//! This is the seam between a [`Strategy`] and whatever HTTP stack hosts it:
//! outcomes become [`Response`]s the host can send as-is, and a success also
//! carries the identity plus the response produced by the finalization hook.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut ctx = AuthContext::new(&request, &mut session, &config);
//! match Authenticator::new(strategy).run(&mut ctx).await? {
//!     AuthResult::Authenticated { user, redirect } => { /* sign in, send redirect */ }
//!     AuthResult::Halted(response) => return response,
//!     AuthResult::Denied { response, .. } => return response,
//!     AuthResult::Skipped => { /* try the next strategy */ }
//! }
//! ```

use crate::context::AuthContext;
use crate::error::Result;
use crate::response::{unauthenticated, Response};
use crate::strategy::{Outcome, Strategy};

/// Result of running a strategy, ready for the host.
#[derive(Debug)]
pub enum AuthResult<U> {
    /// The strategy does not apply to this request.
    Skipped,
    /// Signed in. `redirect` is the finalization response, if the strategy
    /// asked for one.
    Authenticated {
        /// The resolved identity
        user: U,
        /// Response to send instead of continuing to the handler
        redirect: Option<Response>,
    },
    /// The strategy took over the response (e.g. redirect to a provider).
    Halted(Response),
    /// Authentication was refused.
    Denied {
        /// Human-readable reason
        message: String,
        /// 401 response describing the failure
        response: Response,
    },
}

/// Drives a single strategy instance through one request.
///
/// Takes the strategy by value so an instance can never serve two requests.
#[derive(Debug)]
pub struct Authenticator<S> {
    strategy: S,
}

impl<S: Strategy> Authenticator<S> {
    /// Wrap a freshly built strategy.
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    /// Run the strategy against `ctx`.
    pub async fn run(mut self, ctx: &mut AuthContext<'_>) -> Result<AuthResult<S::User>> {
        let name = self.strategy.name();

        if !self.strategy.valid(ctx) {
            tracing::debug!(strategy = name, "Strategy not applicable, skipping");
            return Ok(AuthResult::Skipped);
        }

        match self.strategy.authenticate(ctx).await? {
            Outcome::Redirect(redirect) => {
                tracing::debug!(strategy = name, status = %redirect.status(), "Strategy halted with redirect");
                Ok(AuthResult::Halted(redirect.into_response()))
            }
            Outcome::Failure(message) => {
                tracing::info!(strategy = name, message = message.as_str(), "Authentication failed");
                let response = unauthenticated(&message);
                Ok(AuthResult::Denied { message, response })
            }
            Outcome::Success(user) => {
                tracing::info!(strategy = name, path = ctx.request().path(), "Authentication succeeded");
                let redirect = self.strategy.finalize(ctx)?.map(|r| r.into_response());
                Ok(AuthResult::Authenticated { user, redirect })
            }
        }
    }
}
