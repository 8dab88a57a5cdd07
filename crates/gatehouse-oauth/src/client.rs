//! Seam to the OAuth client that talks to the provider
//!
//! The strategy never speaks HTTP to the provider itself. It describes the
//! request it wants in a [`ClientConfig`], asks a [`ClientFactory`] for an
//! [`OAuthClient`], and lets that client build the authorization URL or
//! exchange the code.

use async_trait::async_trait;
use gatehouse_core::{AuthError, BoxError};
use std::fmt;
use thiserror::Error;

/// Everything the OAuth client needs for one request.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Authorization code from the callback; `None` when starting a flow.
    pub code: Option<String>,
    /// Anti-forgery state sent to the provider.
    pub state: String,
    /// Requested scopes.
    pub scope: String,
    /// Client id issued by the provider.
    pub client_id: String,
    /// Client secret issued by the provider.
    pub client_secret: String,
    /// Absolute callback URI.
    pub redirect_uri: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("code", &self.code.as_ref().map(|_| "***"))
            .field("state", &"***")
            .field("scope", &self.scope)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// Access token returned by the provider.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the token string.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"***").finish()
    }
}

/// Errors reported by the OAuth client or the user loader.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The provider rejected the authorization code (invalid or expired).
    #[error("{0}")]
    BadVerificationCode(String),

    /// Anything else: network failure, malformed response, ...
    #[error("OAuth exchange failed: {0}")]
    Transport(#[source] BoxError),
}

impl ExchangeError {
    /// Create a bad verification code error
    pub fn bad_verification_code(message: impl Into<String>) -> Self {
        Self::BadVerificationCode(message.into())
    }

    /// Wrap a transport failure
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::Transport(err.into())
    }
}

impl From<ExchangeError> for AuthError {
    fn from(err: ExchangeError) -> Self {
        AuthError::collaborator(err)
    }
}

/// OAuth client bound to one [`ClientConfig`].
#[async_trait]
pub trait OAuthClient: Send + Sync {
    /// Provider URL the user agent is sent to.
    fn authorize_url(&self) -> String;

    /// Exchange the configured code for an access token.
    async fn access_token(&self) -> Result<AccessToken, ExchangeError>;
}

/// Builds an [`OAuthClient`] per request.
///
/// Implemented for any `Fn(ClientConfig) -> C`.
pub trait ClientFactory: Send + Sync {
    /// Client type produced
    type Client: OAuthClient;

    /// Build a client for `config`.
    fn build(&self, config: ClientConfig) -> Self::Client;
}

impl<F, C> ClientFactory for F
where
    F: Fn(ClientConfig) -> C + Send + Sync,
    C: OAuthClient,
{
    type Client = C;

    fn build(&self, config: ClientConfig) -> C {
        self(config)
    }
}
