//! # gatehouse-oauth
//!
//! OAuth2 authorization-code redirect strategy for Gatehouse.
//!
//! [`OAuthRedirectStrategy`] sends unauthenticated requests to the provider,
//! validates the callback against the state kept in the session, exchanges
//! the code through a pluggable [`OAuthClient`], and resolves the identity
//! through a [`UserLoader`].
//!
//! ## Host configuration
//!
//! | Key                   | Required | Meaning                          |
//! |-----------------------|----------|----------------------------------|
//! | `oauth_client_id`     | yes      | client id issued by the provider |
//! | `oauth_client_secret` | yes      | client secret                    |
//! | `oauth_scopes`        | no       | scope string, passed as-is       |
//! | `oauth_callback_url`  | no       | callback path override           |
//!
//! ## Example
//!
//! ```rust,ignore
//! use gatehouse_oauth::{OAuthRedirectStrategy, ClientConfig};
//! use std::sync::Arc;
//!
//! let template = OAuthRedirectStrategy::new(
//!     Arc::new(|config: ClientConfig| GithubClient::new(config)),
//!     Arc::new(GithubUserLoader::default()),
//! );
//!
//! // per request
//! let result = Authenticator::new(template.fresh()).run(&mut ctx).await?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod client;
mod error;
mod flow;
mod loader;
mod redirect_uri;
mod settings;
mod state;
mod strategy;

pub use client::{AccessToken, ClientConfig, ClientFactory, ExchangeError, OAuthClient};
pub use error::FlowError;
pub use flow::{FlowSession, DEFAULT_SESSION_KEY};
pub use loader::UserLoader;
pub use redirect_uri::redirect_uri;
pub use settings::{
    OAuthSettings, CALLBACK_URL_KEY, CLIENT_ID_KEY, CLIENT_SECRET_KEY, SCOPES_KEY,
};
pub use state::StateToken;
pub use strategy::{OAuthRedirectStrategy, CODE_PARAM, STATE_PARAM};
