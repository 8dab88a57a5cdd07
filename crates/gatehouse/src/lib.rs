//! # Gatehouse
//!
//! Pluggable request authentication for Rust web hosts.
//!
//! A host builds a [`RequestInfo`], an [`AuthContext`] over the caller's
//! [`Session`] and its [`HostConfig`], and runs a [`Strategy`] through an
//! [`Authenticator`]. The result says whether to continue, respond, or deny.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gatehouse::prelude::*;
//! use std::sync::Arc;
//!
//! let template = OAuthRedirectStrategy::new(Arc::new(client_factory), Arc::new(user_loader));
//! let config = HostConfig::from_env_prefixed("GATEHOUSE")?;
//!
//! async fn handle(req: http::Request<()>, session: &mut MemorySession) -> gatehouse::Result<()> {
//!     let info = RequestInfo::from_request(&req)?;
//!     let mut ctx = AuthContext::new(&info, session, &config);
//!
//!     match Authenticator::new(template.fresh()).run(&mut ctx).await? {
//!         AuthResult::Authenticated { user, redirect } => { /* sign in */ }
//!         AuthResult::Halted(response) | AuthResult::Denied { response, .. } => { /* send */ }
//!         AuthResult::Skipped => { /* next strategy */ }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Optional Features
//!
//! - `oauth` (default) - OAuth2 authorization-code redirect strategy

// Re-export core functionality
pub use gatehouse_core::*;

// Session values are JSON
pub use serde_json;

// Re-export strategies (feature-gated)
#[cfg(feature = "oauth")]
pub use gatehouse_oauth as oauth;
#[cfg(feature = "oauth")]
pub use gatehouse_oauth::{
    AccessToken, ClientConfig, ClientFactory, ExchangeError, FlowError, OAuthClient,
    OAuthRedirectStrategy, OAuthSettings, StateToken, UserLoader,
};

/// Prelude module - import everything you need with `use gatehouse::prelude::*`
pub mod prelude {
    pub use gatehouse_core::{
        async_trait, AuthContext, AuthError, AuthResult, Authenticator, HostConfig,
        MemorySession, Outcome, Redirect, RequestInfo, Response, Result, Session, SessionExt,
        Strategy,
    };

    pub use tracing::{debug, error, info, trace, warn};

    #[cfg(feature = "oauth")]
    pub use gatehouse_oauth::{
        AccessToken, ClientConfig, ClientFactory, ExchangeError, OAuthClient,
        OAuthRedirectStrategy, OAuthSettings, UserLoader,
    };
}
