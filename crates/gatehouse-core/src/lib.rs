//! # Gatehouse Core
//!
//! The host-facing contract for Gatehouse authentication strategies: an
//! explicit per-request [`AuthContext`], a keyed [`Session`], a flat
//! [`HostConfig`], the [`Strategy`] trait with its [`Outcome`], and the
//! [`Authenticator`] that turns outcomes into HTTP responses.
//!
//! This crate is not meant to be used directly. Use `gatehouse` instead.

#![warn(missing_docs)]

mod authenticator;
pub mod config;
mod context;
mod error;
mod request;
mod response;
mod session;
mod strategy;

// Public API
pub use authenticator::{AuthResult, Authenticator};
pub use config::{load_dotenv, load_dotenv_from, Config, ConfigError, HostConfig};
pub use context::AuthContext;
pub use error::{AuthError, BoxError, Result};
pub use request::{default_port, RequestInfo, X_FORWARDED_PROTO};
pub use response::{unauthenticated, Redirect, Response};
pub use session::{MemorySession, Session, SessionExt};
pub use strategy::{Outcome, Strategy};

// Re-exported so strategy implementors need no direct dependency
pub use async_trait::async_trait;
