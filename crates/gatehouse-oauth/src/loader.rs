//! Seam to the host's user lookup

use crate::client::{AccessToken, ExchangeError};
use async_trait::async_trait;

/// Resolves an access token into the host's identity type.
///
/// Return [`ExchangeError::BadVerificationCode`] when the provider reports the
/// token's grant as invalid; the strategy then fails the flow instead of
/// raising an error.
#[async_trait]
pub trait UserLoader: Send + Sync {
    /// Identity handed to the host on success
    type User: Send;

    /// Load the user behind `token`.
    async fn load(&self, token: &AccessToken) -> Result<Self::User, ExchangeError>;
}
