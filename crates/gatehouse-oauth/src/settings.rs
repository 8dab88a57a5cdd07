//! OAuth settings read from host configuration

use gatehouse_core::{ConfigError, HostConfig};
use std::fmt;

/// Host configuration key for the requested scopes.
pub const SCOPES_KEY: &str = "oauth_scopes";
/// Host configuration key for the client id.
pub const CLIENT_ID_KEY: &str = "oauth_client_id";
/// Host configuration key for the client secret.
pub const CLIENT_SECRET_KEY: &str = "oauth_client_secret";
/// Host configuration key for the optional callback path override.
pub const CALLBACK_URL_KEY: &str = "oauth_callback_url";

/// Settings the strategy needs to talk to the provider.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthSettings {
    /// Client id issued by the provider.
    pub client_id: String,
    /// Client secret issued by the provider.
    pub client_secret: String,
    /// Scope string passed through to the provider as-is.
    pub scopes: String,
    /// Callback path (or absolute URL) replacing the current request path.
    pub callback_url: Option<String>,
}

impl OAuthSettings {
    /// Create settings with no scopes and no callback override.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scopes: String::new(),
            callback_url: None,
        }
    }

    /// Set the requested scopes.
    pub fn scopes(mut self, scopes: impl Into<String>) -> Self {
        self.scopes = scopes.into();
        self
    }

    /// Set the callback override.
    pub fn callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    /// Read the `oauth_*` keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] when the client id or secret is
    /// missing or blank.
    pub fn from_host_config(config: &HostConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: config.require(CLIENT_ID_KEY)?.to_string(),
            client_secret: config.require(CLIENT_SECRET_KEY)?.to_string(),
            scopes: config.get(SCOPES_KEY).unwrap_or_default().trim().to_string(),
            callback_url: config.get_non_empty(CALLBACK_URL_KEY).map(str::to_string),
        })
    }

    /// Write these settings as `oauth_*` keys.
    pub fn to_host_config(&self) -> HostConfig {
        let mut config = HostConfig::new()
            .with(CLIENT_ID_KEY, self.client_id.as_str())
            .with(CLIENT_SECRET_KEY, self.client_secret.as_str())
            .with(SCOPES_KEY, self.scopes.as_str());
        if let Some(callback_url) = &self.callback_url {
            config.insert(CALLBACK_URL_KEY, callback_url.as_str());
        }
        config
    }
}

impl fmt::Debug for OAuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("scopes", &self.scopes)
            .field("callback_url", &self.callback_url)
            .finish()
    }
}
