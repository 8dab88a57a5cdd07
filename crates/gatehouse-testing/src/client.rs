//! Scripted OAuth client

use async_trait::async_trait;
use gatehouse_oauth::{AccessToken, ClientConfig, ClientFactory, ExchangeError, OAuthClient};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Authorization endpoint used when none is given.
pub const DEFAULT_AUTHORIZE_URL: &str = "https://provider.test/login/oauth/authorize";

/// Message returned for a code the script does not know.
const UNKNOWN_CODE: &str = "The code passed is incorrect or expired.";

/// How the scripted provider answers the exchange of one code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockExchange {
    /// Issue this access token
    Token(String),
    /// Reject the code with this message
    Rejected(String),
    /// Fail below the protocol (network, malformed body, ...)
    Failed(String),
}

#[derive(Default)]
struct FactoryState {
    exchanges: HashMap<String, MockExchange>,
    configs: Vec<ClientConfig>,
    exchanged: Vec<String>,
}

/// Client factory answering from a script
///
/// Clones share the same script and recordings.
#[derive(Clone)]
pub struct MockClientFactory {
    authorize_url: String,
    state: Arc<Mutex<FactoryState>>,
}

impl MockClientFactory {
    /// Create a factory using [`DEFAULT_AUTHORIZE_URL`]
    pub fn new() -> Self {
        Self::with_authorize_url(DEFAULT_AUTHORIZE_URL)
    }

    /// Create a factory with a custom authorization endpoint
    pub fn with_authorize_url(url: impl Into<String>) -> Self {
        Self {
            authorize_url: url.into(),
            state: Arc::new(Mutex::new(FactoryState::default())),
        }
    }

    /// Script the answer for `code`
    pub fn on_code(&self, code: impl Into<String>, exchange: MockExchange) -> &Self {
        self.state
            .lock()
            .unwrap()
            .exchanges
            .insert(code.into(), exchange);
        self
    }

    /// Issue `token` for `code`
    pub fn grant(&self, code: impl Into<String>, token: impl Into<String>) -> &Self {
        self.on_code(code, MockExchange::Token(token.into()))
    }

    /// Reject `code` with `message`
    pub fn reject(&self, code: impl Into<String>, message: impl Into<String>) -> &Self {
        self.on_code(code, MockExchange::Rejected(message.into()))
    }

    /// Fail the exchange of `code` with a transport error
    pub fn fail(&self, code: impl Into<String>, message: impl Into<String>) -> &Self {
        self.on_code(code, MockExchange::Failed(message.into()))
    }

    /// Every config a client was built from, oldest first
    pub fn configs(&self) -> Vec<ClientConfig> {
        self.state.lock().unwrap().configs.clone()
    }

    /// The config of the most recently built client
    pub fn last_config(&self) -> Option<ClientConfig> {
        self.state.lock().unwrap().configs.last().cloned()
    }

    /// Codes that reached the exchange, oldest first
    pub fn exchanged_codes(&self) -> Vec<String> {
        self.state.lock().unwrap().exchanged.clone()
    }
}

impl Default for MockClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientFactory for MockClientFactory {
    type Client = MockOAuthClient;

    fn build(&self, config: ClientConfig) -> MockOAuthClient {
        self.state.lock().unwrap().configs.push(config.clone());
        MockOAuthClient {
            authorize_url: self.authorize_url.clone(),
            config,
            state: Arc::clone(&self.state),
        }
    }
}

/// Client produced by [`MockClientFactory`]
pub struct MockOAuthClient {
    authorize_url: String,
    config: ClientConfig,
    state: Arc<Mutex<FactoryState>>,
}

impl MockOAuthClient {
    /// Config this client was built from
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl OAuthClient for MockOAuthClient {
    fn authorize_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope={}&state={}",
            self.authorize_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(&self.config.scope),
            urlencoding::encode(&self.config.state),
        )
    }

    async fn access_token(&self) -> Result<AccessToken, ExchangeError> {
        let code = match &self.config.code {
            Some(code) => code.clone(),
            None => return Err(ExchangeError::bad_verification_code(UNKNOWN_CODE)),
        };

        let exchange = {
            let mut state = self.state.lock().unwrap();
            state.exchanged.push(code.clone());
            state.exchanges.get(&code).cloned()
        };
        tracing::debug!(code = code.as_str(), "Mock code exchange");

        match exchange {
            Some(MockExchange::Token(token)) => Ok(AccessToken::new(token)),
            Some(MockExchange::Rejected(message)) => {
                Err(ExchangeError::bad_verification_code(message))
            }
            Some(MockExchange::Failed(message)) => Err(ExchangeError::transport(message)),
            None => Err(ExchangeError::bad_verification_code(UNKNOWN_CODE)),
        }
    }
}
