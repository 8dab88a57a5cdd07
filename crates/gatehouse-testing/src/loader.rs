//! Scripted user loader

use async_trait::async_trait;
use gatehouse_oauth::{AccessToken, ExchangeError, UserLoader};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// How the scripted provider answers a user lookup for one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockLoad<U> {
    /// Resolve to this user
    User(U),
    /// Reject the token with this message
    Rejected(String),
    /// Fail with a transport error
    Failed(String),
}

struct LoaderState<U> {
    script: HashMap<String, MockLoad<U>>,
    loaded: Vec<String>,
}

/// User loader answering from a script
///
/// Unknown tokens fail with a transport error. Clones share the script.
pub struct MockLoader<U> {
    state: Arc<Mutex<LoaderState<U>>>,
}

impl<U: Clone> MockLoader<U> {
    /// Create an empty loader
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LoaderState {
                script: HashMap::new(),
                loaded: Vec::new(),
            })),
        }
    }

    /// Script the answer for `token`
    pub fn on_token(&self, token: impl Into<String>, load: MockLoad<U>) -> &Self {
        self.state
            .lock()
            .unwrap()
            .script
            .insert(token.into(), load);
        self
    }

    /// Resolve `token` to `user`
    pub fn user(&self, token: impl Into<String>, user: U) -> &Self {
        self.on_token(token, MockLoad::User(user))
    }

    /// Reject `token` with `message`
    pub fn reject(&self, token: impl Into<String>, message: impl Into<String>) -> &Self {
        self.on_token(token, MockLoad::Rejected(message.into()))
    }

    /// Fail lookups of `token`
    pub fn fail(&self, token: impl Into<String>, message: impl Into<String>) -> &Self {
        self.on_token(token, MockLoad::Failed(message.into()))
    }

    /// Number of lookups performed
    pub fn load_count(&self) -> usize {
        self.state.lock().unwrap().loaded.len()
    }
}

impl<U: Clone> Default for MockLoader<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> Clone for MockLoader<U> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

#[async_trait]
impl<U> UserLoader for MockLoader<U>
where
    U: Clone + Send + 'static,
{
    type User = U;

    async fn load(&self, token: &AccessToken) -> Result<U, ExchangeError> {
        let answer = {
            let mut state = self.state.lock().unwrap();
            state.loaded.push(token.secret().to_string());
            state.script.get(token.secret()).cloned()
        };

        match answer {
            Some(MockLoad::User(user)) => Ok(user),
            Some(MockLoad::Rejected(message)) => Err(ExchangeError::bad_verification_code(message)),
            Some(MockLoad::Failed(message)) => Err(ExchangeError::transport(message)),
            None => Err(ExchangeError::transport("unknown access token")),
        }
    }
}
