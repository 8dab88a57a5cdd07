//! Anti-forgery state tokens

use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use std::fmt;

/// Opaque value round-tripped through the provider to bind a callback to the
/// request that started the flow.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StateToken(String);

impl StateToken {
    /// Generate a new token: lowercase hex SHA-256 of 32 bytes from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    /// Wrap a token read back from the session.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the token string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Compare against a value returned by the provider.
    ///
    /// An empty token never verifies.
    pub fn verify(&self, received: &str) -> bool {
        let (a, b) = (self.0.as_bytes(), received.as_bytes());
        if a.is_empty() || a.len() != b.len() {
            return false;
        }
        // Branch-free over the contents
        a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

impl fmt::Debug for StateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateToken").field(&"***").finish()
    }
}

impl fmt::Display for StateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
