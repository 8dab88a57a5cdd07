//! Scratch data kept in the caller's session while a flow is in progress

use gatehouse_core::{Result, Session, SessionExt};
use serde::{Deserialize, Serialize};

/// Session key the flow data lives under unless the strategy overrides it.
pub const DEFAULT_SESSION_KEY: &str = "gatehouse.oauth";

/// In-progress flow data: `{"state": ..., "return_to": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSession {
    /// State token sent to the provider
    #[serde(default)]
    pub state: String,
    /// Absolute URL the user asked for before the flow started
    #[serde(default)]
    pub return_to: String,
}

impl FlowSession {
    /// Create flow data for a new redirect.
    pub fn new(state: impl Into<String>, return_to: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            return_to: return_to.into(),
        }
    }

    /// Whether no field carries data.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty() && self.return_to.is_empty()
    }

    /// Read the flow data under `key`.
    ///
    /// An entry that does not decode is treated as absent; the next request
    /// starts a fresh flow and overwrites it.
    pub fn load<S: Session + ?Sized>(session: &S, key: &str) -> Option<Self> {
        match session.get_json::<Self>(key)? {
            Ok(flow) if !flow.is_empty() => Some(flow),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding undecodable OAuth flow session");
                None
            }
        }
    }

    /// Write the flow data under `key`.
    pub fn store<S: Session + ?Sized>(&self, session: &mut S, key: &str) -> Result<()> {
        session.insert_json(key, self)?;
        Ok(())
    }

    /// Delete the flow data under `key`.
    pub fn clear<S: Session + ?Sized>(session: &mut S, key: &str) {
        session.remove(key);
    }

    /// Read and delete the flow data under `key`.
    pub fn take<S: Session + ?Sized>(session: &mut S, key: &str) -> Option<Self> {
        let flow = Self::load(session, key);
        Self::clear(session, key);
        flow
    }
}
