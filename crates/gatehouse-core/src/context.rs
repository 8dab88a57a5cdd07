//! Request-scoped context handed to strategies

use crate::config::HostConfig;
use crate::request::RequestInfo;
use crate::session::Session;

/// Everything a strategy may read or mutate while handling one request.
///
/// The host builds a fresh context per request; strategies never reach for
/// ambient state.
pub struct AuthContext<'a> {
    request: &'a RequestInfo,
    session: &'a mut dyn Session,
    config: &'a HostConfig,
}

impl<'a> AuthContext<'a> {
    /// Create a context for one request.
    pub fn new(
        request: &'a RequestInfo,
        session: &'a mut dyn Session,
        config: &'a HostConfig,
    ) -> Self {
        Self {
            request,
            session,
            config,
        }
    }

    /// The current request
    pub fn request(&self) -> &'a RequestInfo {
        self.request
    }

    /// The caller's session
    pub fn session(&self) -> &(dyn Session + 'a) {
        &*self.session
    }

    /// The caller's session, mutably
    pub fn session_mut(&mut self) -> &mut (dyn Session + 'a) {
        &mut *self.session
    }

    /// Host configuration
    pub fn config(&self) -> &'a HostConfig {
        self.config
    }
}

impl std::fmt::Debug for AuthContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("request", &self.request)
            .field("config_keys", &self.config.len())
            .finish_non_exhaustive()
    }
}
