//! The OAuth2 authorization-code redirect strategy
//!
//! A request is either *fresh* or a *callback*. It is a callback when the
//! session holds flow data and the query carries both `state` and `code`.
//!
//! - Fresh: store `{state, return_to}` in the session and redirect to the
//!   provider's authorization URL.
//! - Callback: check `state`, exchange `code` for a token, load the user, and
//!   report success. A mismatched state or a rejected code clears the flow
//!   data and reports failure.
//! - After the host accepts the success, [`Strategy::finalize`] redirects to
//!   `return_to` and clears the flow data.

use crate::client::{ClientConfig, ClientFactory, ExchangeError, OAuthClient};
use crate::error::FlowError;
use crate::flow::{FlowSession, DEFAULT_SESSION_KEY};
use crate::loader::UserLoader;
use crate::redirect_uri::redirect_uri;
use crate::settings::OAuthSettings;
use crate::state::StateToken;
use async_trait::async_trait;
use gatehouse_core::{AuthContext, Outcome, Redirect, Result, Strategy};
use std::sync::Arc;

/// Query parameter carrying the state on the callback.
pub const STATE_PARAM: &str = "state";
/// Query parameter carrying the authorization code on the callback.
pub const CODE_PARAM: &str = "code";

/// OAuth redirect strategy for one request.
///
/// Build one per request, or keep a template and call [`fresh`](Self::fresh).
/// The factory and loader are shared; the cached state token is not.
pub struct OAuthRedirectStrategy<F, L> {
    factory: Arc<F>,
    loader: Arc<L>,
    session_key: String,
    state: Option<StateToken>,
}

impl<F, L> OAuthRedirectStrategy<F, L>
where
    F: ClientFactory,
    L: UserLoader,
{
    /// Create a strategy using the default session key.
    pub fn new(factory: Arc<F>, loader: Arc<L>) -> Self {
        Self {
            factory,
            loader,
            session_key: DEFAULT_SESSION_KEY.to_string(),
            state: None,
        }
    }

    /// Store flow data under `key` instead of the default.
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    /// A new instance sharing collaborators and session key, with no cached state.
    pub fn fresh(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            loader: Arc::clone(&self.loader),
            session_key: self.session_key.clone(),
            state: None,
        }
    }

    /// Session key the flow data lives under.
    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    /// Whether this request is the provider's callback for a flow we started.
    pub fn in_flow(&self, ctx: &AuthContext<'_>) -> bool {
        self.pending_flow(ctx).is_some()
    }

    /// The state token for this request.
    ///
    /// Cached on the instance; otherwise the one already stored in the
    /// session, otherwise a new random one.
    pub fn state(&mut self, ctx: &AuthContext<'_>) -> &StateToken {
        let key = &self.session_key;
        self.state.get_or_insert_with(|| {
            FlowSession::load(ctx.session(), key)
                .map(|flow| flow.state)
                .filter(|state| !state.is_empty())
                .map(StateToken::new)
                .unwrap_or_else(StateToken::generate)
        })
    }

    /// Absolute callback URI for this request.
    pub fn redirect_uri(&self, ctx: &AuthContext<'_>, settings: &OAuthSettings) -> String {
        redirect_uri(ctx.request(), settings.callback_url.as_deref())
    }

    fn pending_flow(&self, ctx: &AuthContext<'_>) -> Option<FlowSession> {
        let request = ctx.request();
        if request.query_param(STATE_PARAM).is_none() || request.query_param(CODE_PARAM).is_none()
        {
            return None;
        }
        FlowSession::load(ctx.session(), &self.session_key)
    }

    fn client_config(
        &self,
        ctx: &AuthContext<'_>,
        settings: &OAuthSettings,
        state: &StateToken,
        code: Option<String>,
    ) -> ClientConfig {
        ClientConfig {
            code,
            state: state.as_str().to_string(),
            scope: settings.scopes.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            redirect_uri: self.redirect_uri(ctx, settings),
        }
    }

    fn begin_flow(&mut self, ctx: &mut AuthContext<'_>) -> Result<Outcome<L::User>> {
        let settings = OAuthSettings::from_host_config(ctx.config())?;
        let state = self.state(ctx).clone();
        let return_to = ctx.request().url();

        FlowSession::new(state.as_str(), return_to.as_str())
            .store(ctx.session_mut(), &self.session_key)?;

        let config = self.client_config(ctx, &settings, &state, None);
        tracing::debug!(
            return_to = return_to.as_str(),
            redirect_uri = config.redirect_uri.as_str(),
            "Starting OAuth flow"
        );

        let client = self.factory.build(config);
        Ok(Outcome::Redirect(Redirect::to(&client.authorize_url())?))
    }

    async fn continue_flow(
        &mut self,
        ctx: &mut AuthContext<'_>,
        flow: FlowSession,
    ) -> Result<Outcome<L::User>> {
        let settings = OAuthSettings::from_host_config(ctx.config())?;
        let request = ctx.request();
        let returned = request.query_param(STATE_PARAM).unwrap_or_default();
        let code = request.query_param(CODE_PARAM);

        let stored = StateToken::new(flow.state);
        if !stored.verify(&returned) {
            tracing::warn!(path = request.path(), "OAuth callback state does not match session");
            return Ok(self.abort_flow(ctx, FlowError::StateMismatch));
        }
        self.state = Some(stored.clone());

        let client = self
            .factory
            .build(self.client_config(ctx, &settings, &stored, code));

        let token = match client.access_token().await {
            Ok(token) => token,
            Err(ExchangeError::BadVerificationCode(message)) => {
                return Ok(self.abort_flow(ctx, FlowError::InvalidAuthorizationCode(message)));
            }
            Err(e) => return Err(e.into()),
        };

        match self.loader.load(&token).await {
            Ok(user) => {
                tracing::debug!("OAuth callback resolved a user");
                Ok(Outcome::Success(user))
            }
            Err(ExchangeError::BadVerificationCode(message)) => {
                Ok(self.abort_flow(ctx, FlowError::InvalidAuthorizationCode(message)))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn abort_flow(&self, ctx: &mut AuthContext<'_>, reason: FlowError) -> Outcome<L::User> {
        FlowSession::clear(ctx.session_mut(), &self.session_key);
        tracing::info!(reason = %reason, "OAuth flow aborted");
        Outcome::Failure(reason.to_string())
    }
}

#[async_trait]
impl<F, L> Strategy for OAuthRedirectStrategy<F, L>
where
    F: ClientFactory,
    L: UserLoader,
{
    type User = L::User;

    fn name(&self) -> &'static str {
        "oauth"
    }

    async fn authenticate(&mut self, ctx: &mut AuthContext<'_>) -> Result<Outcome<L::User>> {
        match self.pending_flow(ctx) {
            Some(flow) => self.continue_flow(ctx, flow).await,
            None => self.begin_flow(ctx),
        }
    }

    fn finalize(&mut self, ctx: &mut AuthContext<'_>) -> Result<Option<Redirect>> {
        match FlowSession::take(ctx.session_mut(), &self.session_key) {
            Some(flow) if !flow.return_to.is_empty() => {
                tracing::debug!(return_to = flow.return_to.as_str(), "Finishing OAuth flow");
                Ok(Some(Redirect::to(&flow.return_to)?))
            }
            _ => {
                tracing::debug!("No OAuth flow to finish");
                Ok(None)
            }
        }
    }
}

impl<F, L> std::fmt::Debug for OAuthRedirectStrategy<F, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthRedirectStrategy")
            .field("session_key", &self.session_key)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
