//! Integration tests for Gatehouse
//!
//! These run the OAuth strategy through the `Authenticator` with scripted
//! provider doubles, the way a host would.

use gatehouse::prelude::*;
use gatehouse::oauth::{FlowSession, DEFAULT_SESSION_KEY};
use gatehouse_testing::{MockClientFactory, MockLoader, TestRequest};
use http::{header, StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct User {
    login: String,
}

fn octocat() -> User {
    User {
        login: "octocat".to_string(),
    }
}

/// A host with one OAuth strategy template and scripted collaborators
struct Host {
    factory: MockClientFactory,
    loader: MockLoader<User>,
    template: OAuthRedirectStrategy<MockClientFactory, MockLoader<User>>,
    config: HostConfig,
}

impl Host {
    fn new() -> Self {
        Self::with_settings(OAuthSettings::new("client-id", "client-secret").scopes("user"))
    }

    fn with_settings(settings: OAuthSettings) -> Self {
        gatehouse_testing::init_tracing();

        let factory = MockClientFactory::new();
        let loader = MockLoader::new();
        factory.grant("good-code", "tok-1");
        loader.user("tok-1", octocat());

        Self {
            template: OAuthRedirectStrategy::new(
                Arc::new(factory.clone()),
                Arc::new(loader.clone()),
            ),
            factory,
            loader,
            config: settings.to_host_config(),
        }
    }

    async fn run(&self, request: &RequestInfo, session: &mut MemorySession) -> AuthResult<User> {
        self.try_run(request, session).await.unwrap()
    }

    async fn try_run(
        &self,
        request: &RequestInfo,
        session: &mut MemorySession,
    ) -> Result<AuthResult<User>> {
        let mut ctx = AuthContext::new(request, session, &self.config);
        Authenticator::new(self.template.fresh()).run(&mut ctx).await
    }
}

fn location(response: &Response) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

fn halted_location(result: AuthResult<User>) -> String {
    match result {
        AuthResult::Halted(response) => {
            assert_eq!(response.status(), StatusCode::FOUND);
            location(&response)
        }
        other => panic!("expected a redirect, got {:?}", other),
    }
}

fn param(url: &str, name: &str) -> Option<String> {
    TestRequest::get(url).build().query_param(name)
}

fn stored_flow(session: &MemorySession) -> Option<FlowSession> {
    FlowSession::load(session, DEFAULT_SESSION_KEY)
}

fn seeded_session(state: &str, return_to: &str) -> MemorySession {
    let mut session = MemorySession::new();
    FlowSession::new(state, return_to)
        .store(&mut session, DEFAULT_SESSION_KEY)
        .unwrap();
    session
}

// ============================================================================
// Redirect Flow Tests
// ============================================================================

mod redirect_tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_request_redirects_to_provider() {
        let host = Host::new();
        let request = TestRequest::get("http://example.com/protected").build();
        let mut session = MemorySession::new();

        let url = halted_location(host.run(&request, &mut session).await);

        let flow = stored_flow(&session).expect("flow stored");
        assert!(url.starts_with(gatehouse_testing::DEFAULT_AUTHORIZE_URL));
        assert_eq!(param(&url, "state"), Some(flow.state.clone()));
        assert_eq!(param(&url, "client_id").as_deref(), Some("client-id"));
        assert_eq!(param(&url, "scope").as_deref(), Some("user"));
        assert_eq!(
            param(&url, "redirect_uri").as_deref(),
            Some("http://example.com/protected")
        );
        assert_eq!(flow.return_to, "http://example.com/protected");
        assert_eq!(flow.state.len(), 64);
    }

    #[tokio::test]
    async fn test_return_to_keeps_query() {
        let host = Host::new();
        let request = TestRequest::get("http://example.com/repos?page=2").build();
        let mut session = MemorySession::new();

        host.run(&request, &mut session).await;

        assert_eq!(
            stored_flow(&session).unwrap().return_to,
            "http://example.com/repos?page=2"
        );
        assert_eq!(
            host.factory.last_config().unwrap().redirect_uri,
            "http://example.com/repos"
        );
    }

    #[tokio::test]
    async fn test_callback_override_and_forwarded_proto() {
        let host = Host::with_settings(
            OAuthSettings::new("client-id", "client-secret").callback_url("/auth/github/callback"),
        );
        let request = TestRequest::get("http://example.com/protected")
            .forwarded_proto("https")
            .build();
        let mut session = MemorySession::new();

        host.run(&request, &mut session).await;

        let config = host.factory.last_config().unwrap();
        assert_eq!(config.redirect_uri, "https://example.com/auth/github/callback");
        assert_eq!(config.code, None);
    }

    #[tokio::test]
    async fn test_port_omission() {
        let cases = [
            ("http://example.com:80/cb", "http://example.com/cb"),
            ("https://example.com:443/cb", "https://example.com/cb"),
            ("http://example.com:8080/cb", "http://example.com:8080/cb"),
            ("https://example.com:8443/cb", "https://example.com:8443/cb"),
        ];

        for (url, expected) in cases {
            let host = Host::new();
            let mut session = MemorySession::new();
            host.run(&TestRequest::get(url).build(), &mut session).await;
            assert_eq!(host.factory.last_config().unwrap().redirect_uri, expected);
        }
    }

    #[tokio::test]
    async fn test_partial_callback_starts_fresh_flow() {
        let host = Host::new();
        let mut session = seeded_session("s1", "http://example.com/protected");

        // state without code
        let request = TestRequest::get("http://example.com/cb")
            .query("state", "s1")
            .build();
        let url = halted_location(host.run(&request, &mut session).await);

        // the pending state is reused, return_to is replaced
        assert_eq!(param(&url, "state").as_deref(), Some("s1"));
        assert_eq!(
            stored_flow(&session).unwrap().return_to,
            request.url()
        );
        assert!(host.factory.exchanged_codes().is_empty());
    }

    #[tokio::test]
    async fn test_callback_without_flow_starts_fresh_flow() {
        let host = Host::new();
        let mut session = MemorySession::new();
        let request = TestRequest::get("http://example.com/cb")
            .callback("s1", "good-code")
            .build();

        let url = halted_location(host.run(&request, &mut session).await);

        assert_ne!(param(&url, "state").as_deref(), Some("s1"));
        assert!(host.factory.exchanged_codes().is_empty());
    }
}

// ============================================================================
// Callback Tests
// ============================================================================

mod callback_tests {
    use super::*;

    #[tokio::test]
    async fn test_matching_callback_signs_in_and_returns() {
        let host = Host::new();
        let mut session = MemorySession::new();

        let first = TestRequest::get("http://example.com/protected").build();
        let url = halted_location(host.run(&first, &mut session).await);
        let state = param(&url, "state").unwrap();

        let callback = TestRequest::get("http://example.com/protected")
            .callback(state.as_str(), "good-code")
            .build();

        match host.run(&callback, &mut session).await {
            AuthResult::Authenticated { user, redirect } => {
                assert_eq!(user, octocat());
                let redirect = redirect.expect("return-to redirect");
                assert_eq!(redirect.status(), StatusCode::FOUND);
                assert_eq!(location(&redirect), "http://example.com/protected");
            }
            other => panic!("expected sign-in, got {:?}", other),
        }

        assert!(session.is_empty());
        assert_eq!(host.factory.exchanged_codes(), ["good-code"]);

        let exchange = host.factory.last_config().unwrap();
        assert_eq!(exchange.code.as_deref(), Some("good-code"));
        assert_eq!(exchange.state, state);
        assert_eq!(exchange.client_secret, "client-secret");
        assert_eq!(host.loader.load_count(), 1);
    }

    #[tokio::test]
    async fn test_state_mismatch_is_denied() {
        let host = Host::new();
        let mut session = seeded_session("s1", "http://example.com/protected");
        let request = TestRequest::get("http://example.com/cb")
            .callback("WRONG", "good-code")
            .build();

        match host.run(&request, &mut session).await {
            AuthResult::Denied { message, response } => {
                assert_eq!(message, "State mismatch");
                assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

                let body = response.into_body().collect().await.unwrap().to_bytes();
                let json: gatehouse::serde_json::Value =
                    gatehouse::serde_json::from_slice(&body).unwrap();
                assert_eq!(json["error"]["type"], "unauthenticated");
                assert_eq!(json["error"]["message"], "State mismatch");
            }
            other => panic!("expected denial, got {:?}", other),
        }

        assert!(session.is_empty());
        assert!(host.factory.exchanged_codes().is_empty());
    }

    #[tokio::test]
    async fn test_empty_stored_state_rejects_empty_callback_state() {
        let host = Host::new();
        let mut session = seeded_session("", "http://example.com/protected");
        let request = TestRequest::get("http://example.com/cb")
            .callback("", "good-code")
            .build();

        match host.run(&request, &mut session).await {
            AuthResult::Denied { message, .. } => assert_eq!(message, "State mismatch"),
            other => panic!("expected denial, got {:?}", other),
        }
        assert!(session.is_empty());
        assert!(host.factory.exchanged_codes().is_empty());
        assert_eq!(host.loader.load_count(), 0);
    }

    #[tokio::test]
    async fn test_rejected_code_is_denied_with_provider_message() {
        let host = Host::new();
        host.factory
            .reject("stale", "The code passed is incorrect or expired.");
        let mut session = seeded_session("s1", "http://example.com/protected");
        let request = TestRequest::get("http://example.com/cb")
            .callback("s1", "stale")
            .build();

        match host.run(&request, &mut session).await {
            AuthResult::Denied { message, .. } => {
                assert_eq!(message, "The code passed is incorrect or expired.")
            }
            other => panic!("expected denial, got {:?}", other),
        }
        assert!(session.is_empty());
        assert_eq!(host.loader.load_count(), 0);
    }

    #[tokio::test]
    async fn test_loader_rejection_is_denied() {
        let host = Host::new();
        host.factory.grant("code-2", "tok-2");
        host.loader.reject("tok-2", "Bad credentials");
        let mut session = seeded_session("s1", "http://example.com/protected");
        let request = TestRequest::get("http://example.com/cb")
            .callback("s1", "code-2")
            .build();

        match host.run(&request, &mut session).await {
            AuthResult::Denied { message, .. } => assert_eq!(message, "Bad credentials"),
            other => panic!("expected denial, got {:?}", other),
        }
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let host = Host::new();
        host.factory.fail("net", "connection reset by peer");
        let mut session = seeded_session("s1", "http://example.com/protected");
        let request = TestRequest::get("http://example.com/cb")
            .callback("s1", "net")
            .build();

        let err = host.try_run(&request, &mut session).await.unwrap_err();
        assert!(matches!(err, AuthError::Collaborator(_)));
        // flow data is left for a retry
        assert!(stored_flow(&session).is_some());
    }

    #[tokio::test]
    async fn test_custom_session_key() {
        let mut host = Host::new();
        host.template = host.template.fresh().with_session_key("auth.github");
        let mut session = MemorySession::new();

        let first = TestRequest::get("http://example.com/protected").build();
        let url = halted_location(host.run(&first, &mut session).await);
        assert!(session.contains_key("auth.github"));
        assert!(!session.contains_key(DEFAULT_SESSION_KEY));

        let callback = TestRequest::get("http://example.com/protected")
            .callback(param(&url, "state").unwrap(), "good-code")
            .build();
        assert!(matches!(
            host.run(&callback, &mut session).await,
            AuthResult::Authenticated { .. }
        ));
        assert!(session.is_empty());
    }
}

// ============================================================================
// State Freshness Tests
// ============================================================================

mod state_tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_each_caller_gets_a_new_state() {
        let host = Host::new();
        let request = TestRequest::get("http://example.com/protected").build();

        let mut seen = HashSet::new();
        for _ in 0..32 {
            let mut session = MemorySession::new();
            host.run(&request, &mut session).await;
            assert!(seen.insert(stored_flow(&session).unwrap().state));
        }
    }

    #[tokio::test]
    async fn test_completed_flow_does_not_reuse_state() {
        let host = Host::new();
        let mut session = MemorySession::new();
        let request = TestRequest::get("http://example.com/protected").build();

        let url = halted_location(host.run(&request, &mut session).await);
        let first = param(&url, "state").unwrap();

        let callback = TestRequest::get("http://example.com/protected")
            .callback(first.as_str(), "good-code")
            .build();
        host.run(&callback, &mut session).await;

        let url = halted_location(host.run(&request, &mut session).await);
        assert_ne!(param(&url, "state").unwrap(), first);
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

mod config_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_credentials_is_an_error() {
        let mut host = Host::new();
        host.config = HostConfig::new().with("oauth_client_id", "client-id");
        let request = TestRequest::get("http://example.com/protected").build();
        let mut session = MemorySession::new();

        let err = host.try_run(&request, &mut session).await.unwrap_err();
        assert!(matches!(err, AuthError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Missing required configuration key: oauth_client_secret"
        );
        assert!(session.is_empty());
    }

    #[test]
    fn test_settings_from_prefixed_env() {
        std::env::set_var("GHINTEG_OAUTH_CLIENT_ID", "env-id");
        std::env::set_var("GHINTEG_OAUTH_CLIENT_SECRET", "env-secret");
        std::env::set_var("GHINTEG_OAUTH_SCOPES", "read:user");

        let config = HostConfig::from_env_prefixed("GHINTEG").unwrap();
        let settings = OAuthSettings::from_host_config(&config).unwrap();

        assert_eq!(settings.client_id, "env-id");
        assert_eq!(settings.client_secret, "env-secret");
        assert_eq!(settings.scopes, "read:user");
        assert_eq!(settings.callback_url, None);

        std::env::remove_var("GHINTEG_OAUTH_CLIENT_ID");
        std::env::remove_var("GHINTEG_OAUTH_CLIENT_SECRET");
        std::env::remove_var("GHINTEG_OAUTH_SCOPES");
    }
}
