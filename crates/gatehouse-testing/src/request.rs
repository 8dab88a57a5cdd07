//! Request builder for strategy tests

use gatehouse_core::{RequestInfo, X_FORWARDED_PROTO};
use http::Request;

/// Builds a [`RequestInfo`] from an absolute URL
///
/// ```rust,ignore
/// let request = TestRequest::get("http://app.test/callback")
///     .query("state", "s1")
///     .query("code", "abc")
///     .forwarded_proto("https")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct TestRequest {
    url: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl TestRequest {
    /// Start from an absolute URL, which may already carry a query
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Append a query parameter, percent-encoding the value
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Append the `state` and `code` a provider sends back
    pub fn callback(self, state: impl Into<String>, code: impl Into<String>) -> Self {
        self.query("state", state).query("code", code)
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set `X-Forwarded-Proto`
    pub fn forwarded_proto(self, proto: impl Into<String>) -> Self {
        self.header(X_FORWARDED_PROTO, proto)
    }

    /// The URL the built request will carry
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }

        let pairs: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        let sep = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.url, sep, pairs.join("&"))
    }

    /// Build the request view
    ///
    /// # Panics
    ///
    /// Panics when the URL or a header is malformed.
    pub fn build(self) -> RequestInfo {
        let mut builder = Request::get(self.url());
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let request = builder.body(()).expect("invalid test request URL or header");
        RequestInfo::from_request(&request).expect("test request must be absolute")
    }
}
