//! Request view for Gatehouse strategies

use crate::error::{AuthError, Result};
use http::{header, request::Parts, uri::Authority, HeaderMap, Uri};

/// Header set by TLS-terminating proxies to report the original scheme.
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Conventional port for a scheme, if it has one.
pub fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        s if s.eq_ignore_ascii_case("http") => Some(80),
        s if s.eq_ignore_ascii_case("https") => Some(443),
        _ => None,
    }
}

/// The parts of an incoming request a strategy may look at.
///
/// Built once per request by the host, either from [`http::request::Parts`]
/// or by hand with [`RequestInfo::new`].
#[derive(Debug, Clone)]
pub struct RequestInfo {
    scheme: String,
    host: String,
    port: u16,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
}

impl RequestInfo {
    /// Create a request view from its components.
    ///
    /// `path_and_query` may carry a query string (`/callback?code=1`).
    pub fn new(
        scheme: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        path_and_query: &str,
    ) -> Self {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (path_and_query, None),
        };

        Self {
            scheme: scheme.into().to_ascii_lowercase(),
            host: host.into(),
            port,
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            query,
            headers: HeaderMap::new(),
        }
    }

    /// Build a request view from request parts.
    ///
    /// The authority comes from the URI when it is absolute, otherwise from
    /// the `Host` header. The scheme defaults to `http`.
    pub fn from_parts(parts: &Parts) -> Result<Self> {
        Self::from_uri(&parts.uri, &parts.headers)
    }

    /// Build a request view from a full request, ignoring the body.
    pub fn from_request<B>(req: &http::Request<B>) -> Result<Self> {
        Self::from_uri(req.uri(), req.headers())
    }

    fn from_uri(uri: &Uri, headers: &HeaderMap) -> Result<Self> {
        let scheme = uri.scheme_str().unwrap_or("http").to_ascii_lowercase();

        let authority = match uri.authority() {
            Some(authority) => authority.clone(),
            None => {
                let host = headers
                    .get(header::HOST)
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| AuthError::invalid_request("request has no host"))?;
                host.parse::<Authority>().map_err(|e| {
                    AuthError::invalid_request(format!("invalid Host header: {}", e))
                })?
            }
        };

        let port = authority
            .port_u16()
            .or_else(|| default_port(&scheme))
            .ok_or_else(|| {
                AuthError::invalid_request(format!("no port for scheme '{}'", scheme))
            })?;

        Ok(Self {
            host: authority.host().to_string(),
            port,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers: headers.clone(),
            scheme,
        })
    }

    /// Replace the request headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Get mutable headers
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Request scheme, lowercase (`http` or `https`)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host without port
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Effective port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Request path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string
    pub fn query_string(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Get the headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a header as a string, if present and valid ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decoded value of the first query parameter named `name`.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        serde_urlencoded::from_str::<Vec<(String, String)>>(query)
            .ok()?
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// First value of `X-Forwarded-Proto`, trimmed.
    pub fn forwarded_proto(&self) -> Option<&str> {
        self.header(X_FORWARDED_PROTO)
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Whether the port is the conventional one for the request scheme.
    pub fn is_default_port(&self) -> bool {
        default_port(&self.scheme) == Some(self.port)
    }

    /// `host` or `host:port` when the port is not the scheme default.
    pub fn host_with_port(&self) -> String {
        if self.is_default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Absolute URL of the request, including the query string.
    pub fn url(&self) -> String {
        let mut url = format!("{}://{}{}", self.scheme, self.host_with_port(), self.path);
        if let Some(query) = &self.query {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}
