//! HTTP responses produced when a strategy halts a request
//!
//! | Type | Status | Description |
//! |------|--------|-------------|
//! | [`Redirect`] | 3xx | Send the user agent elsewhere |
//! | [`unauthenticated`] | 401 | JSON body describing why authentication failed |

use crate::error::{AuthError, Result};
use bytes::Bytes;
use http::{header, HeaderValue, StatusCode};
use http_body_util::Full;
use serde::Serialize;

/// HTTP Response type
pub type Response = http::Response<Full<Bytes>>;

/// Redirect response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    status: StatusCode,
    uri: String,
    location: HeaderValue,
}

impl Redirect {
    /// Create a 302 Found redirect
    pub fn to(uri: &str) -> Result<Self> {
        Self::with_status(StatusCode::FOUND, uri)
    }

    /// Create a 303 See Other redirect
    pub fn see_other(uri: &str) -> Result<Self> {
        Self::with_status(StatusCode::SEE_OTHER, uri)
    }

    /// Create a 307 Temporary redirect
    pub fn temporary(uri: &str) -> Result<Self> {
        Self::with_status(StatusCode::TEMPORARY_REDIRECT, uri)
    }

    fn with_status(status: StatusCode, uri: &str) -> Result<Self> {
        let location =
            HeaderValue::from_str(uri).map_err(|_| AuthError::InvalidRedirect(uri.to_string()))?;
        Ok(Self {
            status,
            uri: uri.to_string(),
            location,
        })
    }

    /// Redirect status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Target of the redirect
    pub fn location(&self) -> &str {
        &self.uri
    }

    /// Convert into an HTTP response
    pub fn into_response(self) -> Response {
        let mut response = http::Response::new(Full::new(Bytes::new()));
        *response.status_mut() = self.status;
        response.headers_mut().insert(header::LOCATION, self.location);
        response
    }
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    #[serde(rename = "type")]
    error_type: &'a str,
    message: &'a str,
}

/// 401 response with a JSON body carrying the failure message.
pub fn unauthenticated(message: &str) -> Response {
    let body = serde_json::to_vec(&ErrorResponse {
        error: ErrorBody {
            error_type: "unauthenticated",
            message,
        },
    })
    .unwrap_or_else(|_| {
        br#"{"error":{"type":"unauthenticated","message":"Authentication failed"}}"#.to_vec()
    });

    let mut response = http::Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = StatusCode::UNAUTHORIZED;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
