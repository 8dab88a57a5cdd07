//! Callback URI registered with the provider for this request

use gatehouse_core::RequestInfo;

/// Build the absolute callback URI for `request`.
///
/// The scheme is `https` when `X-Forwarded-Proto` says so, otherwise the
/// request's own. The port is left out when it is the default for the
/// request's own scheme. The path is `callback` when given, else the current
/// request path; a `callback` that is already an absolute URL is returned
/// unchanged.
pub fn redirect_uri(request: &RequestInfo, callback: Option<&str>) -> String {
    if let Some(url) = callback.filter(|c| is_absolute(c)) {
        return url.to_string();
    }

    let proto = match request.forwarded_proto() {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => request.scheme(),
    };

    let path = callback.unwrap_or_else(|| request.path());
    let slash = if path.starts_with('/') { "" } else { "/" };

    format!("{}://{}{}{}", proto, request.host_with_port(), slash, path)
}

fn is_absolute(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
