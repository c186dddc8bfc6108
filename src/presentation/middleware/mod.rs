use axum::extract::Request;
use axum::http::header;

pub mod authentication;
pub mod authorization;
pub mod exception;
pub mod hsts;
pub mod https_redirection;
pub mod migrations_endpoint;
pub mod route_casing;
pub mod static_files;

/// Whether the client reached us over TLS. `X-Forwarded-Proto` is only
/// consulted when the app runs behind a trusted proxy.
pub fn is_https(req: &Request, trust_forwarded: bool) -> bool {
    let forwarded = req
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .filter(|_| trust_forwarded);
    if let Some(proto) = forwarded {
        // First hop wins when proxies append
        let first = proto.split(',').next().unwrap_or("").trim();
        return first.eq_ignore_ascii_case("https");
    }
    req.uri().scheme_str() == Some("https")
}

pub fn request_host(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().authority().map(|a| a.as_str()))
        .filter(|h| !h.is_empty())
}

/// Strips a trailing `:port`, keeping bracketed IPv6 literals intact.
pub fn host_without_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, _)) => name,
        None => host,
    }
}
