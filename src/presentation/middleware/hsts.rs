use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderValue, header};
use axum::middleware::Next;
use axum::response::Response;

use super::{host_without_port, is_https, request_host};

#[derive(Debug, Clone)]
pub struct HstsOptions {
    pub max_age_secs: u64,
    pub include_subdomains: bool,
    pub preload: bool,
    pub excluded_hosts: Vec<String>,
    pub trust_forwarded_headers: bool,
}

impl HstsOptions {
    pub fn new(max_age_secs: u64) -> Self {
        Self {
            max_age_secs,
            include_subdomains: false,
            preload: false,
            excluded_hosts: vec!["localhost".into(), "127.0.0.1".into(), "[::1]".into()],
            trust_forwarded_headers: false,
        }
    }

    pub fn header_value(&self) -> HeaderValue {
        let mut value = format!("max-age={}", self.max_age_secs);
        if self.include_subdomains {
            value.push_str("; includeSubDomains");
        }
        if self.preload {
            value.push_str("; preload");
        }
        HeaderValue::from_str(&value).unwrap_or(HeaderValue::from_static("max-age=0"))
    }

    pub fn is_excluded(&self, host: &str) -> bool {
        let name = host_without_port(host);
        self.excluded_hosts
            .iter()
            .any(|h| h.eq_ignore_ascii_case(name))
    }
}

/// Adds `Strict-Transport-Security` to responses for HTTPS requests.
pub async fn hsts(State(opts): State<Arc<HstsOptions>>, req: Request, next: Next) -> Response {
    let applies = is_https(&req, opts.trust_forwarded_headers)
        && request_host(&req).is_some_and(|h| !opts.is_excluded(h));
    let mut res = next.run(req).await;
    if applies {
        res.headers_mut()
            .insert(header::STRICT_TRANSPORT_SECURITY, opts.header_value());
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_value_flags() {
        let mut opts = HstsOptions::new(2_592_000);
        assert_eq!(opts.header_value(), "max-age=2592000");
        opts.include_subdomains = true;
        opts.preload = true;
        assert_eq!(
            opts.header_value(),
            "max-age=2592000; includeSubDomains; preload"
        );
    }

    #[test]
    fn loopback_hosts_are_excluded() {
        let opts = HstsOptions::new(60);
        assert!(opts.is_excluded("localhost:5001"));
        assert!(opts.is_excluded("LOCALHOST"));
        assert!(opts.is_excluded("127.0.0.1"));
        assert!(opts.is_excluded("[::1]:443"));
        assert!(!opts.is_excluded("example.com"));
    }
}
