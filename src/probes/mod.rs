//! Individual diagnostic probes
//!
//! Each submodule implements one probe as
//! `async fn run(&Engine, &str) -> ProbeResult`. All probes share the
//! same structure: fetch, interpret, classify into ok/warning/fail, and
//! attach explanatory details. None of them ever returns an error; every
//! internal failure becomes a `fail`-status result.

pub(crate) mod cache;
pub(crate) mod dns;
pub(crate) mod http_inspector;
pub(crate) mod latency;
pub(crate) mod mixed_content;
pub(crate) mod redirect;
pub(crate) mod response_body;
pub(crate) mod robots;
pub(crate) mod security_headers;
pub(crate) mod tls;

use reqwest::header::HeaderMap;

use crate::result::ABSENT;

/// Read a response header as a string, substituting the absent sentinel
pub(crate) fn header_or_absent(headers: &HeaderMap, name: &str) -> String {
    header_value(headers, name).unwrap_or_else(|| ABSENT.to_string())
}

/// Read a response header as a string if present and valid UTF-8
pub(crate) fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    #[test]
    fn absent_header_uses_sentinel() {
        let headers = HeaderMap::new();
        assert_eq!(header_or_absent(&headers, "server"), "N/A");
        assert_eq!(header_value(&headers, "server"), None);
    }

    #[test]
    fn present_header_is_returned() {
        let mut headers = HeaderMap::new();
        headers.insert("server", HeaderValue::from_static("nginx"));
        assert_eq!(header_or_absent(&headers, "server"), "nginx");
    }
}
