//! Probe execution engine
//!
//! Holds the shared HTTP clients and auxiliary-service endpoints, and
//! orchestrates concurrent probe batches against a single target URL.

use std::time::Duration;

use reqwest::{Client, redirect};
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::registry::ProbeKind;
use crate::result::ProbeResult;

/// User agent sent with every outbound request
const USER_AGENT: &str = "Edge Inspector/1.0";

/// Per-request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Per-probe deadline in seconds
const PROBE_TIMEOUT_SECS: u64 = 30;

/// Default DNS-over-HTTPS JSON endpoint
const DOH_ENDPOINT: &str = "https://cloudflare-dns.com/dns-query";

/// Default TLS-inspection API base URL
const TLS_API_ENDPOINT: &str = "https://check-tls.globalsign.com/api/v1";

/// Allowed target URL schemes
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Validate a caller-supplied target URL
///
/// Accepts only absolute `http://` or `https://` URLs. This is the
/// front-end half of the contract: [`Engine::run_batch`] assumes its
/// target has already passed this check.
pub fn validate_target(url: &str) -> Result<Url> {
    let rejection = || {
        Error::InvalidUrl("A valid URL starting with http:// or https:// is required.".to_string())
    };

    let parsed = Url::parse(url).map_err(|_| rejection())?;
    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) || parsed.host_str().is_none() {
        return Err(rejection());
    }
    Ok(parsed)
}

/// Probe execution engine
///
/// Cheap to clone: the HTTP clients are handle types sharing one
/// connection pool.
#[derive(Debug, Clone)]
pub struct Engine {
    client: Client,
    raw_client: Client,
    doh_endpoint: String,
    tls_api_endpoint: String,
    probe_timeout: Duration,
}

/// Builder for configuring an Engine with options
#[derive(Debug)]
pub struct EngineBuilder {
    doh_endpoint: String,
    tls_api_endpoint: String,
    probe_timeout: Duration,
    request_timeout: Duration,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            doh_endpoint: DOH_ENDPOINT.to_string(),
            tls_api_endpoint: TLS_API_ENDPOINT.to_string(),
            probe_timeout: Duration::from_secs(PROBE_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl EngineBuilder {
    /// Create a builder with default endpoints and timeouts
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the DNS-over-HTTPS JSON endpoint
    pub fn doh_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.doh_endpoint = endpoint.into();
        self
    }

    /// Override the TLS-inspection API base URL
    pub fn tls_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.tls_api_endpoint = endpoint.into();
        self
    }

    /// Override the per-probe deadline
    ///
    /// A probe that does not complete within this window is reported as
    /// `fail` with a `timeout` detail instead of stalling the batch.
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Override the per-request timeout applied at the HTTP client level
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build the Engine with the configured options
    pub fn build(self) -> Result<Engine> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        // Separate client for probes that must observe redirects themselves
        let raw_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.request_timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        Ok(Engine {
            client,
            raw_client,
            doh_endpoint: self.doh_endpoint,
            tls_api_endpoint: self.tls_api_endpoint,
            probe_timeout: self.probe_timeout,
        })
    }
}

impl Engine {
    /// Create an engine with default settings
    pub fn new() -> Result<Self> {
        EngineBuilder::new().build()
    }

    /// Create a builder for configuring engine options
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Client that follows redirects automatically
    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Client with redirect following disabled
    pub(crate) fn raw_client(&self) -> &Client {
        &self.raw_client
    }

    /// DNS-over-HTTPS JSON endpoint
    pub(crate) fn doh_endpoint(&self) -> &str {
        &self.doh_endpoint
    }

    /// TLS-inspection API base URL
    pub(crate) fn tls_api_endpoint(&self) -> &str {
        &self.tls_api_endpoint
    }

    /// Run the selected probes concurrently against one target URL
    ///
    /// Identifiers that do not resolve in the registry are silently
    /// dropped. Results come back in the order the resolved identifiers
    /// were requested, regardless of completion order, and partial
    /// failure never fails the batch: each probe's outcome is captured
    /// independently as a value.
    pub async fn run_batch<S: AsRef<str>>(&self, url: &str, ids: &[S]) -> Vec<ProbeResult> {
        let kinds: Vec<ProbeKind> = ids
            .iter()
            .filter_map(|id| ProbeKind::from_id(id.as_ref()))
            .collect();

        debug!(target = url, probes = kinds.len(), "starting batch");

        let mut handles = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let engine = self.clone();
            let target = url.to_string();
            handles.push((
                kind,
                tokio::spawn(async move { engine.run_probe(kind, &target).await }),
            ));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (kind, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                // A probe escaped its no-throw contract (panicked task).
                // Synthesize a result so the batch contract holds for the
                // remaining probes.
                Err(e) => {
                    warn!(probe = %kind, error = %e, "probe task failed");
                    ProbeResult::runner_failure(e.to_string())
                }
            };
            results.push(result);
        }
        results
    }

    /// Run a single probe under the engine's deadline
    async fn run_probe(&self, kind: ProbeKind, url: &str) -> ProbeResult {
        debug!(probe = %kind, target = url, "running probe");
        match tokio::time::timeout(self.probe_timeout, kind.execute(self, url)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(probe = %kind, target = url, "probe deadline exceeded");
                ProbeResult::timeout(kind, self.probe_timeout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{DetailValue, Status};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn engine() -> Engine {
        Engine::new().unwrap()
    }

    #[test]
    fn validate_accepts_http_and_https() {
        assert!(validate_target("http://example.com").is_ok());
        assert!(validate_target("https://example.com/path?q=1").is_ok());
    }

    #[test]
    fn validate_rejects_other_schemes() {
        assert!(validate_target("ftp://example.com").is_err());
        assert!(validate_target("file:///etc/passwd").is_err());
        assert!(validate_target("example.com").is_err());
        assert!(validate_target("").is_err());
    }

    #[test]
    fn validate_rejection_message() {
        let err = validate_target("not a url").unwrap_err();
        assert_eq!(
            err.to_string(),
            "A valid URL starting with http:// or https:// is required."
        );
    }

    #[tokio::test]
    async fn batch_preserves_request_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let ids = ["response-body", "http-inspector", "security-headers"];
        let results = engine().run_batch(&server.uri(), &ids).await;

        let result_ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            result_ids,
            vec!["response-body", "http-inspector", "security-headers"]
        );
    }

    #[tokio::test]
    async fn unknown_ids_are_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let ids = ["nonsense", "http-inspector", "also-unknown"];
        let results = engine().run_batch(&server.uri(), &ids).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "http-inspector");
    }

    #[tokio::test]
    async fn empty_selection_yields_empty_batch() {
        let results = engine()
            .run_batch::<&str>("http://example.invalid", &[])
            .await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn probe_failure_does_not_affect_other_probes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        // DNS resolver points at a closed port, so it fails; the HTTP
        // inspector against the live mock must be untouched.
        let engine = Engine::builder()
            .doh_endpoint("http://127.0.0.1:9/dns-query")
            .build()
            .unwrap();

        let ids = ["dns-resolver", "http-inspector"];
        let results = engine.run_batch(&server.uri(), &ids).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "dns-resolver");
        assert_eq!(results[0].status, Status::Fail);
        assert_eq!(results[1].id, "http-inspector");
        assert_eq!(results[1].status, Status::Ok);
    }

    #[tokio::test]
    async fn slow_probe_is_reported_as_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let engine = Engine::builder()
            .probe_timeout(Duration::from_millis(100))
            .build()
            .unwrap();

        let results = engine.run_batch(&server.uri(), &["response-body"]).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "response-body");
        assert_eq!(results[0].status, Status::Fail);
        assert_eq!(
            results[0].details.get("timeout"),
            Some(&DetailValue::Bool(true))
        );
    }

    #[tokio::test]
    async fn one_result_per_requested_probe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let ids = [
            "http-inspector",
            "cache-hit-miss",
            "latency-benchmark",
            "redirect-test",
            "security-headers",
            "response-body",
            "robots-sitemap",
            "mixed-content",
        ];
        let results = engine().run_batch(&server.uri(), &ids).await;

        assert_eq!(results.len(), ids.len());
        for (id, result) in ids.iter().zip(&results) {
            assert_eq!(&result.id, id);
        }
    }
}
