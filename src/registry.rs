//! Static probe registry
//!
//! A closed enumeration of the ten diagnostic probes, keyed by stable
//! string identifiers that form the contract between caller and engine.

use serde::Serialize;

use crate::engine::Engine;
use crate::probes;
use crate::result::ProbeResult;

/// One of the ten diagnostic probes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeKind {
    /// Final status code, protocol, and routing headers of a single GET
    HttpInspector,
    /// Cache status after priming the cache with a first request
    CacheAnalysis,
    /// A/AAAA/CNAME resolution via DNS-over-HTTPS
    DnsResolver,
    /// Repeated timed fetches plus a TTFB measurement
    LatencyBenchmark,
    /// TLS version and certificate validity via an inspection API
    TlsSecurity,
    /// Manual redirect-chain following with loop detection
    RedirectTest,
    /// Presence audit of seven security response headers
    SecurityHeaders,
    /// Body size and decoded text preview
    ResponseBody,
    /// robots.txt and sitemap.xml presence and content-type checks
    RobotsSitemap,
    /// Scan for http:// assets referenced from an https:// page
    MixedContent,
}

/// Catalog entry describing one probe
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProbeDefinition {
    /// Stable identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
}

impl ProbeKind {
    /// All probes, in catalog order
    pub const ALL: [ProbeKind; 10] = [
        Self::HttpInspector,
        Self::CacheAnalysis,
        Self::DnsResolver,
        Self::LatencyBenchmark,
        Self::TlsSecurity,
        Self::RedirectTest,
        Self::SecurityHeaders,
        Self::ResponseBody,
        Self::RobotsSitemap,
        Self::MixedContent,
    ];

    /// Stable identifier used by callers to select this probe
    pub fn id(self) -> &'static str {
        match self {
            Self::HttpInspector => "http-inspector",
            Self::CacheAnalysis => "cache-hit-miss",
            Self::DnsResolver => "dns-resolver",
            Self::LatencyBenchmark => "latency-benchmark",
            Self::TlsSecurity => "tls-security",
            Self::RedirectTest => "redirect-test",
            Self::SecurityHeaders => "security-headers",
            Self::ResponseBody => "response-body",
            Self::RobotsSitemap => "robots-sitemap",
            Self::MixedContent => "mixed-content",
        }
    }

    /// Human-readable name, echoed into every result
    pub fn display_name(self) -> &'static str {
        match self {
            Self::HttpInspector => "HTTP Inspector",
            Self::CacheAnalysis => "Cache Analysis",
            Self::DnsResolver => "DNS Resolver",
            Self::LatencyBenchmark => "Latency Benchmark",
            Self::TlsSecurity => "TLS / HTTPS Check",
            Self::RedirectTest => "Redirect Test",
            Self::SecurityHeaders => "Security Headers",
            Self::ResponseBody => "Response Body",
            Self::RobotsSitemap => "Robots.txt / Sitemap",
            Self::MixedContent => "Mixed Content Test",
        }
    }

    /// One-line catalog description
    pub fn description(self) -> &'static str {
        match self {
            Self::HttpInspector => "Inspects status, headers, and protocol.",
            Self::CacheAnalysis => "Checks cache-related headers.",
            Self::DnsResolver => "Performs DoH query for A/AAAA/CNAME records.",
            Self::LatencyBenchmark => "Measures TTFB and fetch duration multiple times.",
            Self::TlsSecurity => "Checks TLS version and certificate validity.",
            Self::RedirectTest => "Follows redirect chains and detects loops.",
            Self::SecurityHeaders => "Checks for HSTS, CSP, X-Frame-Options, etc.",
            Self::ResponseBody => "Analyzes the size of the response body.",
            Self::RobotsSitemap => "Checks for the existence of robots.txt and sitemap.xml.",
            Self::MixedContent => "Scans for insecure http:// assets on an https:// page.",
        }
    }

    /// Look up a probe by its stable identifier
    ///
    /// Unknown identifiers yield `None`; the orchestrator silently skips
    /// them rather than erroring.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Catalog entry for this probe
    pub fn definition(self) -> ProbeDefinition {
        ProbeDefinition {
            id: self.id(),
            name: self.display_name(),
            description: self.description(),
        }
    }

    /// Execute this probe against the target URL
    ///
    /// Never fails: every internal error is converted into a
    /// `fail`-status result. This is the invariant the orchestrator
    /// relies on to treat all probes uniformly.
    pub async fn execute(self, engine: &Engine, url: &str) -> ProbeResult {
        match self {
            Self::HttpInspector => probes::http_inspector::run(engine, url).await,
            Self::CacheAnalysis => probes::cache::run(engine, url).await,
            Self::DnsResolver => probes::dns::run(engine, url).await,
            Self::LatencyBenchmark => probes::latency::run(engine, url).await,
            Self::TlsSecurity => probes::tls::run(engine, url).await,
            Self::RedirectTest => probes::redirect::run(engine, url).await,
            Self::SecurityHeaders => probes::security_headers::run(engine, url).await,
            Self::ResponseBody => probes::response_body::run(engine, url).await,
            Self::RobotsSitemap => probes::robots::run(engine, url).await,
            Self::MixedContent => probes::mixed_content::run(engine, url).await,
        }
    }
}

impl std::fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// The immutable probe catalog, in registry order
pub fn definitions() -> Vec<ProbeDefinition> {
    ProbeKind::ALL.iter().map(|kind| kind.definition()).collect()
}
