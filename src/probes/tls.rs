//! TLS / HTTPS Check probe
//!
//! Queries an external certificate-inspection API for the target's
//! hostname and surfaces the negotiated TLS version plus certificate
//! subject, issuer, and validity window. Plain-http targets are reported
//! as `warning` without any outbound lookup.

use serde::Deserialize;
use url::Url;

use crate::engine::Engine;
use crate::registry::ProbeKind;
use crate::result::{ABSENT, Details, ProbeResult, Status};

const KIND: ProbeKind = ProbeKind::TlsSecurity;

/// Certificate-inspection API payload
#[derive(Debug, Deserialize)]
struct TlsApiResponse {
    status: String,
    #[serde(default)]
    errors: Option<serde_json::Value>,
    #[serde(default)]
    response: Option<TlsInfo>,
}

#[derive(Debug, Deserialize)]
struct TlsInfo {
    #[serde(default)]
    tls_version: Option<String>,
    #[serde(default)]
    certificate: Option<Certificate>,
}

#[derive(Debug, Deserialize)]
struct Certificate {
    #[serde(default)]
    subject: Option<CertName>,
    #[serde(default)]
    issuer: Option<CertName>,
    #[serde(default)]
    valid_from: Option<String>,
    #[serde(default)]
    valid_to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CertName {
    #[serde(default)]
    common_name: Option<String>,
}

pub(crate) async fn run(engine: &Engine, url: &str) -> ProbeResult {
    if !url.starts_with("https://") {
        return ProbeResult::new(
            KIND,
            Status::Warning,
            "Test only applicable for HTTPS URLs.",
            Details::new(),
        );
    }

    let hostname = match Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) {
        Some(hostname) => hostname,
        None => {
            return failure(format!("could not extract a hostname from '{}'", url));
        }
    };

    let api_url = format!("{}/{}", engine.tls_api_endpoint(), hostname);
    let response = match engine.client().get(&api_url).send().await {
        Ok(response) => response,
        Err(e) => return failure(e.to_string()),
    };

    if !response.status().is_success() {
        let api_status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return ProbeResult::failure(
            KIND,
            format!(
                "Failed to retrieve TLS info. API returned status {}.",
                api_status
            ),
            body,
        );
    }

    let payload: TlsApiResponse = match response.json().await {
        Ok(payload) => payload,
        Err(e) => return failure(e.to_string()),
    };

    if payload.status != "ok" {
        let errors = payload
            .errors
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown API error".to_string());
        let details = Details::new()
            .with("api_status", payload.status)
            .with("errors", errors);
        return ProbeResult::new(
            KIND,
            Status::Fail,
            "API reported an issue with the TLS check.",
            details,
        );
    }

    let info = payload.response;
    let tls_version = info
        .as_ref()
        .and_then(|i| i.tls_version.clone())
        .unwrap_or_else(|| ABSENT.to_string());
    let cert = info.and_then(|i| i.certificate);

    let details = Details::new()
        .with("tls_version", tls_version.clone())
        .with(
            "valid_certificate",
            if cert.is_some() { "✓ Yes" } else { "✗ No" },
        )
        .with(
            "certificate_subject",
            cert.as_ref()
                .and_then(|c| c.subject.as_ref())
                .and_then(|n| n.common_name.clone())
                .unwrap_or_else(|| ABSENT.to_string()),
        )
        .with(
            "certificate_issuer",
            cert.as_ref()
                .and_then(|c| c.issuer.as_ref())
                .and_then(|n| n.common_name.clone())
                .unwrap_or_else(|| ABSENT.to_string()),
        )
        .with(
            "valid_from",
            cert.as_ref()
                .and_then(|c| c.valid_from.clone())
                .unwrap_or_else(|| ABSENT.to_string()),
        )
        .with(
            "valid_to",
            cert.as_ref()
                .and_then(|c| c.valid_to.clone())
                .unwrap_or_else(|| ABSENT.to_string()),
        );

    ProbeResult::new(
        KIND,
        Status::Ok,
        format!(
            "Successfully retrieved TLS and certificate information. TLS Version: {}.",
            tls_version
        ),
        details,
    )
}

/// Exception-path failure, annotated as an invalid certificate
fn failure(error: String) -> ProbeResult {
    let details = Details::new()
        .with("error", error)
        .with("valid_certificate", "✗ No");
    ProbeResult::new(
        KIND,
        Status::Fail,
        "Failed to establish a secure connection or parse API response.",
        details,
    )
}
