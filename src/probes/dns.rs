//! DNS Resolver probe
//!
//! Resolves the target's hostname through a DNS-over-HTTPS JSON endpoint,
//! querying A, AAAA, and CNAME records concurrently.

use serde::Deserialize;
use url::Url;

use crate::engine::Engine;
use crate::registry::ProbeKind;
use crate::result::{Details, ProbeResult, Status};

const KIND: ProbeKind = ProbeKind::DnsResolver;

/// DNS-over-HTTPS JSON answer section
#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Answer", default)]
    answer: Vec<DohAnswer>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    data: String,
}

pub(crate) async fn run(engine: &Engine, url: &str) -> ProbeResult {
    let hostname = match Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) {
        Some(hostname) => hostname,
        None => {
            return ProbeResult::failure(
                KIND,
                "Failed to resolve DNS.",
                format!("could not extract a hostname from '{}'", url),
            );
        }
    };

    let (a, aaaa, cname) = tokio::join!(
        query(engine, &hostname, "A"),
        query(engine, &hostname, "AAAA"),
        query(engine, &hostname, "CNAME"),
    );

    let (a_records, aaaa_records, cname_records) = match (a, aaaa, cname) {
        (Ok(a), Ok(aaaa), Ok(cname)) => (a, aaaa, cname),
        (Err(e), ..) | (_, Err(e), _) | (.., Err(e)) => {
            return ProbeResult::failure(KIND, "Failed to resolve DNS.", e);
        }
    };

    let found = !a_records.is_empty() || !aaaa_records.is_empty() || !cname_records.is_empty();
    let description = if found {
        format!("Successfully resolved DNS records for {}.", hostname)
    } else {
        format!("No A, AAAA, or CNAME records found for {}.", hostname)
    };

    let details = Details::new()
        .with("hostname", hostname)
        .with("a_records", a_records)
        .with("aaaa_records", aaaa_records)
        .with("cname_records", cname_records);

    ProbeResult::new(KIND, Status::Ok, description, details)
}

/// Issue one DoH JSON query for the given record type
async fn query(
    engine: &Engine,
    hostname: &str,
    record_type: &str,
) -> std::result::Result<Vec<String>, String> {
    let response = engine
        .client()
        .get(engine.doh_endpoint())
        .query(&[("name", hostname), ("type", record_type)])
        .header("accept", "application/dns-json")
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let payload: DohResponse = response.json().await.map_err(|e| e.to_string())?;
    Ok(payload.answer.into_iter().map(|a| a.data).collect())
}
