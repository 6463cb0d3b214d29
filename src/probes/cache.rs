//! Cache Analysis probe
//!
//! Requests the target twice - once to prime any edge cache, once to
//! measure - and interprets the `cf-cache-status` header of the second
//! response.

use crate::engine::Engine;
use crate::probes::header_or_absent;
use crate::registry::ProbeKind;
use crate::result::{ABSENT, Details, ProbeResult, Status};

const KIND: ProbeKind = ProbeKind::CacheAnalysis;

pub(crate) async fn run(engine: &Engine, url: &str) -> ProbeResult {
    // Prime the cache before measuring
    if let Err(e) = engine.client().get(url).send().await {
        return ProbeResult::failure(KIND, "Failed to fetch the URL.", e.to_string());
    }

    let response = match engine.client().get(url).send().await {
        Ok(response) => response,
        Err(e) => return ProbeResult::failure(KIND, "Failed to fetch the URL.", e.to_string()),
    };

    let cache_status = header_or_absent(response.headers(), "cf-cache-status");
    let status = if cache_status == "HIT" {
        Status::Ok
    } else {
        Status::Warning
    };

    let details = Details::new()
        .with("cf_cache_status", cache_status.clone())
        .with("cf_ray", header_or_absent(response.headers(), "cf-ray"))
        .with("age", header_or_absent(response.headers(), "age"))
        .with("expires", header_or_absent(response.headers(), "expires"))
        .with(
            "cache_control",
            header_or_absent(response.headers(), "cache-control"),
        )
        .with("server", header_or_absent(response.headers(), "server"));

    ProbeResult::new(KIND, status, describe(&cache_status), details)
}

/// Canned description for a cache-status value
fn describe(cache_status: &str) -> String {
    match cache_status {
        "HIT" => "Content was served directly from the edge cache.".to_string(),
        "MISS" => "Content was not in cache and was fetched from the origin server.".to_string(),
        "DYNAMIC" => {
            "Content is not configured to be cached and was served from the origin.".to_string()
        }
        "BYPASS" => "Caching was explicitly bypassed for this request.".to_string(),
        "EXPIRED" => {
            "Content was expired in cache and had to be revalidated with the origin.".to_string()
        }
        "STALE" => {
            "Stale content was served from cache while revalidating in the background.".to_string()
        }
        "REVALIDATED" => {
            "Content was revalidated with the origin and served from cache.".to_string()
        }
        "UPDATING" => {
            "Stale content was served while updating to a newer version in the background."
                .to_string()
        }
        _ if cache_status == ABSENT => {
            "No cache status header was present on the response.".to_string()
        }
        other => format!("Edge cache status: {}.", other),
    }
}
