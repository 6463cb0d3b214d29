//! Security Headers probe
//!
//! Audits seven security-relevant response headers on a single GET.
//! Absent headers are reported with a "not present" sentinel.

use crate::engine::Engine;
use crate::probes::header_value;
use crate::registry::ProbeKind;
use crate::result::{Details, ProbeResult, Status};

const KIND: ProbeKind = ProbeKind::SecurityHeaders;

/// Sentinel for headers the response did not carry
const NOT_PRESENT: &str = "not present";

/// Audited headers, as (detail key, header name) pairs
const CHECKED_HEADERS: &[(&str, &str)] = &[
    ("strict_transport_security", "strict-transport-security"),
    ("content_security_policy", "content-security-policy"),
    ("x_frame_options", "x-frame-options"),
    ("x_content_type_options", "x-content-type-options"),
    ("referrer_policy", "referrer-policy"),
    ("x_xss_protection", "x-xss-protection"),
    ("permissions_policy", "permissions-policy"),
];

pub(crate) async fn run(engine: &Engine, url: &str) -> ProbeResult {
    let response = match engine.client().get(url).send().await {
        Ok(response) => response,
        Err(e) => return ProbeResult::failure(KIND, "Failed to check headers.", e.to_string()),
    };

    let mut details = Details::new();
    let mut present = 0usize;
    for (key, header) in CHECKED_HEADERS {
        match header_value(response.headers(), header) {
            Some(value) => {
                present += 1;
                details.push(*key, value);
            }
            None => details.push(*key, NOT_PRESENT),
        }
    }

    let total = CHECKED_HEADERS.len();
    let status = if present == total {
        Status::Ok
    } else {
        Status::Warning
    };

    ProbeResult::new(
        KIND,
        status,
        format!("{}/{} recommended headers present.", present, total),
        details,
    )
}
