//! Mixed Content probe
//!
//! Scans the raw HTML of an https:// page for `src=` / `href=`
//! attributes whose value starts with `http://`. Plain-http targets are
//! reported as `warning` without fetching.

use regex::Regex;
use std::sync::OnceLock;

use crate::engine::Engine;
use crate::registry::ProbeKind;
use crate::result::{Details, ProbeResult, Status};

const KIND: ProbeKind = ProbeKind::MixedContent;

/// Cap on example matches included in the details
const MAX_EXAMPLES: usize = 10;

fn insecure_attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)(?:src|href)\s*=\s*["']http://[^"']*["']"#).expect("valid regex")
    })
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

    let response = match engine.client().get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return ProbeResult::failure(KIND, "Failed to scan for mixed content.", e.to_string());
        }
    };
    let html = match response.text().await {
        Ok(html) => html,
        Err(e) => {
            return ProbeResult::failure(KIND, "Failed to scan for mixed content.", e.to_string());
        }
    };

    let (count, elements) = find_insecure_references(&html);
    let status = if count > 0 { Status::Fail } else { Status::Ok };

    let details = Details::new()
        .with("insecure_elements_found", count as u64)
        .with("elements", elements);

    ProbeResult::new(
        KIND,
        status,
        format!("Found {} insecure elements.", count),
        details,
    )
}

/// Count insecure src/href references in raw HTML, keeping up to
/// [`MAX_EXAMPLES`] matched attribute strings as examples
fn find_insecure_references(html: &str) -> (usize, Vec<String>) {
    let mut count = 0usize;
    let mut examples = Vec::new();
    for m in insecure_attr_regex().find_iter(html) {
        count += 1;
        if examples.len() < MAX_EXAMPLES {
            examples.push(m.as_str().to_string());
        }
    }
    (count, examples)
}
