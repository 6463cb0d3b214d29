//! Redirect Test probe
//!
//! Follows the redirect chain by hand: each hop is fetched with redirect
//! following disabled, its `Location` header resolved against the current
//! URL, and the visited URLs accumulated. Revisiting a URL already in the
//! chain is a loop; more than ten hops is a failure.

use url::Url;

use crate::engine::Engine;
use crate::probes::header_value;
use crate::registry::ProbeKind;
use crate::result::{Details, ProbeResult, Status};

const KIND: ProbeKind = ProbeKind::RedirectTest;

/// Maximum number of redirect hops to follow
const MAX_HOPS: usize = 10;

pub(crate) async fn run(engine: &Engine, url: &str) -> ProbeResult {
    let mut current_url = url.to_string();
    let mut chain = vec![current_url.clone()];

    for _ in 0..MAX_HOPS {
        let response = match engine.raw_client().get(&current_url).send().await {
            Ok(response) => response,
            Err(e) => {
                return ProbeResult::failure(KIND, "Failed during redirect test.", e.to_string());
            }
        };

        let status = response.status();
        if !status.is_redirection() {
            let count = chain.len() - 1;
            let description = if count > 0 {
                format!("Followed {} redirects.", count)
            } else {
                "No redirects found.".to_string()
            };
            let redirects = match count {
                0 => "None".to_string(),
                1 => "1 redirect".to_string(),
                n => format!("{} redirects", n),
            };
            let details = Details::new()
                .with("final_status", status.as_u16())
                .with("final_url", current_url)
                .with("redirects", redirects);
            return ProbeResult::new(KIND, Status::Ok, description, details);
        }

        let location = match header_value(response.headers(), "location") {
            Some(location) => location,
            None => {
                return ProbeResult::new(
                    KIND,
                    Status::Fail,
                    "Redirect response with no location header.",
                    Details::new().with("chain", chain),
                );
            }
        };

        current_url = match resolve_location(&current_url, &location) {
            Ok(next) => next,
            Err(e) => return ProbeResult::failure(KIND, "Failed during redirect test.", e),
        };

        if chain.contains(&current_url) {
            chain.push(format!("{} (Loop Detected)", current_url));
            return ProbeResult::new(
                KIND,
                Status::Fail,
                "Redirect loop detected.",
                Details::new().with("chain", chain),
            );
        }
        chain.push(current_url.clone());
    }

    ProbeResult::new(
        KIND,
        Status::Fail,
        format!("Exceeded maximum redirects ({}).", MAX_HOPS),
        Details::new().with("chain", chain),
    )
}

/// Resolve a Location header value relative to the current URL
fn resolve_location(current: &str, location: &str) -> std::result::Result<String, String> {
    let base = Url::parse(current).map_err(|e| e.to_string())?;
    let next = base.join(location).map_err(|e| e.to_string())?;
    Ok(next.to_string())
}
