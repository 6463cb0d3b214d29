//! Response Body probe
//!
//! Reports the total byte size of the response body and a short decoded
//! text preview of its beginning.

use crate::engine::Engine;
use crate::registry::ProbeKind;
use crate::result::{Details, ProbeResult, Status};

const KIND: ProbeKind = ProbeKind::ResponseBody;

/// How many leading bytes are decoded for the preview
const PREVIEW_BYTES: usize = 1024;

/// Maximum preview length in characters
const PREVIEW_CHARS: usize = 100;

pub(crate) async fn run(engine: &Engine, url: &str) -> ProbeResult {
    let response = match engine.client().get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return ProbeResult::failure(KIND, "Failed to analyze response body.", e.to_string());
        }
    };

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => {
            return ProbeResult::failure(KIND, "Failed to analyze response body.", e.to_string());
        }
    };

    let details = Details::new()
        .with("size", format!("{} bytes", body.len()))
        .with("preview", preview(&body));

    ProbeResult::new(
        KIND,
        Status::Ok,
        format!("Response body size is {} bytes.", body.len()),
        details,
    )
}

/// First characters of the decoded body, ellipsis-truncated
fn preview(body: &[u8]) -> String {
    let head = &body[..body.len().min(PREVIEW_BYTES)];
    let text = String::from_utf8_lossy(head);
    if text.chars().count() > PREVIEW_CHARS {
        let truncated: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", truncated)
    } else {
        text.into_owned()
    }
}
