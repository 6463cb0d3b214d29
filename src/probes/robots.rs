//! Robots.txt / Sitemap probe
//!
//! Issues concurrent HEAD requests for `{origin}/robots.txt` and
//! `{origin}/sitemap.xml` and validates that each exists with the
//! content type expected for its resource kind.

use url::Url;

use crate::engine::Engine;
use crate::probes::header_value;
use crate::registry::ProbeKind;
use crate::result::{ABSENT, Details, ProbeResult, Status};

const KIND: ProbeKind = ProbeKind::RobotsSitemap;

/// Outcome of one HEAD check
struct ResourceCheck {
    found: bool,
    content_type: String,
    content_type_correct: bool,
}

pub(crate) async fn run(engine: &Engine, url: &str) -> ProbeResult {
    let origin = match Url::parse(url) {
        Ok(parsed) => parsed.origin().ascii_serialization(),
        Err(e) => return ProbeResult::failure(KIND, "Failed to check for files.", e.to_string()),
    };

    let robots_url = format!("{}/robots.txt", origin);
    let sitemap_url = format!("{}/sitemap.xml", origin);

    let (robots, sitemap) = tokio::join!(
        check_resource(engine, &robots_url, &["text/plain"]),
        check_resource(engine, &sitemap_url, &["application/xml", "text/xml"]),
    );

    let (robots, sitemap) = match (robots, sitemap) {
        (Ok(robots), Ok(sitemap)) => (robots, sitemap),
        (Err(e), _) | (_, Err(e)) => {
            return ProbeResult::failure(KIND, "Failed to check for files.", e);
        }
    };

    let details = Details::new()
        .with("robots.txt Found", found_marker(robots.found))
        .with("robots.txt Content-Type", content_type_detail(&robots))
        .with("sitemap.xml Found", found_marker(sitemap.found))
        .with("sitemap.xml Content-Type", content_type_detail(&sitemap));

    let mut issues = Vec::new();
    if !robots.found {
        issues.push("robots.txt not found");
    } else if !robots.content_type_correct {
        issues.push("robots.txt has incorrect Content-Type");
    }
    if !sitemap.found {
        issues.push("sitemap.xml not found");
    } else if !sitemap.content_type_correct {
        issues.push("sitemap.xml has incorrect Content-Type");
    }

    if issues.is_empty() {
        ProbeResult::new(
            KIND,
            Status::Ok,
            "robots.txt and sitemap.xml appear to be correctly configured.",
            details,
        )
    } else {
        ProbeResult::new(
            KIND,
            Status::Warning,
            format!("Issues found: {}.", issues.join(", ")),
            details,
        )
    }
}

/// HEAD one resource and compare its content type to the expected MIMEs
async fn check_resource(
    engine: &Engine,
    url: &str,
    expected_types: &[&str],
) -> std::result::Result<ResourceCheck, String> {
    let response = engine
        .client()
        .head(url)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let found = response.status().is_success();
    let content_type = header_value(response.headers(), "content-type").unwrap_or_default();
    let content_type_correct = expected_types.iter().any(|t| content_type.contains(t));

    Ok(ResourceCheck {
        found,
        content_type,
        content_type_correct,
    })
}

fn found_marker(found: bool) -> &'static str {
    if found { "✓ Yes" } else { "✗ No" }
}

fn content_type_detail(check: &ResourceCheck) -> String {
    if !check.found {
        return ABSENT.to_string();
    }
    let verdict = if check.content_type_correct {
        "Correct"
    } else {
        "Incorrect"
    };
    format!("{} ({})", check.content_type, verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::DetailValue;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn both_present_and_correct_is_ok() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/robots.txt"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("content-type", "text/plain; charset=utf-8"),
            )
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/xml"))
            .mount(&server)
            .await;

        let engine = Engine::new().unwrap();
        let result = run(&engine, &format!("{}/some/page", server.uri())).await;

        assert_eq!(result.status, Status::Ok);
        assert_eq!(
            result.details.get("robots.txt Found"),
            Some(&DetailValue::Text("✓ Yes".to_string()))
        );
        assert_eq!(
            result.details.get("sitemap.xml Content-Type"),
            Some(&DetailValue::Text("application/xml (Correct)".to_string()))
        );
    }

    #[tokio::test]
    async fn missing_sitemap_is_warning() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/plain"))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let engine = Engine::new().unwrap();
        let result = run(&engine, &server.uri()).await;

        assert_eq!(result.status, Status::Warning);
        assert_eq!(result.description, "Issues found: sitemap.xml not found.");
        assert_eq!(
            result.details.get("sitemap.xml Found"),
            Some(&DetailValue::Text("✗ No".to_string()))
        );
        assert_eq!(
            result.details.get("sitemap.xml Content-Type"),
            Some(&DetailValue::Text("N/A".to_string()))
        );
    }

    #[tokio::test]
    async fn wrong_content_type_is_warning() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/xml"))
            .mount(&server)
            .await;

        let engine = Engine::new().unwrap();
        let result = run(&engine, &server.uri()).await;

        assert_eq!(result.status, Status::Warning);
        assert_eq!(
            result.description,
            "Issues found: robots.txt has incorrect Content-Type."
        );
        assert_eq!(
            result.details.get("robots.txt Content-Type"),
            Some(&DetailValue::Text("text/html (Incorrect)".to_string()))
        );
    }

    #[tokio::test]
    async fn network_error_yields_fail() {
        let engine = Engine::new().unwrap();
        let result = run(&engine, "http://127.0.0.1:9").await;

        assert_eq!(result.status, Status::Fail);
        assert_eq!(result.description, "Failed to check for files.");
    }
}
