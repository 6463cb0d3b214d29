//! HTTP Inspector probe
//!
//! Issues a single GET with redirect following disabled and reports the
//! raw status code, negotiated protocol, content type, and edge routing
//! headers of the first response.

use crate::engine::Engine;
use crate::probes::header_or_absent;
use crate::registry::ProbeKind;
use crate::result::{ABSENT, Details, ProbeResult, Status};

const KIND: ProbeKind = ProbeKind::HttpInspector;

pub(crate) async fn run(engine: &Engine, url: &str) -> ProbeResult {
    let response = match engine.raw_client().get(url).send().await {
        Ok(response) => response,
        Err(e) => return ProbeResult::failure(KIND, "Failed to fetch the URL.", e.to_string()),
    };

    let status = response.status().as_u16();
    let cf_ray = header_or_absent(response.headers(), "cf-ray");
    let details = Details::new()
        .with("url", response.url().as_str())
        .with("status", status)
        .with("http_protocol", format!("{:?}", response.version()))
        .with(
            "content_type",
            header_or_absent(response.headers(), "content-type"),
        )
        .with("cf_ray", cf_ray.clone())
        .with("colo", colo_from_ray(&cf_ray))
        .with("server", header_or_absent(response.headers(), "server"));

    ProbeResult::new(
        KIND,
        Status::Ok,
        format!("Request completed with status {}.", status),
        details,
    )
}

/// Extract the colo code from a cf-ray header value ("<ray-id>-<colo>")
fn colo_from_ray(cf_ray: &str) -> String {
    if cf_ray == ABSENT || !cf_ray.contains('-') {
        return ABSENT.to_string();
    }
    cf_ray
        .rsplit('-')
        .next()
        .filter(|colo| !colo.is_empty())
        .unwrap_or(ABSENT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::DetailValue;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn colo_extraction() {
        assert_eq!(colo_from_ray("8f1c2a3b4d5e6f70-FRA"), "FRA");
        assert_eq!(colo_from_ray("N/A"), "N/A");
        assert_eq!(colo_from_ray("noseparator"), "N/A");
    }

    #[tokio::test]
    async fn reports_status_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html; charset=utf-8")
                    .insert_header("server", "cloudflare")
                    .insert_header("cf-ray", "8f1c2a3b4d5e6f70-FRA"),
            )
            .mount(&server)
            .await;

        let engine = Engine::new().unwrap();
        let result = run(&engine, &server.uri()).await;

        assert_eq!(result.status, Status::Ok);
        assert_eq!(result.description, "Request completed with status 200.");
        assert_eq!(result.details.get("status"), Some(&DetailValue::Int(200)));
        assert_eq!(
            result.details.get("content_type"),
            Some(&DetailValue::Text("text/html; charset=utf-8".to_string()))
        );
        assert_eq!(
            result.details.get("colo"),
            Some(&DetailValue::Text("FRA".to_string()))
        );
        assert_eq!(
            result.details.get("server"),
            Some(&DetailValue::Text("cloudflare".to_string()))
        );
    }

    #[tokio::test]
    async fn does_not_follow_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/elsewhere"))
            .mount(&server)
            .await;

        let engine = Engine::new().unwrap();
        let result = run(&engine, &server.uri()).await;

        assert_eq!(result.status, Status::Ok);
        assert_eq!(result.details.get("status"), Some(&DetailValue::Int(301)));
    }

    #[tokio::test]
    async fn network_error_yields_fail() {
        let engine = Engine::new().unwrap();
        let result = run(&engine, "http://127.0.0.1:9").await;

        assert_eq!(result.status, Status::Fail);
        assert_eq!(result.description, "Failed to fetch the URL.");
        assert!(result.details.get("error").is_some());
    }
}
