//! Latency Benchmark probe
//!
//! Issues three timed GETs in sequence and averages them, then one more
//! request that separates time-to-first-byte from full body download.
//! The requests are deliberately sequential; parallelizing them would
//! change what is being measured.

use std::time::Instant;

use crate::engine::Engine;
use crate::registry::ProbeKind;
use crate::result::{Details, ProbeResult, Status};

const KIND: ProbeKind = ProbeKind::LatencyBenchmark;

/// Number of timed sample requests
const SAMPLES: usize = 3;

pub(crate) async fn run(engine: &Engine, url: &str) -> ProbeResult {
    let mut timings_ms: Vec<u128> = Vec::with_capacity(SAMPLES);
    for _ in 0..SAMPLES {
        let start = Instant::now();
        match engine.client().get(url).send().await {
            Ok(response) => {
                // Drain the body so each sample measures a full fetch
                let _ = response.bytes().await;
            }
            Err(e) => {
                return ProbeResult::failure(KIND, "Failed to measure latency.", e.to_string());
            }
        }
        timings_ms.push(start.elapsed().as_millis());
    }
    let average_ms = timings_ms.iter().sum::<u128>() / timings_ms.len() as u128;

    // One more request, timing headers-received separately from body read
    let start = Instant::now();
    let response = match engine.client().get(url).send().await {
        Ok(response) => response,
        Err(e) => return ProbeResult::failure(KIND, "Failed to measure latency.", e.to_string()),
    };
    let ttfb_ms = start.elapsed().as_millis();
    if let Err(e) = response.bytes().await {
        return ProbeResult::failure(KIND, "Failed to measure latency.", e.to_string());
    }
    let total_duration_ms = start.elapsed().as_millis();

    let details = Details::new()
        .with("test1", format!("{}ms", timings_ms[0]))
        .with("test2", format!("{}ms", timings_ms[1]))
        .with("test3", format!("{}ms", timings_ms[2]))
        .with("average_ms", format!("{}ms", average_ms))
        .with("ttfb_ms", format!("{}ms", ttfb_ms))
        .with("total_duration_ms", format!("{}ms", total_duration_ms))
        .with(
            "body_download_ms",
            format!("{}ms", total_duration_ms - ttfb_ms),
        );

    ProbeResult::new(
        KIND,
        Status::Ok,
        format!("Average latency: {}ms.", average_ms),
        details,
    )
}
