//! Edge Inspector - website diagnostics probe engine
//!
//! Runs a caller-selected subset of ten independent network and security
//! probes concurrently against a target URL and returns one classified
//! result per probe. A failing probe never affects the rest of the batch.
//!
//! # Example
//!
//! ```no_run
//! use edge_inspector::Engine;
//!
//! #[tokio::main]
//! async fn main() -> edge_inspector::Result<()> {
//!     let engine = Engine::new()?;
//!     let results = engine
//!         .run_batch("https://example.com", &["http-inspector", "dns-resolver"])
//!         .await;
//!     for result in results {
//!         println!("{}: {} - {}", result.id, result.status, result.description);
//!     }
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod output;
mod probes;
pub mod registry;
pub mod result;

pub use engine::{Engine, EngineBuilder, validate_target};
pub use error::{Error, Result};
pub use output::{OutputConfig, OutputFormat, output_results};
pub use registry::{ProbeDefinition, ProbeKind, definitions};
pub use result::{DetailValue, Details, ProbeResult, Status};
