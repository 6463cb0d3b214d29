//! Edge Inspector CLI - run network and security probes against a URL

use clap::{Parser, ValueEnum};
use std::process::ExitCode;
use std::time::Duration;

use edge_inspector::{
    Engine, OutputConfig, OutputFormat, ProbeKind, definitions, output_results, validate_target,
};
use tracing_subscriber::EnvFilter;

/// Website diagnostics - runs network and security probes against a URL
#[derive(Parser, Debug)]
#[command(name = "edge-inspector")]
#[command(version, about, long_about = None)]
struct Args {
    /// URL to inspect (http:// or https://)
    #[arg(required_unless_present = "list_tests")]
    url: Option<String>,

    /// Comma-separated probe ids to run (default: all)
    #[arg(short = 't', long = "tests", value_delimiter = ',')]
    tests: Vec<String>,

    /// Output format
    #[arg(short = 'o', long = "output", default_value = "human", value_enum)]
    output_format: OutputFormatArg,

    /// Hide the per-probe detail listing in human output
    #[arg(long = "no-details")]
    no_details: bool,

    /// Per-probe deadline in seconds
    #[arg(long = "timeout", default_value_t = 30)]
    timeout: u64,

    /// List the available probes and exit
    #[arg(long = "list-tests")]
    list_tests: bool,
}

/// Output format argument
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
    None,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::None => OutputFormat::None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    if args.list_tests {
        print_catalog();
        return ExitCode::SUCCESS;
    }

    // Presence is enforced by clap when --list-tests is absent
    let url = args.url.clone().unwrap_or_default();

    if matches!(args.output_format, OutputFormatArg::Human) {
        print_banner();
    }

    match run(&args, &url).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args, url: &str) -> edge_inspector::Result<()> {
    let target = validate_target(url)?;

    let engine = Engine::builder()
        .probe_timeout(Duration::from_secs(args.timeout))
        .build()?;

    let ids: Vec<String> = if args.tests.is_empty() {
        ProbeKind::ALL.iter().map(|k| k.id().to_string()).collect()
    } else {
        args.tests.clone()
    };

    let results = engine.run_batch(target.as_str(), &ids).await;

    let output_config = OutputConfig::new(args.output_format.into(), !args.no_details);
    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    output_results(&results, &output_config, &mut writer)?;

    Ok(())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_catalog() {
    for def in definitions() {
        println!("{:<18} {} - {}", def.id, def.name, def.description);
    }
}

fn print_banner() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    println!("Edge Inspector v{}", VERSION);
    println!();
}
