//! shopcheck CLI: storefront regression scenarios
//!
//! ## Usage
//!
//! ```bash
//! shopcheck scenarios                          # List scenarios and checks
//! shopcheck run                                # Every UI scenario, headless
//! shopcheck run -s checkout --headed           # One scenario, visible browser
//! shopcheck run --credentials testdata.json    # Users for the end-to-end journey
//! shopcheck api --check categories             # Catalog API checks
//! ```

use clap::Parser;
use shopcheck_cli::{Cli, CliConfig, CliResult, ColorChoice, Commands, SuiteRunner, Verbosity};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // Build configuration from CLI args
    let config = build_config(&cli);
    init_tracing(&config);

    let mut runner = SuiteRunner::new(&config);
    match cli.command {
        Commands::Scenarios => {
            runner.list();
            Ok(())
        }
        Commands::Run(args) => runner.run_scenarios(&args).map(|_| ()),
        Commands::Api(args) => runner.run_api(&args).map(|_| ()),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// Log to stderr; `RUST_LOG` overrides the verbosity flags
fn init_tracing(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.color.should_color())
        .with_target(false)
        .try_init();
}
