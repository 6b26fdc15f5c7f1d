//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// shopcheck: storefront regression scenarios and catalog API checks
#[derive(Parser, Debug)]
#[command(name = "shopcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (failures only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the UI scenarios and API checks
    Scenarios,

    /// Run UI scenarios in a real browser
    Run(RunArgs),

    /// Run checks against the catalog REST API
    Api(ApiArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Scenario to run (repeatable, default: all)
    #[arg(short, long = "scenario", value_name = "NAME")]
    pub scenarios: Vec<String>,

    /// Harness configuration file (JSON)
    #[arg(long, env = "SHOPCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Credentials file (JSON)
    #[arg(long, env = "SHOPCHECK_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Report file, truncated at the start of the run
    #[arg(long, env = "SHOPCHECK_REPORT")]
    pub report: Option<PathBuf>,

    /// Storefront root URL
    #[arg(long, env = "SHOPCHECK_BASE_URL")]
    pub base_url: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Chromium executable
    #[arg(long, env = "SHOPCHECK_CHROMIUM")]
    pub chromium: Option<String>,

    /// Element wait timeout in milliseconds
    #[arg(long, env = "SHOPCHECK_WAIT_TIMEOUT_MS")]
    pub wait_timeout_ms: Option<u64>,
}

/// Arguments for the api command
#[derive(Parser, Debug)]
pub struct ApiArgs {
    /// Check to run (repeatable, default: all)
    #[arg(short, long = "check", value_name = "NAME")]
    pub checks: Vec<String>,

    /// Catalog API root URL
    #[arg(long, env = "SHOPCHECK_API_BASE_URL")]
    pub base_url: Option<String>,

    /// Report file, truncated at the start of the run
    #[arg(long, env = "SHOPCHECK_API_REPORT", default_value = "reports/ApiTestResults.txt")]
    pub report: PathBuf,

    /// Request timeout in milliseconds
    #[arg(long, env = "SHOPCHECK_API_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    mod run_args_tests {
        use super::*;

        #[test]
        fn test_repeatable_scenarios() {
            let cli = Cli::parse_from([
                "shopcheck",
                "run",
                "--scenario",
                "login-valid",
                "-s",
                "checkout",
                "--headed",
                "--wait-timeout-ms",
                "2500",
            ]);
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert_eq!(args.scenarios, ["login-valid", "checkout"]);
            assert!(args.headed);
            assert_eq!(args.wait_timeout_ms, Some(2500));
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = Cli::parse_from(["shopcheck", "run", "-vv", "--color", "never"]);
            assert_eq!(cli.verbose, 2);
            assert!(matches!(cli.color, ColorArg::Never));
        }

        #[test]
        fn test_defaults_are_empty() {
            let cli = Cli::parse_from(["shopcheck", "run"]);
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert!(args.scenarios.is_empty());
            assert!(!args.headed);
        }
    }

    mod api_args_tests {
        use super::*;

        #[test]
        fn test_api_defaults() {
            let cli = Cli::parse_from(["shopcheck", "api", "--check", "categories"]);
            let Commands::Api(args) = cli.command else {
                panic!("expected api");
            };
            assert_eq!(args.checks, ["categories"]);
            assert_eq!(args.report, PathBuf::from("reports/ApiTestResults.txt"));
        }
    }

    #[test]
    fn test_color_arg_conversion() {
        use crate::config::ColorChoice;
        assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
        assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
    }
}
