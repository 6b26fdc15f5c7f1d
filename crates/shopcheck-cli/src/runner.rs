//! Scenario and API check runners

use crate::commands::{ApiArgs, RunArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use shopcheck::{
    CredentialFixture, HarnessConfig, ReportSink, Scenario, ScenarioInputs, SuiteResults,
    REPORT_HEADER,
};
use std::str::FromStr;
use tracing::debug;

/// Parse scenario names, defaulting to every scenario
pub fn parse_scenarios(names: &[String]) -> CliResult<Vec<Scenario>> {
    if names.is_empty() {
        return Ok(Scenario::ALL.to_vec());
    }
    names
        .iter()
        .map(|name| Scenario::from_str(name).map_err(CliError::from))
        .collect()
}

/// Harness configuration from an optional JSON file overlaid with flags
pub fn harness_config(args: &RunArgs) -> CliResult<HarnessConfig> {
    let mut config = match &args.config {
        Some(path) => HarnessConfig::from_json_file(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(url) = &args.base_url {
        config = config.with_base_url(url.clone());
    }
    if let Some(path) = &args.report {
        config = config.with_report_path(path.clone());
    }
    if let Some(path) = &args.chromium {
        config = config.with_chromium_path(path.clone());
    }
    if let Some(ms) = args.wait_timeout_ms {
        config = config.with_wait_timeout_ms(ms);
    }
    if args.headed {
        config = config.with_headless(false);
    }
    config.validate()?;
    Ok(config)
}

/// Scenario inputs, with users from `--credentials` when given
pub fn scenario_inputs(args: &RunArgs) -> CliResult<ScenarioInputs> {
    let inputs = ScenarioInputs::default();
    Ok(match &args.credentials {
        Some(path) => inputs.with_credentials(CredentialFixture::load(path)?),
        None => inputs,
    })
}

/// Runs suites and prints their progress
#[derive(Debug)]
pub struct SuiteRunner {
    reporter: ProgressReporter,
}

impl SuiteRunner {
    /// Create a new runner
    #[must_use]
    pub fn new(config: &CliConfig) -> Self {
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { reporter }
    }

    /// Print the scenario and check catalogs
    pub fn list(&self) {
        self.reporter.header("Scenarios");
        for scenario in Scenario::ALL {
            println!("  {:<22} {}", scenario.name(), scenario.description());
        }
        #[cfg(feature = "api")]
        {
            self.reporter.header("API checks");
            for check in shopcheck::api::ApiCheck::ALL {
                println!("  {:<22} {}", check.name(), check.report_name());
            }
        }
    }

    /// Run UI scenarios, one browser session each
    pub fn run_scenarios(&mut self, args: &RunArgs) -> CliResult<SuiteResults> {
        let scenarios = parse_scenarios(&args.scenarios)?;
        let config = harness_config(args)?;
        let inputs = scenario_inputs(args)?;
        debug!(?config, scenarios = scenarios.len(), "starting ui suite");
        let report = ReportSink::new(config.report_path.clone());
        report.reset(REPORT_HEADER)?;

        self.reporter.header("UI scenarios");
        self.reporter.info(&format!("Storefront: {}", config.base_url));
        let suite = self.run_ui_suite(&scenarios, &config, &inputs, &report)?;
        self.finish(&suite);
        self.reporter
            .info(&format!("Report written to {}", config.report_path.display()));
        Self::verdict(&suite)
    }

    #[cfg(feature = "browser")]
    fn run_ui_suite(
        &mut self,
        scenarios: &[Scenario],
        config: &HarnessConfig,
        inputs: &ScenarioInputs,
        report: &ReportSink,
    ) -> CliResult<SuiteResults> {
        use shopcheck::{ChromiumDriver, Harness, SessionGuard, SystemClock};

        self.reporter
            .start_progress(scenarios.len() as u64, "Running scenarios");
        let reporter = &self.reporter;
        let suite = shopcheck::run_suite("ui", scenarios, inputs, |scenario| {
            reporter.increment(1);
            reporter.set_message(scenario.name());
            let driver = ChromiumDriver::launch(config.driver_config())?;
            Ok(Harness::with_parts(
                SessionGuard::new(driver, scenario.name()),
                config.clone(),
                SystemClock::shared(),
                report.clone(),
            ))
        });
        self.reporter.finish();
        Ok(suite)
    }

    #[cfg(not(feature = "browser"))]
    fn run_ui_suite(
        &mut self,
        _scenarios: &[Scenario],
        _config: &HarnessConfig,
        _inputs: &ScenarioInputs,
        _report: &ReportSink,
    ) -> CliResult<SuiteResults> {
        Err(CliError::feature_disabled("browser"))
    }

    /// Run catalog API checks
    #[cfg(feature = "api")]
    pub fn run_api(&mut self, args: &ApiArgs) -> CliResult<SuiteResults> {
        use shopcheck::api::{run_checks, ApiCheck, CatalogClient};
        use std::time::Duration;

        let checks = if args.checks.is_empty() {
            ApiCheck::ALL.to_vec()
        } else {
            args.checks
                .iter()
                .map(|name| ApiCheck::from_str(name))
                .collect::<Result<Vec<_>, _>>()?
        };
        let mut config = HarnessConfig::default();
        if let Some(url) = &args.base_url {
            config = config.with_api_base_url(url.clone());
        }
        let timeout = args
            .timeout_ms
            .map_or_else(|| config.api_timeout(), Duration::from_millis);

        let client = CatalogClient::new(&config.api_base_url, timeout)?;
        debug!(base_url = client.base_url(), checks = checks.len(), "starting api suite");
        let report = ReportSink::new(args.report.clone());
        report.reset(REPORT_HEADER)?;

        self.reporter.header("API checks");
        self.reporter.info(&format!("Catalog: {}", client.base_url()));
        self.reporter
            .start_progress(checks.len() as u64, "Running checks");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let suite = runtime.block_on(run_checks(&client, &checks, &report));
        self.reporter.increment(checks.len() as u64);
        self.reporter.finish();

        self.finish(&suite);
        self.reporter
            .info(&format!("Report written to {}", args.report.display()));
        Self::verdict(&suite)
    }

    /// Run catalog API checks
    #[cfg(not(feature = "api"))]
    pub fn run_api(&mut self, _args: &ApiArgs) -> CliResult<SuiteResults> {
        Err(CliError::feature_disabled("api"))
    }

    fn finish(&self, suite: &SuiteResults) {
        for result in &suite.results {
            self.reporter.result(result);
        }
        self.reporter.summary(suite);
    }

    fn verdict(suite: &SuiteResults) -> CliResult<SuiteResults> {
        if suite.all_passed() {
            Ok(suite.clone())
        } else {
            Err(CliError::SuiteFailed {
                suite: suite.suite_name.clone(),
                failed: suite.failed_count(),
                total: suite.total(),
            })
        }
    }
}
