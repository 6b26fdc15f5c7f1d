//! Output formatting and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use shopcheck::{ScenarioResult, ScenarioStatus, SuiteResults};

/// Progress reporter for scenario and check execution
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` scenarios
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    /// Finish and clear the progress bar
    pub fn finish(&mut self) {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_and_clear();
        }
    }

    fn line(&self, symbol: &str, plain: &str, color: &Style, message: &str) {
        let prefix = if self.use_color {
            color.apply_to(symbol).bold().to_string()
        } else {
            plain.to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.line("✓", "PASS", &Style::new().green(), message);
        }
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Failures show even in quiet mode
        self.line("✗", "FAIL", &Style::new().red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            self.line("⚠", "SKIP", &Style::new().yellow(), message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.line("ℹ", "INFO", &Style::new().blue(), message);
        }
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&styled);
    }

    /// Print one scenario or check outcome
    pub fn result(&self, result: &ScenarioResult) {
        let reason = result.error.as_deref().unwrap_or_default();
        match result.status {
            ScenarioStatus::Passed => self.success(&format!(
                "{} ({:.2}s)",
                result.name,
                result.duration.as_secs_f64()
            )),
            ScenarioStatus::Failed => self.failure(&format!("{}: {reason}", result.name)),
            ScenarioStatus::Skipped => self.warning(&format!("{}: {reason}", result.name)),
        }
        if !self.quiet {
            for note in &result.notes {
                let _ = self.term.write_line(&format!("    {note}"));
            }
        }
    }

    /// Print suite summary
    pub fn summary(&self, suite: &SuiteResults) {
        let failed = suite.failed_count();
        if self.quiet && failed == 0 {
            return;
        }

        let passed = suite.passed_count();
        let skipped = suite.skipped_count();
        let total = suite.total();
        let duration_secs = suite.duration.as_secs_f64();
        let name = &suite.suite_name;

        let _ = self.term.write_line("");

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let skipped_style = Style::new().yellow();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };

            let _ = self.term.write_line(&format!(
                "{} {} {} checks in {:.2}s ({} passed, {} failed, {} skipped)",
                status,
                total,
                name,
                duration_secs,
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
                skipped_style.apply_to(skipped)
            ));
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            let _ = self.term.write_line(&format!(
                "{status} {total} {name} checks in {duration_secs:.2}s ({passed} passed, {failed} failed, {skipped} skipped)"
            ));
        }
    }
}
