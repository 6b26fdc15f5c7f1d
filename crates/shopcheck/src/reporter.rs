//! Append-only text report.
//!
//! Every layer writes human-readable audit lines here, one line per event:
//!
//! ```text
//! 2026-10-19 14:03:22 : Login failed for user 'locked_out_user': Epic sadface: ...
//! ```
//!
//! Appends never fail the caller. A write error is logged through `tracing`
//! and the scenario carries on.

use crate::result::ShopResult;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Timestamp layout of each report line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header written when a run resets the report
pub const REPORT_HEADER: &str = "Test Results:\n\n";

/// Outcome of one scenario or API check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioStatus {
    /// Passed
    Passed,
    /// Failed
    Failed,
    /// Not evaluated (the target gave no usable answer)
    Skipped,
}

impl ScenarioStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::Skipped => "Skipped",
        })
    }
}

/// Format one report line
#[must_use]
pub fn format_line(at: &NaiveDateTime, message: &str) -> String {
    format!("{} : {message}\n", at.format(TIMESTAMP_FORMAT))
}

/// Shared append target for report lines.
///
/// Clones share one lock, so lines from concurrent scenarios never interleave.
#[derive(Debug, Clone, Default)]
pub struct ReportSink {
    path: Option<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl ReportSink {
    /// Report to a file, created on first append
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            lock: Arc::default(),
        }
    }

    /// A sink that drops every line
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Report file path, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append a timestamped line, logging instead of failing on I/O errors
    pub fn append(&self, message: &str) {
        if let Err(e) = self.try_append(message) {
            warn!(error = %e, message, "could not write report line");
        }
    }

    /// Append a timestamped line
    pub fn try_append(&self, message: &str) -> ShopResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let line = format_line(&Local::now().naive_local(), message);
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Truncate the report and write `header`
    pub fn reset(&self, header: &str) -> ShopResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, header)?;
        Ok(())
    }

    /// All lines currently in the report; empty when disabled or not yet written
    pub fn read_lines(&self) -> ShopResult<Vec<String>> {
        let Some(path) = &self.path else {
            return Ok(Vec::new());
        };
        match fs::read_to_string(path) {
            Ok(text) => Ok(text.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether any line contains `needle`
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.read_lines()
            .map(|lines| lines.iter().any(|l| l.contains(needle)))
            .unwrap_or(false)
    }
}
