//! Default command: analyze one project and print the report.

use crate::formatters::formatter_for;
use crate::OutputFormat;
use anyhow::{Context, Result};
use depsift_core::{report, ReportOptions};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::debug;

/// Options collected from the command line.
#[derive(Debug, Clone)]
pub struct ReportRunOptions {
    pub path: PathBuf,
    pub threshold: Option<usize>,
    pub plugins: Vec<String>,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
}

pub fn run_report(options: &ReportRunOptions) -> Result<()> {
    let runtime = Runtime::new().context("Failed to create tokio runtime")?;

    let report_options = ReportOptions {
        root: options.path.clone(),
        threshold: options.threshold,
        plugins: options.plugins.clone(),
        config_path: options.config.clone(),
    };
    debug!(?report_options, "starting report");

    let report = runtime
        .block_on(report(report_options))
        .with_context(|| format!("Failed to analyze {}", options.path.display()))?;

    formatter_for(options.format).format_report(&report)
}
