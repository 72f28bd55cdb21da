//! Output formatters for depsift reports.

pub mod human;
pub mod json;

pub use human::HumanFormatter;
pub use json::JsonFormatter;

use crate::OutputFormat;
use anyhow::Result;
use depsift_core::{Report, VersionChange};

/// Trait for printing command results
pub trait Formatter {
    /// Print a project report
    fn format_report(&self, report: &Report) -> Result<()>;

    /// Print lockfile version changes
    fn format_diff(&self, changes: &[VersionChange]) -> Result<()>;
}

impl Formatter for HumanFormatter {
    fn format_report(&self, report: &Report) -> Result<()> {
        print!("{}", human::render_report(report));
        Ok(())
    }

    fn format_diff(&self, changes: &[VersionChange]) -> Result<()> {
        print!("{}", human::render_diff(changes));
        Ok(())
    }
}

impl Formatter for JsonFormatter {
    fn format_report(&self, report: &Report) -> Result<()> {
        println!("{}", json::render_json(report)?);
        Ok(())
    }

    fn format_diff(&self, changes: &[VersionChange]) -> Result<()> {
        println!("{}", json::render_json(changes)?);
        Ok(())
    }
}

pub fn formatter_for(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Human => Box::new(HumanFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
