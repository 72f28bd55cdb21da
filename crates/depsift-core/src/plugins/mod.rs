//! Built-in report plugins.

mod dependencies;
mod duplicates;

pub use dependencies::{run_dependency_analysis, DependencyAnalysis};
pub use duplicates::{duplicate_message, run_duplicate_dependency_analysis, DuplicateDependencyAnalysis};

use crate::error::{Error, Result};
use crate::plugin::{PluginRunner, ReportPlugin};

/// Names accepted in `[plugins] enabled` and `--plugin`.
pub const PLUGIN_NAMES: [&str; 2] = [DependencyAnalysis::NAME, DuplicateDependencyAnalysis::NAME];

/// Plugins run when nothing is configured.
pub const DEFAULT_PLUGINS: [&str; 2] = PLUGIN_NAMES;

/// Instantiate a built-in plugin.
pub fn plugin_by_name(name: &str) -> Option<Box<dyn ReportPlugin>> {
    match name {
        DependencyAnalysis::NAME => Some(Box::new(DependencyAnalysis)),
        DuplicateDependencyAnalysis::NAME => Some(Box::new(DuplicateDependencyAnalysis)),
        _ => None,
    }
}

/// Build a runner for the given plugin names, in order.
pub fn runner_for(names: &[String]) -> Result<PluginRunner> {
    let mut runner = PluginRunner::new();
    for name in names {
        let plugin = plugin_by_name(name).ok_or_else(|| Error::UnknownPlugin(name.clone()))?;
        runner.register(plugin);
    }
    Ok(runner)
}
