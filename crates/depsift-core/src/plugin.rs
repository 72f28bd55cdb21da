//! Report plugins and the stats reducer.

use crate::context::AnalysisContext;
use crate::error::{Error, Result};
use crate::types::{PluginOutput, Stats, StatsPatch};
use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// A check that contributes stats and messages to a report.
///
/// Plugins never mutate the context. They return a [`PluginOutput`] which
/// the runner folds into the running stats with [`apply_patch`].
#[async_trait]
pub trait ReportPlugin: Send + Sync + fmt::Debug {
    /// Name used in config files and error messages.
    fn name(&self) -> &str;

    /// Run against the current context.
    async fn run(&self, context: &AnalysisContext) -> Result<PluginOutput>;
}

/// Merge a stats patch.
///
/// Scalars overwrite when present, dependency counters merge key by key,
/// and extra stats append only when their name is not in `seen`.
pub fn apply_patch(stats: &mut Stats, patch: StatsPatch, seen: &mut HashSet<String>) {
    if let Some(name) = patch.name {
        stats.name = name;
    }
    if let Some(version) = patch.version {
        stats.version = version;
    }
    if let Some(install_size) = patch.install_size {
        stats.install_size = Some(install_size);
    }

    if let Some(counts) = patch.dependency_count {
        let target = &mut stats.dependency_count;
        if let Some(production) = counts.production {
            target.production = production;
        }
        if let Some(development) = counts.development {
            target.development = development;
        }
        if counts.cjs.is_some() {
            target.cjs = counts.cjs;
        }
        if counts.esm.is_some() {
            target.esm = counts.esm;
        }
        if counts.duplicate.is_some() {
            target.duplicate = counts.duplicate;
        }
    }

    for stat in patch.extra_stats {
        if seen.insert(stat.name.clone()) {
            stats.extra_stats.push(stat);
        } else {
            debug!(stat = %stat.name, "dropping extra stat already reported");
        }
    }
}

/// Ordered set of plugins.
#[derive(Debug, Default)]
pub struct PluginRunner {
    plugins: Vec<Box<dyn ReportPlugin>>,
}

impl PluginRunner {
    /// Creates an empty runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plugin.
    pub fn register(&mut self, plugin: Box<dyn ReportPlugin>) {
        self.plugins.push(plugin);
    }

    /// Registered plugin names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|plugin| plugin.name())
    }

    /// Run every plugin in order, folding each output into `context`.
    ///
    /// # Errors
    ///
    /// Stops at the first failing plugin and returns [`Error::Plugin`].
    pub async fn run(&self, context: &mut AnalysisContext) -> Result<()> {
        let mut seen: HashSet<String> = context
            .stats
            .extra_stats
            .iter()
            .map(|stat| stat.name.clone())
            .collect();

        for plugin in &self.plugins {
            debug!(plugin = plugin.name(), "running plugin");

            let output = plugin
                .run(context)
                .await
                .map_err(|e| Error::plugin(plugin.name(), e))?;

            debug!(
                plugin = plugin.name(),
                messages = output.messages.len(),
                "plugin finished"
            );

            if let Some(patch) = output.stats {
                apply_patch(&mut context.stats, patch, &mut seen);
            }
            context.messages.extend(output.messages);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DependencyCountPatch, Stat, StatValue};

    #[test]
    fn test_scalars_overwrite() {
        let mut stats = Stats::default();
        let mut seen = HashSet::new();

        apply_patch(
            &mut stats,
            StatsPatch {
                name: Some("app".to_string()),
                install_size: Some(10),
                ..Default::default()
            },
            &mut seen,
        );
        apply_patch(
            &mut stats,
            StatsPatch {
                install_size: Some(20),
                ..Default::default()
            },
            &mut seen,
        );

        assert_eq!(stats.name, "app");
        assert_eq!(stats.version, "unknown");
        assert_eq!(stats.install_size, Some(20));
    }

    #[test]
    fn test_counts_merge_key_by_key() {
        let mut stats = Stats::default();
        let mut seen = HashSet::new();

        apply_patch(
            &mut stats,
            StatsPatch {
                dependency_count: Some(DependencyCountPatch {
                    production: Some(3),
                    cjs: Some(5),
                    ..Default::default()
                }),
                ..Default::default()
            },
            &mut seen,
        );
        apply_patch(
            &mut stats,
            StatsPatch {
                dependency_count: Some(DependencyCountPatch {
                    duplicate: Some(1),
                    ..Default::default()
                }),
                ..Default::default()
            },
            &mut seen,
        );

        let counts = &stats.dependency_count;
        assert_eq!(counts.production, 3);
        assert_eq!(counts.development, 0);
        assert_eq!(counts.cjs, Some(5));
        assert_eq!(counts.esm, Some(0));
        assert_eq!(counts.duplicate, Some(1));
    }

    #[test]
    fn test_extra_stats_first_writer_wins() {
        let mut stats = Stats::default();
        stats.extra_stats.push(Stat::new("preset", "Preset", 1usize));
        let mut seen: HashSet<String> = ["preset".to_string()].into_iter().collect();

        apply_patch(
            &mut stats,
            StatsPatch {
                extra_stats: vec![
                    Stat::new("preset", "Preset", 2usize),
                    Stat::new("size", "Size", 10usize),
                ],
                ..Default::default()
            },
            &mut seen,
        );
        apply_patch(
            &mut stats,
            StatsPatch {
                extra_stats: vec![Stat::new("size", "Size", 99usize)],
                ..Default::default()
            },
            &mut seen,
        );

        assert_eq!(stats.extra_stats.len(), 2);
        assert_eq!(stats.extra_stats[0].value, StatValue::from(1usize));
        assert_eq!(stats.extra_stats[1].value, StatValue::from(10usize));
    }
}
