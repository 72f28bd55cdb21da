use crate::context::AnalysisContext;
use crate::error::Result;
use crate::parents::attribute_parents;
use crate::plugin::ReportPlugin;
use crate::types::{DependencyCountPatch, Message, PluginOutput, Severity, Stat, StatsPatch};
use crate::versions::{compute_dependency_versions, detect_duplicates, DuplicateRecord};
use async_trait::async_trait;
use std::fmt::Write;
use tracing::debug;

/// Reports packages installed in more than one version.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateDependencyAnalysis;

impl DuplicateDependencyAnalysis {
    /// Registry name.
    pub const NAME: &'static str = "duplicates";
}

#[async_trait]
impl ReportPlugin for DuplicateDependencyAnalysis {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self, context: &AnalysisContext) -> Result<PluginOutput> {
        run_duplicate_dependency_analysis(context).await
    }
}

/// Detect duplicates, attribute their consumers and emit one warning each.
pub async fn run_duplicate_dependency_analysis(context: &AnalysisContext) -> Result<PluginOutput> {
    let config = &context.config;
    let index = compute_dependency_versions(&context.lockfile);

    let mut duplicates: Vec<DuplicateRecord> = detect_duplicates(&index, Some(config.threshold))
        .into_iter()
        .filter(|record| !config.ignore.contains(&record.name))
        .collect();
    attribute_parents(&context.lockfile.graph, &mut duplicates);

    debug!(
        duplicates = duplicates.len(),
        threshold = config.threshold,
        "detected duplicate dependencies"
    );

    let surplus: usize = duplicates
        .iter()
        .map(|record| record.version_count().saturating_sub(1))
        .sum();

    let messages = duplicates
        .iter()
        .map(|record| Message::new(Severity::Warning, duplicate_message(record)))
        .collect();

    Ok(PluginOutput {
        stats: Some(StatsPatch {
            dependency_count: Some(DependencyCountPatch {
                duplicate: Some(duplicates.len()),
                ..Default::default()
            }),
            extra_stats: vec![Stat::new("duplicateVersions", "Duplicate versions", surplus)],
            ..Default::default()
        }),
        messages,
    })
}

/// Render the warning text for one duplicate.
///
/// Expects versions already ranked by consumer count.
pub fn duplicate_message(record: &DuplicateRecord) -> String {
    let mut message = format!(
        "[duplicate dependency] {} has {} installed versions:",
        record.name,
        record.version_count()
    );

    for usage in &record.versions {
        let _ = write!(
            message,
            "\n{} via the following {} package(s) {}",
            usage.version,
            usage.parents.len(),
            usage.parents.join(", ")
        );
    }

    message.push_str("\nSuggestions:");
    if let Some(most_used) = record.versions.first().filter(|usage| usage.parents.len() > 1) {
        let _ = write!(
            message,
            "\n- Consider standardizing on version {} as this version is the most commonly used.",
            most_used.version
        );
    }
    message.push_str(
        "\n- Consider upgrading consuming packages as this may resolve this duplicate version.",
    );

    message
}
