use crate::context::AnalysisContext;
use crate::error::Result;
use crate::manifest::read_package_json;
use crate::module_type::classify_module_type;
use crate::plugin::ReportPlugin;
use crate::types::{DependencyCountPatch, Message, PluginOutput, Severity, Stat, StatsPatch};
use crate::versions::compute_dependency_versions;
use async_trait::async_trait;
use depsift_lockfile::DependencyKind;
use tracing::debug;

/// Root identity, direct dependency counts, install size and module formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyAnalysis;

impl DependencyAnalysis {
    /// Registry name.
    pub const NAME: &'static str = "dependencies";
}

#[async_trait]
impl ReportPlugin for DependencyAnalysis {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self, context: &AnalysisContext) -> Result<PluginOutput> {
        run_dependency_analysis(context).await
    }
}

/// Compute the base stats of a project.
///
/// Name and version come from the lockfile root, falling back to the
/// manifest. Direct dependency counts follow the lockfile root's resolved
/// edges. Every installed manifest is classified; dual packages count as
/// both CommonJS and ESM.
pub async fn run_dependency_analysis(context: &AnalysisContext) -> Result<PluginOutput> {
    let root = context.lockfile.root();
    let name = non_empty(&root.name).or_else(|| context.manifest.name.clone());
    let version = non_empty(&root.version).or_else(|| context.manifest.version.clone());

    let install_size = context.fs.install_size().await?;

    let mut cjs = 0;
    let mut esm = 0;
    let package_files = context.fs.list_package_files().await?;
    for path in &package_files {
        let Some(manifest) = read_package_json(&*context.fs, path).await else {
            continue;
        };
        let module_type = classify_module_type(&manifest);
        if module_type.is_cjs() {
            cjs += 1;
        }
        if module_type.is_esm() {
            esm += 1;
        }
    }
    debug!(manifests = package_files.len(), cjs, esm, "classified installed packages");

    let total_packages = compute_dependency_versions(&context.lockfile).package_count();

    let mut messages = Vec::new();
    if context.manifest.engines.node.is_none() {
        messages.push(Message::new(
            Severity::Suggestion,
            "package.json does not declare engines.node; consider specifying the Node.js versions this package supports",
        ));
    }

    Ok(PluginOutput {
        stats: Some(StatsPatch {
            name,
            version,
            install_size: Some(install_size),
            dependency_count: Some(DependencyCountPatch {
                production: Some(root.dependencies(DependencyKind::Production).count()),
                development: Some(root.dependencies(DependencyKind::Development).count()),
                cjs: Some(cjs),
                esm: Some(esm),
                duplicate: None,
            }),
            extra_stats: vec![Stat::new("totalPackages", "Total packages", total_packages)],
        }),
        messages,
    })
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
