//! Report orchestration.

use crate::config::{ConfigOverrides, ReportConfig};
use crate::context::AnalysisContext;
use crate::error::{Error, Result};
use crate::manifest::load_root_manifest;
use crate::plugins::runner_for;
use crate::types::{PackageInfo, Report};
use depsift_fs::{FileSystem, MemoryFileSystem, NativeFileSystem};
use depsift_lockfile::{load_lockfile, SUPPORTED_LOCKFILES};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Inputs of a report run.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Project directory or `npm pack` tarball.
    pub root: PathBuf,
    /// Duplicate threshold override.
    pub threshold: Option<usize>,
    /// Plugins to run instead of the configured ones.
    pub plugins: Vec<String>,
    /// Config file to use instead of `<root>/depsift.toml`.
    pub config_path: Option<PathBuf>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            threshold: None,
            plugins: Vec::new(),
            config_path: None,
        }
    }
}

impl ReportOptions {
    /// Options for analyzing `root` with defaults everywhere else.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            threshold: self.threshold,
            plugins: self.plugins.clone(),
        }
    }
}

/// True for `.tgz` / `.tar.gz` paths.
pub fn is_tarball(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    name.ends_with(".tgz") || name.ends_with(".tar.gz")
}

/// Open the file system for a directory or tarball.
pub async fn open_file_system(path: &Path) -> Result<Arc<dyn FileSystem>> {
    if is_tarball(path) {
        let bytes = tokio::fs::read(path).await?;
        return Ok(Arc::new(MemoryFileSystem::from_tarball(&bytes)?));
    }
    Ok(Arc::new(NativeFileSystem::new(path)?))
}

/// Analyze a project and return the aggregated report.
///
/// # Errors
///
/// Fails if the manifest or lockfile is missing, the config is invalid, or
/// any plugin fails. No partial report is returned.
pub async fn report(options: ReportOptions) -> Result<Report> {
    let fs = open_file_system(&options.root).await?;
    report_with_fs(fs, &options).await
}

/// Like [`report`], over an already opened file system.
pub async fn report_with_fs(fs: Arc<dyn FileSystem>, options: &ReportOptions) -> Result<Report> {
    let manifest = load_root_manifest(&*fs).await?;

    let lockfile = load_lockfile(&*fs).await.map_err(|e| match e {
        depsift_lockfile::Error::NotFound(searched) => Error::MissingInput {
            artifact: format!("lockfile ({})", SUPPORTED_LOCKFILES.join(", ")),
            searched,
        },
        other => Error::Lockfile(other),
    })?;

    let config = ReportConfig::load(&*fs, options.config_path.as_deref())
        .await?
        .resolve(&options.overrides())?;
    let runner = runner_for(&config.plugins)?;

    info!(
        root = %fs.root_dir().display(),
        lockfile = %lockfile.kind,
        plugins = ?config.plugins,
        "building report"
    );

    let info = PackageInfo::from_manifest(&manifest);
    let mut context = AnalysisContext::new(fs, manifest, lockfile, config);
    runner.run(&mut context).await?;

    Ok(Report {
        info,
        stats: context.stats,
        messages: context.messages,
    })
}
