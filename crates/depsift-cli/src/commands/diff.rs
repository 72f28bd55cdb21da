//! `depsift diff`: installed version changes between two lockfiles.

use crate::formatters::formatter_for;
use crate::OutputFormat;
use anyhow::{Context, Result};
use depsift_core::{compute_dependency_versions, diff_dependency_versions, VersionIndex};
use depsift_fs::NativeFileSystem;
use depsift_lockfile::load_lockfile;
use std::path::Path;
use tokio::runtime::Runtime;

pub fn run_diff(base: &Path, target: &Path, format: OutputFormat) -> Result<()> {
    let runtime = Runtime::new().context("Failed to create tokio runtime")?;

    let (previous, current) = runtime.block_on(async {
        let previous = load_versions(base).await?;
        let current = load_versions(target).await?;
        anyhow::Ok((previous, current))
    })?;

    let changes = diff_dependency_versions(&previous, &current);
    formatter_for(format).format_diff(&changes)
}

async fn load_versions(root: &Path) -> Result<VersionIndex> {
    let fs = NativeFileSystem::new(root)
        .with_context(|| format!("Cannot open project {}", root.display()))?;
    let lockfile = load_lockfile(&fs)
        .await
        .with_context(|| format!("Failed to load lockfile from {}", root.display()))?;
    Ok(compute_dependency_versions(&lockfile))
}
