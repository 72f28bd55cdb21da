//! Per-run analysis state.

use crate::config::ResolvedConfig;
use crate::manifest::PackageJson;
use crate::types::{Message, Stats};
use depsift_fs::FileSystem;
use depsift_lockfile::ParsedLockfile;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a plugin can look at.
///
/// Created once per report and owned by the orchestrator. Plugins see it
/// through a shared reference; only the [`crate::PluginRunner`] writes to
/// `stats` and `messages`.
#[derive(Debug)]
pub struct AnalysisContext {
    /// Project files.
    pub fs: Arc<dyn FileSystem>,
    /// Project root as reported by `fs`.
    pub root: PathBuf,
    /// Root `package.json`.
    pub manifest: PackageJson,
    /// Parsed lockfile.
    pub lockfile: ParsedLockfile,
    /// Effective configuration.
    pub config: ResolvedConfig,
    /// Stats accumulated so far.
    pub stats: Stats,
    /// Messages accumulated so far.
    pub messages: Vec<Message>,
}

impl AnalysisContext {
    /// Create a context with default stats and no messages.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        manifest: PackageJson,
        lockfile: ParsedLockfile,
        config: ResolvedConfig,
    ) -> Self {
        let root = fs.root_dir().to_path_buf();
        Self {
            fs,
            root,
            manifest,
            lockfile,
            config,
            stats: Stats::default(),
            messages: Vec::new(),
        }
    }
}
