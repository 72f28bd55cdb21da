//! depsift Core - duplicate dependency detection and report aggregation.
//!
//! This crate turns a project's root manifest and resolved lockfile into a
//! report of stats and messages. It defines:
//!
//! - [`compute_dependency_versions`] and [`detect_duplicates`]: the version
//!   index and the ranked duplicate records built from it
//! - [`attribute_parents`]: direct consumers of every duplicated version
//! - [`classify_module_type`]: CommonJS / ESM / dual classification
//! - [`ReportPlugin`] and [`PluginRunner`]: sequential plugins folded by
//!   [`apply_patch`]
//! - [`report`]: the orchestrator tying the pieces together
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  depsift-cli    │  (User interface)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  depsift-core   │  (This crate - plugins and aggregation)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌─────────────────┐
//! │depsift-lockfile │────▶│   depsift-fs    │
//! └─────────────────┘     └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use depsift_core::{report, ReportOptions};
//!
//! # async fn run() -> depsift_core::Result<()> {
//! let report = report(ReportOptions::new("path/to/project")).await?;
//! println!(
//!     "{} has {} duplicated packages",
//!     report.stats.name,
//!     report.stats.dependency_count.duplicate.unwrap_or(0)
//! );
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod manifest;
pub mod module_type;
pub mod parents;
pub mod plugin;
pub mod plugins;
pub mod report;
pub mod types;
pub mod versions;

pub use config::{ConfigOverrides, ReportConfig, ResolvedConfig};
pub use context::AnalysisContext;
pub use error::{Error, Result};
pub use manifest::{load_root_manifest, read_package_json, PackageJson};
pub use module_type::{classify_module_type, ModuleType};
pub use parents::attribute_parents;
pub use plugin::{apply_patch, PluginRunner, ReportPlugin};
pub use plugins::{
    run_dependency_analysis, run_duplicate_dependency_analysis, DependencyAnalysis,
    DuplicateDependencyAnalysis,
};
pub use report::{open_file_system, report, report_with_fs, ReportOptions};
pub use types::{
    DependencyCount, DependencyCountPatch, Message, PackageInfo, PluginOutput, Report, Severity,
    Stat, StatValue, Stats, StatsPatch,
};
pub use versions::{
    compute_dependency_versions, compute_duplicate_summary, detect_duplicates,
    diff_dependency_versions, DuplicateRecord, DuplicateSummary, VersionChange, VersionIndex,
    VersionUsage,
};
