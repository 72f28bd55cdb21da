//! Lockfile detection and loading

use crate::graph::{LockfileKind, ParsedLockfile};
use crate::npm::NpmLockfileParser;
use crate::{Error, Result};
use depsift_fs::FileSystem;
use std::path::Path;
use tracing::debug;

/// Lockfile names in detection order
pub const SUPPORTED_LOCKFILES: [&str; 4] =
    ["pnpm-lock.yaml", "package-lock.json", "yarn.lock", "bun.lock"];

const KINDS: [LockfileKind; 4] = [
    LockfileKind::Pnpm,
    LockfileKind::Npm,
    LockfileKind::Yarn,
    LockfileKind::Bun,
];

/// Trait for lockfile format parsers
pub trait LockfileParser: Send + Sync {
    /// Format handled by this parser
    fn kind(&self) -> LockfileKind;

    /// Parse lockfile contents into a resolved graph
    fn parse(&self, content: &str) -> Result<ParsedLockfile>;
}

/// Return the first supported lockfile present in the root of `fs`
pub async fn detect_lockfile(fs: &dyn FileSystem) -> Result<Option<LockfileKind>> {
    for kind in KINDS {
        if fs.exists(Path::new(kind.file_name())).await? {
            return Ok(Some(kind));
        }
    }
    Ok(None)
}

fn parser_for(kind: LockfileKind) -> Option<Box<dyn LockfileParser>> {
    match kind {
        LockfileKind::Npm => Some(Box::new(NpmLockfileParser::new())),
        LockfileKind::Pnpm | LockfileKind::Yarn | LockfileKind::Bun => None,
    }
}

/// Detect and parse the project's lockfile
pub async fn load_lockfile(fs: &dyn FileSystem) -> Result<ParsedLockfile> {
    let kind = detect_lockfile(fs)
        .await?
        .ok_or_else(|| Error::NotFound(fs.root_dir().to_path_buf()))?;

    let parser = parser_for(kind).ok_or(Error::UnsupportedLockfile(kind))?;
    debug_assert_eq!(parser.kind(), kind);
    let content = fs.read_to_string(Path::new(kind.file_name())).await?;
    let lockfile = parser.parse(&content)?;

    debug!(
        lockfile = %parser.kind(),
        packages = lockfile.packages.len(),
        "parsed lockfile"
    );
    Ok(lockfile)
}
