//! Error types for depsift-lockfile

use crate::graph::LockfileKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using depsift-lockfile Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while locating or parsing a lockfile
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Invalid package-lock.json")]
    Json(#[from] serde_json::Error),

    /// No supported lockfile in the project root
    #[error("No lockfile found in {0}")]
    NotFound(PathBuf),

    /// A lockfile was found but its format has no parser
    #[error("Unsupported lockfile format: {}", .0.file_name())]
    UnsupportedLockfile(LockfileKind),

    /// npm lockfile version without a `packages` map
    #[error("Unsupported package-lock.json version {0} (lockfileVersion 2 or 3 required)")]
    UnsupportedVersion(u8),
}
