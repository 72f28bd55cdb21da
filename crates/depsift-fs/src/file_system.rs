//! FileSystem trait shared by the on-disk and in-memory implementations.

use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Capability set the analysis engine needs from a package tree.
///
/// All paths are relative to [`FileSystem::root_dir`]. A leading `/` is
/// accepted and refers to the root, so `"/package.json"` and
/// `"package.json"` are the same file.
///
/// # Design Decisions
///
/// ## Async
///
/// Methods are async so the native implementation can offload blocking
/// `std::fs` work with `tokio::task::spawn_blocking`, while the in-memory
/// implementation completes immediately.
///
/// ## Error Handling
///
/// Uses `std::io::Result<T>`:
/// - `NotFound` for missing files
/// - `InvalidData` for non UTF-8 contents
/// - `PermissionDenied` for paths escaping the root
#[async_trait::async_trait]
pub trait FileSystem: Send + Sync + fmt::Debug {
    /// Root directory every other path is resolved against.
    fn root_dir(&self) -> &Path;

    /// List every installed `package.json` below `node_modules`.
    ///
    /// Returned paths are root-relative and sorted.
    async fn list_package_files(&self) -> io::Result<Vec<PathBuf>>;

    /// Read a file as UTF-8.
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Aggregate size in bytes of the installed tree.
    ///
    /// For an on-disk project this is the size of `node_modules`; for a
    /// tarball it is the size of the packed files.
    async fn install_size(&self) -> io::Result<u64>;

    /// Check whether a file or directory exists.
    async fn exists(&self, path: &Path) -> io::Result<bool>;
}

/// Normalize a root-relative path.
///
/// Strips root and `.` components and resolves `..` syntactically.
///
/// # Errors
///
/// Returns `PermissionDenied` if the path climbs above the root.
pub fn normalize_relative(path: &Path) -> io::Result<PathBuf> {
    let mut components: Vec<&std::ffi::OsStr> = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => components.clear(),
            Component::CurDir => {}
            Component::ParentDir => {
                if components.pop().is_none() {
                    return Err(io::Error::new(
                        io::ErrorKind::PermissionDenied,
                        format!("Path escapes the project root: {}", path.display()),
                    ));
                }
            }
            Component::Normal(name) => components.push(name),
        }
    }

    Ok(components.into_iter().collect())
}
