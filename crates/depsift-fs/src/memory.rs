//! In-memory filesystem, used for packed tarballs and tests.

use crate::{normalize_relative, FileSystem};
use flate2::read::GzDecoder;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// In-memory file system.
///
/// Files are keyed by their normalized root-relative path. Directories are
/// implicit: a directory exists when any file lives below it.
///
/// # Thread Safety
///
/// Uses `Arc<RwLock<HashMap>>` so clones share the same files; writes only
/// happen during setup.
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    root: PathBuf,
    files: Arc<RwLock<HashMap<PathBuf, Vec<u8>>>>,
}

impl MemoryFileSystem {
    /// Create a file system from pre-loaded files.
    ///
    /// `root` is only reported back through [`FileSystem::root_dir`]; file
    /// keys are root-relative.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` if a key climbs above the root.
    pub fn new(root: impl AsRef<Path>, files: HashMap<PathBuf, Vec<u8>>) -> io::Result<Self> {
        let mut normalized = HashMap::with_capacity(files.len());
        for (path, contents) in files {
            normalized.insert(normalize_relative(&path)?, contents);
        }

        Ok(Self {
            root: root.as_ref().to_path_buf(),
            files: Arc::new(RwLock::new(normalized)),
        })
    }

    /// Create an empty file system (useful for testing).
    pub fn empty(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            files: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Load the contents of an `npm pack` tarball (`.tgz`).
    ///
    /// npm prefixes every entry with a single top-level directory
    /// (`package/`), which is stripped so `package/package.json` becomes
    /// `package.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive is not valid gzip/tar data.
    pub fn from_tarball(bytes: &[u8]) -> io::Result<Self> {
        let mut archive = tar::Archive::new(GzDecoder::new(bytes));
        let mut files = HashMap::new();

        for entry in archive.entries()? {
            let mut entry = entry?;
            if !entry.header().entry_type().is_file() {
                continue;
            }

            let entry_path = entry.path()?.into_owned();
            let relative: PathBuf = entry_path.components().skip(1).collect();
            if relative.as_os_str().is_empty() {
                continue;
            }

            let mut contents = Vec::new();
            entry.read_to_end(&mut contents)?;
            files.insert(normalize_relative(&relative)?, contents);
        }

        debug!(files = files.len(), "loaded tarball into memory");

        Ok(Self {
            root: PathBuf::from("/"),
            files: Arc::new(RwLock::new(files)),
        })
    }

    /// Add a file (used during setup).
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> io::Result<()> {
        let normalized = normalize_relative(path.as_ref())?;
        self.files.write().insert(normalized, contents.into());
        Ok(())
    }
}

#[async_trait::async_trait]
impl FileSystem for MemoryFileSystem {
    fn root_dir(&self) -> &Path {
        &self.root
    }

    async fn list_package_files(&self) -> io::Result<Vec<PathBuf>> {
        let files = self.files.read();
        let mut package_files: Vec<PathBuf> = files
            .keys()
            .filter(|path| path.starts_with("node_modules") && path.ends_with("package.json"))
            .cloned()
            .collect();
        package_files.sort();
        Ok(package_files)
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let normalized = normalize_relative(path)?;
        let bytes = self.files.read().get(&normalized).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", normalized.display()),
            )
        })?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    async fn install_size(&self) -> io::Result<u64> {
        Ok(self.files.read().values().map(|c| c.len() as u64).sum())
    }

    async fn exists(&self, path: &Path) -> io::Result<bool> {
        let normalized = normalize_relative(path)?;
        let files = self.files.read();
        Ok(files.contains_key(&normalized) || files.keys().any(|p| p.starts_with(&normalized)))
    }
}
