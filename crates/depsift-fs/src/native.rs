//! Native filesystem implementation using std::fs + tokio.

use crate::{normalize_relative, FileSystem};
use ignore::WalkBuilder;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;
use tokio::task;
use tracing::debug;

/// Result of walking `node_modules` once.
#[derive(Debug, Clone, Default)]
struct CrawlResult {
    package_files: Vec<PathBuf>,
    install_size: u64,
}

/// On-disk project tree.
///
/// Blocking `std::fs` calls are wrapped with `tokio::task::spawn_blocking`.
/// The `node_modules` walk backs both [`FileSystem::list_package_files`] and
/// [`FileSystem::install_size`], so it runs at most once per instance.
#[derive(Debug)]
pub struct NativeFileSystem {
    project_root: PathBuf,
    canonical_root: PathBuf,
    crawl: OnceCell<CrawlResult>,
}

impl NativeFileSystem {
    /// Create a file system scoped to a project root.
    ///
    /// # Errors
    ///
    /// Returns an error if the root doesn't exist or can't be canonicalized.
    pub fn new(project_root: impl AsRef<Path>) -> io::Result<Self> {
        let project_root = project_root.as_ref().to_path_buf();
        let canonical_root = project_root.canonicalize().map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("Project root does not exist: {}", project_root.display()),
            )
        })?;

        Ok(Self {
            project_root,
            canonical_root,
            crawl: OnceCell::new(),
        })
    }

    /// Resolve a root-relative path and make sure it stays inside the root.
    ///
    /// Existing paths are canonicalized so symlinks pointing out of the
    /// project are rejected.
    fn validate_path(&self, path: &Path) -> io::Result<PathBuf> {
        let relative = normalize_relative(path)?;
        let absolute = self.canonical_root.join(relative);

        let resolved = match absolute.canonicalize() {
            Ok(canonical) => canonical,
            // Doesn't exist yet; `normalize_relative` already rejected `..`
            Err(_) => return Ok(absolute),
        };

        if !resolved.starts_with(&self.canonical_root) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!(
                    "Path traversal detected: {} is outside project root {}",
                    resolved.display(),
                    self.project_root.display()
                ),
            ));
        }

        Ok(resolved)
    }

    async fn crawl(&self) -> io::Result<&CrawlResult> {
        self.crawl
            .get_or_try_init(|| async {
                let root = self.canonical_root.clone();
                task::spawn_blocking(move || crawl_node_modules(&root))
                    .await
                    .map_err(io::Error::other)?
            })
            .await
    }
}

#[async_trait::async_trait]
impl FileSystem for NativeFileSystem {
    fn root_dir(&self) -> &Path {
        &self.project_root
    }

    async fn list_package_files(&self) -> io::Result<Vec<PathBuf>> {
        Ok(self.crawl().await?.package_files.clone())
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let validated = self.validate_path(path)?;
        task::spawn_blocking(move || std::fs::read_to_string(&validated))
            .await
            .map_err(io::Error::other)?
    }

    async fn install_size(&self) -> io::Result<u64> {
        Ok(self.crawl().await?.install_size)
    }

    async fn exists(&self, path: &Path) -> io::Result<bool> {
        let validated = self.validate_path(path)?;
        task::spawn_blocking(move || Ok(validated.exists()))
            .await
            .map_err(io::Error::other)?
    }
}

/// Walk `node_modules`, collecting manifests and summing file sizes.
///
/// Symlinks are followed (pnpm and workspace links), hidden entries such as
/// `.bin` are included and ignore files are not consulted, since
/// `node_modules` is almost always git-ignored.
fn crawl_node_modules(root: &Path) -> io::Result<CrawlResult> {
    let node_modules = root.join("node_modules");
    let mut result = CrawlResult::default();

    if !node_modules.is_dir() {
        debug!(root = %root.display(), "no node_modules directory found");
        return Ok(result);
    }

    let walker = WalkBuilder::new(&node_modules)
        .standard_filters(false)
        .follow_links(true)
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(error = %err, "skipping unreadable node_modules entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        match entry.metadata() {
            Ok(meta) => result.install_size += meta.len(),
            Err(err) => debug!(path = %entry.path().display(), error = %err, "error getting file stats"),
        }

        if entry.file_name() == "package.json" {
            if let Ok(relative) = entry.path().strip_prefix(root) {
                result.package_files.push(relative.to_path_buf());
            }
        }
    }

    result.package_files.sort();
    debug!(
        manifests = result.package_files.len(),
        bytes = result.install_size,
        "crawled node_modules"
    );

    Ok(result)
}
