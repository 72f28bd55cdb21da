//! File system capability for depsift.
//!
//! Analysis code never touches `std::fs` directly. It depends on the
//! [`FileSystem`] trait, which has two implementations:
//!
//! - [`NativeFileSystem`]: an installed project on disk (`node_modules` is
//!   crawled once and cached)
//! - [`MemoryFileSystem`]: files held in memory, typically loaded from an
//!   `npm pack` tarball
//!
//! # Example
//!
//! ```no_run
//! use depsift_fs::{FileSystem, NativeFileSystem};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> std::io::Result<()> {
//! let fs = NativeFileSystem::new(".")?;
//! let manifest = fs.read_to_string(Path::new("package.json")).await?;
//! let installed = fs.list_package_files().await?;
//! println!("{} bytes, {} installed manifests", manifest.len(), installed.len());
//! # Ok(())
//! # }
//! ```

mod file_system;
pub use file_system::{normalize_relative, FileSystem};

#[cfg(feature = "native")]
pub mod native;
#[cfg(feature = "native")]
pub use native::NativeFileSystem;

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "memory")]
pub use memory::MemoryFileSystem;
