//! package.json reading.

use crate::error::{Error, Result};
use depsift_fs::FileSystem;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// The manifest fields depsift cares about.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    /// Package name.
    #[serde(default)]
    pub name: Option<String>,
    /// Package version.
    #[serde(default)]
    pub version: Option<String>,
    /// `dependencies`.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    /// `devDependencies`.
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
    /// `engines`.
    #[serde(default)]
    pub engines: Engines,
    /// `type` (`"module"` or `"commonjs"`).
    #[serde(default, rename = "type")]
    pub module_type: Option<String>,
    /// `main` entry point.
    #[serde(default)]
    pub main: Option<String>,
    /// `exports` map, kept raw since it may be a string, array or nested object.
    #[serde(default)]
    pub exports: Option<serde_json::Value>,
}

/// The `engines` field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Engines {
    /// Supported Node.js range.
    #[serde(default)]
    pub node: Option<String>,
}

/// Root manifest file name.
pub const PACKAGE_JSON: &str = "package.json";

/// Load the root `package.json`.
///
/// # Errors
///
/// Returns [`Error::MissingInput`] if the file does not exist and
/// [`Error::Json`] if it does not parse.
pub async fn load_root_manifest(fs: &dyn FileSystem) -> Result<PackageJson> {
    let path = Path::new(PACKAGE_JSON);
    if !fs.exists(path).await? {
        return Err(Error::MissingInput {
            artifact: PACKAGE_JSON.to_string(),
            searched: fs.root_dir().to_path_buf(),
        });
    }

    let content = fs.read_to_string(path).await?;
    serde_json::from_str(&content).map_err(|source| Error::Json {
        file: fs.root_dir().join(PACKAGE_JSON),
        source,
    })
}

/// Read an installed package's manifest.
///
/// Manifests that cannot be read, do not parse or have no name are skipped.
pub async fn read_package_json(fs: &dyn FileSystem, path: &Path) -> Option<PackageJson> {
    let content = match fs.read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "skipping unreadable manifest");
            return None;
        }
    };

    match serde_json::from_str::<PackageJson>(&content) {
        Ok(manifest) if manifest.name.as_deref().is_some_and(|n| !n.is_empty()) => Some(manifest),
        Ok(_) => {
            debug!(path = %path.display(), "skipping manifest without a name");
            None
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "skipping malformed manifest");
            None
        }
    }
}
