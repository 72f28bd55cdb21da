//! Project configuration (`depsift.toml`).

use crate::error::{Error, Result};
use crate::plugins::{DEFAULT_PLUGINS, PLUGIN_NAMES};
use crate::versions::DEFAULT_THRESHOLD;
use depsift_fs::{FileSystem, NativeFileSystem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the analyzed root.
pub const CONFIG_FILE: &str = "depsift.toml";

/// Contents of `depsift.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// `[duplicates]` table.
    pub duplicates: DuplicatesConfig,
    /// `[plugins]` table.
    pub plugins: PluginsConfig,
}

/// Duplicate detection settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DuplicatesConfig {
    /// More than this many versions is a duplicate.
    pub threshold: Option<usize>,
    /// Package names never reported.
    pub ignore: Vec<String>,
}

/// Plugin selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginsConfig {
    /// Plugins to run, in order.
    pub enabled: Option<Vec<String>>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--threshold`.
    pub threshold: Option<usize>,
    /// `--plugin` (empty means "use the file or defaults").
    pub plugins: Vec<String>,
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Duplicate threshold.
    pub threshold: usize,
    /// Names excluded from duplicate reporting.
    pub ignore: BTreeSet<String>,
    /// Plugin names in execution order.
    pub plugins: Vec<String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            ignore: BTreeSet::new(),
            plugins: DEFAULT_PLUGINS.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl ReportConfig {
    /// Parse TOML text; `file` is only used for error reporting.
    pub fn parse(content: &str, file: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| Error::Config {
            file: file.to_path_buf(),
            source,
        })
    }

    /// Load the config for a project.
    ///
    /// An explicit path must exist. Without one, `depsift.toml` in the root
    /// of `fs` is used when present and defaults otherwise.
    pub async fn load(fs: &dyn FileSystem, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path).await;
        }

        let path = Path::new(CONFIG_FILE);
        if !fs.exists(path).await? {
            debug!(root = %fs.root_dir().display(), "no depsift.toml, using defaults");
            return Ok(Self::default());
        }

        let content = fs.read_to_string(path).await?;
        Self::parse(&content, &fs.root_dir().join(CONFIG_FILE))
    }

    /// Load config from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let config_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = path.file_name().map(PathBuf::from).ok_or_else(|| Error::MissingInput {
            artifact: path.display().to_string(),
            searched: config_dir.clone(),
        })?;

        let fs = NativeFileSystem::new(&config_dir)?;
        if !fs.exists(&file_name).await? {
            return Err(Error::MissingInput {
                artifact: file_name.display().to_string(),
                searched: config_dir,
            });
        }

        let content = fs.read_to_string(&file_name).await?;
        Self::parse(&content, path)
    }

    /// Apply overrides and validate plugin names.
    pub fn resolve(&self, overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
        let plugins = if !overrides.plugins.is_empty() {
            overrides.plugins.clone()
        } else if let Some(enabled) = &self.plugins.enabled {
            enabled.clone()
        } else {
            ResolvedConfig::default().plugins
        };

        if let Some(unknown) = plugins.iter().find(|name| !PLUGIN_NAMES.contains(&name.as_str())) {
            return Err(Error::UnknownPlugin(unknown.clone()));
        }

        Ok(ResolvedConfig {
            threshold: overrides
                .threshold
                .or(self.duplicates.threshold)
                .unwrap_or(DEFAULT_THRESHOLD),
            ignore: self.duplicates.ignore.iter().cloned().collect(),
            plugins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsift_fs::MemoryFileSystem;

    #[test]
    fn test_parse_full_config() {
        let config = ReportConfig::parse(
            r#"
            [duplicates]
            threshold = 2
            ignore = ["tslib"]

            [plugins]
            enabled = ["duplicates"]
            "#,
            Path::new("depsift.toml"),
        )
        .unwrap();

        let resolved = config.resolve(&ConfigOverrides::default()).unwrap();
        assert_eq!(resolved.threshold, 2);
        assert!(resolved.ignore.contains("tslib"));
        assert_eq!(resolved.plugins, vec!["duplicates"]);
    }

    #[test]
    fn test_overrides_win() {
        let config = ReportConfig::parse("[duplicates]\nthreshold = 3\n", Path::new("x")).unwrap();
        let resolved = config
            .resolve(&ConfigOverrides {
                threshold: Some(1),
                plugins: vec!["dependencies".to_string()],
            })
            .unwrap();
        assert_eq!(resolved.threshold, 1);
        assert_eq!(resolved.plugins, vec!["dependencies"]);
    }

    #[test]
    fn test_defaults() {
        let resolved = ReportConfig::default()
            .resolve(&ConfigOverrides::default())
            .unwrap();
        assert_eq!(resolved, ResolvedConfig::default());
        assert_eq!(resolved.plugins, vec!["dependencies", "duplicates"]);
    }

    #[test]
    fn test_unknown_plugin() {
        let err = ReportConfig::default()
            .resolve(&ConfigOverrides {
                threshold: None,
                plugins: vec!["publint".to_string()],
            })
            .unwrap_err();
        assert!(matches!(err, Error::UnknownPlugin(ref name) if name == "publint"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = ReportConfig::parse("[duplicates]\nthreshold = \"many\"\n", Path::new("depsift.toml"))
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let err = ReportConfig::parse("[unknown]\n", Path::new("depsift.toml")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[tokio::test]
    async fn test_load_from_project_root() {
        let fs = MemoryFileSystem::empty("/project");
        assert_eq!(ReportConfig::load(&fs, None).await.unwrap(), ReportConfig::default());

        fs.add_file(CONFIG_FILE, "[duplicates]\nignore = [\"a\"]\n").unwrap();
        let config = ReportConfig::load(&fs, None).await.unwrap();
        assert_eq!(config.duplicates.ignore, vec!["a"]);
    }

    #[tokio::test]
    async fn test_load_explicit_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(&path, "[duplicates]\nthreshold = 4\n").unwrap();

        let fs = MemoryFileSystem::empty("/project");
        let config = ReportConfig::load(&fs, Some(&path)).await.unwrap();
        assert_eq!(config.duplicates.threshold, Some(4));

        let missing = temp_dir.path().join("missing.toml");
        assert!(matches!(
            ReportConfig::load(&fs, Some(&missing)).await.unwrap_err(),
            Error::MissingInput { .. }
        ));
    }
}
