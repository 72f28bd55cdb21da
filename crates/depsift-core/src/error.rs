//! Error types for depsift core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for depsift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a report.
#[derive(Debug, Error)]
pub enum Error {
    /// A required input (root manifest or lockfile) is missing.
    #[error("No {artifact} found in {}", searched.display())]
    MissingInput {
        /// What was looked for (e.g. `package.json`).
        artifact: String,
        /// Directory that was searched.
        searched: PathBuf,
    },

    /// A plugin failed; the run was aborted.
    #[error("Plugin {plugin} failed")]
    Plugin {
        /// Name of the failing plugin.
        plugin: String,
        /// The plugin's error.
        #[source]
        source: Box<Error>,
    },

    /// Plugin name that no registered plugin answers to.
    #[error("Unknown plugin: {0} (expected one of: {known})", known = crate::plugins::PLUGIN_NAMES.join(", "))]
    UnknownPlugin(String),

    /// Configuration file is invalid.
    #[error("Invalid configuration in {}", file.display())]
    Config {
        /// Path to the TOML file with the error.
        file: PathBuf,
        /// The underlying TOML parsing error.
        #[source]
        source: toml::de::Error,
    },

    /// JSON parsing error (package.json).
    #[error("JSON parse error in {}", file.display())]
    Json {
        /// Path to the JSON file with the error.
        file: PathBuf,
        /// The underlying JSON parsing error.
        #[source]
        source: serde_json::Error,
    },

    /// Lockfile could not be loaded.
    #[error(transparent)]
    Lockfile(#[from] depsift_lockfile::Error),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap an error raised by the named plugin.
    pub fn plugin(plugin: impl Into<String>, source: Error) -> Self {
        Error::Plugin {
            plugin: plugin.into(),
            source: Box::new(source),
        }
    }
}
