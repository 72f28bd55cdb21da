//! Report data model: stats, messages and plugin patches.

use crate::manifest::PackageJson;
use crate::module_type::{classify_module_type, ModuleType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a report message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Something is broken.
    Error,
    /// Something is wasteful or risky.
    Warning,
    /// Something could be improved.
    Suggestion,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Suggestion => write!(f, "suggestion"),
        }
    }
}

/// A single finding in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// How serious the finding is.
    pub severity: Severity,
    /// Weight of the finding (0 when unscored).
    pub score: u32,
    /// Human-readable text.
    pub message: String,
    /// Tool or command that can fix the finding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixable_by: Option<String>,
}

impl Message {
    /// Creates an unscored message.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            score: 0,
            message: message.into(),
            fixable_by: None,
        }
    }
}

/// Value of an extra stat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    /// Count or other whole number.
    Integer(u64),
    /// Fractional value.
    Number(f64),
    /// Free-form value.
    Text(String),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Integer(n) => write!(f, "{n}"),
            StatValue::Number(n) => write!(f, "{n}"),
            StatValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<usize> for StatValue {
    fn from(value: usize) -> Self {
        StatValue::Integer(value as u64)
    }
}

impl From<&str> for StatValue {
    fn from(value: &str) -> Self {
        StatValue::Text(value.to_string())
    }
}

/// A named metric contributed by a plugin beyond the core stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    /// Unique key within a report.
    pub name: String,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// The metric.
    pub value: StatValue,
}

impl Stat {
    /// Creates a labeled stat.
    pub fn new(name: impl Into<String>, label: impl Into<String>, value: impl Into<StatValue>) -> Self {
        Self {
            name: name.into(),
            label: Some(label.into()),
            value: value.into(),
        }
    }

    /// Label if present, name otherwise.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Dependency counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyCount {
    /// Direct production dependencies of the root.
    pub production: usize,
    /// Direct development dependencies of the root.
    pub development: usize,
    /// Installed packages shipping CommonJS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cjs: Option<usize>,
    /// Installed packages shipping ES modules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esm: Option<usize>,
    /// Package names resolved to more than one version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<usize>,
}

/// Aggregated report stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Root package name.
    pub name: String,
    /// Root package version.
    pub version: String,
    /// Installed size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_size: Option<u64>,
    /// Dependency counters.
    pub dependency_count: DependencyCount,
    /// Plugin-contributed metrics, unique by name.
    #[serde(default)]
    pub extra_stats: Vec<Stat>,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            name: "unknown".to_string(),
            version: "unknown".to_string(),
            install_size: None,
            dependency_count: DependencyCount {
                production: 0,
                development: 0,
                cjs: Some(0),
                esm: Some(0),
                duplicate: Some(0),
            },
            extra_stats: Vec::new(),
        }
    }
}

/// Partial dependency counters; present keys overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyCountPatch {
    /// New production count.
    pub production: Option<usize>,
    /// New development count.
    pub development: Option<usize>,
    /// New CommonJS count.
    pub cjs: Option<usize>,
    /// New ESM count.
    pub esm: Option<usize>,
    /// New duplicate count.
    pub duplicate: Option<usize>,
}

/// Partial stats returned by a plugin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsPatch {
    /// New root name.
    pub name: Option<String>,
    /// New root version.
    pub version: Option<String>,
    /// New install size.
    pub install_size: Option<u64>,
    /// Counter updates.
    pub dependency_count: Option<DependencyCountPatch>,
    /// Metrics to append (first writer wins per name).
    pub extra_stats: Vec<Stat>,
}

/// What a plugin contributes to the report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginOutput {
    /// Stats patch, if any.
    pub stats: Option<StatsPatch>,
    /// Messages in emission order.
    pub messages: Vec<Message>,
}

/// Identity of the analyzed package, read from its root manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Manifest name, `unknown` when absent.
    pub name: String,
    /// Manifest version, `unknown` when absent.
    pub version: String,
    /// Module format of the package itself.
    #[serde(rename = "type")]
    pub module_type: ModuleType,
}

impl PackageInfo {
    pub fn from_manifest(manifest: &PackageJson) -> Self {
        let or_unknown = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|value| !value.is_empty())
                .unwrap_or("unknown")
                .to_string()
        };

        Self {
            name: or_unknown(&manifest.name),
            version: or_unknown(&manifest.version),
            module_type: classify_module_type(manifest),
        }
    }
}

impl Default for PackageInfo {
    fn default() -> Self {
        Self::from_manifest(&PackageJson::default())
    }
}

/// Final report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// The analyzed package.
    pub info: PackageInfo,
    /// Aggregated stats.
    pub stats: Stats,
    /// Messages from all plugins, in execution order.
    pub messages: Vec<Message>,
}

impl Report {
    /// Messages of one severity.
    pub fn messages_with(&self, severity: Severity) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.severity == severity)
    }
}
