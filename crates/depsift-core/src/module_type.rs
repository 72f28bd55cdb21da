//! CommonJS / ESM classification of installed packages.

use crate::manifest::PackageJson;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Module format a package ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleType {
    /// CommonJS only.
    #[serde(rename = "cjs")]
    CommonJs,
    /// ES modules only.
    #[serde(rename = "esm")]
    Module,
    /// Both CommonJS and ES module entry points.
    #[serde(rename = "dual")]
    Dual,
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleType::CommonJs => write!(f, "CommonJS"),
            ModuleType::Module => write!(f, "ESM"),
            ModuleType::Dual => write!(f, "dual CommonJS/ESM"),
        }
    }
}

impl ModuleType {
    /// Counts toward the CJS counter.
    pub fn is_cjs(self) -> bool {
        matches!(self, ModuleType::CommonJs | ModuleType::Dual)
    }

    /// Counts toward the ESM counter.
    pub fn is_esm(self) -> bool {
        matches!(self, ModuleType::Module | ModuleType::Dual)
    }
}

/// Classify a manifest. Falls back to [`ModuleType::CommonJs`] when unsure.
pub fn classify_module_type(manifest: &PackageJson) -> ModuleType {
    let conditions = manifest
        .exports
        .as_ref()
        .map(export_conditions)
        .unwrap_or_default();

    if conditions.contains("require") && conditions.contains("import") {
        return ModuleType::Dual;
    }

    match manifest.module_type.as_deref() {
        Some("module") if manifest.main.is_some() && !conditions.is_empty() => ModuleType::Dual,
        Some("module") => ModuleType::Module,
        _ => ModuleType::CommonJs,
    }
}

/// Condition names used anywhere in an `exports` value.
///
/// Keys starting with `.` are subpaths, everything else is a condition.
fn export_conditions(exports: &Value) -> BTreeSet<&str> {
    let mut conditions = BTreeSet::new();
    let mut pending = vec![exports];

    while let Some(value) = pending.pop() {
        match value {
            Value::Object(map) => {
                for (key, nested) in map {
                    if !key.starts_with('.') {
                        conditions.insert(key.as_str());
                    }
                    pending.push(nested);
                }
            }
            Value::Array(items) => pending.extend(items),
            _ => {}
        }
    }

    conditions
}
