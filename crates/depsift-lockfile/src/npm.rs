//! package-lock.json parser (lockfile version 2 and 3)

use crate::detect::LockfileParser;
use crate::graph::{DependencyKind, LockGraph, LockfileKind, NodeId, ParsedLockfile};
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

const NODE_MODULES: &str = "node_modules/";

/// package-lock.json parser (npm v7+)
#[derive(Debug, Clone, Copy)]
pub struct NpmLockfileParser;

impl NpmLockfileParser {
    /// Create a new npm lockfile parser
    pub fn new() -> Self {
        Self
    }
}

impl Default for NpmLockfileParser {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageLock {
    #[serde(default)]
    lockfile_version: u8,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    packages: BTreeMap<String, PackageLockEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageLockEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    resolved: Option<String>,
    #[serde(default)]
    link: bool,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    optional_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    peer_dependencies: BTreeMap<String, String>,
}

impl PackageLockEntry {
    fn declared(&self, kind: DependencyKind) -> &BTreeMap<String, String> {
        match kind {
            DependencyKind::Production => &self.dependencies,
            DependencyKind::Development => &self.dev_dependencies,
            DependencyKind::Optional => &self.optional_dependencies,
            DependencyKind::Peer => &self.peer_dependencies,
        }
    }
}

impl LockfileParser for NpmLockfileParser {
    fn kind(&self) -> LockfileKind {
        LockfileKind::Npm
    }

    fn parse(&self, content: &str) -> Result<ParsedLockfile> {
        let lock: PackageLock = serde_json::from_str(content)?;

        if lock.lockfile_version < 2 && lock.packages.is_empty() {
            return Err(Error::UnsupportedVersion(lock.lockfile_version));
        }

        Ok(build_graph(lock))
    }
}

fn build_graph(lock: PackageLock) -> ParsedLockfile {
    let root_entry = lock.packages.get("");
    let root_name = root_entry
        .and_then(|entry| entry.name.clone())
        .or(lock.name)
        .unwrap_or_default();
    let root_version = root_entry
        .and_then(|entry| entry.version.clone())
        .or(lock.version)
        .unwrap_or_default();

    let mut graph = LockGraph::new(root_name, root_version);
    let mut ids: HashMap<&str, NodeId> = HashMap::new();
    ids.insert("", graph.root());

    for (key, entry) in &lock.packages {
        if key.is_empty() || entry.link {
            continue;
        }
        let name = entry
            .name
            .clone()
            .unwrap_or_else(|| name_from_key(key).to_string());
        let version = entry.version.clone().unwrap_or_default();
        ids.insert(key.as_str(), graph.add_node(name, version));
    }

    // Workspace links point at the entry of the linked directory
    for (key, entry) in &lock.packages {
        if !entry.link {
            continue;
        }
        match entry.resolved.as_deref().and_then(|target| ids.get(target)) {
            Some(&target) => {
                ids.insert(key.as_str(), target);
            }
            None => debug!(key = %key, "link without a resolvable target"),
        }
    }

    for (key, entry) in &lock.packages {
        if entry.link {
            continue;
        }
        let Some(&from) = ids.get(key.as_str()) else {
            continue;
        };
        for kind in DependencyKind::ALL {
            for dependency in entry.declared(kind).keys() {
                match resolve(&ids, key, dependency) {
                    Some(to) => graph.add_edge(from, kind, to),
                    None if matches!(kind, DependencyKind::Optional | DependencyKind::Peer) => {}
                    None => debug!(
                        package = %key,
                        dependency = %dependency,
                        "unresolved {} entry",
                        kind.field_name()
                    ),
                }
            }
        }
    }

    ParsedLockfile::from_graph(LockfileKind::Npm, graph)
}

/// Find the install location npm would pick for `dependency` required from
/// the package at `from_key`, walking up enclosing `node_modules` folders.
fn resolve(ids: &HashMap<&str, NodeId>, from_key: &str, dependency: &str) -> Option<NodeId> {
    let mut key = from_key;
    loop {
        let candidate = if key.is_empty() {
            format!("{NODE_MODULES}{dependency}")
        } else {
            format!("{key}/{NODE_MODULES}{dependency}")
        };
        if let Some(id) = ids.get(candidate.as_str()) {
            return Some(*id);
        }
        if key.is_empty() {
            return None;
        }
        key = parent_key(key);
    }
}

fn parent_key(key: &str) -> &str {
    match key.rfind("/node_modules/") {
        Some(idx) => &key[..idx],
        None => "",
    }
}

fn name_from_key(key: &str) -> &str {
    match key.rfind(NODE_MODULES) {
        Some(idx) => &key[idx + NODE_MODULES.len()..],
        None => key.rsplit('/').next().unwrap_or(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_key() {
        assert_eq!(name_from_key("node_modules/a"), "a");
        assert_eq!(name_from_key("node_modules/@scope/b"), "@scope/b");
        assert_eq!(name_from_key("node_modules/a/node_modules/@s/c"), "@s/c");
        assert_eq!(name_from_key("packages/web"), "web");
    }

    #[test]
    fn test_parent_key() {
        assert_eq!(parent_key("node_modules/a"), "");
        assert_eq!(parent_key("node_modules/a/node_modules/b"), "node_modules/a");
        assert_eq!(parent_key("packages/web"), "");
    }

    #[test]
    fn test_rejects_v1_lockfile() {
        let content = r#"{"name":"app","version":"1.0.0","lockfileVersion":1,"dependencies":{}}"#;
        let err = NpmLockfileParser::new().parse(content).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(1)));
    }

    #[test]
    fn test_nested_install_shadows_hoisted() {
        let content = r#"{
            "name": "app",
            "lockfileVersion": 3,
            "packages": {
                "": { "name": "app", "version": "1.0.0", "dependencies": { "a": "^1", "b": "^1" } },
                "node_modules/a": { "version": "1.0.0", "dependencies": { "shared": "^1" } },
                "node_modules/b": { "version": "1.0.0", "dependencies": { "shared": "^2" } },
                "node_modules/b/node_modules/shared": { "version": "2.0.0" },
                "node_modules/shared": { "version": "1.0.0" }
            }
        }"#;

        let lockfile = NpmLockfileParser::new().parse(content).unwrap();
        let graph = &lockfile.graph;
        let version_of = |parent: &str| {
            let (_, node) = graph.iter().find(|(_, n)| n.name == parent).unwrap();
            let target = node.dependencies(DependencyKind::Production).next().unwrap();
            graph.node(target).version.clone()
        };

        assert_eq!(version_of("a"), "1.0.0");
        assert_eq!(version_of("b"), "2.0.0");
        assert_eq!(lockfile.packages.len(), 4);
    }
}
