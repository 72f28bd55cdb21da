//! Version index and duplicate detection.
//!
//! These are pure functions over a [`ParsedLockfile`]: the flat package list
//! is folded into name → versions once, and duplicates are read off that
//! index without looking at the graph. Parent attribution lives in
//! [`crate::parents`].

use depsift_lockfile::ParsedLockfile;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Default number of versions a name may have before it counts as duplicated.
pub const DEFAULT_THRESHOLD: usize = 1;

/// Package name → distinct installed versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionIndex {
    /// Versions per package name.
    pub versions: BTreeMap<String, BTreeSet<String>>,
    /// Root package name, excluded from duplicate detection.
    pub root_name: Option<String>,
}

impl VersionIndex {
    /// Record one installed version.
    pub fn insert(&mut self, name: impl Into<String>, version: impl Into<String>) {
        self.versions
            .entry(name.into())
            .or_default()
            .insert(version.into());
    }

    /// Versions installed for `name`.
    pub fn get(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.versions.get(name)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// True when no package was indexed.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Number of distinct name@version pairs.
    pub fn package_count(&self) -> usize {
        self.versions.values().map(BTreeSet::len).sum()
    }
}

/// Build the version index from the lockfile's flat package list.
///
/// Entries without a name or version are skipped.
pub fn compute_dependency_versions(lockfile: &ParsedLockfile) -> VersionIndex {
    let mut index = VersionIndex::default();

    for package in lockfile.packages() {
        if package.name.is_empty() || package.version.is_empty() {
            continue;
        }
        index.insert(package.name.as_str(), package.version.as_str());
    }

    let root = lockfile.root();
    if !root.name.is_empty() {
        index.root_name = Some(root.name.clone());
    }

    index
}

/// One installed version of a duplicated package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionUsage {
    /// The version.
    pub version: String,
    /// `name@version` of every distinct direct consumer.
    pub parents: Vec<String>,
}

/// A package installed in more versions than the threshold allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRecord {
    /// Package name.
    pub name: String,
    /// Installed versions.
    pub versions: Vec<VersionUsage>,
}

impl DuplicateRecord {
    /// Number of installed versions.
    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    /// Look up a version entry.
    pub fn usage_mut(&mut self, version: &str) -> Option<&mut VersionUsage> {
        self.versions.iter_mut().find(|usage| usage.version == version)
    }
}

/// Names with more than `threshold` (default 1) distinct versions.
///
/// Sorted by version count descending, then name. The root package is never
/// reported. Versions start in lexicographic order with no parents.
pub fn detect_duplicates(index: &VersionIndex, threshold: Option<usize>) -> Vec<DuplicateRecord> {
    let threshold = threshold.unwrap_or(DEFAULT_THRESHOLD);

    let mut duplicates: Vec<DuplicateRecord> = index
        .versions
        .iter()
        .filter(|(name, _)| index.root_name.as_deref() != Some(name.as_str()))
        .filter(|(_, versions)| versions.len() > threshold)
        .map(|(name, versions)| DuplicateRecord {
            name: name.clone(),
            versions: versions
                .iter()
                .map(|version| VersionUsage {
                    version: version.clone(),
                    parents: Vec::new(),
                })
                .collect(),
        })
        .collect();

    duplicates.sort_by(|a, b| {
        b.version_count()
            .cmp(&a.version_count())
            .then_with(|| a.name.cmp(&b.name))
    });

    duplicates
}

/// Duplicate count plus the records behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateSummary {
    /// Number of duplicated names.
    pub duplicate_count: usize,
    /// The duplicates, in detector order.
    pub duplicates: Vec<DuplicateRecord>,
}

/// Index the lockfile and detect duplicates in one step.
pub fn compute_duplicate_summary(
    lockfile: &ParsedLockfile,
    threshold: Option<usize>,
) -> DuplicateSummary {
    let index = compute_dependency_versions(lockfile);
    let duplicates = detect_duplicates(&index, threshold);

    DuplicateSummary {
        duplicate_count: duplicates.len(),
        duplicates,
    }
}

/// A package whose installed versions differ between two indexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionChange {
    /// Package name.
    pub name: String,
    /// Versions before (empty if the package was added).
    pub previous: BTreeSet<String>,
    /// Versions after (empty if the package was removed).
    pub current: BTreeSet<String>,
}

impl VersionChange {
    /// Versions present only after.
    pub fn added(&self) -> impl Iterator<Item = &String> {
        self.current.difference(&self.previous)
    }

    /// Versions present only before.
    pub fn removed(&self) -> impl Iterator<Item = &String> {
        self.previous.difference(&self.current)
    }
}

/// Packages whose version sets differ, sorted by name.
pub fn diff_dependency_versions(previous: &VersionIndex, current: &VersionIndex) -> Vec<VersionChange> {
    let names: BTreeSet<&String> = previous
        .versions
        .keys()
        .chain(current.versions.keys())
        .collect();
    let empty = BTreeSet::new();

    names
        .into_iter()
        .filter_map(|name| {
            let before = previous.versions.get(name).unwrap_or(&empty);
            let after = current.versions.get(name).unwrap_or(&empty);
            (before != after).then(|| VersionChange {
                name: name.clone(),
                previous: before.clone(),
                current: after.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsift_lockfile::{LockGraph, LockfileKind};

    fn lockfile(packages: &[(&str, &str)]) -> ParsedLockfile {
        let mut graph = LockGraph::new("app", "1.0.0");
        for (name, version) in packages {
            graph.add_node(*name, *version);
        }
        ParsedLockfile::from_graph(LockfileKind::Npm, graph)
    }

    fn index(entries: &[(&str, &str)]) -> VersionIndex {
        let mut index = VersionIndex::default();
        for (name, version) in entries {
            index.insert(*name, *version);
        }
        index
    }

    #[test]
    fn test_index_skips_malformed_entries() {
        let lockfile = lockfile(&[("a", "1.0.0"), ("", "1.0.0"), ("b", ""), ("a", "1.0.0")]);
        let index = compute_dependency_versions(&lockfile);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("a").unwrap().len(), 1);
        assert_eq!(index.root_name.as_deref(), Some("app"));
    }

    #[test]
    fn test_duplicate_completeness() {
        let lockfile = lockfile(&[
            ("shared", "1.0.0"),
            ("shared", "2.0.0"),
            ("shared", "1.0.0"),
            ("other", "1.0.0"),
        ]);
        let duplicates = detect_duplicates(&compute_dependency_versions(&lockfile), None);

        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].name, "shared");
        let versions: Vec<_> = duplicates[0].versions.iter().map(|v| v.version.as_str()).collect();
        assert_eq!(versions, vec!["1.0.0", "2.0.0"]);
        assert!(duplicates[0].versions.iter().all(|v| v.parents.is_empty()));
    }

    #[test]
    fn test_root_name_is_never_reported() {
        let lockfile = lockfile(&[("app", "0.9.0"), ("app", "0.8.0")]);
        let summary = compute_duplicate_summary(&lockfile, None);
        assert_eq!(summary.duplicate_count, 0);
    }

    #[test]
    fn test_threshold_and_ordering() {
        let index = index(&[
            ("b", "1"),
            ("b", "2"),
            ("a", "1"),
            ("a", "2"),
            ("c", "1"),
            ("c", "2"),
            ("c", "3"),
            ("d", "1"),
        ]);

        let names: Vec<_> = detect_duplicates(&index, None)
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);

        let names: Vec<_> = detect_duplicates(&index, Some(2))
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["c"]);
    }

    #[test]
    fn test_diff() {
        let before = index(&[("a", "1.0.0"), ("b", "1.0.0"), ("b", "2.0.0"), ("c", "1.0.0")]);
        let after = index(&[("a", "1.0.0"), ("b", "2.0.0"), ("d", "3.0.0")]);

        let changes = diff_dependency_versions(&before, &after);
        let names: Vec<_> = changes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "d"]);

        assert_eq!(changes[0].removed().collect::<Vec<_>>(), vec!["1.0.0"]);
        assert_eq!(changes[0].added().count(), 0);
        assert!(changes[1].current.is_empty());
        assert!(changes[2].previous.is_empty());
    }
}
