//! Parent attribution for duplicated versions.

use crate::versions::DuplicateRecord;
use depsift_lockfile::{traverse, LockGraph};
use std::collections::HashMap;
use tracing::trace;

/// Record the direct consumers of every duplicated version.
///
/// Walks every edge of `graph` once (cycles included) and appends
/// `"<parent>@<version>"` to the matching [`crate::VersionUsage`] unless it is
/// already listed. Afterwards each record's versions are re-ranked by
/// consumer count descending, ties broken by version.
pub fn attribute_parents(graph: &LockGraph, duplicates: &mut [DuplicateRecord]) {
    let by_name: HashMap<String, usize> = duplicates
        .iter()
        .enumerate()
        .map(|(i, record)| (record.name.clone(), i))
        .collect();

    let stats = traverse(graph, |visit| {
        let Some(parent) = visit.parent else {
            return;
        };
        let Some(&i) = by_name.get(&visit.child.name) else {
            return;
        };
        let Some(usage) = duplicates[i].usage_mut(&visit.child.version) else {
            return;
        };

        let ident = parent.ident();
        if !usage.parents.contains(&ident) {
            usage.parents.push(ident);
        }
    });
    trace!(edges = stats.edges_visited, cycles = stats.back_edges, "attributed parents");

    for record in duplicates.iter_mut() {
        record.versions.sort_by(|a, b| {
            b.parents
                .len()
                .cmp(&a.parents.len())
                .then_with(|| a.version.cmp(&b.version))
        });
    }
}
