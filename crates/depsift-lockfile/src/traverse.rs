//! Depth-first edge traversal with an explicit cycle guard.
//!
//! The walk is iterative: a stack of frames holds the current root-to-node
//! path, and an expanded set keyed by [`NodeId`] ensures each node's edges
//! are followed at most once. Every edge is therefore reported exactly once
//! and a cycle such as `a -> b -> a` terminates without relying on call-stack
//! depth.

use crate::graph::{DependencyKind, LockGraph, LockNode, NodeId};
use tracing::trace;

/// One visitor call.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    /// The node reached
    pub child: &'a LockNode,
    /// Id of the node reached
    pub child_id: NodeId,
    /// The consumer, `None` for the root
    pub parent: Option<&'a LockNode>,
    /// Edge kind, `None` for the root
    pub kind: Option<DependencyKind>,
    /// Root-to-parent path (empty for the root)
    pub path: &'a [NodeId],
}

/// Counters describing a finished traversal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Nodes whose edges were followed
    pub nodes_expanded: usize,
    /// Edges reported to the visitor
    pub edges_visited: usize,
    /// Edges pointing back into the current path (cycles)
    pub back_edges: usize,
}

struct Frame {
    node: NodeId,
    next_edge: usize,
}

/// Walk every edge reachable from the root.
///
/// The visitor is called once for the root (with no parent) and then once
/// per edge, in depth-first declaration order.
pub fn traverse<F>(graph: &LockGraph, mut visitor: F) -> TraversalStats
where
    F: FnMut(&Visit<'_>),
{
    let mut stats = TraversalStats::default();
    let mut expanded = vec![false; graph.len()];
    let root = graph.root();

    visitor(&Visit {
        child: graph.node(root),
        child_id: root,
        parent: None,
        kind: None,
        path: &[],
    });

    expanded[root.index()] = true;
    stats.nodes_expanded += 1;

    let mut stack = vec![Frame {
        node: root,
        next_edge: 0,
    }];
    let mut path = vec![root];

    while let Some(frame) = stack.last_mut() {
        let parent_id = frame.node;
        let parent = graph.node(parent_id);

        let Some(edge) = parent.edges.get(frame.next_edge).copied() else {
            stack.pop();
            path.pop();
            continue;
        };
        frame.next_edge += 1;

        let Some(child) = graph.get(edge.target) else {
            continue;
        };

        visitor(&Visit {
            child,
            child_id: edge.target,
            parent: Some(parent),
            kind: Some(edge.kind),
            path: &path,
        });
        stats.edges_visited += 1;

        if expanded[edge.target.index()] {
            if path.contains(&edge.target) {
                trace!(from = %parent.ident(), to = %child.ident(), "cycle edge not descended");
                stats.back_edges += 1;
            }
            continue;
        }

        expanded[edge.target.index()] = true;
        stats.nodes_expanded += 1;
        stack.push(Frame {
            node: edge.target,
            next_edge: 0,
        });
        path.push(edge.target);
    }

    stats
}
