//! # depsift-lockfile
//!
//! Resolved dependency graph model for depsift.
//!
//! This crate provides:
//! - [`LockGraph`]: an arena of resolved packages connected by typed edges
//! - [`ParsedLockfile`]: the graph plus the flat list of every resolved package
//! - [`traverse`]: a depth-first edge walk that terminates on cyclic graphs
//! - [`load_lockfile`]: lockfile detection and `package-lock.json` parsing
//!
//! ## Example
//!
//! ```rust
//! use depsift_lockfile::{traverse, DependencyKind, LockGraph};
//!
//! let mut graph = LockGraph::new("app", "1.0.0");
//! let a = graph.add_node("a", "1.0.0");
//! let b = graph.add_node("b", "1.0.0");
//! graph.add_edge(graph.root(), DependencyKind::Production, a);
//! graph.add_edge(a, DependencyKind::Production, b);
//! graph.add_edge(b, DependencyKind::Production, a);
//!
//! let mut seen = 0;
//! let stats = traverse(&graph, |_visit| seen += 1);
//! assert_eq!(stats.edges_visited, 3);
//! assert_eq!(seen, 4); // the root plus one call per edge
//! ```

#![warn(missing_docs)]

pub mod detect;
pub mod error;
pub mod graph;
pub mod npm;
pub mod traverse;

pub use detect::{detect_lockfile, load_lockfile, LockfileParser, SUPPORTED_LOCKFILES};
pub use error::{Error, Result};
pub use graph::{DependencyKind, Edge, LockGraph, LockNode, LockfileKind, NodeId, ParsedLockfile};
pub use npm::NpmLockfileParser;
pub use traverse::{traverse, TraversalStats, Visit};
