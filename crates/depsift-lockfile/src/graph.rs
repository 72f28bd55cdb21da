//! Arena-based model of a resolved dependency graph

use serde::Serialize;
use std::fmt;

/// Opaque index of a node inside a [`LockGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// Kind of dependency edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyKind {
    /// `dependencies`
    Production,
    /// `devDependencies`
    Development,
    /// `optionalDependencies`
    Optional,
    /// `peerDependencies`
    Peer,
}

impl DependencyKind {
    /// All kinds in manifest order
    pub const ALL: [DependencyKind; 4] = [
        DependencyKind::Production,
        DependencyKind::Development,
        DependencyKind::Optional,
        DependencyKind::Peer,
    ];

    /// Manifest field holding dependencies of this kind
    pub fn field_name(self) -> &'static str {
        match self {
            DependencyKind::Production => "dependencies",
            DependencyKind::Development => "devDependencies",
            DependencyKind::Optional => "optionalDependencies",
            DependencyKind::Peer => "peerDependencies",
        }
    }
}

/// Directed edge from a consumer to the package it depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Which manifest field declared the dependency
    pub kind: DependencyKind,
    /// The resolved dependency
    pub target: NodeId,
}

/// A resolved package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockNode {
    /// Package name (empty if the lockfile entry had none)
    pub name: String,
    /// Resolved version (empty if the lockfile entry had none)
    pub version: String,
    /// Outgoing edges in declaration order
    pub edges: Vec<Edge>,
}

impl LockNode {
    /// `"<name>@<version>"` identifier
    pub fn ident(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    /// Resolved dependencies of one kind
    pub fn dependencies(&self, kind: DependencyKind) -> impl Iterator<Item = NodeId> + '_ {
        self.edges
            .iter()
            .filter(move |edge| edge.kind == kind)
            .map(|edge| edge.target)
    }
}

/// Resolved dependency graph stored as a node arena.
///
/// A package consumed by several parents is a single node with several
/// incoming edges. Cycles are representable; use [`crate::traverse`] to walk
/// the graph safely.
#[derive(Debug, Clone)]
pub struct LockGraph {
    nodes: Vec<LockNode>,
    root: NodeId,
}

impl LockGraph {
    /// Create a graph holding only the root package
    pub fn new(root_name: impl Into<String>, root_version: impl Into<String>) -> Self {
        Self {
            nodes: vec![LockNode {
                name: root_name.into(),
                version: root_version.into(),
                edges: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    /// The root package
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Add a package and return its id
    pub fn add_node(&mut self, name: impl Into<String>, version: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(LockNode {
            name: name.into(),
            version: version.into(),
            edges: Vec::new(),
        });
        id
    }

    /// Record that `from` depends on `to`
    ///
    /// # Panics
    ///
    /// Panics if `from` does not belong to this graph.
    pub fn add_edge(&mut self, from: NodeId, kind: DependencyKind, to: NodeId) {
        self.nodes[from.0].edges.push(Edge { kind, target: to });
    }

    /// Look up a node
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph.
    pub fn node(&self, id: NodeId) -> &LockNode {
        &self.nodes[id.0]
    }

    /// Look up a node, returning `None` for foreign ids
    pub fn get(&self, id: NodeId) -> Option<&LockNode> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a graph has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every node with its id
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &LockNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }
}

/// Lockfile formats known to the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LockfileKind {
    /// `package-lock.json`
    Npm,
    /// `pnpm-lock.yaml`
    Pnpm,
    /// `yarn.lock`
    Yarn,
    /// `bun.lock`
    Bun,
}

impl LockfileKind {
    /// File name in the project root
    pub fn file_name(self) -> &'static str {
        match self {
            LockfileKind::Npm => "package-lock.json",
            LockfileKind::Pnpm => "pnpm-lock.yaml",
            LockfileKind::Yarn => "yarn.lock",
            LockfileKind::Bun => "bun.lock",
        }
    }
}

impl fmt::Display for LockfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// A parsed lockfile: the resolved graph plus every resolved package.
///
/// `packages` may contain nodes that are unreachable from the root (for
/// example extraneous installs).
#[derive(Debug, Clone)]
pub struct ParsedLockfile {
    /// Format the lockfile was read from
    pub kind: LockfileKind,
    /// Resolved graph
    pub graph: LockGraph,
    /// Flat enumeration of resolved packages, root excluded
    pub packages: Vec<NodeId>,
}

impl ParsedLockfile {
    /// Wrap a graph, listing every non-root node as a resolved package
    pub fn from_graph(kind: LockfileKind, graph: LockGraph) -> Self {
        let root = graph.root();
        let packages = graph
            .iter()
            .map(|(id, _)| id)
            .filter(|id| *id != root)
            .collect();
        Self {
            kind,
            graph,
            packages,
        }
    }

    /// The root package
    pub fn root(&self) -> &LockNode {
        self.graph.node(self.graph.root())
    }

    /// Iterate over the flat package list
    pub fn packages(&self) -> impl Iterator<Item = &LockNode> {
        self.packages.iter().filter_map(|id| self.graph.get(*id))
    }
}
