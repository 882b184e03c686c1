//! Dependency graph construction and topological ordering.
//!
//! This module provides the graph data structure and algorithms behind the
//! bundle order: building a graph from installed package descriptors (with
//! optional whitelist filtering), detecting cycles, and producing the
//! deterministic dependency-first ordering the assembler relies on.

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use sha2::{Digest, Sha256};

use crate::core::{Result, StylepackError};
use crate::manifest::PackageDescriptor;

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Node has not been visited.
    White,
    /// Node is currently being visited (in the DFS stack).
    Gray,
    /// Node has been fully visited.
    Black,
}

/// Directed dependency graph over installed package ids.
///
/// An edge from `a` to `b` means `a` depends on `b`, so `b`'s CSS must appear
/// before `a`'s in the bundle. Nodes are inserted in the order the descriptors
/// were supplied; that insertion order is the deterministic tie-break between
/// packages with no ordering constraint relative to each other.
#[derive(Debug)]
pub struct DependencyGraph {
    /// The underlying directed graph.
    graph: DiGraph<String, ()>,
    /// Map from package ids to their graph indices.
    node_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Build a graph from the installed package set.
    ///
    /// Every declared dependency is validated against the full installed set
    /// first: a reference to a package that is not installed fails with
    /// [`StylepackError::DanglingDependency`], whether or not a whitelist
    /// would later prune it.
    ///
    /// When a non-empty `whitelist` is supplied, only whitelisted packages
    /// become nodes. Edges pointing at packages outside the whitelist are
    /// dropped silently rather than treated as errors, so a whitelist can
    /// carve out any subset of the tree without the caller having to close it
    /// over dependencies. An empty whitelist means no filtering.
    pub fn build(
        packages: &[PackageDescriptor],
        whitelist: Option<&BTreeSet<String>>,
    ) -> Result<Self> {
        let mut installed = HashSet::new();
        for package in packages {
            if !installed.insert(package.id.as_str()) {
                return Err(StylepackError::DuplicatePackage {
                    package: package.id.clone(),
                });
            }
        }
        for package in packages {
            for dependency in &package.dependencies {
                if !installed.contains(dependency.as_str()) {
                    return Err(StylepackError::DanglingDependency {
                        package: package.id.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        let whitelist = whitelist.filter(|w| !w.is_empty());
        let keep = |id: &str| whitelist.is_none_or(|w| w.contains(id));

        let mut graph = Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        };
        for package in packages {
            if !keep(&package.id) {
                tracing::debug!("whitelist pruned package '{}'", package.id);
                continue;
            }
            let from = graph.ensure_node(&package.id);
            for dependency in &package.dependencies {
                if !keep(dependency) {
                    tracing::debug!(
                        "whitelist dropped edge '{}' -> '{}'",
                        package.id,
                        dependency
                    );
                    continue;
                }
                let to = graph.ensure_node(dependency);
                // Duplicate declarations collapse to a single edge
                if !graph.graph.contains_edge(from, to) {
                    graph.graph.add_edge(from, to, ());
                }
            }
        }

        Ok(graph)
    }

    /// Add a node to the graph if it doesn't already exist.
    ///
    /// Returns the node index in the graph.
    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&index) = self.node_map.get(id) {
            index
        } else {
            let index = self.graph.add_node(id.to_string());
            self.node_map.insert(id.to_string(), index);
            index
        }
    }

    /// Detect cycles in the dependency graph using DFS with colors.
    ///
    /// Returns an error containing the cycle path if a cycle is detected.
    pub fn detect_cycles(&self) -> Result<()> {
        let mut colors: HashMap<NodeIndex, Color> = HashMap::new();
        let mut path: Vec<NodeIndex> = Vec::new();

        for node in self.graph.node_indices() {
            colors.insert(node, Color::White);
        }

        for node in self.graph.node_indices() {
            if matches!(colors.get(&node), Some(Color::White))
                && let Some(cycle) = self.dfs_visit(node, &mut colors, &mut path)
            {
                let cycle_str = cycle
                    .iter()
                    .map(|idx| self.graph[*idx].as_str())
                    .collect::<Vec<_>>()
                    .join(" -> ");
                return Err(StylepackError::CircularDependency { cycle: cycle_str });
            }
        }

        Ok(())
    }

    /// DFS visit for cycle detection.
    ///
    /// Returns `Some(cycle_path)` if a cycle is detected, None otherwise.
    fn dfs_visit(
        &self,
        node: NodeIndex,
        colors: &mut HashMap<NodeIndex, Color>,
        path: &mut Vec<NodeIndex>,
    ) -> Option<Vec<NodeIndex>> {
        colors.insert(node, Color::Gray);
        path.push(node);

        for neighbor in self.graph.neighbors(node) {
            match colors.get(&neighbor) {
                Some(Color::Gray) => {
                    // Found a cycle - find where it starts in the path
                    let cycle_start = path.iter().position(|idx| *idx == neighbor)?;
                    let mut cycle = path[cycle_start..].to_vec();
                    // Close the loop so the rendered path reads a -> b -> a
                    cycle.push(neighbor);
                    return Some(cycle);
                }
                Some(Color::White) => {
                    if let Some(cycle) = self.dfs_visit(neighbor, colors, path) {
                        return Some(cycle);
                    }
                }
                _ => {}
            }
        }

        path.pop();
        colors.insert(node, Color::Black);
        None
    }

    /// Get the bundle order for the graph.
    ///
    /// Performs a depth-first traversal with post-order emission: a package is
    /// emitted only after all of its dependencies have been emitted, and each
    /// package is emitted exactly once however many dependents reference it.
    /// Traversal roots are visited in node insertion order, which fixes the
    /// tie-break between independent subgraphs and makes the output
    /// reproducible across runs.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        self.detect_cycles()?;

        let mut visited = HashSet::new();
        let mut order = Vec::with_capacity(self.graph.node_count());
        for node in self.graph.node_indices() {
            self.emit_post_order(node, &mut visited, &mut order);
        }
        Ok(order)
    }

    /// Emit `node` after all of its dependencies.
    fn emit_post_order(
        &self,
        node: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        order: &mut Vec<String>,
    ) {
        if !visited.insert(node) {
            return;
        }
        for dependency in self.graph.neighbors(node) {
            self.emit_post_order(dependency, visited, order);
        }
        order.push(self.graph[node].clone());
    }

    /// Structural fingerprint of the graph: node ids in insertion order plus
    /// each node's outgoing edges. Combined with per-package content
    /// fingerprints, this keys the assembled-output cache.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for node in self.graph.node_indices() {
            hasher.update(self.graph[node].as_bytes());
            hasher.update([0u8]);
            for dependency in self.graph.neighbors(node) {
                hasher.update(self.graph[dependency].as_bytes());
                hasher.update([1u8]);
            }
        }
        hex::encode(hasher.finalize())
    }

    /// Check whether a package survived filtering into the graph.
    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    /// Get the total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the total number of edges (dependencies) in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
