//! Directed graph of module references.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::model::{ModuleSummary, ModuleType};

/// One module in a dependency-graph view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    /// Modules this one references that exist.
    pub references: Vec<ModuleSummary>,
}

/// Every module reachable from a root, keyed by id.
pub type DependencyGraph = BTreeMap<String, GraphNode>;

/// The reference graph: an edge goes from the referencing module to the
/// referenced one.
///
/// Nodes exist for known modules and for dangling targets; only known
/// modules carry a summary.
pub struct ReferenceGraph {
    graph: DiGraph<String, ()>,
    node_indices: FxHashMap<String, NodeIndex>,
    summaries: FxHashMap<String, ModuleSummary>,
}

impl ReferenceGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: FxHashMap::default(),
            summaries: FxHashMap::default(),
        }
    }

    /// Build from known modules and their deduplicated outgoing edges.
    pub fn build<'a>(
        modules: impl IntoIterator<Item = (ModuleSummary, &'a BTreeSet<String>)>,
    ) -> Self {
        let mut graph = Self::new();
        let mut edges = Vec::new();

        for (summary, targets) in modules {
            let id = summary.id.clone();
            graph.add_module(summary);
            edges.extend(targets.iter().map(|t| (id.clone(), t.clone())));
        }

        for (source, target) in edges {
            graph.add_reference(&source, &target);
        }

        graph
    }

    fn node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.node_indices.insert(id.to_string(), idx);
        idx
    }

    /// Register a known module.
    pub fn add_module(&mut self, summary: ModuleSummary) {
        self.node(&summary.id);
        self.summaries.insert(summary.id.clone(), summary);
    }

    /// Add a `source → target` edge unless it already exists.
    pub fn add_reference(&mut self, source: &str, target: &str) {
        let from = self.node(source);
        let to = self.node(target);
        if self.graph.find_edge(from, to).is_none() {
            self.graph.add_edge(from, to, ());
        }
    }

    /// Whether `id` is a known module (not just a dangling target).
    pub fn contains(&self, id: &str) -> bool {
        self.summaries.contains_key(id)
    }

    /// Summary of a known module.
    pub fn summary(&self, id: &str) -> Option<&ModuleSummary> {
        self.summaries.get(id)
    }

    fn sorted_neighbors(&self, id: &str, direction: Direction) -> Vec<String> {
        let mut ids: Vec<String> = self
            .node_indices
            .get(id)
            .map(|&idx| {
                self.graph
                    .neighbors_directed(idx, direction)
                    .map(|n| self.graph[n].clone())
                    .collect()
            })
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Ids directly referenced by `id`, including dangling targets.
    pub fn dependencies(&self, id: &str) -> Vec<String> {
        self.sorted_neighbors(id, Direction::Outgoing)
    }

    /// Ids of modules that reference `id`.
    pub fn dependents(&self, id: &str) -> Vec<String> {
        self.sorted_neighbors(id, Direction::Incoming)
    }

    /// Every known module reachable from `root` (inclusive), sorted.
    ///
    /// Traversal stops at dangling targets and terminates on cycles.
    pub fn reachable_from(&self, root: &str) -> Vec<String> {
        let Some(&start) = self.node_indices.get(root) else {
            return Vec::new();
        };
        if !self.contains(root) {
            return Vec::new();
        }

        let mut reached = Vec::new();
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(idx) = dfs.next(&self.graph) {
            let id = &self.graph[idx];
            if self.contains(id) {
                reached.push(id.clone());
            }
        }
        reached.sort();
        reached
    }

    /// The dependency-graph view rooted at `root`.
    ///
    /// Returns `None` if `root` is not a known module.
    pub fn dependency_graph(&self, root: &str) -> Option<DependencyGraph> {
        if !self.contains(root) {
            return None;
        }

        let graph = self
            .reachable_from(root)
            .into_iter()
            .filter_map(|id| {
                let summary = self.summaries.get(&id)?;
                let references = self
                    .dependencies(&id)
                    .iter()
                    .filter_map(|dep| self.summaries.get(dep).cloned())
                    .collect();
                Some((
                    id,
                    GraphNode {
                        id: summary.id.clone(),
                        title: summary.title.clone(),
                        module_type: summary.module_type,
                        references,
                    },
                ))
            })
            .collect();

        Some(graph)
    }

    /// Number of nodes, dangling targets included.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for ReferenceGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> ModuleSummary {
        ModuleSummary {
            id: id.to_string(),
            title: id.to_uppercase(),
            module_type: ModuleType::Explanation,
        }
    }

    fn graph(edges: &[(&str, &[&str])]) -> ReferenceGraph {
        let targets: Vec<(ModuleSummary, BTreeSet<String>)> = edges
            .iter()
            .map(|(id, to)| (summary(id), to.iter().map(|t| t.to_string()).collect()))
            .collect();
        ReferenceGraph::build(targets.iter().map(|(s, t)| (s.clone(), t)))
    }

    #[test]
    fn test_dependencies_and_dependents() {
        let g = graph(&[("a", &["b", "c"]), ("b", &["c"]), ("c", &[])]);
        assert_eq!(g.dependencies("a"), vec!["b", "c"]);
        assert_eq!(g.dependents("c"), vec!["a", "b"]);
        assert!(g.dependents("a").is_empty());
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let mut g = graph(&[("a", &["b"]), ("b", &[])]);
        g.add_reference("a", "b");
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_dangling_target_is_node_but_not_module() {
        let g = graph(&[("a", &["ghost"])]);
        assert_eq!(g.node_count(), 2);
        assert!(!g.contains("ghost"));
        assert_eq!(g.dependencies("a"), vec!["ghost"]);
        assert_eq!(g.reachable_from("a"), vec!["a"]);
    }

    #[test]
    fn test_dependency_graph_terminates_on_cycle() {
        let g = graph(&[("a", &["b"]), ("b", &["a", "c"]), ("c", &[]), ("z", &[])]);
        let view = g.dependency_graph("a").unwrap();
        assert_eq!(view.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        let b = &view["b"];
        assert_eq!(b.title, "B");
        let refs: Vec<_> = b.references.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(refs, vec!["a", "c"]);
    }

    #[test]
    fn test_dependency_graph_unknown_root() {
        let g = graph(&[("a", &["ghost"])]);
        assert!(g.dependency_graph("ghost").is_none());
        assert!(g.dependency_graph("nope").is_none());
    }

    #[test]
    fn test_view_skips_dangling_references() {
        let g = graph(&[("a", &["ghost", "b"]), ("b", &[])]);
        let view = g.dependency_graph("a").unwrap();
        let refs: Vec<_> = view["a"].references.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(refs, vec!["b"]);
    }
}
