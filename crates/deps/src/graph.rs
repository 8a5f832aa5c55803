use brief_protocol::{DepKind, DependencyEdge};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Directed dependency graph with exact-tuple dedup.
///
/// Nodes are raw strings (source paths and targets); parallel edges of the
/// same kind collapse to one. Insertion order is preserved for rendering.
pub struct DepGraph {
    graph: DiGraph<String, DepKind>,
    node_index: HashMap<String, NodeIndex>,
    seen: HashSet<(NodeIndex, NodeIndex, DepKind)>,
}

impl DepGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_index: HashMap::new(),
            seen: HashSet::new(),
        }
    }

    pub fn from_edges(edges: &[DependencyEdge]) -> Self {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_edge(&edge.source, &edge.target, edge.kind);
        }
        graph
    }

    /// Returns false when the exact `(source, target, kind)` tuple was
    /// already present.
    pub fn add_edge(&mut self, source: &str, target: &str, kind: DepKind) -> bool {
        let from = self.intern(source);
        let to = self.intern(target);
        if !self.seen.insert((from, to, kind)) {
            return false;
        }
        self.graph.add_edge(from, to, kind);
        true
    }

    fn intern(&mut self, name: &str) -> NodeIndex {
        if let Some(idx) = self.node_index.get(name) {
            return *idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_index.insert(name.to_string(), idx);
        idx
    }

    /// Deduplicated edges in first-seen order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, DepKind)> {
        self.graph.edge_indices().filter_map(move |idx| {
            let (from, to) = self.graph.edge_endpoints(idx)?;
            let kind = *self.graph.edge_weight(idx)?;
            Some((
                self.graph[from].as_str(),
                self.graph[to].as_str(),
                kind,
            ))
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }
}

impl Default for DepGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn exact_duplicates_collapse() {
        let mut graph = DepGraph::new();
        assert!(graph.add_edge("a.py", "os", DepKind::Import));
        assert!(!graph.add_edge("a.py", "os", DepKind::Import));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn same_pair_different_kind_is_kept() {
        let mut graph = DepGraph::new();
        graph.add_edge("a.py", "svc", DepKind::Import);
        graph.add_edge("a.py", "svc", DepKind::Call);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn edges_iterate_in_first_seen_order() {
        let edges = vec![
            DependencyEdge::new("b.py", "os", DepKind::Import),
            DependencyEdge::new("a.py", "db:<unknown>", DepKind::Db),
            DependencyEdge::new("b.py", "os", DepKind::Import),
            DependencyEdge::new("a.py", "queue:x", DepKind::Queue),
        ];
        let graph = DepGraph::from_edges(&edges);
        let rendered: Vec<_> = graph
            .edges()
            .map(|(s, t, k)| format!("{s} -> {t} ({})", k.as_str()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                "b.py -> os (import)",
                "a.py -> db:<unknown> (db)",
                "a.py -> queue:x (queue)",
            ]
        );
    }
}
