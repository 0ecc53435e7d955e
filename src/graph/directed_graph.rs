//! Directed, unweighted graph keyed by package name, built on petgraph.
//!
//! Every mutation is total: empty names, missing vertices, duplicate vertices
//! and duplicate edges are absorbed as no-ops instead of errors, so callers can
//! mutate the graph without pre-checking membership.

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// A directed graph of named vertices.
///
/// Vertices are identified purely by their name. Edges are directed and
/// carry no weight; at most one edge exists per ordered `(from, to)` pair.
/// The graph uses petgraph's `StableDiGraph` internally so that removing a
/// vertex leaves every other vertex's index untouched.
///
/// # Example
///
/// ```rust
/// use pkgorder::graph::DirectedGraph;
///
/// let mut graph = DirectedGraph::new();
/// graph.add_edge("libc", "openssl");
/// graph.add_edge("openssl", "curl");
/// graph.add_edge("libc", "openssl"); // duplicate, ignored
///
/// assert_eq!(graph.order(), 3);
/// assert_eq!(graph.size(), 2);
/// assert_eq!(graph.successors_of("libc"), vec!["openssl"]);
/// ```
#[derive(Debug, Clone)]
pub struct DirectedGraph {
    /// The underlying directed graph
    graph: StableDiGraph<String, ()>,
    /// Maps vertex names to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
}

impl Default for DirectedGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectedGraph {
    /// Creates a new empty graph.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pkgorder::graph::DirectedGraph;
    ///
    /// let graph = DirectedGraph::new();
    /// assert_eq!(graph.order(), 0);
    /// assert_eq!(graph.size(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            node_indices: HashMap::new(),
        }
    }

    /// Adds a vertex with an empty successor list.
    ///
    /// Does nothing if `name` is empty or the vertex already exists.
    pub fn add_vertex(&mut self, name: &str) {
        self.ensure_vertex(name);
    }

    /// Removes a vertex and every edge that starts or ends at it.
    ///
    /// Does nothing if the vertex is absent.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pkgorder::graph::DirectedGraph;
    ///
    /// let mut graph = DirectedGraph::new();
    /// graph.add_edge("a", "b");
    /// graph.add_edge("b", "c");
    /// graph.remove_vertex("b");
    ///
    /// assert_eq!(graph.order(), 2);
    /// assert_eq!(graph.size(), 0);
    /// assert!(graph.successors_of("a").is_empty());
    /// ```
    pub fn remove_vertex(&mut self, name: &str) {
        let Some(idx) = self.node_indices.remove(name) else {
            return;
        };
        // StableGraph drops the incident edges together with the node.
        self.graph.remove_node(idx);
    }

    /// Adds the directed edge `from -> to`.
    ///
    /// Missing endpoints are created first. Does nothing if either name is
    /// empty or the edge already exists.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        if from.is_empty() || to.is_empty() {
            return;
        }
        let (Some(from_idx), Some(to_idx)) = (self.ensure_vertex(from), self.ensure_vertex(to))
        else {
            return;
        };

        if self.graph.contains_edge(from_idx, to_idx) {
            return;
        }
        self.graph.add_edge(from_idx, to_idx, ());
    }

    /// Removes the directed edge `from -> to` if both vertices and the edge exist.
    pub fn remove_edge(&mut self, from: &str, to: &str) {
        let (Some(&from_idx), Some(&to_idx)) =
            (self.node_indices.get(from), self.node_indices.get(to))
        else {
            return;
        };

        if let Some(edge) = self.graph.find_edge(from_idx, to_idx) {
            self.graph.remove_edge(edge);
        }
    }

    /// Returns the names of all vertices.
    pub fn all_vertices(&self) -> HashSet<&str> {
        self.node_indices.keys().map(String::as_str).collect()
    }

    /// Iterates over all vertex names in index order.
    pub fn vertices(&self) -> impl Iterator<Item = &str> {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.graph.node_weight(idx))
            .map(String::as_str)
    }

    /// Returns the direct successors of `name` in the order their edges were added.
    ///
    /// Returns an empty vector if the vertex is absent.
    pub fn successors_of(&self, name: &str) -> Vec<&str> {
        self.neighbor_names(name, Direction::Outgoing)
    }

    /// Returns the direct predecessors of `name`, i.e. every vertex with an
    /// edge pointing at `name`.
    ///
    /// Returns an empty vector if the vertex is absent.
    pub fn predecessors_of(&self, name: &str) -> Vec<&str> {
        self.neighbor_names(name, Direction::Incoming)
    }

    /// Returns true if a vertex named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.node_indices.contains_key(name)
    }

    /// Returns true if the edge `from -> to` exists.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_indices.get(from), self.node_indices.get(to)) {
            (Some(&from_idx), Some(&to_idx)) => self.graph.contains_edge(from_idx, to_idx),
            _ => false,
        }
    }

    /// Returns the number of vertices.
    pub fn order(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn size(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true if the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Checks whether the graph contains any cycle at all.
    pub fn is_cyclic(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Returns true if following successor edges from `start` leads back to `start`.
    ///
    /// Cycles that `start` cannot reach are not reported. Absent vertices
    /// never have a cycle.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pkgorder::graph::DirectedGraph;
    ///
    /// let mut graph = DirectedGraph::new();
    /// graph.add_edge("a", "b");
    /// graph.add_edge("b", "a");
    /// graph.add_vertex("c");
    ///
    /// assert!(graph.cycle_exists_at("a"));
    /// assert!(!graph.cycle_exists_at("c"));
    /// ```
    pub fn cycle_exists_at(&self, start: &str) -> bool {
        self.cycle_at(start).is_some()
    }

    /// Finds a cycle through `start` with a breadth-first search over successors.
    ///
    /// Each vertex is visited at most once. The returned path begins at
    /// `start` and its last vertex has an edge back to `start`.
    pub fn cycle_at(&self, start: &str) -> Option<CycleInfo> {
        let &start_idx = self.node_indices.get(start)?;

        let mut parents: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut visited = HashSet::from([start_idx]);
        let mut queue = VecDeque::from([start_idx]);

        while let Some(current) = queue.pop_front() {
            for next in self.neighbor_indices(current, Direction::Outgoing) {
                if next == start_idx {
                    return Some(self.trace_back(start_idx, current, &parents));
                }
                if visited.insert(next) {
                    parents.insert(next, current);
                    queue.push_back(next);
                }
            }
        }

        None
    }

    /// Detects every cycle in the graph.
    ///
    /// Uses Tarjan's algorithm to find strongly connected components; a
    /// component is a cycle if it has more than one vertex or a self loop.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pkgorder::graph::DirectedGraph;
    ///
    /// let mut graph = DirectedGraph::new();
    /// graph.add_edge("a", "b");
    /// graph.add_edge("b", "c");
    /// graph.add_edge("c", "a");
    /// graph.add_edge("a", "d");
    ///
    /// let cycles = graph.cycles();
    /// assert_eq!(cycles.len(), 1);
    /// assert_eq!(cycles[0].len(), 3);
    /// ```
    pub fn cycles(&self) -> Vec<CycleInfo> {
        let mut cycles = Vec::new();

        for scc in tarjan_scc(&self.graph) {
            let is_cycle = match scc.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            };
            if !is_cycle {
                continue;
            }

            let nodes = scc
                .iter()
                .filter_map(|&idx| self.graph.node_weight(idx))
                .cloned()
                .collect();
            cycles.push(CycleInfo { nodes });
        }

        cycles
    }

    /// Returns the index for `name`, inserting a new vertex when needed.
    fn ensure_vertex(&mut self, name: &str) -> Option<NodeIndex> {
        if name.is_empty() {
            return None;
        }
        if let Some(&idx) = self.node_indices.get(name) {
            return Some(idx);
        }

        let idx = self.graph.add_node(name.to_string());
        self.node_indices.insert(name.to_string(), idx);
        Some(idx)
    }

    fn neighbor_names(&self, name: &str, direction: Direction) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(name) else {
            return Vec::new();
        };

        self.neighbor_indices(idx, direction)
            .into_iter()
            .filter_map(|n| self.graph.node_weight(n))
            .map(String::as_str)
            .collect()
    }

    /// Neighbors in edge-insertion order. petgraph walks its adjacency lists
    /// newest first, so the walk is reversed.
    fn neighbor_indices(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        neighbors.reverse();
        neighbors
    }

    fn trace_back(
        &self,
        start: NodeIndex,
        last: NodeIndex,
        parents: &HashMap<NodeIndex, NodeIndex>,
    ) -> CycleInfo {
        let mut path = vec![last];
        let mut current = last;
        while current != start {
            match parents.get(&current) {
                Some(&parent) => {
                    path.push(parent);
                    current = parent;
                }
                None => break,
            }
        }
        path.reverse();

        CycleInfo {
            nodes: path
                .into_iter()
                .filter_map(|idx| self.graph.node_weight(idx))
                .cloned()
                .collect(),
        }
    }
}

impl fmt::Display for DirectedGraph {
    /// Writes one line per vertex: `name -> succ1, succ2` or `name -> (none)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.vertices() {
            let successors = self.successors_of(name);
            if successors.is_empty() {
                writeln!(f, "{} -> (none)", name)?;
            } else {
                writeln!(f, "{} -> {}", name, successors.join(", "))?;
            }
        }
        Ok(())
    }
}

/// Information about a detected cycle.
///
/// Contains the names of the vertices that form the cycle.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CycleInfo {
    /// The vertex names in the cycle (the last connects back to the first)
    pub nodes: Vec<String>,
}

impl CycleInfo {
    /// Returns a formatted string representation of the cycle path.
    ///
    /// For example: "a -> b -> c -> a"
    pub fn cycle_path(&self) -> String {
        let Some(first) = self.nodes.first() else {
            return String::new();
        };
        format!("{} -> {}", self.nodes.join(" -> "), first)
    }

    /// Returns true if `name` is part of the cycle.
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n == name)
    }

    /// Returns the number of vertices in the cycle.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the cycle is empty (should not happen in practice).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl fmt::Display for CycleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cycle_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(set: HashSet<&str>) -> Vec<&str> {
        let mut names: Vec<&str> = set.into_iter().collect();
        names.sort_unstable();
        names
    }

    #[test]
    fn test_create_empty_graph() {
        let graph = DirectedGraph::new();
        assert_eq!(graph.order(), 0);
        assert_eq!(graph.size(), 0);
        assert!(graph.is_empty());
        assert!(graph.all_vertices().is_empty());
    }

    #[test]
    fn test_add_vertex() {
        let mut graph = DirectedGraph::new();
        graph.add_vertex("a");
        graph.add_vertex("b");

        assert_eq!(graph.order(), 2);
        assert!(graph.contains("a"));
        assert!(graph.successors_of("a").is_empty());
    }

    #[test]
    fn test_add_vertex_twice_is_idempotent() {
        let mut graph = DirectedGraph::new();
        graph.add_vertex("a");
        graph.add_edge("a", "b");
        graph.add_vertex("a");

        assert_eq!(graph.order(), 2);
        assert_eq!(graph.size(), 1);
        assert_eq!(graph.successors_of("a"), vec!["b"]);
    }

    #[test]
    fn test_empty_names_are_ignored() {
        let mut graph = DirectedGraph::new();
        graph.add_vertex("");
        graph.add_edge("", "a");
        graph.add_edge("a", "");
        graph.remove_vertex("");
        graph.remove_edge("", "a");

        assert_eq!(graph.order(), 0);
        assert_eq!(graph.size(), 0);
    }

    #[test]
    fn test_add_edge_creates_missing_vertices() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "b");

        assert_eq!(graph.order(), 2);
        assert_eq!(graph.size(), 1);
        assert!(graph.has_edge("a", "b"));
        assert!(!graph.has_edge("b", "a"));
    }

    #[test]
    fn test_add_edge_twice_is_idempotent() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("a", "b");

        assert_eq!(graph.size(), 1);
        assert_eq!(graph.successors_of("a"), vec!["b"]);
    }

    #[test]
    fn test_successors_keep_insertion_order() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "d");
        graph.add_edge("a", "b");
        graph.add_edge("a", "c");

        assert_eq!(graph.successors_of("a"), vec!["d", "b", "c"]);
        assert!(graph.successors_of("missing").is_empty());
    }

    #[test]
    fn test_predecessors_of() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "c");
        graph.add_edge("b", "c");
        graph.add_edge("c", "d");

        assert_eq!(graph.predecessors_of("c"), vec!["a", "b"]);
        assert!(graph.predecessors_of("a").is_empty());
        assert!(graph.predecessors_of("missing").is_empty());
    }

    #[test]
    fn test_remove_edge() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("a", "c");
        graph.remove_edge("a", "b");

        assert_eq!(graph.size(), 1);
        assert_eq!(graph.successors_of("a"), vec!["c"]);
        assert_eq!(graph.order(), 3);
    }

    #[test]
    fn test_remove_missing_edge_is_noop() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "b");
        graph.remove_edge("b", "a");
        graph.remove_edge("a", "missing");
        graph.remove_edge("missing", "a");

        assert_eq!(graph.size(), 1);
        assert_eq!(graph.order(), 2);
    }

    #[test]
    fn test_remove_vertex_drops_incident_edges() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("c", "b");
        graph.add_edge("b", "d");
        graph.add_edge("b", "e");
        graph.add_edge("a", "d");
        assert_eq!(graph.size(), 5);

        graph.remove_vertex("b");

        assert_eq!(graph.order(), 4);
        assert_eq!(graph.size(), 1);
        assert!(!graph.contains("b"));
        for name in graph.vertices() {
            assert!(!graph.successors_of(name).contains(&"b"));
        }
        assert_eq!(graph.successors_of("a"), vec!["d"]);
    }

    #[test]
    fn test_remove_missing_vertex_is_noop() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "b");
        graph.remove_vertex("missing");

        assert_eq!(graph.order(), 2);
        assert_eq!(graph.size(), 1);
    }

    #[test]
    fn test_counts_after_mixed_mutations() {
        let mut graph = DirectedGraph::new();
        for name in ["a", "b", "c", "d"] {
            graph.add_vertex(name);
        }
        graph.add_edge("a", "b");
        graph.add_edge("b", "c");
        graph.add_edge("c", "d");
        graph.add_edge("d", "a");
        graph.remove_vertex("c");
        graph.add_vertex("e");
        graph.add_edge("e", "a");

        assert_eq!(graph.order(), 4);
        assert_eq!(graph.size(), 3);
        assert_eq!(sorted(graph.all_vertices()), vec!["a", "b", "d", "e"]);
    }

    #[test]
    fn test_vertex_can_be_readded_after_removal() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "b");
        graph.remove_vertex("a");
        graph.add_vertex("a");

        assert_eq!(graph.order(), 2);
        assert_eq!(graph.size(), 0);
        assert!(graph.successors_of("a").is_empty());
    }

    #[test]
    fn test_cycle_exists_at() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("b", "a");
        graph.add_vertex("c");

        assert!(graph.cycle_exists_at("a"));
        assert!(graph.cycle_exists_at("b"));
        assert!(!graph.cycle_exists_at("c"));
        assert!(!graph.cycle_exists_at("missing"));
    }

    #[test]
    fn test_cycle_unreachable_from_start_is_not_reported() {
        let mut graph = DirectedGraph::new();
        // d feeds into the a <-> b cycle but the cycle never returns to d
        graph.add_edge("d", "a");
        graph.add_edge("a", "b");
        graph.add_edge("b", "a");

        assert!(!graph.cycle_exists_at("d"));
        assert!(graph.cycle_exists_at("a"));
    }

    #[test]
    fn test_cycle_at_returns_path() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("b", "c");
        graph.add_edge("c", "a");

        let cycle = graph.cycle_at("a").unwrap();
        assert_eq!(cycle.nodes, vec!["a", "b", "c"]);
        assert_eq!(cycle.cycle_path(), "a -> b -> c -> a");
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "a");

        let cycle = graph.cycle_at("a").unwrap();
        assert_eq!(cycle.nodes, vec!["a"]);
        assert!(graph.is_cyclic());
        assert_eq!(graph.cycles().len(), 1);
    }

    #[test]
    fn test_is_cyclic() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("b", "c");
        assert!(!graph.is_cyclic());

        graph.add_edge("c", "a");
        assert!(graph.is_cyclic());
    }

    #[test]
    fn test_multiple_cycles() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("b", "a");
        graph.add_edge("x", "y");
        graph.add_edge("y", "z");
        graph.add_edge("z", "x");
        graph.add_edge("b", "x");
        graph.add_vertex("alone");

        let cycles = graph.cycles();
        assert_eq!(cycles.len(), 2);
        assert!(cycles.iter().any(|c| c.len() == 2 && c.contains("a")));
        assert!(cycles.iter().any(|c| c.len() == 3 && c.contains("z")));
        assert!(!cycles.iter().any(|c| c.contains("alone")));
    }

    #[test]
    fn test_cycle_info_empty() {
        let cycle = CycleInfo { nodes: Vec::new() };
        assert!(cycle.is_empty());
        assert_eq!(cycle.cycle_path(), "");
    }

    #[test]
    fn test_display_lists_successors() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("a", "c");

        let dump = graph.to_string();
        assert!(dump.contains("a -> b, c\n"));
        assert!(dump.contains("b -> (none)\n"));
        assert!(dump.contains("c -> (none)\n"));
    }
}
