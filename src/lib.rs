/// Represents a directed multigraph with adjacency matrix and vertex labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    /// Number of vertices
    pub n: usize,
    /// Adjacency matrix: adj[i][j] = number of edges from vertex i to vertex j
    pub adj: Vec<Vec<usize>>,
    /// Vertex labels, all zero unless given explicitly
    pub labels: Vec<usize>,
}

impl Graph {
    pub fn new(n: usize) -> Self {
        Graph {
            n,
            adj: vec![vec![0; n]; n],
            labels: vec![0; n],
        }
    }

    pub fn from_adjacency_matrix(adj: Vec<Vec<usize>>) -> Self {
        let n = adj.len();
        Graph {
            n,
            adj,
            labels: vec![0; n],
        }
    }

    /// Build a graph from `(u, v)` pairs; repeated pairs raise the multiplicity.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut g = Graph::new(n);
        for &(u, v) in edges {
            g.add_edge(u, v);
        }
        g
    }

    /// Replace the vertex labels. Panics if the length does not match.
    pub fn with_labels(mut self, labels: Vec<usize>) -> Self {
        assert_eq!(labels.len(), self.n, "one label per vertex");
        self.labels = labels;
        self
    }

    pub fn num_vertices(&self) -> usize {
        self.n
    }

    pub fn get_edge(&self, u: usize, v: usize) -> usize {
        self.adj[u][v]
    }

    pub fn add_edge(&mut self, u: usize, v: usize) {
        self.adj[u][v] += 1;
    }

    pub fn label(&self, v: usize) -> usize {
        self.labels[v]
    }

    /// Number of ordered vertex pairs joined by at least one edge
    pub fn edge_count(&self) -> usize {
        self.adj
            .iter()
            .map(|row| row.iter().filter(|&&m| m > 0).count())
            .sum()
    }
}

// Module declarations
pub mod comparator;
pub mod config;
pub mod generator;
pub mod mapping;
pub mod ordering;
pub mod parser;
pub mod search;
pub mod state;

pub use comparator::{AlwaysEqual, Equivalence, ExactMatch};
pub use config::MatchOptions;
pub use mapping::GraphMapping;
pub use ordering::GraphOrdering;
pub use search::SubgraphInspector;
pub use state::{StateError, SubState, NULL_NODE};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_creation() {
        let g = Graph::new(3);
        assert_eq!(g.num_vertices(), 3);
        assert_eq!(g.get_edge(0, 0), 0);
        assert_eq!(g.labels, vec![0, 0, 0]);
    }

    #[test]
    fn test_from_edges_counts_multiplicity() {
        let g = Graph::from_edges(3, &[(0, 1), (0, 1), (1, 2)]);
        assert_eq!(g.get_edge(0, 1), 2);
        assert_eq!(g.get_edge(1, 2), 1);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_parse_simple_graph() {
        let input = "2\n0 1\n0 0\n\n2\n0 1\n0 0\n";
        let result = parser::parse_two_graphs(input);
        assert!(result.is_ok());
    }

    #[test]
    fn test_find_mappings() {
        let host = Graph::from_adjacency_matrix(vec![vec![0, 1, 0], vec![0, 0, 1], vec![1, 0, 0]]);
        let pattern = Graph::from_adjacency_matrix(vec![vec![0, 1], vec![0, 0]]);
        let inspector = SubgraphInspector::new(&host, &pattern, AlwaysEqual, AlwaysEqual);
        assert_eq!(inspector.mappings().count(), 3);
    }

    #[test]
    #[should_panic(expected = "one label per vertex")]
    fn test_with_labels_rejects_wrong_length() {
        let _ = Graph::new(2).with_labels(vec![1]);
    }
}
