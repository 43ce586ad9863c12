use crate::Graph;

/// Pre-indexed view of a [`Graph`] consumed by the search state.
///
/// Vertices are addressed by a dense index `0..n`. With [`GraphOrdering::new`]
/// the index equals the vertex id; [`GraphOrdering::by_degree`] puts the
/// highest-degree vertices first. Neighbor lists are sorted and hold every
/// neighbor once regardless of edge multiplicity.
#[derive(Debug, Clone)]
pub struct GraphOrdering<'g> {
    graph: &'g Graph,
    /// index -> original vertex id
    order: Vec<usize>,
    /// original vertex id -> index
    position: Vec<usize>,
    in_edges: Vec<Vec<usize>>,
    out_edges: Vec<Vec<usize>>,
}

impl<'g> GraphOrdering<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self::with_order(graph, (0..graph.num_vertices()).collect())
    }

    /// Order vertices by descending total degree, ties by vertex id.
    pub fn by_degree(graph: &'g Graph) -> Self {
        let n = graph.num_vertices();
        let degree = |v: usize| -> usize {
            (0..n)
                .filter(|&u| graph.get_edge(v, u) > 0)
                .count()
                + (0..n).filter(|&u| graph.get_edge(u, v) > 0).count()
        };
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&v| (std::cmp::Reverse(degree(v)), v));
        Self::with_order(graph, order)
    }

    fn with_order(graph: &'g Graph, order: Vec<usize>) -> Self {
        let n = graph.num_vertices();
        let mut position = vec![0; n];
        for (idx, &v) in order.iter().enumerate() {
            position[v] = idx;
        }

        let mut in_edges = vec![Vec::new(); n];
        let mut out_edges = vec![Vec::new(); n];
        for (i, &u) in order.iter().enumerate() {
            for (j, &v) in order.iter().enumerate() {
                if graph.get_edge(u, v) > 0 {
                    out_edges[i].push(j);
                    in_edges[j].push(i);
                }
            }
        }

        GraphOrdering {
            graph,
            order,
            position,
            in_edges,
            out_edges,
        }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn vertex_count(&self) -> usize {
        self.order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.out_edges.iter().map(Vec::len).sum()
    }

    /// Indices with an edge into `i`
    pub fn in_edges(&self, i: usize) -> &[usize] {
        &self.in_edges[i]
    }

    /// Indices reached by an edge out of `i`
    pub fn out_edges(&self, i: usize) -> &[usize] {
        &self.out_edges[i]
    }

    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        self.edge(i, j).is_some()
    }

    /// Multiplicity of the edge `i -> j`, or `None` without one.
    pub fn edge(&self, i: usize, j: usize) -> Option<usize> {
        match self.graph.get_edge(self.order[i], self.order[j]) {
            0 => None,
            m => Some(m),
        }
    }

    /// Label of the vertex at index `i`
    pub fn vertex(&self, i: usize) -> &usize {
        &self.graph.labels[self.order[i]]
    }

    pub fn vertex_id(&self, i: usize) -> usize {
        self.order[i]
    }

    pub fn index_of(&self, v: usize) -> usize {
        self.position[v]
    }
}
