use std::fmt;

use itertools::Itertools;

use crate::{comparator::Equivalence, ordering::GraphOrdering, Graph, NULL_NODE};

/// Vertex correspondence between a host graph and a pattern graph,
/// expressed in original vertex ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphMapping {
    host_to_pattern: Vec<Option<usize>>,
    pattern_to_host: Vec<Option<usize>>,
}

impl GraphMapping {
    /// Translate the index-space core arrays of a search state back to vertex ids.
    pub fn from_cores(
        host: &GraphOrdering,
        pattern: &GraphOrdering,
        core1: &[usize],
        core2: &[usize],
    ) -> Self {
        let mut host_to_pattern = vec![None; host.vertex_count()];
        let mut pattern_to_host = vec![None; pattern.vertex_count()];

        for (i, &j) in core1.iter().enumerate() {
            if j != NULL_NODE {
                host_to_pattern[host.vertex_id(i)] = Some(pattern.vertex_id(j));
            }
        }
        for (j, &i) in core2.iter().enumerate() {
            if i != NULL_NODE {
                pattern_to_host[pattern.vertex_id(j)] = Some(host.vertex_id(i));
            }
        }

        GraphMapping {
            host_to_pattern,
            pattern_to_host,
        }
    }

    /// Build a total mapping where pattern vertex `p` lands on `images[p]`.
    pub fn from_images(host_len: usize, images: &[usize]) -> Self {
        let mut host_to_pattern = vec![None; host_len];
        for (p, &h) in images.iter().enumerate() {
            host_to_pattern[h] = Some(p);
        }
        GraphMapping {
            host_to_pattern,
            pattern_to_host: images.iter().copied().map(Some).collect(),
        }
    }

    /// With `forward` a host vertex is looked up, otherwise a pattern vertex.
    pub fn vertex_correspondence(&self, vertex: usize, forward: bool) -> Option<usize> {
        if forward {
            self.host_preimage(vertex)
        } else {
            self.pattern_image(vertex)
        }
    }

    pub fn pattern_image(&self, pattern_vertex: usize) -> Option<usize> {
        self.pattern_to_host.get(pattern_vertex).copied().flatten()
    }

    pub fn host_preimage(&self, host_vertex: usize) -> Option<usize> {
        self.host_to_pattern.get(host_vertex).copied().flatten()
    }

    /// The host pair a pattern edge `u -> v` lands on, when both ends are mapped.
    pub fn edge_correspondence(&self, u: usize, v: usize) -> Option<(usize, usize)> {
        Some((self.pattern_image(u)?, self.pattern_image(v)?))
    }

    /// Number of mapped pairs
    pub fn len(&self) -> usize {
        self.pattern_to_host.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every pattern vertex has an image
    pub fn is_total(&self) -> bool {
        self.pattern_to_host.iter().all(Option::is_some)
    }

    /// `(pattern, host)` pairs ordered by pattern vertex
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pattern_to_host
            .iter()
            .enumerate()
            .filter_map(|(p, h)| h.map(|h| (p, h)))
    }

    /// Image of each pattern vertex, for total mappings.
    pub fn images(&self) -> Option<Vec<usize>> {
        self.pattern_to_host.iter().copied().collect()
    }
}

impl fmt::Display for GraphMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (k, (p, h)) in self.pairs().enumerate() {
            if k > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", p, h)?;
        }
        write!(f, "}}")
    }
}

/// Check that `images` is an induced embedding of `pattern` into `host`
/// under the given comparators.
pub fn is_induced_embedding<VC, EC>(
    host: &Graph,
    pattern: &Graph,
    images: &[usize],
    vertex_cmp: &VC,
    edge_cmp: &EC,
) -> bool
where
    VC: Equivalence<usize>,
    EC: Equivalence<usize>,
{
    if images.len() != pattern.num_vertices() || !images.iter().all_unique() {
        return false;
    }

    for (p, &h) in images.iter().enumerate() {
        if !vertex_cmp.equivalent(&host.labels[h], &pattern.labels[p]) {
            return false;
        }
    }

    for (u, &x) in images.iter().enumerate() {
        for (v, &y) in images.iter().enumerate() {
            let pattern_edge = pattern.get_edge(u, v);
            let host_edge = host.get_edge(x, y);
            if (pattern_edge > 0) != (host_edge > 0) {
                return false;
            }
            if pattern_edge > 0 && !edge_cmp.equivalent(&host_edge, &pattern_edge) {
                return false;
            }
        }
    }

    true
}

/// Find every induced embedding of `pattern` into `host` by trying all
/// injective vertex assignments. Exponential; meant as a reference oracle.
pub fn find_all_embeddings<VC, EC>(
    host: &Graph,
    pattern: &Graph,
    vertex_cmp: &VC,
    edge_cmp: &EC,
) -> Vec<GraphMapping>
where
    VC: Equivalence<usize>,
    EC: Equivalence<usize>,
{
    let n_p = pattern.num_vertices();
    let n_h = host.num_vertices();

    if n_p > n_h {
        return vec![];
    }

    (0..n_h)
        .permutations(n_p)
        .filter(|images| is_induced_embedding(host, pattern, images, vertex_cmp, edge_cmp))
        .map(|images| GraphMapping::from_images(n_h, &images))
        .collect()
}
