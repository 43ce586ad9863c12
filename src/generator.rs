use rand::Rng;

use crate::Graph;

/// Knobs for [`generate_instance`]
#[derive(Debug, Clone)]
pub struct InstanceParams {
    pub host_size: usize,
    pub pattern_size: usize,
    /// Probability of an edge between two distinct host vertices
    pub density: f64,
    /// Probability that a generated edge becomes a multiedge
    pub multiedge_prob: f64,
    /// Maximum multiplicity for a multiedge (uniformly sampled in [2, max])
    pub max_multiedge: usize,
    /// Number of distinct vertex labels, drawn uniformly
    pub labels: usize,
}

impl Default for InstanceParams {
    fn default() -> Self {
        InstanceParams {
            host_size: 12,
            pattern_size: 4,
            density: 0.25,
            multiedge_prob: 0.0,
            max_multiedge: 3,
            labels: 1,
        }
    }
}

/// A host graph together with a pattern planted inside it.
#[derive(Debug, Clone)]
pub struct Instance {
    pub host: Graph,
    pub pattern: Graph,
    /// Host vertex chosen for each pattern vertex
    pub planted: Vec<usize>,
}

/// Generate a random edge count (>=1) possibly becoming a multiedge
fn random_edge_count<R: Rng>(rng: &mut R, multiedge_prob: f64, max_multiedge: usize) -> usize {
    if max_multiedge < 2 || rng.gen::<f64>() >= multiedge_prob {
        1
    } else {
        rng.gen_range(2..=max_multiedge)
    }
}

/// Random loop-free directed multigraph with labels in `0..labels`
pub fn random_graph<R: Rng>(n: usize, params: &InstanceParams, rng: &mut R) -> Graph {
    let mut g = Graph::new(n);
    for i in 0..n {
        for j in 0..n {
            if i != j && rng.gen::<f64>() < params.density {
                g.adj[i][j] = random_edge_count(rng, params.multiedge_prob, params.max_multiedge);
            }
        }
    }
    let labels = (0..n).map(|_| rng.gen_range(0..params.labels.max(1))).collect();
    g.with_labels(labels)
}

/// Select a random injective assignment of `k` vertices out of `n`
fn random_injective_mapping<R: Rng>(k: usize, n: usize, rng: &mut R) -> Vec<usize> {
    let mut pool: Vec<usize> = (0..n).collect();
    // Fisher-Yates shuffle then take first k
    for i in (1..n).rev() {
        let j = rng.gen_range(0..=i);
        pool.swap(i, j);
    }
    pool.truncate(k);
    pool
}

/// Subgraph of `host` induced by `vertices`; pattern vertex `p` is `vertices[p]`.
pub fn induced_subgraph(host: &Graph, vertices: &[usize]) -> Graph {
    let adj = vertices
        .iter()
        .map(|&u| vertices.iter().map(|&v| host.get_edge(u, v)).collect())
        .collect();
    let labels = vertices.iter().map(|&v| host.label(v)).collect();
    Graph::from_adjacency_matrix(adj).with_labels(labels)
}

/// Random host with a pattern cut out of it, so at least one induced
/// embedding (the planted one) always exists.
pub fn generate_instance<R: Rng>(params: &InstanceParams, rng: &mut R) -> Instance {
    let host = random_graph(params.host_size, params, rng);
    let planted = random_injective_mapping(params.pattern_size, params.host_size, rng);
    let pattern = induced_subgraph(&host, &planted);
    Instance {
        host,
        pattern,
        planted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_induced_subgraph_keeps_edges_and_labels() {
        let host = Graph::from_edges(4, &[(0, 1), (1, 3), (3, 1), (2, 0)]).with_labels(vec![9, 8, 7, 6]);
        let sub = induced_subgraph(&host, &[3, 1]);
        assert_eq!(sub.adj, vec![vec![0, 1], vec![1, 0]]);
        assert_eq!(sub.labels, vec![6, 8]);
    }

    #[test]
    fn test_generated_instance_is_consistent() {
        let mut rng = StdRng::seed_from_u64(7);
        let params = InstanceParams {
            labels: 3,
            multiedge_prob: 0.3,
            ..InstanceParams::default()
        };
        let inst = generate_instance(&params, &mut rng);
        assert_eq!(inst.host.num_vertices(), 12);
        assert_eq!(inst.pattern.num_vertices(), 4);
        assert_eq!(inst.planted.len(), 4);
        assert!(inst.host.labels.iter().all(|&l| l < 3));
        assert!((0..12).all(|v| inst.host.get_edge(v, v) == 0));
        for (p, &h) in inst.planted.iter().enumerate() {
            assert_eq!(inst.pattern.label(p), inst.host.label(h));
        }
    }
}
