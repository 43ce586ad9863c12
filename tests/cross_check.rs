use quickcheck::{quickcheck, Arbitrary, Gen};
use vf2_subgraph::{
    mapping::find_all_embeddings, AlwaysEqual, ExactMatch, Graph, GraphMapping, MatchOptions,
    SubgraphInspector,
};

/// Host/pattern pair small enough for brute force.
#[derive(Clone, Debug)]
struct SmallInstance {
    host: Graph,
    pattern: Graph,
}

fn arbitrary_graph(g: &mut Gen, max_n: u8) -> Graph {
    let n = (u8::arbitrary(g) % (max_n + 1)) as usize;
    let mut graph = Graph::new(n);
    for u in 0..n {
        for v in 0..n {
            let roll = u8::arbitrary(g) % 16;
            graph.adj[u][v] = match roll {
                0..=3 if u != v => 1,
                4 if u != v => 2,
                5 if u == v => 1,
                _ => 0,
            };
        }
    }
    let labels = (0..n).map(|_| usize::from(u8::arbitrary(g) % 2)).collect();
    graph.with_labels(labels)
}

impl Arbitrary for SmallInstance {
    fn arbitrary(g: &mut Gen) -> Self {
        SmallInstance {
            host: arbitrary_graph(g, 6),
            pattern: arbitrary_graph(g, 4),
        }
    }
}

fn sorted(mut mappings: Vec<GraphMapping>) -> Vec<GraphMapping> {
    mappings.sort_by_key(|m| m.images());
    mappings
}

quickcheck! {
    fn prop_structural_matches_brute_force(inst: SmallInstance) -> bool {
        let inspector = SubgraphInspector::new(&inst.host, &inst.pattern, AlwaysEqual, AlwaysEqual);
        let vf2 = sorted(inspector.mappings().collect());
        let brute = sorted(find_all_embeddings(&inst.host, &inst.pattern, &AlwaysEqual, &AlwaysEqual));
        vf2 == brute
    }

    fn prop_labelled_matches_brute_force(inst: SmallInstance) -> bool {
        let inspector = SubgraphInspector::new(&inst.host, &inst.pattern, ExactMatch, ExactMatch);
        let vf2 = sorted(inspector.mappings().collect());
        let brute = sorted(find_all_embeddings(&inst.host, &inst.pattern, &ExactMatch, &ExactMatch));
        vf2 == brute
    }

    fn prop_parallel_preserves_order(inst: SmallInstance) -> bool {
        let inspector = SubgraphInspector::new(&inst.host, &inst.pattern, AlwaysEqual, AlwaysEqual);
        let sequential: Vec<_> = inspector.mappings().collect();
        inspector.par_mappings() == sequential
    }

    fn prop_degree_order_finds_same_set(inst: SmallInstance) -> bool {
        let natural = SubgraphInspector::new(&inst.host, &inst.pattern, AlwaysEqual, AlwaysEqual);
        let opts = MatchOptions { order_by_degree: true, ..MatchOptions::default() };
        let by_degree = SubgraphInspector::with_options(
            &inst.host, &inst.pattern, AlwaysEqual, AlwaysEqual, &opts,
        );
        sorted(natural.mappings().collect()) == sorted(by_degree.mappings().collect())
    }
}
