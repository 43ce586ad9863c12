/// Options controlling a subgraph search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Vertices only match when their labels are equal
    pub match_labels: bool,
    /// Edges only match when their multiplicities are equal
    pub match_multiplicity: bool,
    /// Visit host vertices by descending degree instead of by id
    pub order_by_degree: bool,
    /// Stop after this many mappings
    pub limit: Option<usize>,
    /// Explore root branches on the rayon thread pool
    pub parallel: bool,
}

impl MatchOptions {
    /// Vertex comparator implied by `match_labels`
    pub fn vertex_comparator(&self) -> impl Fn(&usize, &usize) -> bool + Sync + Copy {
        let strict = self.match_labels;
        move |h: &usize, p: &usize| !strict || h == p
    }

    /// Edge comparator implied by `match_multiplicity`
    pub fn edge_comparator(&self) -> impl Fn(&usize, &usize) -> bool + Sync + Copy {
        let strict = self.match_multiplicity;
        move |h: &usize, p: &usize| !strict || h == p
    }
}
