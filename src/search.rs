use rayon::prelude::*;
use tracing::{debug, error};

use crate::{
    comparator::Equivalence,
    config::MatchOptions,
    mapping::GraphMapping,
    ordering::GraphOrdering,
    state::{StateError, SubState},
    Graph,
};

/// Finds induced embeddings of a pattern graph inside a host graph with VF2.
pub struct SubgraphInspector<'g, VC, EC> {
    host: GraphOrdering<'g>,
    pattern: GraphOrdering<'g>,
    vertex_cmp: VC,
    edge_cmp: EC,
}

impl<'g, VC, EC> SubgraphInspector<'g, VC, EC>
where
    VC: Equivalence<usize>,
    EC: Equivalence<usize>,
{
    pub fn new(host: &'g Graph, pattern: &'g Graph, vertex_cmp: VC, edge_cmp: EC) -> Self {
        SubgraphInspector {
            host: GraphOrdering::new(host),
            pattern: GraphOrdering::new(pattern),
            vertex_cmp,
            edge_cmp,
        }
    }

    pub fn with_options(
        host: &'g Graph,
        pattern: &'g Graph,
        vertex_cmp: VC,
        edge_cmp: EC,
        options: &MatchOptions,
    ) -> Self {
        let host = if options.order_by_degree {
            GraphOrdering::by_degree(host)
        } else {
            GraphOrdering::new(host)
        };
        SubgraphInspector {
            host,
            pattern: GraphOrdering::new(pattern),
            vertex_cmp,
            edge_cmp,
        }
    }

    fn root_state(&self) -> SubState<'_, VC, EC> {
        SubState::new(&self.host, &self.pattern, &self.vertex_cmp, &self.edge_cmp)
    }

    /// A host smaller than the pattern in vertices or edges cannot contain it.
    fn too_small(&self) -> bool {
        self.host.vertex_count() < self.pattern.vertex_count()
            || self.host.edge_count() < self.pattern.edge_count()
    }

    /// Lazily enumerate every mapping in search order.
    pub fn mappings(&self) -> Mappings<'_, VC, EC> {
        debug!(
            host_vertices = self.host.vertex_count(),
            pattern_vertices = self.pattern.vertex_count(),
            "starting VF2 search"
        );

        if self.too_small() {
            debug!("host is too small for the pattern");
            return Mappings {
                state: None,
                empty_pattern: false,
                resume: false,
            };
        }

        Mappings {
            empty_pattern: self.pattern.vertex_count() == 0,
            state: Some(self.root_state()),
            resume: false,
        }
    }

    pub fn isomorphism_exists(&self) -> bool {
        self.mappings().next().is_some()
    }

    pub fn count_mappings(&self, limit: Option<usize>) -> usize {
        self.mappings().take(limit.unwrap_or(usize::MAX)).count()
    }
}

impl<VC, EC> SubgraphInspector<'_, VC, EC>
where
    VC: Equivalence<usize> + Sync,
    EC: Equivalence<usize> + Sync,
{
    /// Enumerate every mapping, exploring each feasible root pair on its own
    /// copy of the state in parallel. The order matches [`Self::mappings`].
    pub fn par_mappings(&self) -> Vec<GraphMapping> {
        if self.too_small() {
            return vec![];
        }
        if self.pattern.vertex_count() == 0 {
            return vec![self.root_state().current_matching()];
        }

        let mut probe = self.root_state();
        let mut branches = Vec::new();
        while probe.next_pair() {
            if !probe.is_feasible_pair() {
                continue;
            }
            let mut child = probe.clone();
            if let Err(e) = child.add_pair() {
                error!("failed to fork search branch: {}", e);
                continue;
            }
            branches.push(child);
        }
        debug!(branches = branches.len(), "exploring root branches in parallel");

        branches
            .into_par_iter()
            .map(explore_branch)
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    /// Collect mappings as `options` asks: sequential or parallel, capped by `limit`.
    pub fn find_mappings(&self, options: &MatchOptions) -> Vec<GraphMapping> {
        let limit = options.limit.unwrap_or(usize::MAX);
        if options.parallel {
            let mut found = self.par_mappings();
            found.truncate(limit);
            found
        } else {
            self.mappings().take(limit).collect()
        }
    }
}

/// Every goal reachable below a state that already holds one committed pair.
fn explore_branch<VC, EC>(mut state: SubState<'_, VC, EC>) -> Vec<GraphMapping>
where
    VC: Equivalence<usize>,
    EC: Equivalence<usize>,
{
    if state.is_goal() {
        return vec![state.current_matching()];
    }

    let floor = state.core_len();
    state.reset_add_vertexes();

    let mut found = Vec::new();
    let mut resume = false;
    loop {
        match advance(&mut state, &mut resume, floor) {
            Ok(Some(mapping)) => found.push(mapping),
            Ok(None) => break,
            Err(e) => {
                error!("search aborted: {}", e);
                break;
            }
        }
    }
    found
}

/// Run the DFS until the next goal state or until the search falls back to
/// depth `floor`. `resume` is set when the state was left on a goal.
fn advance<VC, EC>(
    state: &mut SubState<'_, VC, EC>,
    resume: &mut bool,
    floor: usize,
) -> Result<Option<GraphMapping>, StateError>
where
    VC: Equivalence<usize>,
    EC: Equivalence<usize>,
{
    if *resume {
        state.backtrack()?;
        *resume = false;
    }

    loop {
        while state.next_pair() {
            if !state.is_feasible_pair() {
                continue;
            }
            state.add_pair()?;
            if state.is_goal() {
                *resume = true;
                return Ok(Some(state.current_matching()));
            }
            state.reset_add_vertexes();
        }

        if state.core_len() <= floor {
            return Ok(None);
        }
        state.backtrack()?;
    }
}

/// Iterator over the mappings of a [`SubgraphInspector`].
pub struct Mappings<'a, VC, EC> {
    state: Option<SubState<'a, VC, EC>>,
    empty_pattern: bool,
    resume: bool,
}

impl<VC, EC> Iterator for Mappings<'_, VC, EC>
where
    VC: Equivalence<usize>,
    EC: Equivalence<usize>,
{
    type Item = GraphMapping;

    fn next(&mut self) -> Option<GraphMapping> {
        if self.empty_pattern {
            self.empty_pattern = false;
            return self.state.take().map(|s| s.current_matching());
        }

        let state = self.state.as_mut()?;
        match advance(state, &mut self.resume, 0) {
            Ok(Some(mapping)) => Some(mapping),
            Ok(None) => {
                self.state = None;
                None
            }
            Err(e) => {
                error!("search aborted: {}", e);
                self.state = None;
                None
            }
        }
    }
}
