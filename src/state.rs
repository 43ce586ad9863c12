//! VF2 search state for induced subgraph isomorphism.
//!
//! Graph 1 is the host that gets searched and graph 2 is the pattern that
//! must be covered completely. A state is one node of the depth-first search
//! tree; it is mutated in place by [`SubState::add_pair`] and restored by
//! [`SubState::backtrack`]. Frontier membership is kept as per-vertex
//! timestamps (the depth at which a vertex first touched the core) so a
//! backtrack undoes exactly the stamps of the pair it removes.

use tracing::trace;

use crate::{comparator::Equivalence, mapping::GraphMapping, ordering::GraphOrdering};

/// Marks an unmapped vertex or an unset cursor. Never a valid index.
pub const NULL_NODE: usize = usize::MAX;

/// Misuse of the commit/backtrack protocol.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// `add_pair` without a candidate from `next_pair`
    #[error("no candidate pair is selected")]
    NoCandidate,
    /// The selected candidate would break injectivity
    #[error("host vertex {host} or pattern vertex {pattern} is already mapped")]
    AlreadyMapped { host: usize, pattern: usize },
    /// `backtrack` with nothing committed
    #[error("cannot backtrack an empty core mapping")]
    EmptyCore,
}

/// Candidate class chosen by `next_pair`, most constrained first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Both,
    Out,
    In,
    Any,
}

/// Mapping and frontier bookkeeping for one of the two graphs.
///
/// The `*_len` counters include mapped vertices, so a frontier is
/// non-empty iff its counter exceeds the core length.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Side {
    core: Vec<usize>,
    t_in: Vec<usize>,
    t_out: Vec<usize>,
    in_len: usize,
    out_len: usize,
    both_len: usize,
}

impl Side {
    fn new(n: usize) -> Self {
        Side {
            core: vec![NULL_NODE; n],
            t_in: vec![0; n],
            t_out: vec![0; n],
            in_len: 0,
            out_len: 0,
            both_len: 0,
        }
    }

    fn is_mapped(&self, v: usize) -> bool {
        self.core[v] != NULL_NODE
    }

    fn mark_in(&mut self, v: usize, stamp: usize) {
        if self.t_in[v] == 0 {
            self.t_in[v] = stamp;
            self.in_len += 1;
            if self.t_out[v] > 0 {
                self.both_len += 1;
            }
        }
    }

    fn mark_out(&mut self, v: usize, stamp: usize) {
        if self.t_out[v] == 0 {
            self.t_out[v] = stamp;
            self.out_len += 1;
            if self.t_in[v] > 0 {
                self.both_len += 1;
            }
        }
    }

    fn unmark_in(&mut self, v: usize, stamp: usize) {
        if self.t_in[v] == stamp {
            self.t_in[v] = 0;
            self.in_len -= 1;
            if self.t_out[v] > 0 {
                self.both_len -= 1;
            }
        }
    }

    fn unmark_out(&mut self, v: usize, stamp: usize) {
        if self.t_out[v] == stamp {
            self.t_out[v] = 0;
            self.out_len -= 1;
            if self.t_in[v] > 0 {
                self.both_len -= 1;
            }
        }
    }

    fn admits(&self, tier: Tier, v: usize) -> bool {
        if self.is_mapped(v) {
            return false;
        }
        match tier {
            Tier::Both => self.t_in[v] > 0 && self.t_out[v] > 0,
            Tier::Out => self.t_out[v] > 0,
            Tier::In => self.t_in[v] > 0,
            Tier::Any => true,
        }
    }

    fn tally(&self, v: usize, terminals: &mut Terminals) {
        let (t_in, t_out) = (self.t_in[v], self.t_out[v]);
        if t_in > 0 {
            terminals.term_in += 1;
        }
        if t_out > 0 {
            terminals.term_out += 1;
        }
        if t_in == 0 && t_out == 0 {
            terminals.new += 1;
        }
    }
}

/// Unmapped neighbors of a candidate, split by frontier membership.
#[derive(Debug, Default, Clone, Copy)]
struct Terminals {
    term_in: usize,
    term_out: usize,
    new: usize,
}

impl Terminals {
    fn covers(&self, other: &Terminals) -> bool {
        self.term_in >= other.term_in && self.term_out >= other.term_out && self.new >= other.new
    }
}

/// One node of the VF2 search tree over a host/pattern pair.
///
/// The typical driver loop is
/// `next_pair -> is_feasible_pair -> add_pair -> reset_add_vertexes -> ...`
/// and `backtrack` once a depth is exhausted; see [`crate::search`].
/// `Clone` makes a fully independent copy, suitable for exploring
/// branches on separate threads.
pub struct SubState<'a, VC, EC> {
    g1: &'a GraphOrdering<'a>,
    g2: &'a GraphOrdering<'a>,
    vertex_cmp: &'a VC,
    edge_cmp: &'a EC,
    n1: usize,
    n2: usize,
    side1: Side,
    side2: Side,
    core_len: usize,
    add_vertex1: usize,
    add_vertex2: usize,
    committed: Vec<(usize, usize)>,
}

impl<VC, EC> Clone for SubState<'_, VC, EC> {
    fn clone(&self) -> Self {
        SubState {
            g1: self.g1,
            g2: self.g2,
            vertex_cmp: self.vertex_cmp,
            edge_cmp: self.edge_cmp,
            n1: self.n1,
            n2: self.n2,
            side1: self.side1.clone(),
            side2: self.side2.clone(),
            core_len: self.core_len,
            add_vertex1: self.add_vertex1,
            add_vertex2: self.add_vertex2,
            committed: self.committed.clone(),
        }
    }
}

impl<'a, VC, EC> SubState<'a, VC, EC>
where
    VC: Equivalence<usize>,
    EC: Equivalence<usize>,
{
    pub fn new(
        g1: &'a GraphOrdering<'a>,
        g2: &'a GraphOrdering<'a>,
        vertex_cmp: &'a VC,
        edge_cmp: &'a EC,
    ) -> Self {
        let n1 = g1.vertex_count();
        let n2 = g2.vertex_count();
        SubState {
            g1,
            g2,
            vertex_cmp,
            edge_cmp,
            n1,
            n2,
            side1: Side::new(n1),
            side2: Side::new(n2),
            core_len: 0,
            add_vertex1: NULL_NODE,
            add_vertex2: NULL_NODE,
            committed: Vec::with_capacity(n2),
        }
    }

    fn tier(&self) -> Tier {
        let (s1, s2, len) = (&self.side1, &self.side2, self.core_len);
        if s1.both_len > len && s2.both_len > len {
            Tier::Both
        } else if s1.out_len > len && s2.out_len > len {
            Tier::Out
        } else if s1.in_len > len && s2.in_len > len {
            Tier::In
        } else {
            Tier::Any
        }
    }

    /// Advance the cursor to the next untried candidate pair.
    ///
    /// The pattern vertex is the first admissible one for the current tier;
    /// host vertices are then walked in index order. Returns `false` and
    /// clears the cursor once this depth has no candidates left.
    pub fn next_pair(&mut self) -> bool {
        if self.add_vertex2 == NULL_NODE {
            self.add_vertex2 = 0;
        }
        if self.add_vertex1 == NULL_NODE {
            self.add_vertex1 = 0;
        } else {
            self.add_vertex1 += 1;
        }

        let tier = self.tier();

        while self.add_vertex2 < self.n2 && !self.side2.admits(tier, self.add_vertex2) {
            self.add_vertex2 += 1;
            self.add_vertex1 = 0;
        }
        while self.add_vertex1 < self.n1 && !self.side1.admits(tier, self.add_vertex1) {
            self.add_vertex1 += 1;
        }

        if self.add_vertex1 < self.n1 && self.add_vertex2 < self.n2 {
            return true;
        }

        self.reset_add_vertexes();
        false
    }

    fn compatible_edges(&self, h_from: usize, h_to: usize, p_from: usize, p_to: usize) -> bool {
        match (self.g1.edge(h_from, h_to), self.g2.edge(p_from, p_to)) {
            (Some(h), Some(p)) => self.edge_cmp.equivalent(&h, &p),
            _ => false,
        }
    }

    /// Whether the cursor pair can extend the current mapping.
    ///
    /// Mapped host neighbors must be mirrored in the pattern with compatible
    /// edges; mapped pattern neighbors must be mirrored in the host. The
    /// unmapped neighbors are then counted per frontier class and the host
    /// must offer at least as many as the pattern needs in every class.
    pub fn is_feasible_pair(&self) -> bool {
        let (v1, v2) = (self.add_vertex1, self.add_vertex2);
        if v1 >= self.n1 || v2 >= self.n2 {
            return false;
        }

        if !self.vertex_cmp.equivalent(self.g1.vertex(v1), self.g2.vertex(v2)) {
            trace!(host = v1, pattern = v2, "vertex labels differ");
            return false;
        }

        // a self-loop is never seen as a mapped neighbor below
        match (self.g1.edge(v1, v1), self.g2.edge(v2, v2)) {
            (None, None) => {}
            (Some(h), Some(p)) if self.edge_cmp.equivalent(&h, &p) => {}
            _ => return false,
        }

        let mut pred1 = Terminals::default();
        let mut succ1 = Terminals::default();
        let mut pred2 = Terminals::default();
        let mut succ2 = Terminals::default();

        for &other1 in self.g1.out_edges(v1) {
            let other2 = self.side1.core[other1];
            if other2 != NULL_NODE {
                if !self.g2.has_edge(v2, other2) || !self.compatible_edges(v1, other1, v2, other2) {
                    return false;
                }
            } else {
                self.side1.tally(other1, &mut succ1);
            }
        }

        for &other1 in self.g1.in_edges(v1) {
            let other2 = self.side1.core[other1];
            if other2 != NULL_NODE {
                if !self.g2.has_edge(other2, v2) || !self.compatible_edges(other1, v1, other2, v2) {
                    return false;
                }
            } else {
                self.side1.tally(other1, &mut pred1);
            }
        }

        for &other2 in self.g2.out_edges(v2) {
            let other1 = self.side2.core[other2];
            if other1 != NULL_NODE {
                if !self.g1.has_edge(v1, other1) {
                    return false;
                }
            } else {
                self.side2.tally(other2, &mut succ2);
            }
        }

        for &other2 in self.g2.in_edges(v2) {
            let other1 = self.side2.core[other2];
            if other1 != NULL_NODE {
                if !self.g1.has_edge(other1, v1) {
                    return false;
                }
            } else {
                self.side2.tally(other2, &mut pred2);
            }
        }

        pred1.covers(&pred2) && succ1.covers(&succ2)
    }

    /// Commit the cursor pair. The cursor itself is left untouched.
    pub fn add_pair(&mut self) -> Result<(), StateError> {
        let (v1, v2) = (self.add_vertex1, self.add_vertex2);
        if v1 >= self.n1 || v2 >= self.n2 {
            return Err(StateError::NoCandidate);
        }
        if self.side1.is_mapped(v1) || self.side2.is_mapped(v2) {
            return Err(StateError::AlreadyMapped {
                host: self.g1.vertex_id(v1),
                pattern: self.g2.vertex_id(v2),
            });
        }

        self.core_len += 1;
        let stamp = self.core_len;
        trace!(depth = stamp, host = v1, pattern = v2, "add pair");

        self.side1.mark_in(v1, stamp);
        self.side1.mark_out(v1, stamp);
        self.side2.mark_in(v2, stamp);
        self.side2.mark_out(v2, stamp);

        self.side1.core[v1] = v2;
        self.side2.core[v2] = v1;

        let (g1, g2) = (self.g1, self.g2);
        for &other in g1.in_edges(v1) {
            self.side1.mark_in(other, stamp);
        }
        for &other in g1.out_edges(v1) {
            self.side1.mark_out(other, stamp);
        }
        for &other in g2.in_edges(v2) {
            self.side2.mark_in(other, stamp);
        }
        for &other in g2.out_edges(v2) {
            self.side2.mark_out(other, stamp);
        }

        self.committed.push((v1, v2));
        Ok(())
    }

    pub fn is_goal(&self) -> bool {
        self.core_len == self.n2
    }

    /// Undo the most recent `add_pair`.
    ///
    /// Clears the stamps carrying the current depth, rolls the frontier
    /// counters back and leaves the cursor on the removed pair, so the next
    /// `next_pair` continues after it.
    pub fn backtrack(&mut self) -> Result<(), StateError> {
        let (v1, v2) = self.committed.pop().ok_or(StateError::EmptyCore)?;
        let stamp = self.core_len;
        trace!(depth = stamp, host = v1, pattern = v2, "backtrack");

        let (g1, g2) = (self.g1, self.g2);
        self.side1.unmark_in(v1, stamp);
        for &other in g1.in_edges(v1) {
            self.side1.unmark_in(other, stamp);
        }
        self.side1.unmark_out(v1, stamp);
        for &other in g1.out_edges(v1) {
            self.side1.unmark_out(other, stamp);
        }

        self.side2.unmark_in(v2, stamp);
        for &other in g2.in_edges(v2) {
            self.side2.unmark_in(other, stamp);
        }
        self.side2.unmark_out(v2, stamp);
        for &other in g2.out_edges(v2) {
            self.side2.unmark_out(other, stamp);
        }

        self.side1.core[v1] = NULL_NODE;
        self.side2.core[v2] = NULL_NODE;
        self.core_len -= 1;
        self.add_vertex1 = v1;
        self.add_vertex2 = v2;
        Ok(())
    }

    pub fn current_matching(&self) -> GraphMapping {
        GraphMapping::from_cores(self.g1, self.g2, &self.side1.core, &self.side2.core)
    }

    pub fn reset_add_vertexes(&mut self) {
        self.add_vertex1 = NULL_NODE;
        self.add_vertex2 = NULL_NODE;
    }
}

impl<VC, EC> SubState<'_, VC, EC> {
    pub fn core_len(&self) -> usize {
        self.core_len
    }

    /// `(host index, pattern index)` under the cursor, `NULL_NODE` when unset
    pub fn cursor(&self) -> (usize, usize) {
        (self.add_vertex1, self.add_vertex2)
    }

    /// Host index committed last, or `NULL_NODE` at depth zero
    pub fn added_vertex1(&self) -> usize {
        self.committed.last().map_or(NULL_NODE, |&(v1, _)| v1)
    }

    pub fn host_len(&self) -> usize {
        self.n1
    }

    pub fn pattern_len(&self) -> usize {
        self.n2
    }

    /// Host index -> pattern index, `NULL_NODE` when unmapped
    pub fn core1(&self) -> &[usize] {
        &self.side1.core
    }

    /// Pattern index -> host index, `NULL_NODE` when unmapped
    pub fn core2(&self) -> &[usize] {
        &self.side2.core
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{comparator::AlwaysEqual, Graph};

    type Snapshot = (Side, Side, usize, (usize, usize), Vec<(usize, usize)>);

    fn snapshot<VC, EC>(s: &SubState<'_, VC, EC>) -> Snapshot {
        (
            s.side1.clone(),
            s.side2.clone(),
            s.core_len,
            s.cursor(),
            s.committed.clone(),
        )
    }

    fn check_invariants<VC, EC>(s: &SubState<'_, VC, EC>) {
        let core1 = s.core1();
        let core2 = s.core2();
        for (i, &j) in core1.iter().enumerate() {
            if j != NULL_NODE {
                assert_eq!(core2[j], i);
            }
        }
        for (j, &i) in core2.iter().enumerate() {
            if i != NULL_NODE {
                assert_eq!(core1[i], j);
            }
        }
        assert_eq!(core1.iter().filter(|&&j| j != NULL_NODE).count(), s.core_len());
        assert_eq!(core2.iter().filter(|&&i| i != NULL_NODE).count(), s.core_len());

        for side in [&s.side1, &s.side2] {
            let in_len = side.t_in.iter().filter(|&&t| t > 0).count();
            let out_len = side.t_out.iter().filter(|&&t| t > 0).count();
            let both_len = side
                .t_in
                .iter()
                .zip(&side.t_out)
                .filter(|&(&i, &o)| i > 0 && o > 0)
                .count();
            assert_eq!(side.in_len, in_len);
            assert_eq!(side.out_len, out_len);
            assert_eq!(side.both_len, both_len);
            assert!(side.t_in.iter().chain(&side.t_out).all(|&t| t <= s.core_len()));
        }
    }

    /// Exhaustive DFS checking invariants and backtrack restoration at each step.
    fn walk<VC, EC>(s: &mut SubState<'_, VC, EC>, goals: &mut usize)
    where
        VC: Equivalence<usize>,
        EC: Equivalence<usize>,
    {
        while s.next_pair() {
            if !s.is_feasible_pair() {
                continue;
            }
            let before = snapshot(s);
            s.add_pair().unwrap();
            check_invariants(s);
            if s.is_goal() {
                *goals += 1;
            } else {
                s.reset_add_vertexes();
                walk(s, goals);
                assert_eq!(s.cursor(), (NULL_NODE, NULL_NODE));
            }
            s.backtrack().unwrap();
            assert_eq!(snapshot(s), before);
        }
    }

    fn triangle() -> Graph {
        Graph::from_edges(3, &[(0, 1), (1, 2), (2, 0)])
    }

    #[test]
    fn test_fresh_state() {
        let host = triangle();
        let pattern = Graph::from_edges(2, &[(0, 1)]);
        let (g1, g2) = (GraphOrdering::new(&host), GraphOrdering::new(&pattern));
        let s = SubState::new(&g1, &g2, &AlwaysEqual, &AlwaysEqual);
        assert_eq!(s.core_len(), 0);
        assert_eq!(s.cursor(), (NULL_NODE, NULL_NODE));
        assert_eq!(s.added_vertex1(), NULL_NODE);
        assert_eq!((s.host_len(), s.pattern_len()), (3, 2));
        assert!(!s.is_goal());
        check_invariants(&s);
    }

    #[test]
    fn test_first_pairs_follow_index_order() {
        let host = triangle();
        let pattern = Graph::from_edges(2, &[(0, 1)]);
        let (g1, g2) = (GraphOrdering::new(&host), GraphOrdering::new(&pattern));
        let mut s = SubState::new(&g1, &g2, &AlwaysEqual, &AlwaysEqual);

        let mut seen = Vec::new();
        while s.next_pair() {
            seen.push(s.cursor());
        }
        // pattern vertex 0 stays fixed, host vertices are walked
        assert_eq!(seen, vec![(0, 0), (1, 0), (2, 0)]);
        assert_eq!(s.cursor(), (NULL_NODE, NULL_NODE));
    }

    #[test]
    fn test_frontier_tier_after_commit() {
        let host = triangle();
        let pattern = Graph::from_edges(2, &[(0, 1)]);
        let (g1, g2) = (GraphOrdering::new(&host), GraphOrdering::new(&pattern));
        let mut s = SubState::new(&g1, &g2, &AlwaysEqual, &AlwaysEqual);

        assert!(s.next_pair());
        assert!(s.is_feasible_pair());
        s.add_pair().unwrap();
        assert_eq!(s.added_vertex1(), 0);
        s.reset_add_vertexes();

        // only the out-frontier of both sides is populated: host 1, pattern 1
        assert!(s.next_pair());
        assert_eq!(s.cursor(), (1, 1));
        assert!(s.is_feasible_pair());
        assert!(!s.next_pair());
    }

    #[test]
    fn test_add_backtrack_restores_state() {
        let host = Graph::from_edges(5, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 3), (1, 1)]);
        let pattern = Graph::from_edges(3, &[(0, 1), (1, 2), (2, 1)]);
        let (g1, g2) = (GraphOrdering::new(&host), GraphOrdering::new(&pattern));
        let mut s = SubState::new(&g1, &g2, &AlwaysEqual, &AlwaysEqual);
        let mut goals = 0;
        walk(&mut s, &mut goals);
        assert_eq!(s.core_len(), 0);
        // 2 -> 3 <-> 4 is the only induced copy
        assert_eq!(goals, 1);
    }

    #[test]
    fn test_clone_is_independent() {
        let host = triangle();
        let pattern = Graph::from_edges(2, &[(0, 1)]);
        let (g1, g2) = (GraphOrdering::new(&host), GraphOrdering::new(&pattern));
        let mut s = SubState::new(&g1, &g2, &AlwaysEqual, &AlwaysEqual);
        assert!(s.next_pair());
        let copy = s.clone();
        s.add_pair().unwrap();
        assert_eq!(copy.core_len(), 0);
        assert!(copy.core1().iter().all(|&j| j == NULL_NODE));
        assert_eq!(s.core1()[0], 0);
    }

    #[test]
    fn test_protocol_violations() {
        let host = triangle();
        let pattern = Graph::from_edges(2, &[(0, 1)]);
        let (g1, g2) = (GraphOrdering::new(&host), GraphOrdering::new(&pattern));
        let mut s = SubState::new(&g1, &g2, &AlwaysEqual, &AlwaysEqual);

        assert_eq!(s.add_pair(), Err(StateError::NoCandidate));
        assert_eq!(s.backtrack(), Err(StateError::EmptyCore));
        assert!(!s.is_feasible_pair());

        assert!(s.next_pair());
        s.add_pair().unwrap();
        assert_eq!(
            s.add_pair(),
            Err(StateError::AlreadyMapped {
                host: 0,
                pattern: 0
            })
        );
        check_invariants(&s);
    }

    #[test]
    fn test_vertex_comparator_fails_fast() {
        let host = Graph::from_edges(2, &[(0, 1)]).with_labels(vec![1, 1]);
        let pattern = Graph::from_edges(2, &[(0, 1)]).with_labels(vec![2, 2]);
        let (g1, g2) = (GraphOrdering::new(&host), GraphOrdering::new(&pattern));
        let labels = |h: &usize, p: &usize| h == p;
        let mut s = SubState::new(&g1, &g2, &labels, &AlwaysEqual);
        let mut tried = 0;
        while s.next_pair() {
            tried += 1;
            assert!(!s.is_feasible_pair());
        }
        assert_eq!(tried, 2);
    }

    #[test]
    fn test_self_loop_must_match() {
        let host = Graph::from_edges(2, &[(0, 0)]);
        let pattern = Graph::new(1);
        let (g1, g2) = (GraphOrdering::new(&host), GraphOrdering::new(&pattern));
        let mut s = SubState::new(&g1, &g2, &AlwaysEqual, &AlwaysEqual);
        assert!(s.next_pair());
        assert_eq!(s.cursor(), (0, 0));
        assert!(!s.is_feasible_pair());
        assert!(s.next_pair());
        assert_eq!(s.cursor(), (1, 0));
        assert!(s.is_feasible_pair());
    }
}
