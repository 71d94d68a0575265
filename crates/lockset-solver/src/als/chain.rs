use std::{
    ops::ControlFlow,
    time::{Duration, Instant},
};

use lockset_core::{CellSet, Digit, DigitSet, Position};
use tinyvec::ArrayVec;

use super::{AlmostLockedSet, MAX_CHAIN_ALSS, RccSet};

/// One elimination chain found by [`ChainSearch`].
///
/// The chain is an ordered ALS sequence connected by restricted common
/// digits. The two boundary link digits are consumed by the chaining
/// argument; every other digit common to the first and last ALS is locked
/// into one of them and removable from outside cells seeing all of its
/// occurrences in both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHit {
    alss: Vec<usize>,
    first_link: Digit,
    last_link: Digit,
    eliminations: Vec<(Position, DigitSet)>,
}

impl ChainHit {
    /// Indices of the chain's ALSs, in walk order.
    #[must_use]
    pub fn alss(&self) -> &[usize] {
        &self.alss
    }

    /// The digit linking the first ALS to the second.
    #[must_use]
    pub fn first_link(&self) -> Digit {
        self.first_link
    }

    /// The digit linking the last ALS to its predecessor.
    #[must_use]
    pub fn last_link(&self) -> Digit {
        self.last_link
    }

    /// The eliminated digits per cell.
    #[must_use]
    pub fn eliminations(&self) -> &[(Position, DigitSet)] {
        &self.eliminations
    }
}

/// Result of one chain search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainOutcome {
    hits: Vec<ChainHit>,
    timed_out: bool,
}

impl ChainOutcome {
    /// The chains found, in discovery order.
    #[must_use]
    pub fn hits(&self) -> &[ChainHit] {
        &self.hits
    }

    /// Consumes the outcome and returns the chains.
    #[must_use]
    pub fn into_hits(self) -> Vec<ChainHit> {
        self.hits
    }

    /// Whether the wall-clock budget expired before the search finished.
    ///
    /// The hits found up to that point are still valid.
    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ChainNode {
    als: u16,
    /// Link digit value used to enter this node; 0 for the starting node.
    entry: u8,
}

impl ChainNode {
    fn entry_digit(self) -> Digit {
        Digit::from_value(self.entry)
    }
}

/// Depth-bounded, memo-pruned search over restricted common links.
///
/// Starting from each ALS in turn, the search walks outgoing links, never
/// revisiting a chain member and rejecting any candidate whose cells are a
/// subset or superset of a chain member (a tangle breaks the alternating
/// locking argument). A running union of chain cells pre-filters that
/// check: a candidate disjoint from the union cannot tangle. From four
/// ALSs onward every extension is tested for a closing elimination against
/// the chain's first ALS.
///
/// Branches and leaves that produced no elimination are memoized and
/// skipped on later visits. Both memo tables are reset once per starting
/// ALS rather than per branch; the coarser reset loses a few eliminations
/// but roughly halves the search time, a deliberate tradeoff.
#[derive(Debug, Clone, Copy)]
pub struct ChainSearch {
    max_length: usize,
    budget: Option<Duration>,
    single_result: bool,
}

impl Default for ChainSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainSearch {
    /// Creates a search with the default length bound and no time budget.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_length: MAX_CHAIN_ALSS,
            budget: None,
            single_result: false,
        }
    }

    /// Sets the wall-clock budget. `None` disables the deadline, which
    /// keeps test runs deterministic.
    #[must_use]
    pub fn with_budget(mut self, budget: Option<Duration>) -> Self {
        self.budget = budget;
        self
    }

    /// Limits chains to at most `max_length` ALSs (clamped to
    /// [`MAX_CHAIN_ALSS`]).
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length.min(MAX_CHAIN_ALSS);
        self
    }

    /// Stops at the first chain found, making the result deterministic.
    #[must_use]
    pub fn with_single_result(mut self, single_result: bool) -> Self {
        self.single_result = single_result;
        self
    }

    /// Runs the search over the given ALSs and their directed links.
    #[must_use]
    pub fn run(&self, alss: &[AlmostLockedSet], rccs: &RccSet) -> ChainOutcome {
        let deadline = self.budget.map(|budget| Instant::now() + budget);
        let mut search = Search {
            alss,
            rccs,
            max_length: self.max_length,
            single_result: self.single_result,
            chain: ArrayVec::new(),
            members: vec![false; alss.len()],
            dead_branch: vec![DigitSet::EMPTY; alss.len()],
            dead_leaf: vec![false; alss.len()],
            hits: Vec::new(),
        };
        let mut timed_out = false;
        for start in 0..alss.len() {
            // The deadline is polled between starting sets only; the branch
            // in flight always finishes.
            if let Some(deadline) = deadline
                && Instant::now() >= deadline
            {
                timed_out = true;
                log::warn!("chain search timed out before starting set {start}");
                break;
            }
            if rccs.outgoing(start).is_empty() {
                continue;
            }
            search.dead_branch.fill(DigitSet::EMPTY);
            search.dead_leaf.fill(false);
            search.chain.clear();
            #[expect(clippy::cast_possible_truncation)]
            search.chain.push(ChainNode {
                als: start as u16,
                entry: 0,
            });
            search.members[start] = true;
            let flow = search.extend(alss[start].cells());
            search.members[start] = false;
            if flow.is_break() {
                break;
            }
        }
        ChainOutcome {
            hits: search.hits,
            timed_out,
        }
    }
}

struct Search<'a> {
    alss: &'a [AlmostLockedSet],
    rccs: &'a RccSet,
    max_length: usize,
    single_result: bool,
    chain: ArrayVec<[ChainNode; MAX_CHAIN_ALSS]>,
    members: Vec<bool>,
    dead_branch: Vec<DigitSet>,
    dead_leaf: Vec<bool>,
    hits: Vec<ChainHit>,
}

impl Search<'_> {
    /// Extends the chain by one link in every admissible way.
    ///
    /// `cell_union` is the union of all chain members' cells; a candidate
    /// disjoint from it cannot tangle with any member, so the per-member
    /// scan only runs on intersection.
    ///
    /// Returns `Break` when single-result mode found a chain; otherwise
    /// `Continue(found)` reports whether this subtree produced any
    /// elimination, which drives the dead-branch memoization.
    fn extend(&mut self, cell_union: CellSet) -> ControlFlow<(), bool> {
        let tail = self.chain[self.chain.len() - 1];
        let mut found = false;
        for rcc in self.rccs.outgoing(usize::from(tail.als)) {
            let next = rcc.related();
            if self.members[next] {
                continue;
            }
            let next_als = &self.alss[next];
            if cell_union.intersects(next_als.cells())
                && self
                    .chain
                    .iter()
                    .any(|node| self.alss[usize::from(node.als)].tangles_with(next_als))
            {
                continue;
            }
            for digit in rcc.digits() {
                // Consecutive links must consume different digits.
                if digit.value() == tail.entry {
                    continue;
                }
                if self.dead_branch[next].contains(digit) {
                    continue;
                }
                #[expect(clippy::cast_possible_truncation)]
                self.chain.push(ChainNode {
                    als: next as u16,
                    entry: digit.value(),
                });
                self.members[next] = true;

                let mut branch_found = false;
                if self.chain.len() >= 4 && !self.dead_leaf[next] {
                    branch_found = self.leaf_check();
                    if !branch_found {
                        self.dead_leaf[next] = true;
                    }
                    if branch_found && self.single_result {
                        return ControlFlow::Break(());
                    }
                }
                if self.chain.len() < self.max_length {
                    branch_found |= self.extend(cell_union | next_als.cells())?;
                }
                if !branch_found {
                    self.dead_branch[next].insert(digit);
                }
                found |= branch_found;

                self.members[next] = false;
                self.chain.pop();
            }
        }
        ControlFlow::Continue(found)
    }

    /// Tests the current chain for a closing elimination and records it.
    fn leaf_check(&mut self) -> bool {
        let first_node = self.chain[0];
        let tail_node = self.chain[self.chain.len() - 1];
        let first = &self.alss[usize::from(first_node.als)];
        let tail = &self.alss[usize::from(tail_node.als)];
        let first_link = self.chain[1].entry_digit();
        let last_link = tail_node.entry_digit();

        let mut used = DigitSet::from_elem(first_link);
        used.insert(last_link);
        let z_digits = (first.candidates() & tail.candidates()).difference(used);
        if z_digits.is_empty() {
            return false;
        }

        let excluded = first.cells() | tail.cells();
        let mut eliminations: Vec<(Position, DigitSet)> = Vec::new();
        for z in z_digits {
            let targets = (first.buddies(z) & tail.buddies(z)).difference(excluded);
            for pos in targets {
                match eliminations.iter_mut().find(|(cell, _)| *cell == pos) {
                    Some((_, digits)) => {
                        digits.insert(z);
                    }
                    None => eliminations.push((pos, DigitSet::from_elem(z))),
                }
            }
        }
        if eliminations.is_empty() {
            return false;
        }
        self.hits.push(ChainHit {
            alss: self
                .chain
                .iter()
                .map(|node| usize::from(node.als))
                .collect(),
            first_link,
            last_link,
            eliminations,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        TechniqueGrid,
        als::{RccMode, collect_alss},
    };

    /// Four 2-cell sets forming a single chain path:
    ///
    /// A0 {(0,0),(1,0)} {1,2,9} -2- A1 {(4,0),(5,0)} {2,3,4}
    ///                                  |4
    /// A3 {(1,5),(2,5)} {6,8,9} -6- A2 {(5,4),(5,5)} {4,5,6}
    ///
    /// Digit 9 is common to A0 and A3 and distinct from both boundary
    /// links, so it is eliminable from every cell seeing (0,0) and (2,5).
    fn chain_grid() -> TechniqueGrid {
        let mut grid = TechniqueGrid::new();
        grid.set_candidates(Position::new(0, 0), DigitSet::from_iter([Digit::D1, Digit::D9]));
        grid.set_candidates(Position::new(1, 0), DigitSet::from_iter([Digit::D1, Digit::D2]));
        grid.set_candidates(Position::new(4, 0), DigitSet::from_iter([Digit::D2, Digit::D3]));
        grid.set_candidates(Position::new(5, 0), DigitSet::from_iter([Digit::D3, Digit::D4]));
        grid.set_candidates(Position::new(5, 4), DigitSet::from_iter([Digit::D4, Digit::D5]));
        grid.set_candidates(Position::new(5, 5), DigitSet::from_iter([Digit::D5, Digit::D6]));
        grid.set_candidates(Position::new(1, 5), DigitSet::from_iter([Digit::D6, Digit::D8]));
        grid.set_candidates(Position::new(2, 5), DigitSet::from_iter([Digit::D8, Digit::D9]));
        grid
    }

    /// The four path ALSs of [`chain_grid`], curated out of the full
    /// enumeration so the link graph contains exactly the chain.
    fn curated_snapshot() -> (Vec<AlmostLockedSet>, RccSet) {
        let grid = chain_grid();
        let all = collect_alss(&grid);
        let pick = |cells: [Position; 2]| {
            let cells: CellSet = cells.into_iter().collect();
            all.iter().find(|als| als.cells() == cells).unwrap().clone()
        };
        let alss = vec![
            pick([Position::new(0, 0), Position::new(1, 0)]),
            pick([Position::new(4, 0), Position::new(5, 0)]),
            pick([Position::new(5, 4), Position::new(5, 5)]),
            pick([Position::new(1, 5), Position::new(2, 5)]),
        ];
        let rccs = RccSet::find(&alss, RccMode::AllPairs);
        (alss, rccs)
    }

    fn expected_targets() -> CellSet {
        // Cells seeing both (0,0) and (2,5), outside the end sets.
        [
            Position::new(2, 0),
            Position::new(2, 1),
            Position::new(2, 2),
            Position::new(0, 3),
            Position::new(0, 4),
            Position::new(0, 5),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_four_als_chain_closure() {
        let (alss, rccs) = curated_snapshot();
        let outcome = ChainSearch::new().run(&alss, &rccs);

        assert!(!outcome.timed_out());
        // The path is walkable from either end; both walks close on the
        // same eliminations.
        assert_eq!(outcome.hits().len(), 2);
        for hit in outcome.hits() {
            assert_eq!(hit.alss().len(), 4);
            let cells: CellSet = hit.eliminations().iter().map(|&(pos, _)| pos).collect();
            assert_eq!(cells, expected_targets());
            for &(_, digits) in hit.eliminations() {
                assert_eq!(digits, DigitSet::from_elem(Digit::D9));
            }
        }
    }

    #[test]
    fn test_boundary_links_reported() {
        let (alss, rccs) = curated_snapshot();
        let outcome = ChainSearch::new().with_single_result(true).run(&alss, &rccs);

        let hit = &outcome.hits()[0];
        assert_eq!(hit.alss(), &[0, 1, 2, 3]);
        assert_eq!(hit.first_link(), Digit::D2);
        assert_eq!(hit.last_link(), Digit::D6);
    }

    #[test]
    fn test_no_tangled_chains() {
        // The full enumeration contains supersets of the path sets (for
        // example {(0,0),(1,0),(4,0)}); no result chain may combine a set
        // with its cell-superset.
        let grid = chain_grid();
        let alss = collect_alss(&grid);
        let rccs = RccSet::find(&alss, RccMode::AllPairs);
        let outcome = ChainSearch::new().run(&alss, &rccs);

        assert!(!outcome.hits().is_empty());
        for hit in outcome.hits() {
            for (i, &a) in hit.alss().iter().enumerate() {
                for &b in &hit.alss()[i + 1..] {
                    assert!(
                        !alss[a].tangles_with(&alss[b]),
                        "chain contains a tangled pair"
                    );
                }
            }
        }
    }

    #[test]
    fn test_single_result_is_deterministic() {
        let (alss, rccs) = curated_snapshot();
        let search = ChainSearch::new().with_single_result(true);

        let first = search.run(&alss, &rccs);
        let second = search.run(&alss, &rccs);
        assert_eq!(first, second);
        assert_eq!(first.hits().len(), 1);
    }

    #[test]
    fn test_repeated_runs_identical() {
        let grid = chain_grid();
        let alss = collect_alss(&grid);
        let rccs = RccSet::find(&alss, RccMode::AllPairs);
        let search = ChainSearch::new();

        assert_eq!(search.run(&alss, &rccs), search.run(&alss, &rccs));
    }

    #[test]
    fn test_zero_budget_times_out_immediately() {
        let (alss, rccs) = curated_snapshot();
        let outcome = ChainSearch::new()
            .with_budget(Some(Duration::ZERO))
            .run(&alss, &rccs);

        assert!(outcome.timed_out());
        assert!(outcome.hits().is_empty());
    }

    #[test]
    fn test_length_bound_respected() {
        let (alss, rccs) = curated_snapshot();
        // Chains need 4 sets to close; a bound of 3 finds nothing.
        let outcome = ChainSearch::new().with_max_length(3).run(&alss, &rccs);
        assert!(outcome.hits().is_empty());
    }
}
