use std::sync::atomic::{AtomicU32, Ordering};

use lockset_core::{CandidateGrid, CellSet, ConsistencyError, Digit, DigitSet, House, Position};

/// Identifier for one puzzle-solving session.
///
/// Each [`TechniqueGrid`] is tagged with the puzzle it belongs to, so caches
/// and per-puzzle technique state can tell two sessions apart even when their
/// candidate contents happen to coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PuzzleId(u32);

impl PuzzleId {
    fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Cache-invalidation key for a grid state.
///
/// The stamp changes whenever the candidate state changes: the `revision`
/// counter is bumped on every mutation that removes or places a candidate,
/// and the `puzzle` component separates unrelated solving sessions. Within a
/// single mutation lineage, equal stamps denote the identical candidate
/// state.
///
/// Cloning a [`TechniqueGrid`] shares the stamp, so a clone starts out
/// cache-equivalent to its source. Clones mutated independently can reach
/// equal stamps with differing contents, so they must not feed the same
/// cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridStamp {
    puzzle: PuzzleId,
    revision: u64,
}

impl GridStamp {
    /// Returns the puzzle this stamp belongs to.
    #[must_use]
    pub fn puzzle(self) -> PuzzleId {
        self.puzzle
    }

    /// Returns the mutation counter within the puzzle.
    #[must_use]
    pub fn revision(self) -> u64 {
        self.revision
    }
}

/// Solver state for technique-based solving.
///
/// This type wraps a [`CandidateGrid`] and exposes a solver-oriented API for
/// applying techniques without leaking direct candidate access. Besides the
/// candidate state it tracks two pieces of solver bookkeeping:
///
/// - a [`GridStamp`] that changes on every effective mutation, used by shared
///   caches to decide when derived data must be recomputed, and
/// - the set of decided cells whose peer eliminations have already been
///   propagated, used by the naked single technique.
#[derive(Debug, Clone)]
pub struct TechniqueGrid {
    /// Underlying candidate state.
    candidates: CandidateGrid,
    stamp: GridStamp,
    /// Decided cells that have already had their peer eliminations applied.
    decided_propagated: CellSet,
}

impl From<CandidateGrid> for TechniqueGrid {
    fn from(candidates: CandidateGrid) -> Self {
        Self {
            candidates,
            stamp: GridStamp {
                puzzle: PuzzleId::next(),
                revision: 0,
            },
            decided_propagated: CellSet::EMPTY,
        }
    }
}

impl Default for TechniqueGrid {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TechniqueGrid {
    /// Creates an empty technique grid with all candidates available.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::from(CandidateGrid::new())
    }

    /// Returns the current cache-invalidation stamp.
    #[inline]
    #[must_use]
    pub fn stamp(&self) -> GridStamp {
        self.stamp
    }

    /// Consumes the wrapper and returns the underlying candidate grid.
    #[inline]
    #[must_use]
    pub fn into_candidates(self) -> CandidateGrid {
        self.candidates
    }

    fn bump_revision(&mut self) {
        self.stamp.revision += 1;
    }

    /// Places a digit at a position by removing all other candidates at that cell.
    ///
    /// This does not propagate eliminations to peers. Returns `true` if the
    /// grid changed.
    pub fn place(&mut self, pos: Position, digit: Digit) -> bool {
        let mut changed = false;
        for other in self.candidates.candidates_at(pos) {
            if other != digit {
                changed |= self.candidates.remove_candidate(pos, other);
            }
        }
        if changed {
            self.bump_revision();
        }
        changed
    }

    /// Removes a specific digit as a candidate at a position.
    ///
    /// Returns `true` if the candidate was removed.
    pub fn remove_candidate(&mut self, pos: Position, digit: Digit) -> bool {
        let changed = self.candidates.remove_candidate(pos, digit);
        if changed {
            self.bump_revision();
        }
        changed
    }

    /// Removes a candidate digit from all positions specified by a mask.
    ///
    /// Returns `true` if any candidate was removed.
    pub fn remove_candidate_with_mask(&mut self, mask: CellSet, digit: Digit) -> bool {
        let removed = self.candidates.remove_candidates_with_mask(mask, digit);
        if !removed.is_empty() {
            self.bump_revision();
        }
        !removed.is_empty()
    }

    /// Restricts the candidates at a position to exactly `candidates`.
    ///
    /// This is a test-setup convenience; unlike the removal methods it may
    /// also reintroduce candidates.
    pub fn set_candidates(&mut self, pos: Position, candidates: DigitSet) {
        if self.candidates.candidates_at(pos) != candidates {
            self.candidates.set_candidates(pos, candidates);
            self.bump_revision();
        }
    }

    /// Returns the set of all positions where the specified digit can be placed.
    #[inline]
    #[must_use]
    pub fn digit_positions(&self, digit: Digit) -> CellSet {
        self.candidates.digit_positions(digit)
    }

    /// Returns the set of candidate digits that can be placed at a position.
    #[inline]
    #[must_use]
    pub fn candidates_at(&self, pos: Position) -> DigitSet {
        self.candidates.candidates_at(pos)
    }

    /// Returns the positions in a house where the digit can still be placed.
    #[inline]
    #[must_use]
    pub fn house_positions(&self, house: House, digit: Digit) -> CellSet {
        self.candidates.digit_positions(digit) & house.cells()
    }

    /// Checks whether the candidate grid is consistent.
    ///
    /// # Errors
    ///
    /// Returns [`ConsistencyError`] if the grid contains contradictions.
    #[inline]
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        self.candidates.check_consistency()
    }

    /// Returns whether the candidate grid is fully solved.
    #[inline]
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.candidates.is_solved()
    }

    /// Returns all positions that have exactly one candidate (decided cells).
    #[inline]
    #[must_use]
    pub fn decided_cells(&self) -> CellSet {
        self.candidates.decided_cells()
    }

    /// Returns all positions with two or more candidates.
    #[inline]
    #[must_use]
    pub fn undecided_cells(&self) -> CellSet {
        self.candidates.undecided_cells()
    }

    /// Returns the set of decided cells that have already been propagated.
    #[inline]
    #[must_use]
    pub fn decided_propagated(&self) -> CellSet {
        self.decided_propagated
    }

    /// Marks a decided cell as having its peer eliminations applied.
    #[inline]
    pub fn insert_decided_propagated(&mut self, pos: Position) {
        self.decided_propagated.insert(pos);
    }
}
