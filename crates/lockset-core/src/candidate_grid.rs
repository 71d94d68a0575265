//! Candidate bitboard for sudoku deduction.
//!
//! This module provides [`CandidateGrid`], which tracks possible placements
//! for each digit across the 9x9 board using one [`CellSet`] per digit.

use derive_more::{Display, Error};

use crate::{CellSet, Digit, DigitSet, Position};

/// A contradiction found in a [`CandidateGrid`].
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyError {
    /// A cell has no remaining candidate.
    #[display("cell {position} has no candidate")]
    EmptyCell {
        /// The contradictory cell.
        position: Position,
    },
    /// A decided digit appears more than once in a house.
    #[display("digit {digit} at {position} conflicts with another placement")]
    DuplicateDigit {
        /// The duplicated digit.
        digit: Digit,
        /// One of the conflicting cells.
        position: Position,
    },
}

/// Candidate bitboard tracking possible placements for each digit.
///
/// Internally stores 9 [`CellSet`]s, one per digit, each holding the board
/// positions where that digit can still be placed. A cell whose candidate
/// set has shrunk to a single digit is *decided*.
///
/// # Examples
///
/// ```
/// use lockset_core::{CandidateGrid, Digit, Position};
///
/// let mut grid = CandidateGrid::new();
/// grid.place(Position::new(4, 4), Digit::D5);
///
/// let candidates = grid.candidates_at(Position::new(4, 5));
/// assert!(!candidates.contains(Digit::D5)); // removed from the column
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateGrid {
    /// `digits[d]` holds the possible positions for digit `d + 1`.
    digits: [CellSet; 9],
}

impl Default for CandidateGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateGrid {
    /// Creates a grid with every position available for every digit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            digits: [CellSet::FULL; 9],
        }
    }

    fn cells(&self, digit: Digit) -> &CellSet {
        &self.digits[usize::from(digit.bit_index())]
    }

    fn cells_mut(&mut self, digit: Digit) -> &mut CellSet {
        &mut self.digits[usize::from(digit.bit_index())]
    }

    /// Places a digit at a position and updates candidates accordingly.
    ///
    /// Removes all other candidates at the position and removes the digit
    /// from every peer of the position.
    pub fn place(&mut self, pos: Position, digit: Digit) {
        for cells in &mut self.digits {
            cells.remove(pos);
        }
        let cells = self.cells_mut(digit);
        *cells = cells.difference(pos.peers());
        cells.insert(pos);
    }

    /// Removes a digit as a candidate at a position.
    ///
    /// Returns `true` if the candidate was present.
    pub fn remove_candidate(&mut self, pos: Position, digit: Digit) -> bool {
        self.cells_mut(digit).remove(pos)
    }

    /// Removes a digit as a candidate from every cell in `mask`.
    ///
    /// Returns the cells where the candidate was actually present.
    pub fn remove_candidates_with_mask(&mut self, mask: CellSet, digit: Digit) -> CellSet {
        let cells = self.cells_mut(digit);
        let removed = *cells & mask;
        *cells = cells.difference(mask);
        removed
    }

    /// Restricts the candidates at a position to exactly `candidates`.
    ///
    /// Digits outside the set are removed; digits inside it are inserted
    /// even if previously removed.
    pub fn set_candidates(&mut self, pos: Position, candidates: DigitSet) {
        for digit in Digit::ALL {
            if candidates.contains(digit) {
                self.cells_mut(digit).insert(pos);
            } else {
                self.cells_mut(digit).remove(pos);
            }
        }
    }

    /// Returns the positions where the digit can still be placed.
    #[must_use]
    pub fn digit_positions(&self, digit: Digit) -> CellSet {
        *self.cells(digit)
    }

    /// Returns the set of candidate digits at a position.
    #[must_use]
    pub fn candidates_at(&self, pos: Position) -> DigitSet {
        Digit::ALL
            .into_iter()
            .filter(|&digit| self.cells(digit).contains(pos))
            .collect()
    }

    /// Returns the cells with exactly one remaining candidate.
    #[must_use]
    pub fn decided_cells(&self) -> CellSet {
        self.classify_cells().1
    }

    /// Returns the cells with two or more remaining candidates.
    #[must_use]
    pub fn undecided_cells(&self) -> CellSet {
        let (empty, decided) = self.classify_cells();
        !(empty | decided)
    }

    /// Classifies positions into `(empty_cells, decided_cells)`.
    ///
    /// Single pass over the nine digit bitboards. Positions with two or
    /// more candidates land in neither set.
    fn classify_cells(&self) -> (CellSet, CellSet) {
        let mut empty_cells = CellSet::FULL;
        let mut decided_cells = CellSet::EMPTY;
        for &digit in &self.digits {
            decided_cells &= !digit;
            decided_cells |= empty_cells & digit;
            empty_cells &= !digit;
        }
        (empty_cells, decided_cells)
    }

    /// Checks the grid for contradictions.
    ///
    /// # Errors
    ///
    /// Returns [`ConsistencyError::EmptyCell`] if any position lost all of
    /// its candidates, or [`ConsistencyError::DuplicateDigit`] if a decided
    /// digit still appears among the candidates of a peer decided to the
    /// same digit.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        let (empty_cells, decided_cells) = self.classify_cells();
        if let Some(position) = empty_cells.smallest() {
            return Err(ConsistencyError::EmptyCell { position });
        }
        for digit in Digit::ALL {
            let placed = *self.cells(digit) & decided_cells;
            for position in placed {
                if placed.intersects(position.peers()) {
                    return Err(ConsistencyError::DuplicateDigit { digit, position });
                }
            }
        }
        Ok(())
    }

    /// Returns `true` if all 81 cells are decided and consistent.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        let (empty_cells, decided_cells) = self.classify_cells();
        empty_cells.is_empty() && decided_cells.len() == 81 && self.check_consistency().is_ok()
    }
}
