use lockset_core::{CellSet, Digit, DigitSet, Position};

use crate::{
    SolverError,
    technique::{
        BoxedTechnique, BoxedTechniqueStep, ConditionCells, ConditionDigitCells, Technique,
        TechniqueApplication, TechniqueGrid, TechniqueStep,
    },
};

const NAME: &str = "Naked Single";

/// A technique that finds cells with only one remaining candidate and propagates constraints.
///
/// When a cell has only one possible digit (a "naked single"), that digit is
/// placed in that cell, and then constraint propagation is performed by
/// removing that digit from all peers of the cell.
///
/// This technique is fundamental to the solver's architecture: it handles all
/// constraint propagation for the system. Other techniques only identify and
/// place digits; the subsequent constraint propagation is performed when
/// control returns to this technique.
///
/// # Examples
///
/// ```
/// use lockset_solver::{
///     TechniqueGrid,
///     technique::{NakedSingle, Technique},
/// };
///
/// let mut grid = TechniqueGrid::new();
/// let technique = NakedSingle::new();
///
/// let changed = technique.apply(&mut grid)?;
/// assert!(!changed); // nothing to propagate on an empty grid
/// # Ok::<(), lockset_solver::SolverError>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct NakedSingle;

impl NakedSingle {
    /// Creates a new `NakedSingle` technique.
    #[must_use]
    pub const fn new() -> Self {
        NakedSingle
    }
}

#[derive(Debug, Clone)]
pub struct NakedSingleStep {
    position: Position,
    digit: Digit,
    affected_positions: CellSet,
}

impl NakedSingleStep {
    fn new(position: Position, digit: Digit, affected_positions: CellSet) -> Self {
        Self {
            position,
            digit,
            affected_positions,
        }
    }
}

impl TechniqueStep for NakedSingleStep {
    fn technique_name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechniqueStep {
        Box::new(self.clone())
    }

    fn condition_cells(&self) -> ConditionCells {
        CellSet::from_elem(self.position)
    }

    fn condition_digit_cells(&self) -> ConditionDigitCells {
        vec![(
            CellSet::from_elem(self.position),
            DigitSet::from_elem(self.digit),
        )]
    }

    fn application(&self) -> Vec<TechniqueApplication> {
        vec![
            TechniqueApplication::Placement {
                position: self.position,
                digit: self.digit,
            },
            TechniqueApplication::CandidateElimination {
                positions: self.affected_positions,
                digits: DigitSet::from_elem(self.digit),
            },
        ]
    }
}

impl Technique for NakedSingle {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn find_step(&self, grid: &TechniqueGrid) -> Result<Option<BoxedTechniqueStep>, SolverError> {
        let decided_cells = grid.decided_cells();
        for digit in Digit::ALL {
            let decided_digit_positions =
                grid.digit_positions(digit) & decided_cells & !grid.decided_propagated();
            for pos in decided_digit_positions {
                let affected_pos = pos.peers() & grid.digit_positions(digit);
                if !affected_pos.is_empty() {
                    return Ok(Some(Box::new(NakedSingleStep::new(
                        pos,
                        digit,
                        affected_pos,
                    ))));
                }
            }
        }
        Ok(None)
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
        let mut changed = false;

        let decided_cells = grid.decided_cells();
        for digit in Digit::ALL {
            let decided_digit_positions =
                grid.digit_positions(digit) & decided_cells & !grid.decided_propagated();
            for pos in decided_digit_positions {
                grid.insert_decided_propagated(pos);
                changed |= grid.remove_candidate_with_mask(pos.peers(), digit);
            }
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use lockset_core::{CandidateGrid, Digit, DigitSet, Position};

    use super::*;
    use crate::testing::TechniqueTester;

    /// Decides a cell without propagating to its peers, leaving the
    /// propagation for the technique under test.
    fn decide(grid: &mut CandidateGrid, pos: Position, digit: Digit) {
        grid.set_candidates(pos, DigitSet::from_elem(digit));
    }

    #[test]
    fn test_propagates_naked_single() {
        // When a cell has only one candidate, that digit is removed from
        // all cells in the same row, column, and box
        let mut grid = CandidateGrid::new();
        decide(&mut grid, Position::new(0, 0), Digit::D5);

        TechniqueTester::new(grid)
            .apply_once(&NakedSingle::new())
            // D5 removed from same row
            .assert_removed_exact(Position::new(1, 0), [Digit::D5])
            // D5 removed from same column
            .assert_removed_exact(Position::new(0, 1), [Digit::D5])
            // D5 removed from same box
            .assert_removed_exact(Position::new(1, 1), [Digit::D5]);
    }

    #[test]
    fn test_propagates_multiple_naked_singles() {
        // Multiple naked singles in different regions are all propagated
        let mut grid = CandidateGrid::new();
        decide(&mut grid, Position::new(0, 0), Digit::D3);
        decide(&mut grid, Position::new(5, 5), Digit::D7);

        TechniqueTester::new(grid)
            .apply_once(&NakedSingle::new())
            // D3 removed from a cell in same row as (0, 0)
            .assert_removed_exact(Position::new(1, 0), [Digit::D3])
            // D7 removed from a cell in same column as (5, 5)
            .assert_removed_exact(Position::new(5, 4), [Digit::D7]);
    }

    #[test]
    fn test_no_change_when_no_naked_singles() {
        let grid = CandidateGrid::new();

        TechniqueTester::new(grid)
            .apply_once(&NakedSingle::new())
            .assert_no_change(Position::new(0, 0))
            .assert_no_change(Position::new(4, 4));
    }

    #[test]
    fn test_already_propagated_cell_is_skipped() {
        let mut grid = CandidateGrid::new();
        decide(&mut grid, Position::new(0, 0), Digit::D5);

        let technique = NakedSingle::new();
        let mut grid = crate::TechniqueGrid::from(grid);
        assert!(technique.apply(&mut grid).unwrap());
        // The second pass has nothing left to propagate.
        assert!(!technique.apply(&mut grid).unwrap());
    }
}
