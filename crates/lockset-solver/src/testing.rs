//! Test utilities for technique implementations.
//!
//! This module provides [`TechniqueTester`], a testing harness for verifying
//! that sudoku solving techniques work as expected.

use lockset_core::{Digit, DigitSet, Position};

use crate::{BoxedTechniqueStep, Technique, TechniqueApplication, TechniqueGrid};

/// A test harness for verifying technique implementations.
///
/// `TechniqueTester` tracks the initial and current state of a sudoku grid,
/// allowing you to apply techniques and assert that they produce the expected
/// changes.
///
/// # Method Chaining
///
/// All methods return `self`, enabling fluent method chaining for readable tests.
///
/// # Panics
///
/// All assertion methods panic with detailed messages on failure, using
/// `#[track_caller]` to report the correct source location.
#[derive(Debug)]
pub struct TechniqueTester {
    initial: TechniqueGrid,
    current: TechniqueGrid,
    check_find_step_consistency: bool,
}

impl TechniqueTester {
    /// Creates a new tester from an initial grid state.
    pub fn new<T>(initial: T) -> Self
    where
        T: Into<TechniqueGrid>,
    {
        let initial = initial.into();
        let current = initial.clone();
        Self {
            initial,
            current,
            check_find_step_consistency: true,
        }
    }

    /// Disables `find_step`/`apply` consistency checks for this tester.
    ///
    /// When enabled (the default), `apply_*` methods assert that `find_step`
    /// and `apply` agree on whether a step exists and that the reported step
    /// was actually applied.
    #[must_use]
    pub fn without_find_step_consistency(mut self) -> Self {
        self.check_find_step_consistency = false;
        self
    }

    /// Applies the technique once and returns self for chaining.
    ///
    /// # Panics
    ///
    /// Panics if the technique returns an error.
    #[track_caller]
    pub fn apply_once<T>(mut self, technique: &T) -> Self
    where
        T: Technique,
    {
        let before = self.current.clone();
        let changed = technique.apply(&mut self.current).unwrap();
        if self.check_find_step_consistency {
            Self::assert_find_step_consistent_once(technique, &before, &self.current, changed);
        }
        self
    }

    /// Applies the technique repeatedly until it makes no more progress.
    ///
    /// # Panics
    ///
    /// Panics if the technique returns an error.
    #[track_caller]
    pub fn apply_until_stuck<T>(mut self, technique: &T) -> Self
    where
        T: Technique,
    {
        loop {
            let before = self.current.clone();
            let changed = technique.apply(&mut self.current).unwrap();
            if self.check_find_step_consistency {
                Self::assert_find_step_consistent_once(technique, &before, &self.current, changed);
            }
            if !changed {
                break;
            }
        }
        self
    }

    /// Applies the technique a specific number of times.
    ///
    /// # Panics
    ///
    /// Panics if the technique returns an error.
    #[track_caller]
    pub fn apply_times<T>(mut self, technique: &T, times: usize) -> Self
    where
        T: Technique,
    {
        for _ in 0..times {
            let before = self.current.clone();
            let changed = technique.apply(&mut self.current).unwrap();
            if self.check_find_step_consistency {
                Self::assert_find_step_consistent_once(technique, &before, &self.current, changed);
            }
        }
        self
    }

    #[track_caller]
    fn assert_find_step_consistent_once<T>(
        technique: &T,
        before: &TechniqueGrid,
        after: &TechniqueGrid,
        changed: bool,
    ) where
        T: Technique,
    {
        let name = technique.name();
        let step = technique.find_step(before).unwrap();
        match step {
            None => {
                assert!(
                    !changed,
                    "Expected {name} to report no change when find_step returned None"
                );
                Self::assert_candidates_unchanged(before, after);
            }
            Some(step) => {
                assert!(
                    changed,
                    "Expected {name} to report a change when find_step returned a step"
                );
                Self::assert_step_application_applied(before, &step, after);
            }
        }
    }

    #[track_caller]
    fn assert_candidates_unchanged(before: &TechniqueGrid, after: &TechniqueGrid) {
        for digit in Digit::ALL {
            let before_positions = before.digit_positions(digit);
            let after_positions = after.digit_positions(digit);
            assert_eq!(
                before_positions, after_positions,
                "Expected candidates to remain unchanged for {digit:?}"
            );
        }
    }

    #[track_caller]
    fn assert_step_application_applied(
        before: &TechniqueGrid,
        step: &BoxedTechniqueStep,
        after: &TechniqueGrid,
    ) {
        let name = step.technique_name();
        for application in step.application() {
            match application {
                TechniqueApplication::Placement { position, digit } => {
                    let candidates = after.candidates_at(position);
                    assert_eq!(
                        candidates.len(),
                        1,
                        "Expected {position:?} to be decided after applying {name}, but candidates are {candidates:?}"
                    );
                    assert!(
                        candidates.contains(digit),
                        "Expected {position:?} to contain {digit:?} after applying {name}, but candidates are {candidates:?}"
                    );
                }
                TechniqueApplication::CandidateElimination { positions, digits } => {
                    for pos in positions {
                        let before_candidates = before.candidates_at(pos);
                        let after_candidates = after.candidates_at(pos);
                        for digit in digits {
                            if before_candidates.contains(digit) {
                                assert!(
                                    !after_candidates.contains(digit),
                                    "Expected {digit:?} to be removed from {pos:?} after applying {name}, but candidates are {after_candidates:?}"
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    /// Asserts that a cell was placed (decided) with the given digit.
    ///
    /// This verifies that:
    /// - The cell was initially undecided (had multiple candidates)
    /// - The cell is now decided (has exactly one candidate)
    /// - That candidate is the expected digit
    ///
    /// # Panics
    ///
    /// Panics if the cell was not placed as expected.
    #[track_caller]
    pub fn assert_placed(self, pos: Position, digit: Digit) -> Self {
        let initial = self.initial.candidates_at(pos);
        let current = self.current.candidates_at(pos);

        assert!(
            initial.len() > 1,
            "Expected initial cell at {pos:?} to be undecided (>1 candidates), but had {} candidates: {initial:?}",
            initial.len()
        );
        assert_eq!(
            current.len(),
            1,
            "Expected cell at {pos:?} to be decided (1 candidate), but has {} candidates: {current:?}",
            current.len()
        );
        assert!(
            current.contains(digit),
            "Expected cell at {pos:?} to contain {digit:?}, but candidates are: {current:?}"
        );

        self
    }

    /// Asserts that all specified candidates were removed from a cell.
    ///
    /// Other candidates may also have been removed; this method only checks
    /// that the specified ones are gone.
    ///
    /// # Panics
    ///
    /// Panics if any of the specified digits were initially absent or are
    /// still present in the cell's candidates.
    #[track_caller]
    pub fn assert_removed_includes<C>(self, pos: Position, digits: C) -> Self
    where
        C: IntoIterator<Item = Digit>,
    {
        let digits = DigitSet::from_iter(digits);
        let initial = self.initial.candidates_at(pos);
        let current = self.current.candidates_at(pos);
        assert_eq!(
            initial & digits,
            digits,
            "Expected initial candidates at {pos:?} to include {digits:?}, but initial candidates are: {initial:?}"
        );
        assert!(
            (current & digits).is_empty(),
            "Expected all of {digits:?} to be removed from {pos:?}, but {current:?} still contains some: {:?}",
            current & digits
        );
        self
    }

    /// Asserts that exactly the specified candidates were removed from a cell.
    ///
    /// This verifies that the set of removed candidates exactly matches the
    /// specified set - no more, no less.
    ///
    /// # Panics
    ///
    /// Panics if the removed candidates don't exactly match the specified set.
    #[track_caller]
    pub fn assert_removed_exact<C>(self, pos: Position, digits: C) -> Self
    where
        C: IntoIterator<Item = Digit>,
    {
        let digits = DigitSet::from_iter(digits);
        let initial = self.initial.candidates_at(pos);
        let current = self.current.candidates_at(pos);
        let removed = initial.difference(current);
        assert_eq!(
            removed, digits,
            "Expected exactly {digits:?} to be removed from {pos:?}, but removed candidates are: {removed:?} (initial: {initial:?}, current: {current:?})"
        );
        self
    }

    /// Asserts that a cell's candidates are unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the cell's candidates differ from the initial state.
    #[track_caller]
    pub fn assert_no_change(self, pos: Position) -> Self {
        let initial = self.initial.candidates_at(pos);
        let current = self.current.candidates_at(pos);
        assert_eq!(
            initial, current,
            "Expected no change at {pos:?}, but candidates changed from {initial:?} to {current:?}"
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use lockset_core::CandidateGrid;

    use super::*;
    use crate::{BoxedTechnique, SolverError, technique_step::TechniqueStepData};

    #[derive(Debug, Clone, Copy)]
    struct RemoveD1At00;

    impl Technique for RemoveD1At00 {
        fn name(&self) -> &'static str {
            "remove D1 at (0,0)"
        }

        fn clone_box(&self) -> BoxedTechnique {
            Box::new(*self)
        }

        fn find_step(
            &self,
            grid: &TechniqueGrid,
        ) -> Result<Option<BoxedTechniqueStep>, SolverError> {
            let pos = Position::new(0, 0);
            if !grid.candidates_at(pos).contains(Digit::D1) {
                return Ok(None);
            }
            let mut after_grid = grid.clone();
            after_grid.remove_candidate(pos, Digit::D1);
            Ok(Some(Box::new(TechniqueStepData::from_diff(
                self.name(),
                lockset_core::CellSet::from_elem(pos),
                vec![],
                grid,
                &after_grid,
            ))))
        }

        fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
            Ok(grid.remove_candidate(Position::new(0, 0), Digit::D1))
        }
    }

    #[derive(Debug, Clone, Copy)]
    struct NoOpTechnique;

    impl Technique for NoOpTechnique {
        fn name(&self) -> &'static str {
            "no-op"
        }

        fn clone_box(&self) -> BoxedTechnique {
            Box::new(*self)
        }

        fn find_step(
            &self,
            _grid: &TechniqueGrid,
        ) -> Result<Option<BoxedTechniqueStep>, SolverError> {
            Ok(None)
        }

        fn apply(&self, _grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
            Ok(false)
        }
    }

    #[test]
    fn test_apply_once_and_assert_removed() {
        TechniqueTester::new(CandidateGrid::new())
            .apply_once(&RemoveD1At00)
            .assert_removed_exact(Position::new(0, 0), [Digit::D1])
            .assert_no_change(Position::new(1, 0));
    }

    #[test]
    fn test_apply_until_stuck() {
        // The removal applies once, then reports no further change.
        TechniqueTester::new(CandidateGrid::new())
            .apply_until_stuck(&RemoveD1At00)
            .assert_removed_exact(Position::new(0, 0), [Digit::D1]);
    }

    #[test]
    fn test_apply_times_with_no_op() {
        TechniqueTester::new(CandidateGrid::new())
            .apply_times(&NoOpTechnique, 5)
            .assert_no_change(Position::new(0, 0));
    }

    #[test]
    #[should_panic(expected = "Expected no change at")]
    fn test_assert_no_change_fails_when_changed() {
        TechniqueTester::new(CandidateGrid::new())
            .apply_once(&RemoveD1At00)
            .assert_no_change(Position::new(0, 0));
    }

    #[test]
    #[should_panic(expected = "Expected exactly")]
    fn test_assert_removed_exact_fails_on_mismatch() {
        TechniqueTester::new(CandidateGrid::new())
            .apply_once(&RemoveD1At00)
            .assert_removed_exact(Position::new(0, 0), [Digit::D2]);
    }
}
