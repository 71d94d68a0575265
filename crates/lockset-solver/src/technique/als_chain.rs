use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

use lockset_core::CellSet;

use crate::{
    PuzzleId, SolverError,
    als::{AlsRccCache, ChainHit, ChainOutcome, ChainSearch, DEFAULT_CHAIN_BUDGET, RccMode},
    technique::{BoxedTechnique, BoxedTechniqueStep, Technique, TechniqueGrid},
    technique_step::TechniqueStepData,
};

const NAME: &str = "ALS Chain";

/// A technique that eliminates candidates using chains of almost locked sets.
///
/// Chains of four or more sets connected by restricted common digits extend
/// the ALS-XZ argument transitively: whichever end of the chain escapes its
/// first link, some set along the chain locks, and a digit common to both end
/// sets can be removed from every outside cell seeing all of its occurrences
/// in both.
///
/// Chain search is the most expensive technique here, so it carries a
/// wall-clock budget. When the budget expires the technique disables itself
/// for the current puzzle and reports no change; other puzzles are
/// unaffected.
///
/// # Examples
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
///
/// use lockset_solver::{
///     TechniqueGrid,
///     als::AlsRccCache,
///     technique::{AlsChain, Technique},
/// };
///
/// let mut grid = TechniqueGrid::new();
/// let technique = AlsChain::new(Rc::new(RefCell::new(AlsRccCache::new())));
///
/// let changed = technique.apply(&mut grid)?;
/// assert!(!changed); // nothing to find on an empty grid
/// # Ok::<(), lockset_solver::SolverError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AlsChain {
    cache: Rc<RefCell<AlsRccCache>>,
    budget: Option<Duration>,
    disabled_for: Cell<Option<PuzzleId>>,
}

impl AlsChain {
    /// Creates a new `AlsChain` technique backed by the given cache, with
    /// the default search budget.
    #[must_use]
    pub fn new(cache: Rc<RefCell<AlsRccCache>>) -> Self {
        Self {
            cache,
            budget: Some(DEFAULT_CHAIN_BUDGET),
            disabled_for: Cell::new(None),
        }
    }

    /// Overrides the search budget. `None` removes the deadline entirely,
    /// which keeps runs deterministic.
    #[must_use]
    pub fn with_budget(mut self, budget: Option<Duration>) -> Self {
        self.budget = budget;
        self
    }

    /// Returns the puzzle this technique has disabled itself for, if any.
    #[must_use]
    pub fn disabled_for(&self) -> Option<PuzzleId> {
        self.disabled_for.get()
    }

    fn search(&self, grid: &TechniqueGrid, single_result: bool) -> ChainOutcome {
        let mut cache = self.cache.borrow_mut();
        let (alss, rccs) = cache.alss_and_rccs(grid, RccMode::AllPairs);
        let outcome = ChainSearch::new()
            .with_budget(self.budget)
            .with_single_result(single_result)
            .run(alss, rccs);
        if outcome.timed_out() {
            self.disabled_for.set(Some(grid.stamp().puzzle()));
            log::warn!("{NAME} search timed out; technique disabled for the current puzzle");
        }
        outcome
    }

    fn apply_hit(grid: &mut TechniqueGrid, hit: &ChainHit) -> bool {
        let mut changed = false;
        for &(pos, digits) in hit.eliminations() {
            for digit in digits {
                changed |= grid.remove_candidate(pos, digit);
            }
        }
        changed
    }
}

impl Technique for AlsChain {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(self.clone())
    }

    fn find_step(&self, grid: &TechniqueGrid) -> Result<Option<BoxedTechniqueStep>, SolverError> {
        if self.disabled_for.get() == Some(grid.stamp().puzzle()) {
            return Ok(None);
        }
        let outcome = self.search(grid, true);
        let Some(hit) = outcome.hits().first() else {
            return Ok(None);
        };

        let mut cache = self.cache.borrow_mut();
        let alss = cache.alss(grid);
        let cells = hit
            .alss()
            .iter()
            .fold(CellSet::EMPTY, |acc, &i| acc | alss[i].cells());
        let digit_cells = hit
            .alss()
            .iter()
            .map(|&i| (alss[i].cells(), alss[i].candidates()))
            .collect();

        let mut after_grid = grid.clone();
        if !Self::apply_hit(&mut after_grid, hit) {
            return Ok(None);
        }
        Ok(Some(Box::new(TechniqueStepData::from_diff(
            NAME,
            cells,
            digit_cells,
            grid,
            &after_grid,
        ))))
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
        if self.disabled_for.get() == Some(grid.stamp().puzzle()) {
            return Ok(false);
        }
        let outcome = self.search(grid, false);
        let mut changed = false;
        // All hits were found against the same snapshot, so they are all
        // simultaneously valid and can be applied together.
        for hit in outcome.hits() {
            changed |= Self::apply_hit(grid, hit);
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use lockset_core::{CandidateGrid, Digit, DigitSet, Position};

    use super::*;
    use crate::testing::TechniqueTester;

    /// Four bivalue pairs forming one chain path:
    ///
    /// {(0,0),(1,0)} -2- {(4,0),(5,0)} -4- {(5,4),(5,5)} -6- {(1,5),(2,5)}
    ///
    /// Digit 9 sits at (0,0) in the first set and (2,5) in the last, so it
    /// falls out of every cell seeing both.
    fn chain_grid() -> CandidateGrid {
        let mut grid = CandidateGrid::new();
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

    fn technique() -> AlsChain {
        AlsChain::new(Rc::new(RefCell::new(AlsRccCache::new())))
    }

    #[test]
    fn test_eliminates_chain_closure_digit() {
        TechniqueTester::new(chain_grid())
            .apply_once(&technique())
            .assert_removed_exact(Position::new(2, 0), [Digit::D9])
            .assert_removed_exact(Position::new(0, 5), [Digit::D9])
            .assert_removed_exact(Position::new(0, 4), [Digit::D9]);
    }

    #[test]
    fn test_no_change_on_fresh_grid() {
        TechniqueTester::new(CandidateGrid::new())
            .apply_once(&technique())
            .assert_no_change(Position::new(0, 0))
            .assert_no_change(Position::new(4, 4));
    }

    #[test]
    fn test_timeout_disables_for_current_puzzle_only() {
        let technique = technique().with_budget(Some(Duration::ZERO));
        let mut grid = TechniqueGrid::from(chain_grid());

        assert!(technique.disabled_for().is_none());
        assert!(!technique.apply(&mut grid).unwrap());
        assert_eq!(technique.disabled_for(), Some(grid.stamp().puzzle()));

        // A different puzzle is unaffected by the disable flag.
        let other = TechniqueGrid::from(chain_grid());
        assert_ne!(technique.disabled_for(), Some(other.stamp().puzzle()));
    }

    #[test]
    fn test_disabled_technique_reports_no_step() {
        let technique = technique().with_budget(Some(Duration::ZERO));
        let mut grid = TechniqueGrid::from(chain_grid());

        assert!(!technique.apply(&mut grid).unwrap());
        assert!(technique.find_step(&grid).unwrap().is_none());
    }

    #[test]
    fn test_find_step_is_read_only() {
        let technique = technique();
        let grid = TechniqueGrid::from(chain_grid());
        let stamp = grid.stamp();

        let step = technique.find_step(&grid).unwrap().unwrap();
        assert_eq!(step.technique_name(), NAME);
        assert_eq!(grid.stamp(), stamp);
        assert!(grid.candidates_at(Position::new(2, 0)).contains(Digit::D9));
    }
}
