use std::ops::ControlFlow;

use lockset_core::{Digit, DigitSet, House, Position};

use crate::{
    SolverError,
    technique::{
        BoxedTechnique, BoxedTechniqueStep, ConditionCells, ConditionDigitCells, Technique,
        TechniqueApplication, TechniqueGrid, TechniqueStep,
    },
};

const NAME: &str = "Hidden Single";

/// A technique that finds digits that can only go in one position within a house.
///
/// A "hidden single" occurs when a digit has only one possible position in a
/// row, column, or box, even though that cell may have multiple candidates.
///
/// # Examples
///
/// ```
/// use lockset_solver::{
///     TechniqueGrid,
///     technique::{HiddenSingle, Technique},
/// };
///
/// let mut grid = TechniqueGrid::new();
/// let technique = HiddenSingle::new();
///
/// let changed = technique.apply(&mut grid)?;
/// assert!(!changed); // no hidden singles on an empty grid
/// # Ok::<(), lockset_solver::SolverError>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenSingle {}

impl HiddenSingle {
    /// Creates a new `HiddenSingle` technique.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

#[derive(Debug, Clone)]
pub struct HiddenSingleStep {
    house: House,
    digit: Digit,
    application: Vec<TechniqueApplication>,
}

impl HiddenSingleStep {
    fn new(house: House, digit: Digit, application: Vec<TechniqueApplication>) -> Self {
        HiddenSingleStep {
            house,
            digit,
            application,
        }
    }
}

impl TechniqueStep for HiddenSingleStep {
    fn technique_name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechniqueStep {
        Box::new(self.clone())
    }

    fn condition_cells(&self) -> ConditionCells {
        self.house.cells()
    }

    fn condition_digit_cells(&self) -> ConditionDigitCells {
        vec![(self.house.cells(), DigitSet::from_elem(self.digit))]
    }

    fn application(&self) -> Vec<TechniqueApplication> {
        self.application.clone()
    }
}

impl HiddenSingle {
    #[inline]
    fn apply_with_control_flow<F>(
        grid: &mut TechniqueGrid,
        mut on_condition: F,
    ) -> Option<HiddenSingleStep>
    where
        F: for<'a> FnMut(
            &'a mut TechniqueGrid,
            House,
            Position,
            Digit,
        ) -> ControlFlow<HiddenSingleStep>,
    {
        let decided_cells = grid.decided_cells();
        for digit in Digit::ALL {
            let undecided_digit_positions = grid.digit_positions(digit) & !decided_cells;
            for house in House::ALL {
                if let Some(pos) = (undecided_digit_positions & house.cells()).as_single()
                    && grid.place(pos, digit)
                    && let ControlFlow::Break(value) = on_condition(grid, house, pos, digit)
                {
                    return Some(value);
                }
            }
        }
        None
    }
}

impl Technique for HiddenSingle {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(*self)
    }

    fn find_step(&self, grid: &TechniqueGrid) -> Result<Option<BoxedTechniqueStep>, SolverError> {
        let mut after_grid = grid.clone();
        let step =
            Self::apply_with_control_flow(&mut after_grid, |after_grid, house, pos, digit| {
                let mut app = crate::technique_step::collect_applications_from_diff(grid, after_grid);
                app.push(TechniqueApplication::Placement {
                    position: pos,
                    digit,
                });
                ControlFlow::Break(HiddenSingleStep::new(house, digit, app))
            });
        Ok(step.map(|step| step.clone_box()))
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
        let mut changed = false;
        Self::apply_with_control_flow(grid, |_, _, _, _| {
            changed = true;
            ControlFlow::Continue(())
        });
        Ok(changed)
    }
}
