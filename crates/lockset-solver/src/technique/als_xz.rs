use std::{cell::RefCell, ops::ControlFlow, rc::Rc};

use lockset_core::{Digit, DigitSet};

use crate::{
    SolverError,
    als::{AlmostLockedSet, AlsRccCache, RccMode},
    technique::{BoxedTechnique, BoxedTechniqueStep, Technique, TechniqueGrid},
    technique_step::TechniqueStepData,
};

const NAME: &str = "ALS-XZ";

/// A technique that eliminates candidates using two linked almost locked sets.
///
/// When two almost locked sets share a restricted common digit `x`, at most
/// one of them can contain `x`, so the other is forced to lock its remaining
/// candidates. Any other digit `z` common to both sets must then land in one
/// of them, and `z` can be removed from every outside cell that sees all of
/// its occurrences in both sets.
///
/// The enumeration of sets and links is shared with the other ALS techniques
/// through an [`AlsRccCache`].
///
/// # Examples
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
///
/// use lockset_solver::{
///     TechniqueGrid,
///     als::AlsRccCache,
///     technique::{AlsXz, Technique},
/// };
///
/// let mut grid = TechniqueGrid::new();
/// let technique = AlsXz::new(Rc::new(RefCell::new(AlsRccCache::new())));
///
/// let changed = technique.apply(&mut grid)?;
/// assert!(!changed); // nothing to find on an empty grid
/// # Ok::<(), lockset_solver::SolverError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AlsXz {
    cache: Rc<RefCell<AlsRccCache>>,
}

impl AlsXz {
    /// Creates a new `AlsXz` technique backed by the given cache.
    #[must_use]
    pub fn new(cache: Rc<RefCell<AlsRccCache>>) -> Self {
        Self { cache }
    }

    #[inline]
    fn apply_with_control_flow<F>(
        &self,
        grid: &mut TechniqueGrid,
        mut on_condition: F,
    ) -> Option<BoxedTechniqueStep>
    where
        F: FnMut(
            &mut TechniqueGrid,
            &AlmostLockedSet,
            &AlmostLockedSet,
            DigitSet,
            Digit,
        ) -> ControlFlow<BoxedTechniqueStep>,
    {
        let mut cache = self.cache.borrow_mut();
        let (alss, rccs) = cache.alss_and_rccs(grid, RccMode::Forward);
        for rcc in rccs.rccs() {
            let a = &alss[rcc.source()];
            let b = &alss[rcc.related()];
            let z_digits = (a.candidates() & b.candidates()).difference(rcc.digits());
            for z in z_digits {
                let targets = (a.buddies(z) & b.buddies(z)).difference(a.cells() | b.cells());
                if grid.remove_candidate_with_mask(targets, z)
                    && let ControlFlow::Break(value) = on_condition(grid, a, b, rcc.digits(), z)
                {
                    return Some(value);
                }
            }
        }
        None
    }
}

impl Technique for AlsXz {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(self.clone())
    }

    fn find_step(&self, grid: &TechniqueGrid) -> Result<Option<BoxedTechniqueStep>, SolverError> {
        let mut after_grid = grid.clone();
        let step = self.apply_with_control_flow(&mut after_grid, |after_grid, a, b, x, z| {
            let cells = a.cells() | b.cells();
            ControlFlow::Break(Box::new(TechniqueStepData::from_diff(
                NAME,
                cells,
                vec![(cells, x), (cells, DigitSet::from_elem(z))],
                grid,
                after_grid,
            )))
        });
        Ok(step)
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
        let mut changed = false;
        self.apply_with_control_flow(grid, |_, _, _, _, _| {
            changed = true;
            ControlFlow::Continue(())
        });
        Ok(changed)
    }
}
