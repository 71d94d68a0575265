use std::{cell::RefCell, ops::ControlFlow, rc::Rc};

use lockset_core::{Digit, DigitSet};

use crate::{
    SolverError,
    als::{AlmostLockedSet, AlsRccCache, RccMode},
    technique::{BoxedTechnique, BoxedTechniqueStep, Technique, TechniqueGrid},
    technique_step::TechniqueStepData,
};

const NAME: &str = "ALS-XY-Wing";

/// A technique that eliminates candidates using three almost locked sets.
///
/// A pivot set B is linked to two wing sets A and C on distinct restricted
/// common digits `x` and `y`. B cannot lock both links at once, so at least
/// one of A and C locks its remaining candidates. Any digit `z` common to A
/// and C (other than `x` and `y`) must then land in one of them, and `z` can
/// be removed from every outside cell seeing all of its occurrences in both
/// wings.
///
/// The pivot enumeration walks the full directed link table, which the shared
/// [`AlsRccCache`] derives from the forward scan by mirroring when possible.
///
/// # Examples
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
///
/// use lockset_solver::{
///     TechniqueGrid,
///     als::AlsRccCache,
///     technique::{AlsXyWing, Technique},
/// };
///
/// let mut grid = TechniqueGrid::new();
/// let technique = AlsXyWing::new(Rc::new(RefCell::new(AlsRccCache::new())));
///
/// let changed = technique.apply(&mut grid)?;
/// assert!(!changed); // nothing to find on an empty grid
/// # Ok::<(), lockset_solver::SolverError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AlsXyWing {
    cache: Rc<RefCell<AlsRccCache>>,
}

impl AlsXyWing {
    /// Creates a new `AlsXyWing` technique backed by the given cache.
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
            [&AlmostLockedSet; 3],
            (Digit, Digit),
            Digit,
        ) -> ControlFlow<BoxedTechniqueStep>,
    {
        let mut cache = self.cache.borrow_mut();
        let (alss, rccs) = cache.alss_and_rccs(grid, RccMode::AllPairs);
        for pivot in 0..alss.len() {
            let outgoing = rccs.outgoing(pivot);
            for (i, first) in outgoing.iter().enumerate() {
                for second in &outgoing[i + 1..] {
                    let a = &alss[first.related()];
                    let c = &alss[second.related()];
                    if a.overlaps(c) {
                        continue;
                    }
                    for x in first.digits() {
                        for y in second.digits() {
                            if x == y {
                                continue;
                            }
                            let mut links = DigitSet::from_elem(x);
                            links.insert(y);
                            let z_digits = (a.candidates() & c.candidates()).difference(links);
                            for z in z_digits {
                                let targets = (a.buddies(z) & c.buddies(z))
                                    .difference(a.cells() | c.cells());
                                if grid.remove_candidate_with_mask(targets, z)
                                    && let ControlFlow::Break(value) = on_condition(
                                        grid,
                                        [a, &alss[pivot], c],
                                        (x, y),
                                        z,
                                    )
                                {
                                    return Some(value);
                                }
                            }
                        }
                    }
                }
            }
        }
        None
    }
}

impl Technique for AlsXyWing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn clone_box(&self) -> BoxedTechnique {
        Box::new(self.clone())
    }

    fn find_step(&self, grid: &TechniqueGrid) -> Result<Option<BoxedTechniqueStep>, SolverError> {
        let mut after_grid = grid.clone();
        let step = self.apply_with_control_flow(&mut after_grid, |after_grid, [a, b, c], _, z| {
            let cells = a.cells() | b.cells() | c.cells();
            ControlFlow::Break(Box::new(TechniqueStepData::from_diff(
                NAME,
                cells,
                vec![(cells, DigitSet::from_elem(z))],
                grid,
                after_grid,
            )))
        });
        Ok(step)
    }

    fn apply(&self, grid: &mut TechniqueGrid) -> Result<bool, SolverError> {
        let mut changed = false;
        self.apply_with_control_flow(grid, |_, _, _, _| {
            changed = true;
            ControlFlow::Continue(())
        });
        Ok(changed)
    }
}
