//! Sudoku solving techniques.
//!
//! This module provides various techniques for solving Sudoku puzzles.
//! Each technique implements the [`Technique`] trait and can be applied to a
//! technique grid.

use std::{cell::RefCell, rc::Rc};

pub use self::{
    als_chain::AlsChain, als_xy_wing::AlsXyWing, als_xz::AlsXz, hidden_single::HiddenSingle,
    naked_single::NakedSingle, traits::*,
};
pub use crate::{
    technique_grid::TechniqueGrid,
    technique_step::{
        BoxedTechniqueStep, ConditionCells, ConditionDigitCells, TechniqueApplication,
        TechniqueStep, TechniqueStepData,
    },
};
use crate::als::AlsRccCache;

mod als_chain;
mod als_xy_wing;
mod als_xz;
mod hidden_single;
mod naked_single;
mod traits;

/// Returns all available techniques.
///
/// Techniques are ordered from easiest to hardest. The three ALS techniques
/// share one almost-locked-set cache, so a grid snapshot is enumerated at
/// most once per candidate state no matter how many of them run.
#[must_use]
pub fn all_techniques() -> Vec<BoxedTechnique> {
    let cache = Rc::new(RefCell::new(AlsRccCache::new()));
    let mut techniques = fundamental_techniques();
    techniques.push(Box::new(AlsXz::new(Rc::clone(&cache))));
    techniques.push(Box::new(AlsXyWing::new(Rc::clone(&cache))));
    techniques.push(Box::new(AlsChain::new(cache)));
    techniques
}

/// Returns the fundamental techniques.
///
/// These are the most basic logical techniques for solving Sudoku puzzles:
/// - **Naked Single**: A cell with only one remaining candidate
/// - **Hidden Single**: A digit that can only go in one cell within a house
///
/// This set remains stable over time, serving as a consistent baseline even
/// as more advanced techniques are added to [`all_techniques`].
///
/// # Examples
///
/// ```
/// use lockset_solver::technique;
///
/// let techniques = technique::fundamental_techniques();
/// assert_eq!(techniques.len(), 2);
/// ```
#[must_use]
pub fn fundamental_techniques() -> Vec<BoxedTechnique> {
    vec![Box::new(NakedSingle::new()), Box::new(HiddenSingle::new())]
}
