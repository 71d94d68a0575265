//! Technique-based sudoku deduction engine.
//!
//! This crate provides a solver that applies human-style solving techniques
//! to a candidate grid, from simple singles up to almost-locked-set (ALS)
//! deductions: ALS-XZ, ALS-XY-Wing, and ALS chains. The ALS techniques share
//! a per-session cache of enumerated sets and their restricted common links,
//! keyed by a grid revision stamp.
//!
//! # Examples
//!
//! ```
//! use lockset_solver::{TechniqueGrid, TechniqueSolver};
//!
//! let solver = TechniqueSolver::with_all_techniques();
//! let mut grid = TechniqueGrid::new();
//!
//! let (solved, stats) = solver.solve(&mut grid)?;
//! println!("solved: {solved}, steps: {}", stats.total_steps());
//! # Ok::<(), lockset_solver::SolverError>(())
//! ```

pub use self::{
    error::*,
    technique::{BoxedTechnique, Technique},
    technique_grid::*,
    technique_solver::*,
    technique_step::*,
};

pub mod als;
mod error;
pub mod technique;
mod technique_grid;
mod technique_solver;
mod technique_step;
pub mod testing;
