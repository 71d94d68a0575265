//! Core data structures for sudoku deduction.
//!
//! This crate provides the fundamental types used by the solving layer:
//!
//! - [`digit`]: Type-safe representation of sudoku digits 1-9
//! - [`digit_set`]: A 9-bit set of digits
//! - [`position`]: Board position (x, y) coordinates
//! - [`cell_set`]: An 81-bit set of board cells with precomputed house and
//!   peer tables
//! - [`house`]: Rows, columns, and 3×3 boxes
//! - [`candidate_grid`]: Board-wide candidate tracking with consistency
//!   checks
//!
//! # Examples
//!
//! ```
//! use lockset_core::{CandidateGrid, Digit, Position};
//!
//! let mut grid = CandidateGrid::new();
//! grid.place(Position::new(4, 4), Digit::D5);
//!
//! let candidates = grid.candidates_at(Position::new(4, 5));
//! assert!(!candidates.contains(Digit::D5)); // 5 removed from same column
//! ```

pub mod candidate_grid;
pub mod cell_set;
pub mod digit;
pub mod digit_set;
pub mod house;
pub mod position;

// Re-export commonly used types
pub use self::{
    candidate_grid::{CandidateGrid, ConsistencyError},
    cell_set::CellSet,
    digit::Digit,
    digit_set::DigitSet,
    house::House,
    position::Position,
};
