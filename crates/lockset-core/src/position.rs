//! Cell coordinates on the 9x9 board.
//!
//! This module provides [`Position`], an (x, y) coordinate with box math
//! and peer lookup.

use std::fmt::{self, Debug, Display};

use crate::CellSet;

/// A cell coordinate on the 9x9 board.
///
/// `x` is the column (0-8, left to right) and `y` is the row (0-8, top to
/// bottom). Positions also have a linear index in row-major order (0-80).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    x: u8,
    y: u8,
}

impl Position {
    /// All positions of each row, indexed by `y`.
    pub const ROWS: [[Self; 9]; 9] = {
        let mut rows = [[Self { x: 0, y: 0 }; 9]; 9];
        let mut y: u8 = 0;
        while y < 9 {
            let mut x: u8 = 0;
            while x < 9 {
                rows[y as usize][x as usize] = Self { x, y };
                x += 1;
            }
            y += 1;
        }
        rows
    };

    /// All positions of each column, indexed by `x`.
    pub const COLUMNS: [[Self; 9]; 9] = {
        let mut columns = [[Self { x: 0, y: 0 }; 9]; 9];
        let mut x: u8 = 0;
        while x < 9 {
            let mut y: u8 = 0;
            while y < 9 {
                columns[x as usize][y as usize] = Self { x, y };
                y += 1;
            }
            x += 1;
        }
        columns
    };

    /// All positions of each 3x3 box, indexed by box index
    /// (0-8, left to right, top to bottom).
    pub const BOXES: [[Self; 9]; 9] = {
        let mut boxes = [[Self { x: 0, y: 0 }; 9]; 9];
        let mut b: u8 = 0;
        while b < 9 {
            let mut i: u8 = 0;
            while i < 9 {
                boxes[b as usize][i as usize] = Self::from_box(b, i);
                i += 1;
            }
            b += 1;
        }
        boxes
    };

    /// Creates a position from column and row coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is not in the range 0-8.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        assert!(x < 9 && y < 9);
        Self { x, y }
    }

    /// Creates a position from a linear row-major index (0-80).
    ///
    /// # Panics
    ///
    /// Panics if `index` is 81 or greater.
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        assert!(index < 81);
        Self {
            x: index % 9,
            y: index / 9,
        }
    }

    /// Creates a position from a box index and a cell index within the box
    /// (both 0-8, row-major within the box).
    ///
    /// # Panics
    ///
    /// Panics if either index is 9 or greater.
    #[must_use]
    pub const fn from_box(box_index: u8, cell_index: u8) -> Self {
        assert!(box_index < 9 && cell_index < 9);
        Self {
            x: (box_index % 3) * 3 + cell_index % 3,
            y: (box_index / 3) * 3 + cell_index / 3,
        }
    }

    /// Returns the column coordinate (0-8).
    #[must_use]
    pub const fn x(self) -> u8 {
        self.x
    }

    /// Returns the row coordinate (0-8).
    #[must_use]
    pub const fn y(self) -> u8 {
        self.y
    }

    /// Returns the linear row-major index (0-80).
    #[must_use]
    pub const fn index(self) -> u8 {
        self.y * 9 + self.x
    }

    /// Returns the index of the 3x3 box containing this position.
    #[must_use]
    pub const fn box_index(self) -> u8 {
        (self.y / 3) * 3 + self.x / 3
    }

    /// Returns this position's cell index within its box (0-8).
    #[must_use]
    pub const fn box_cell_index(self) -> u8 {
        (self.y % 3) * 3 + self.x % 3
    }

    /// Returns the 20 cells that share a row, column, or box with this
    /// position (the position itself excluded).
    ///
    /// Two cells are mutually visible exactly when each is in the other's
    /// peer set.
    #[must_use]
    pub fn peers(self) -> CellSet {
        CellSet::PEERS[usize::from(self.index())]
    }
}

impl Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // rYcX is the conventional human-readable cell name
        write!(f, "r{}c{}", self.y + 1, self.x + 1)
    }
}
