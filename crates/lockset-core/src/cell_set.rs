//! An 81-bit set of board cells.
//!
//! This module provides [`CellSet`], a bitset over all cells of the 9x9
//! board, along with precomputed row, column, box, and peer tables.

use std::{
    fmt::{self, Debug},
    iter::FusedIterator,
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not},
};

use crate::Position;

const MASK: u128 = (1 << 81) - 1;

const fn bit(index: u8) -> u128 {
    1 << index
}

const fn row_bits(y: u8) -> u128 {
    0x1FF << (y * 9)
}

const fn column_bits(x: u8) -> u128 {
    let mut bits = 0;
    let mut y = 0;
    while y < 9 {
        bits |= bit(y * 9 + x);
        y += 1;
    }
    bits
}

const fn box_bits(box_index: u8) -> u128 {
    let mut bits = 0;
    let mut i = 0;
    while i < 9 {
        bits |= bit(Position::from_box(box_index, i).index());
        i += 1;
    }
    bits
}

/// A set of board cells, backed by an 81-bit mask.
///
/// Bit `n` represents the position with row-major index `n`. All set
/// operations are O(1); iteration yields [`Position`]s in index order.
///
/// # Examples
///
/// ```
/// use lockset_core::{CellSet, Position};
///
/// let row = CellSet::ROW_CELLS[0];
/// let column = CellSet::COLUMN_CELLS[0];
/// let corner = row & column;
/// assert_eq!(corner.len(), 1);
/// assert!(corner.contains(Position::new(0, 0)));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSet {
    bits: u128,
}

impl CellSet {
    /// The empty set.
    pub const EMPTY: Self = Self { bits: 0 };

    /// The set containing all 81 cells.
    pub const FULL: Self = Self { bits: MASK };

    /// The cells of each row, indexed by `y`.
    pub const ROW_CELLS: [Self; 9] = {
        let mut cells = [Self::EMPTY; 9];
        let mut y: u8 = 0;
        while y < 9 {
            cells[y as usize] = Self { bits: row_bits(y) };
            y += 1;
        }
        cells
    };

    /// The cells of each column, indexed by `x`.
    pub const COLUMN_CELLS: [Self; 9] = {
        let mut cells = [Self::EMPTY; 9];
        let mut x: u8 = 0;
        while x < 9 {
            cells[x as usize] = Self {
                bits: column_bits(x),
            };
            x += 1;
        }
        cells
    };

    /// The cells of each 3x3 box, indexed by box index.
    pub const BOX_CELLS: [Self; 9] = {
        let mut cells = [Self::EMPTY; 9];
        let mut b: u8 = 0;
        while b < 9 {
            cells[b as usize] = Self { bits: box_bits(b) };
            b += 1;
        }
        cells
    };

    /// Per-cell peer sets: the 20 cells sharing a row, column, or box with
    /// the indexing cell, the cell itself excluded.
    pub const PEERS: [Self; 81] = {
        let mut peers = [Self::EMPTY; 81];
        let mut index: u8 = 0;
        while index < 81 {
            let pos = Position::from_index(index);
            let bits = (row_bits(pos.y()) | column_bits(pos.x()) | box_bits(pos.box_index()))
                & !bit(index);
            peers[index as usize] = Self { bits };
            index += 1;
        }
        peers
    };

    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Creates a set containing a single cell.
    #[must_use]
    pub const fn from_elem(pos: Position) -> Self {
        Self {
            bits: bit(pos.index()),
        }
    }

    /// Adds a cell to the set. Returns `true` if it was not already present.
    pub const fn insert(&mut self, pos: Position) -> bool {
        let bit = bit(pos.index());
        let added = self.bits & bit == 0;
        self.bits |= bit;
        added
    }

    /// Removes a cell from the set. Returns `true` if it was present.
    pub const fn remove(&mut self, pos: Position) -> bool {
        let bit = bit(pos.index());
        let removed = self.bits & bit != 0;
        self.bits &= !bit;
        removed
    }

    /// Returns `true` if the set contains the cell.
    #[must_use]
    pub const fn contains(self, pos: Position) -> bool {
        self.bits & bit(pos.index()) != 0
    }

    /// Returns the number of cells in the set.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Returns `true` if the two sets share at least one cell.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.bits & other.bits != 0
    }

    /// Returns `true` if every cell of `self` is in `other`.
    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.bits & !other.bits == 0
    }

    /// Returns `true` if every cell of `other` is in `self`.
    #[must_use]
    pub const fn is_superset(self, other: Self) -> bool {
        other.is_subset(self)
    }

    /// Returns the cells in `self` but not in `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self {
            bits: self.bits & !other.bits,
        }
    }

    /// If the set holds exactly one cell, returns it.
    #[must_use]
    pub fn as_single(self) -> Option<Position> {
        (self.len() == 1).then(|| self.smallest_unchecked())
    }

    /// Returns the cell with the smallest index in the set.
    #[must_use]
    pub fn smallest(self) -> Option<Position> {
        (!self.is_empty()).then(|| self.smallest_unchecked())
    }

    #[expect(clippy::cast_possible_truncation)]
    fn smallest_unchecked(self) -> Position {
        debug_assert!(!self.is_empty());
        Position::from_index(self.bits.trailing_zeros() as u8)
    }

    /// Returns an iterator over the cells in index order.
    #[must_use]
    pub const fn iter(self) -> CellSetIter {
        CellSetIter { bits: self.bits }
    }
}

impl Default for CellSet {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl BitAnd for CellSet {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self {
            bits: self.bits & rhs.bits,
        }
    }
}

impl BitAndAssign for CellSet {
    fn bitand_assign(&mut self, rhs: Self) {
        self.bits &= rhs.bits;
    }
}

impl BitOr for CellSet {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitOrAssign for CellSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl BitXor for CellSet {
    type Output = Self;
    fn bitxor(self, rhs: Self) -> Self {
        Self {
            bits: self.bits ^ rhs.bits,
        }
    }
}

impl BitXorAssign for CellSet {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.bits ^= rhs.bits;
    }
}

impl Not for CellSet {
    type Output = Self;
    fn not(self) -> Self {
        Self {
            bits: !self.bits & MASK,
        }
    }
}

impl FromIterator<Position> for CellSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for pos in iter {
            set.insert(pos);
        }
        set
    }
}

impl IntoIterator for CellSet {
    type Item = Position;
    type IntoIter = CellSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the cells of a [`CellSet`] in index order.
#[derive(Debug, Clone)]
pub struct CellSetIter {
    bits: u128,
}

impl Iterator for CellSetIter {
    type Item = Position;

    #[expect(clippy::cast_possible_truncation)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let index = self.bits.trailing_zeros() as u8;
        self.bits &= self.bits - 1;
        Some(Position::from_index(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = CellSet { bits: self.bits }.len();
        (n, Some(n))
    }
}

impl FusedIterator for CellSetIter {}
impl ExactSizeIterator for CellSetIter {}
