//! A 9-bit set of digits.
//!
//! This module provides [`DigitSet`], a bitset over the digits 1-9 used to
//! represent per-cell candidates and digit selections.

use std::{
    fmt::{self, Debug},
    iter::FusedIterator,
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not},
};

use crate::Digit;

/// A set of candidate digits (1-9), backed by a 9-bit mask.
///
/// Bit `n` represents digit `n + 1`. All set operations are O(1).
///
/// # Examples
///
/// ```
/// use lockset_core::{Digit, DigitSet};
///
/// let a = DigitSet::from_iter([Digit::D1, Digit::D2, Digit::D3]);
/// let b = DigitSet::from_iter([Digit::D2, Digit::D3, Digit::D4]);
///
/// assert_eq!(a & b, DigitSet::from_iter([Digit::D2, Digit::D3]));
/// assert_eq!((a | b).len(), 4);
/// assert_eq!(a.difference(b), DigitSet::from_elem(Digit::D1));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigitSet {
    bits: u16,
}

const MASK: u16 = (1 << 9) - 1;

impl DigitSet {
    /// The empty set.
    pub const EMPTY: Self = Self { bits: 0 };

    /// The set containing all nine digits.
    pub const FULL: Self = Self { bits: MASK };

    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Creates a set containing a single digit.
    #[must_use]
    pub const fn from_elem(digit: Digit) -> Self {
        Self {
            bits: 1 << digit.bit_index(),
        }
    }

    /// Adds a digit to the set. Returns `true` if it was not already present.
    pub const fn insert(&mut self, digit: Digit) -> bool {
        let bit = 1 << digit.bit_index();
        let added = self.bits & bit == 0;
        self.bits |= bit;
        added
    }

    /// Removes a digit from the set. Returns `true` if it was present.
    pub const fn remove(&mut self, digit: Digit) -> bool {
        let bit = 1 << digit.bit_index();
        let removed = self.bits & bit != 0;
        self.bits &= !bit;
        removed
    }

    /// Returns `true` if the set contains the digit.
    #[must_use]
    pub const fn contains(self, digit: Digit) -> bool {
        self.bits & (1 << digit.bit_index()) != 0
    }

    /// Returns the number of digits in the set.
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

    /// Returns `true` if every digit of `self` is in `other`.
    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.bits & !other.bits == 0
    }

    /// Returns the digits in `self` but not in `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self {
            bits: self.bits & !other.bits,
        }
    }

    /// If the set holds exactly one digit, returns it.
    #[must_use]
    pub fn as_single(self) -> Option<Digit> {
        (self.len() == 1).then(|| self.smallest_unchecked())
    }

    /// If the set holds exactly two digits, returns them in ascending order.
    #[must_use]
    pub fn as_double(self) -> Option<(Digit, Digit)> {
        if self.len() != 2 {
            return None;
        }
        let first = self.smallest_unchecked();
        let rest = self.difference(Self::from_elem(first));
        Some((first, rest.smallest_unchecked()))
    }

    /// Returns the smallest digit in the set.
    #[must_use]
    pub fn smallest(self) -> Option<Digit> {
        (!self.is_empty()).then(|| self.smallest_unchecked())
    }

    #[expect(clippy::cast_possible_truncation)]
    fn smallest_unchecked(self) -> Digit {
        debug_assert!(!self.is_empty());
        Digit::from_value(self.bits.trailing_zeros() as u8 + 1)
    }

    /// Returns an iterator over the digits in ascending order.
    #[must_use]
    pub const fn iter(self) -> DigitSetIter {
        DigitSetIter { bits: self.bits }
    }
}

impl Default for DigitSet {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Debug for DigitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl BitAnd for DigitSet {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self {
            bits: self.bits & rhs.bits,
        }
    }
}

impl BitAndAssign for DigitSet {
    fn bitand_assign(&mut self, rhs: Self) {
        self.bits &= rhs.bits;
    }
}

impl BitOr for DigitSet {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitOrAssign for DigitSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl BitXor for DigitSet {
    type Output = Self;
    fn bitxor(self, rhs: Self) -> Self {
        Self {
            bits: self.bits ^ rhs.bits,
        }
    }
}

impl BitXorAssign for DigitSet {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.bits ^= rhs.bits;
    }
}

impl Not for DigitSet {
    type Output = Self;
    fn not(self) -> Self {
        Self {
            bits: !self.bits & MASK,
        }
    }
}

impl FromIterator<Digit> for DigitSet {
    fn from_iter<I: IntoIterator<Item = Digit>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for digit in iter {
            set.insert(digit);
        }
        set
    }
}

impl IntoIterator for DigitSet {
    type Item = Digit;
    type IntoIter = DigitSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the digits of a [`DigitSet`] in ascending order.
#[derive(Debug, Clone)]
pub struct DigitSetIter {
    bits: u16,
}

impl Iterator for DigitSetIter {
    type Item = Digit;

    #[expect(clippy::cast_possible_truncation)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let index = self.bits.trailing_zeros() as u8;
        self.bits &= self.bits - 1;
        Some(Digit::from_value(index + 1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl FusedIterator for DigitSetIter {}
impl ExactSizeIterator for DigitSetIter {}
