use lockset_core::{CellSet, Digit, DigitSet, House, Position};

use super::{MAX_ALS_COUNT, MAX_ALS_SIZE};
use crate::TechniqueGrid;

/// A group of N cells in one house sharing exactly N+1 candidate digits.
///
/// Immutable once built. Besides the defining cell and candidate sets, an
/// ALS carries per-digit derivatives precomputed for the link and chain
/// computations:
///
/// - `support(d)`: the cells of the set that can hold `d`.
/// - `buddies(d)`: cells outside the set, able to hold `d`, that see every
///   occurrence of `d` inside the set. These are the only cells a
///   restriction on `d` can act through.
/// - `reach(d) = support(d) ∪ buddies(d)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlmostLockedSet {
    cells: CellSet,
    candidates: DigitSet,
    house: House,
    digit_cells: [CellSet; 9],
    digit_buddies: [CellSet; 9],
    digit_reach: [CellSet; 9],
    all_buddies: CellSet,
}

impl AlmostLockedSet {
    fn build(grid: &TechniqueGrid, house: House, cells: CellSet, candidates: DigitSet) -> Self {
        let mut digit_cells = [CellSet::EMPTY; 9];
        let mut digit_buddies = [CellSet::EMPTY; 9];
        let mut digit_reach = [CellSet::EMPTY; 9];
        let mut all_buddies = CellSet::EMPTY;
        for digit in candidates {
            let support = grid.digit_positions(digit) & cells;
            let mut buddies = grid.digit_positions(digit).difference(cells);
            for pos in support {
                buddies &= pos.peers();
            }
            let i = usize::from(digit.bit_index());
            digit_cells[i] = support;
            digit_buddies[i] = buddies;
            digit_reach[i] = support | buddies;
            all_buddies |= buddies;
        }
        Self {
            cells,
            candidates,
            house,
            digit_cells,
            digit_buddies,
            digit_reach,
            all_buddies,
        }
    }

    /// Returns the cells of the set.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> CellSet {
        self.cells
    }

    /// Returns the shared candidate digits.
    #[inline]
    #[must_use]
    pub fn candidates(&self) -> DigitSet {
        self.candidates
    }

    /// Returns the house containing the set.
    #[inline]
    #[must_use]
    pub fn house(&self) -> House {
        self.house
    }

    /// Returns the cells of the set that can hold the digit.
    #[inline]
    #[must_use]
    pub fn support(&self, digit: Digit) -> CellSet {
        self.digit_cells[usize::from(digit.bit_index())]
    }

    /// Returns the outside cells holding the digit that see every occurrence
    /// of it inside the set.
    #[inline]
    #[must_use]
    pub fn buddies(&self, digit: Digit) -> CellSet {
        self.digit_buddies[usize::from(digit.bit_index())]
    }

    /// Returns `support(digit) | buddies(digit)`.
    #[inline]
    #[must_use]
    pub fn reach(&self, digit: Digit) -> CellSet {
        self.digit_reach[usize::from(digit.bit_index())]
    }

    /// Returns the union of `buddies` over all candidate digits.
    #[inline]
    #[must_use]
    pub fn all_buddies(&self) -> CellSet {
        self.all_buddies
    }

    /// Returns `true` if the two sets share at least one cell.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.cells.intersects(other.cells)
    }

    /// Returns `true` if one set's cells contain the other's.
    ///
    /// Such a pair cannot appear in the same chain (a "tangle").
    #[inline]
    #[must_use]
    pub fn tangles_with(&self, other: &Self) -> bool {
        self.cells.is_subset(other.cells) || other.cells.is_subset(self.cells)
    }
}

/// Enumerates all almost locked sets of the current grid state.
///
/// Scans every house for cell groups of 2 to [`MAX_ALS_SIZE`] cells whose
/// combined candidates number exactly one more than the group size. A group
/// using every empty cell of its house is skipped, as is a cell set already
/// collected from another house (a small group in a box-line intersection
/// would otherwise appear twice). Enumeration stops at [`MAX_ALS_COUNT`]
/// sets with a warning; callers see a partial but valid result.
#[must_use]
pub fn collect_alss(grid: &TechniqueGrid) -> Vec<AlmostLockedSet> {
    let mut alss = Vec::new();
    let undecided = grid.undecided_cells();
    let mut pool = Vec::with_capacity(9);
    let mut picked = Vec::with_capacity(MAX_ALS_SIZE);

    'houses: for house in House::ALL {
        let free = house.cells() & undecided;
        let max_degree = MAX_ALS_SIZE.min(free.len().saturating_sub(1));
        for degree in 2..=max_degree {
            // A cell with more than degree+1 candidates cannot belong here.
            pool.clear();
            pool.extend(
                free.iter()
                    .filter(|&pos| grid.candidates_at(pos).len() <= degree + 1),
            );
            if pool.len() < degree {
                continue;
            }
            picked.clear();
            let completed = each_combination(&pool, degree, &mut picked, &mut |group| {
                let candidates = group
                    .iter()
                    .map(|&pos| grid.candidates_at(pos))
                    .fold(DigitSet::EMPTY, |acc, set| acc | set);
                if candidates.len() != degree + 1 {
                    return true;
                }
                let cells: CellSet = group.iter().copied().collect();
                if alss.iter().any(|als: &AlmostLockedSet| als.cells() == cells) {
                    return true;
                }
                if alss.len() == MAX_ALS_COUNT {
                    return false;
                }
                alss.push(AlmostLockedSet::build(grid, house, cells, candidates));
                true
            });
            if !completed {
                log::warn!("almost locked set capacity {MAX_ALS_COUNT} reached, truncating");
                break 'houses;
            }
        }
    }
    alss
}

/// Visits every `degree`-combination of `pool` in lexicographic order.
///
/// The callback returns `false` to abort; the function then returns `false`.
fn each_combination(
    pool: &[Position],
    degree: usize,
    picked: &mut Vec<Position>,
    visit: &mut impl FnMut(&[Position]) -> bool,
) -> bool {
    if picked.len() == degree {
        return visit(picked);
    }
    let needed = degree - picked.len();
    for i in 0..=pool.len().saturating_sub(needed) {
        picked.push(pool[i]);
        let keep_going = each_combination(&pool[i + 1..], degree, picked, visit);
        picked.pop();
        if !keep_going {
            return false;
        }
    }
    true
}
