use lockset_core::DigitSet;

use super::{AlmostLockedSet, MAX_RCC_COUNT};

/// A restricted common candidate link between two ALSs.
///
/// Up to two digits may be restricted between the same pair; a third cannot
/// occur on a solvable grid. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestrictedCommon {
    source: u16,
    related: u16,
    digits: DigitSet,
}

impl RestrictedCommon {
    /// Index of the ALS this link starts from.
    #[inline]
    #[must_use]
    pub fn source(self) -> usize {
        usize::from(self.source)
    }

    /// Index of the ALS this link leads to.
    #[inline]
    #[must_use]
    pub fn related(self) -> usize {
        usize::from(self.related)
    }

    /// The restricted digits (one or two).
    #[inline]
    #[must_use]
    pub fn digits(self) -> DigitSet {
        self.digits
    }
}

/// Which links to compute and keep.
///
/// The variant is chosen once per technique: pairwise consumers only need
/// each unordered pair once ([`Forward`]), while the chain search walks
/// links in either direction and needs per-source slices ([`AllPairs`]).
/// The `NoOverlap` variants additionally drop pairs that share cells, for
/// consumers whose deduction does not tolerate overlap.
///
/// [`Forward`]: RccMode::Forward
/// [`AllPairs`]: RccMode::AllPairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RccMode {
    /// Each unordered pair once, overlapping pairs allowed.
    Forward,
    /// Each unordered pair once, overlapping pairs skipped.
    ForwardNoOverlap,
    /// Both directions, grouped by source index; overlapping pairs allowed.
    AllPairs,
    /// Both directions, grouped by source index; overlapping pairs skipped.
    AllPairsNoOverlap,
}

impl RccMode {
    fn allow_overlap(self) -> bool {
        matches!(self, Self::Forward | Self::AllPairs)
    }

    fn directed(self) -> bool {
        matches!(self, Self::AllPairs | Self::AllPairsNoOverlap)
    }

    /// The forward variant whose results this mode can be expanded from.
    pub(crate) fn forward_source(self) -> Option<Self> {
        match self {
            Self::AllPairs => Some(Self::Forward),
            Self::AllPairsNoOverlap => Some(Self::ForwardNoOverlap),
            Self::Forward | Self::ForwardNoOverlap => None,
        }
    }
}

/// The restricted common candidates of one ALS array.
///
/// For the directed variants, links are grouped by ascending source index
/// and [`outgoing`](Self::outgoing) returns the slice for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RccSet {
    mode: RccMode,
    rccs: Vec<RestrictedCommon>,
    /// Per-source (start, end) into `rccs`; empty for forward variants.
    spans: Vec<(u32, u32)>,
}

impl RccSet {
    /// Computes the links of `alss` for the given mode.
    ///
    /// Stops with a warning once [`MAX_RCC_COUNT`] links have been
    /// collected; the result is then partial.
    #[must_use]
    pub fn find(alss: &[AlmostLockedSet], mode: RccMode) -> Self {
        let mut rccs = Vec::new();
        'pairs: for (i, a) in alss.iter().enumerate() {
            for (j, b) in alss.iter().enumerate().skip(i + 1) {
                if !mode.allow_overlap() && a.overlaps(b) {
                    continue;
                }
                let digits = restricted_digits(a, b);
                if digits.is_empty() {
                    continue;
                }
                if rccs.len() == MAX_RCC_COUNT {
                    log::warn!("restricted common capacity {MAX_RCC_COUNT} reached, truncating");
                    break 'pairs;
                }
                #[expect(clippy::cast_possible_truncation)]
                rccs.push(RestrictedCommon {
                    source: i as u16,
                    related: j as u16,
                    digits,
                });
            }
        }
        let forward = Self {
            mode: match mode.forward_source() {
                Some(forward) => forward,
                None => mode,
            },
            rccs,
            spans: Vec::new(),
        };
        if mode.directed() {
            forward.expand(alss.len())
        } else {
            forward
        }
    }

    /// Re-emits forward-only results in both directions, grouping links by
    /// source index and building the per-source spans.
    ///
    /// This avoids a second pairwise scan when a directed variant is needed
    /// and the matching forward variant has already been computed.
    #[must_use]
    pub fn expand(&self, als_count: usize) -> Self {
        debug_assert!(!self.mode.directed());
        let mut rccs = Vec::with_capacity((self.rccs.len() * 2).min(MAX_RCC_COUNT));
        for rcc in &self.rccs {
            if rccs.len() + 2 > MAX_RCC_COUNT {
                log::warn!("restricted common capacity {MAX_RCC_COUNT} reached, truncating");
                break;
            }
            rccs.push(*rcc);
            rccs.push(RestrictedCommon {
                source: rcc.related,
                related: rcc.source,
                digits: rcc.digits,
            });
        }
        rccs.sort_unstable_by_key(|rcc| (rcc.source, rcc.related));

        let mut spans = vec![(0, 0); als_count];
        let mut start = 0;
        while start < rccs.len() {
            let source = rccs[start].source();
            let end = rccs[start..]
                .iter()
                .position(|rcc| rcc.source() != source)
                .map_or(rccs.len(), |offset| start + offset);
            #[expect(clippy::cast_possible_truncation)]
            {
                spans[source] = (start as u32, end as u32);
            }
            start = end;
        }

        let mode = match self.mode {
            RccMode::Forward => RccMode::AllPairs,
            RccMode::ForwardNoOverlap => RccMode::AllPairsNoOverlap,
            directed @ (RccMode::AllPairs | RccMode::AllPairsNoOverlap) => directed,
        };
        Self { mode, rccs, spans }
    }

    /// The variant these links were computed for.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> RccMode {
        self.mode
    }

    /// All links, in source order.
    #[inline]
    #[must_use]
    pub fn rccs(&self) -> &[RestrictedCommon] {
        &self.rccs
    }

    /// The links starting at `source`. Only populated for directed modes.
    #[inline]
    #[must_use]
    pub fn outgoing(&self, source: usize) -> &[RestrictedCommon] {
        debug_assert!(self.mode.directed());
        let (start, end) = self.spans[source];
        &self.rccs[start as usize..end as usize]
    }
}

/// Returns the digits restricted between two ALSs (at most two).
///
/// A digit is restricted when every cell able to hold it in either set sees
/// every other such cell, and none of those cells lies in the sets' overlap.
fn restricted_digits(a: &AlmostLockedSet, b: &AlmostLockedSet) -> DigitSet {
    let common = a.candidates() & b.candidates();
    if common.is_empty() {
        return DigitSet::EMPTY;
    }
    let overlap = a.cells() & b.cells();
    let mut digits = DigitSet::EMPTY;
    for digit in common {
        let either = a.support(digit) | b.support(digit);
        if !overlap.is_empty() && either.intersects(overlap) {
            continue;
        }
        if either.is_subset(a.reach(digit) & b.reach(digit)) {
            digits.insert(digit);
            if digits.len() == 2 {
                break;
            }
        }
    }
    digits
}

#[cfg(test)]
mod tests {
    use lockset_core::{Digit, DigitSet, Position};

    use super::*;
    use crate::{TechniqueGrid, als::collect_alss};

    /// Two bivalue pairs in row 0 linked on digit 3.
    fn linked_pair_grid() -> TechniqueGrid {
        let mut grid = TechniqueGrid::new();
        // Set A in box 0, set B in box 2, all four cells in row 0. Digit 3
        // occurs in (1,0) and (7,0) only, which see each other along the
        // row, so 3 is restricted between A and B.
        grid.set_candidates(Position::new(0, 0), DigitSet::from_iter([Digit::D1, Digit::D2]));
        grid.set_candidates(Position::new(1, 0), DigitSet::from_iter([Digit::D2, Digit::D3]));
        grid.set_candidates(Position::new(6, 0), DigitSet::from_iter([Digit::D4, Digit::D5]));
        grid.set_candidates(Position::new(7, 0), DigitSet::from_iter([Digit::D5, Digit::D3]));
        grid
    }

    fn find_als(alss: &[AlmostLockedSet], cells: &[Position]) -> usize {
        let cells: lockset_core::CellSet = cells.iter().copied().collect();
        alss.iter().position(|als| als.cells() == cells).unwrap()
    }

    #[test]
    fn test_restriction_detected() {
        let grid = linked_pair_grid();
        let alss = collect_alss(&grid);
        let a = find_als(&alss, &[Position::new(0, 0), Position::new(1, 0)]);
        let b = find_als(&alss, &[Position::new(6, 0), Position::new(7, 0)]);

        let set = RccSet::find(&alss, RccMode::Forward);
        let link = set
            .rccs()
            .iter()
            .find(|rcc| {
                (rcc.source() == a && rcc.related() == b)
                    || (rcc.source() == b && rcc.related() == a)
            })
            .unwrap();
        assert!(link.digits().contains(Digit::D3));
    }

    #[test]
    fn test_rcc_validity() {
        let grid = linked_pair_grid();
        let alss = collect_alss(&grid);
        let set = RccSet::find(&alss, RccMode::Forward);

        for rcc in set.rccs() {
            let a = &alss[rcc.source()];
            let b = &alss[rcc.related()];
            let overlap = a.cells() & b.cells();
            for digit in rcc.digits() {
                let cells = a.support(digit) | b.support(digit);
                assert!(!cells.intersects(overlap));
                for from in cells {
                    for to in cells {
                        assert!(
                            from == to || from.peers().contains(to),
                            "all occurrences of a restricted digit must see each other"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_unrestricted_digit_rejected() {
        let mut grid = TechniqueGrid::new();
        // Digit 3 occurs at (1,0) and (7,4): no shared house, no link.
        grid.set_candidates(Position::new(0, 0), DigitSet::from_iter([Digit::D1, Digit::D2]));
        grid.set_candidates(Position::new(1, 0), DigitSet::from_iter([Digit::D2, Digit::D3]));
        grid.set_candidates(Position::new(6, 4), DigitSet::from_iter([Digit::D4, Digit::D5]));
        grid.set_candidates(Position::new(7, 4), DigitSet::from_iter([Digit::D5, Digit::D3]));

        let alss = collect_alss(&grid);
        let a = find_als(&alss, &[Position::new(0, 0), Position::new(1, 0)]);
        let b = find_als(&alss, &[Position::new(6, 4), Position::new(7, 4)]);

        let set = RccSet::find(&alss, RccMode::Forward);
        assert!(set.rccs().iter().all(|rcc| {
            let pair = (rcc.source(), rcc.related());
            pair != (a, b) && pair != (b, a)
        }));
    }

    #[test]
    fn test_expand_groups_by_source() {
        let grid = linked_pair_grid();
        let alss = collect_alss(&grid);
        let forward = RccSet::find(&alss, RccMode::Forward);
        let directed = forward.expand(alss.len());

        assert_eq!(directed.mode(), RccMode::AllPairs);
        assert_eq!(directed.rccs().len(), forward.rccs().len() * 2);

        // Every forward link appears in both directions.
        for rcc in forward.rccs() {
            assert!(
                directed
                    .outgoing(rcc.related())
                    .iter()
                    .any(|back| back.related() == rcc.source() && back.digits() == rcc.digits())
            );
        }
        // Spans cover exactly the links with the matching source.
        for source in 0..alss.len() {
            for rcc in directed.outgoing(source) {
                assert_eq!(rcc.source(), source);
            }
        }
    }

    #[test]
    fn test_find_directed_matches_expand() {
        let grid = linked_pair_grid();
        let alss = collect_alss(&grid);
        let direct = RccSet::find(&alss, RccMode::AllPairs);
        let expanded = RccSet::find(&alss, RccMode::Forward).expand(alss.len());
        assert_eq!(direct, expanded);
    }
}
