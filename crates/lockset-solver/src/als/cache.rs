use super::{AlmostLockedSet, RccMode, RccSet, collect_alss};
use crate::{GridStamp, TechniqueGrid};

/// Shared ALS and restricted-common cache for one solving session.
///
/// Several techniques run against the same grid state in sequence; the
/// pairwise link computation is quadratic and dominates their runtime, so
/// it is computed once here and shared. The cache is keyed by the grid's
/// [`GridStamp`]: ALSs are recomputed when the stamp changes, links when
/// the ALSs changed or a different [`RccMode`] is requested. A directed
/// request served while the matching forward results are cached reuses
/// them via [`RccSet::expand`] instead of rescanning all pairs.
///
/// One cache instance is created per technique set and handed to each ALS
/// technique; it is single-threaded by design.
#[derive(Debug, Default)]
pub struct AlsRccCache {
    stamp: Option<GridStamp>,
    alss: Vec<AlmostLockedSet>,
    rccs: Option<RccSet>,
    als_computations: u64,
    rcc_computations: u64,
}

impl AlsRccCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn refresh_alss(&mut self, grid: &TechniqueGrid) {
        if self.stamp != Some(grid.stamp()) {
            self.alss = collect_alss(grid);
            self.stamp = Some(grid.stamp());
            self.rccs = None;
            self.als_computations += 1;
        }
    }

    /// Returns the ALSs of the current grid state, recomputing only when
    /// the grid's stamp has changed.
    pub fn alss(&mut self, grid: &TechniqueGrid) -> &[AlmostLockedSet] {
        self.refresh_alss(grid);
        &self.alss
    }

    /// Returns the ALSs and their links for the requested mode.
    ///
    /// Links are recomputed when the ALSs were refreshed or the cached mode
    /// differs from the requested one.
    pub fn alss_and_rccs(
        &mut self,
        grid: &TechniqueGrid,
        mode: RccMode,
    ) -> (&[AlmostLockedSet], &RccSet) {
        self.refresh_alss(grid);
        let up_to_date = self.rccs.as_ref().is_some_and(|set| set.mode() == mode);
        if !up_to_date {
            let set = match (self.rccs.take(), mode.forward_source()) {
                (Some(prev), Some(forward)) if prev.mode() == forward => {
                    prev.expand(self.alss.len())
                }
                _ => RccSet::find(&self.alss, mode),
            };
            self.rccs = Some(set);
            self.rcc_computations += 1;
        }
        match &self.rccs {
            Some(set) => (&self.alss, set),
            None => unreachable!(),
        }
    }

    /// Number of times the ALS array has been recomputed.
    #[must_use]
    pub fn als_computations(&self) -> u64 {
        self.als_computations
    }

    /// Number of times the link set has been recomputed.
    #[must_use]
    pub fn rcc_computations(&self) -> u64 {
        self.rcc_computations
    }
}

#[cfg(test)]
mod tests {
    use lockset_core::{Digit, DigitSet, Position};

    use super::*;

    fn busy_grid() -> TechniqueGrid {
        let mut grid = TechniqueGrid::new();
        grid.set_candidates(Position::new(0, 0), DigitSet::from_iter([Digit::D1, Digit::D2]));
        grid.set_candidates(Position::new(1, 0), DigitSet::from_iter([Digit::D2, Digit::D3]));
        grid.set_candidates(Position::new(6, 0), DigitSet::from_iter([Digit::D4, Digit::D5]));
        grid.set_candidates(Position::new(7, 0), DigitSet::from_iter([Digit::D3, Digit::D5]));
        grid
    }

    #[test]
    fn test_same_stamp_reuses_alss() {
        let grid = busy_grid();
        let mut cache = AlsRccCache::new();

        let first = cache.alss(&grid).to_vec();
        let second = cache.alss(&grid).to_vec();

        assert_eq!(first, second);
        assert_eq!(cache.als_computations(), 1);
    }

    #[test]
    fn test_changed_stamp_recomputes() {
        let mut grid = busy_grid();
        let mut cache = AlsRccCache::new();

        let _ = cache.alss(&grid);
        grid.remove_candidate(Position::new(8, 8), Digit::D9);
        let _ = cache.alss(&grid);

        assert_eq!(cache.als_computations(), 2);
    }

    #[test]
    fn test_distinct_puzzles_never_share() {
        let a = busy_grid();
        let b = busy_grid();
        let mut cache = AlsRccCache::new();

        let _ = cache.alss(&a);
        let _ = cache.alss(&b);
        let _ = cache.alss(&a);

        // Same candidate contents, but three recomputations: the puzzle id
        // tells the sessions apart.
        assert_eq!(cache.als_computations(), 3);
    }

    #[test]
    fn test_rcc_mode_switch_recomputes() {
        let grid = busy_grid();
        let mut cache = AlsRccCache::new();

        let _ = cache.alss_and_rccs(&grid, RccMode::Forward);
        let _ = cache.alss_and_rccs(&grid, RccMode::Forward);
        assert_eq!(cache.rcc_computations(), 1);

        let _ = cache.alss_and_rccs(&grid, RccMode::AllPairs);
        assert_eq!(cache.rcc_computations(), 2);
        assert_eq!(cache.als_computations(), 1, "ALSs stay cached across modes");
    }

    #[test]
    fn test_recycled_expansion_matches_direct_find() {
        let grid = busy_grid();

        let mut recycled = AlsRccCache::new();
        let _ = recycled.alss_and_rccs(&grid, RccMode::Forward);
        let (_, from_forward) = recycled.alss_and_rccs(&grid, RccMode::AllPairs);
        let from_forward = from_forward.clone();

        let mut direct = AlsRccCache::new();
        let (_, computed) = direct.alss_and_rccs(&grid, RccMode::AllPairs);

        assert_eq!(&from_forward, computed);
    }

    #[test]
    fn test_grid_mutation_marks_rccs_dirty() {
        let mut grid = busy_grid();
        let mut cache = AlsRccCache::new();

        let _ = cache.alss_and_rccs(&grid, RccMode::Forward);
        grid.remove_candidate(Position::new(8, 8), Digit::D9);
        let _ = cache.alss_and_rccs(&grid, RccMode::Forward);

        assert_eq!(cache.rcc_computations(), 2);
    }
}
