//! Almost locked sets and the links between them.
//!
//! An *almost locked set* (ALS) is a group of N empty cells in one house
//! sharing exactly N+1 candidate digits. Removing any one digit from the
//! group would lock it, which is what makes ALSs useful for deductions: a
//! digit *restricted* between two ALSs (every occurrence in one set sees
//! every occurrence in the other) forces one of the two sets to lock.
//!
//! This module provides the building blocks consumed by the ALS-based
//! techniques in [`crate::technique`]:
//!
//! - [`AlmostLockedSet`] and [`collect_alss`]: enumeration per house with
//!   precomputed per-digit support and visibility sets.
//! - [`RestrictedCommon`] and [`RccSet`]: the restricted common candidates
//!   linking ALS pairs, in forward-only and all-pairs variants.
//! - [`AlsRccCache`]: a cache shared by all ALS techniques so the quadratic
//!   link computation runs once per grid state.
//! - [`ChainSearch`]: the depth-bounded, memo-pruned walk over links that
//!   finds elimination chains of four or more ALSs.

use std::time::Duration;

pub use self::{
    cache::AlsRccCache,
    chain::{ChainHit, ChainOutcome, ChainSearch},
    rcc::{RccMode, RccSet, RestrictedCommon},
    set::{AlmostLockedSet, collect_alss},
};

mod cache;
mod chain;
mod rcc;
mod set;

/// Maximum number of cells in an enumerated ALS.
///
/// Larger sets exist but contribute almost no additional eliminations while
/// inflating the pairwise link computation. Tuned empirically, not derived.
pub const MAX_ALS_SIZE: usize = 5;

/// Capacity bound for the ALS array. Enumeration truncates beyond this.
pub const MAX_ALS_COUNT: usize = 512;

/// Capacity bound for the restricted-common array.
pub const MAX_RCC_COUNT: usize = 7168;

/// Maximum number of ALSs in a chain.
///
/// Long enough to find all chains observed in practice while keeping the
/// search bounded.
pub const MAX_CHAIN_ALSS: usize = 26;

/// Default wall-clock budget for one chain search.
pub const DEFAULT_CHAIN_BUDGET: Duration = Duration::from_secs(1);
