use derive_more::{Display, Error, From};
use lockset_core::ConsistencyError;

/// Errors produced while applying solving techniques.
#[derive(Debug, Display, Error, From, Clone, Copy, PartialEq, Eq)]
pub enum SolverError {
    /// The grid contains a contradiction.
    #[display("inconsistent grid: {_0}")]
    Inconsistent(ConsistencyError),
}
