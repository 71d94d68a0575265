use crate::{
    SolverError, TechniqueGrid,
    technique::{self, BoxedTechnique, BoxedTechniqueStep},
};

/// Statistics collected during technique-based solving.
///
/// This structure tracks which techniques were applied and how many times,
/// as well as the total number of solving steps taken.
///
/// # Examples
///
/// ```
/// use lockset_solver::{TechniqueGrid, TechniqueSolver};
///
/// let solver = TechniqueSolver::with_all_techniques();
/// let mut grid = TechniqueGrid::new();
///
/// let (_solved, stats) = solver.solve(&mut grid)?;
/// println!("Total steps: {}", stats.total_steps());
/// # Ok::<(), lockset_solver::SolverError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TechniqueSolverStats {
    applications: Vec<usize>,
    total_steps: usize,
}

impl TechniqueSolverStats {
    /// Returns technique application counts in solver order.
    ///
    /// Includes techniques that were never applied with a count of `0`.
    #[must_use]
    pub fn applications(&self) -> &[usize] {
        &self.applications
    }

    /// Returns the total number of solving steps taken.
    ///
    /// This is the sum of all technique applications.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Returns `true` if any technique was applied at least once.
    #[must_use]
    pub fn has_progress(&self) -> bool {
        self.total_steps > 0
    }
}

/// A solver that applies human-like solving techniques to a Sudoku grid.
///
/// `TechniqueSolver` iterates through a list of techniques in order, applying
/// the first technique that makes progress. When a technique succeeds, the
/// solver returns to allow the caller to check the grid state. This allows
/// for step-by-step solving or continuous solving until stuck.
///
/// # Examples
///
/// ```
/// use lockset_solver::{TechniqueGrid, TechniqueSolver};
///
/// let solver = TechniqueSolver::with_all_techniques();
/// let mut grid = TechniqueGrid::new();
///
/// let (solved, stats) = solver.solve(&mut grid)?;
/// if solved {
///     println!("Puzzle solved in {} steps!", stats.total_steps());
/// } else {
///     println!("Stuck after {} steps", stats.total_steps());
/// }
/// # Ok::<(), lockset_solver::SolverError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TechniqueSolver {
    techniques: Vec<BoxedTechnique>,
}

impl TechniqueSolver {
    /// Creates a new solver with the specified techniques.
    ///
    /// Techniques are applied in the order they appear in the vector.
    /// When a technique makes progress, the solver stops and returns,
    /// allowing the next call to start from the first technique again.
    #[must_use]
    pub fn new(techniques: Vec<BoxedTechnique>) -> Self {
        Self { techniques }
    }

    /// Creates a new solver with all available techniques.
    ///
    /// Techniques are ordered from easiest to hardest, as defined by
    /// [`technique::all_techniques`].
    #[must_use]
    pub fn with_all_techniques() -> Self {
        Self {
            techniques: technique::all_techniques(),
        }
    }

    /// Creates a statistics object aligned with this solver's technique order.
    #[must_use]
    pub fn new_stats(&self) -> TechniqueSolverStats {
        TechniqueSolverStats {
            applications: vec![0; self.techniques.len()],
            total_steps: 0,
        }
    }

    /// Returns the configured techniques in application order.
    ///
    /// The returned slice defines the index mapping used by
    /// [`TechniqueSolverStats::applications`].
    #[must_use]
    pub fn techniques(&self) -> &[BoxedTechnique] {
        &self.techniques
    }

    /// Applies one step of solving by trying each technique in order.
    ///
    /// Iterates through the list of techniques, applying the first one that
    /// makes progress. When a technique succeeds, the statistics are updated
    /// and the method returns immediately.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A technique was applied and made progress
    /// * `Ok(false)` - No technique could make progress (solver is stuck)
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Inconsistent`] if the grid is or becomes
    /// inconsistent.
    pub fn step(
        &self,
        grid: &mut TechniqueGrid,
        stats: &mut TechniqueSolverStats,
    ) -> Result<bool, SolverError> {
        debug_assert_eq!(self.techniques.len(), stats.applications.len());
        grid.check_consistency()?;

        for (i, technique) in self.techniques.iter().enumerate() {
            if technique.apply(grid)? {
                stats.applications[i] += 1;
                stats.total_steps += 1;
                grid.check_consistency()?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Finds the next available hint step without mutating the grid.
    ///
    /// Returns `Ok(None)` when no technique can provide a step.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Inconsistent`] if the grid is inconsistent.
    pub fn find_step(
        &self,
        grid: &TechniqueGrid,
    ) -> Result<Option<BoxedTechniqueStep>, SolverError> {
        grid.check_consistency()?;
        for technique in &self.techniques {
            if let Some(step) = technique.find_step(grid)? {
                return Ok(Some(step));
            }
        }
        Ok(None)
    }

    /// Applies techniques repeatedly until the grid is solved or no progress
    /// can be made.
    ///
    /// # Returns
    ///
    /// Returns a tuple `(solved, stats)` where:
    /// * `solved` - `true` if the grid is completely solved, `false` if stuck
    /// * `stats` - Statistics about which techniques were applied and how often
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Inconsistent`] if the grid becomes inconsistent
    /// during solving.
    pub fn solve(
        &self,
        grid: &mut TechniqueGrid,
    ) -> Result<(bool, TechniqueSolverStats), SolverError> {
        let mut stats = self.new_stats();
        let solved = self.solve_with_stats(grid, &mut stats)?;
        Ok((solved, stats))
    }

    /// Applies techniques repeatedly until the grid is solved or no progress
    /// can be made, using the provided statistics object.
    ///
    /// This is similar to [`solve`](Self::solve), but allows accumulating
    /// statistics across multiple solving attempts.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Inconsistent`] if the grid becomes inconsistent
    /// during solving.
    pub fn solve_with_stats(
        &self,
        grid: &mut TechniqueGrid,
        stats: &mut TechniqueSolverStats,
    ) -> Result<bool, SolverError> {
        while self.step(grid, stats)? {
            if grid.is_solved() {
                return Ok(true);
            }
        }
        Ok(grid.is_solved())
    }
}
