//! Solver backends and the code for solving a [`ModelSpec`].
//!
//! The optimisation problem is handed to a solver as a solver-agnostic [`LinearProgram`], so any
//! backend implementing [`SolverBackend`] can be used.
use crate::error::SolveFailure;
use crate::formulation::ModelSpec;
use crate::lp::LinearProgram;
use crate::solution::Solution;
use log::{debug, info};

pub mod highs_backend;
pub use highs_backend::HighsBackend;

/// The name of the solver backend used if the user hasn't specified one
pub const DEFAULT_SOLVER: &str = "highs";

/// Options controlling a single solve
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveOptions {
    /// Maximum wall-clock time for the solve in seconds (no limit if `None`)
    pub time_limit: Option<f64>,
    /// Whether to let the solver print its own progress output
    pub verbose: bool,
}

/// The raw output of a successful solve
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolution {
    /// The value of each column, in column order
    pub columns: Vec<f64>,
    /// The dual value of each row, in row order
    pub row_duals: Vec<f64>,
}

/// A solver which can find the optimal solution of a [`LinearProgram`]
pub trait SolverBackend {
    /// The name of the backend, as used in settings files
    fn name(&self) -> &'static str;

    /// Solve the problem.
    ///
    /// # Returns
    ///
    /// The optimal values of all columns and the duals of all rows, or the reason that no optimal
    /// solution was found.
    fn solve(
        &self,
        problem: &LinearProgram,
        options: &SolveOptions,
    ) -> Result<RawSolution, SolveFailure>;
}

/// Get the solver backend with the given name.
///
/// Returns [`SolveFailure::SolverUnavailable`] if there is no such backend.
pub fn get_backend(name: &str) -> Result<Box<dyn SolverBackend>, SolveFailure> {
    match name.to_lowercase().as_str() {
        "highs" => Ok(Box::new(HighsBackend)),
        _ => Err(SolveFailure::SolverUnavailable(format!(
            "Unknown solver backend '{name}'"
        ))),
    }
}

/// Solve the optimisation problem and extract the results.
///
/// # Arguments
///
/// * `spec` - The problem to solve
/// * `backend` - The solver to use
/// * `options` - Options for the solver
///
/// # Returns
///
/// A fully populated [`Solution`], or the reason no optimal solution could be found. No partial
/// results are returned.
pub fn solve(
    spec: &ModelSpec,
    backend: &dyn SolverBackend,
    options: &SolveOptions,
) -> Result<Solution, SolveFailure> {
    info!(
        "Solving problem with {} variables and {} constraints using {}",
        spec.problem().num_columns(),
        spec.problem().num_rows(),
        backend.name()
    );
    if let Some(time_limit) = options.time_limit {
        debug!("Solver time limit: {time_limit}s");
    }

    let raw = backend.solve(spec.problem(), options)?;
    let solution = Solution::from_raw(spec, raw)?;

    info!("Optimal objective value: {:.6e}", solution.objective);
    debug!("Constraint residuals: {:?}", solution.residuals);

    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_backend() {
        assert_eq!(get_backend("highs").unwrap().name(), "highs");
        assert_eq!(get_backend("HiGHS").unwrap().name(), "highs");
        assert_eq!(get_backend(DEFAULT_SOLVER).unwrap().name(), "highs");
    }

    #[test]
    fn test_get_backend_unknown() {
        assert_eq!(
            get_backend("gurobi").err().unwrap(),
            SolveFailure::SolverUnavailable("Unknown solver backend 'gurobi'".into())
        );
    }
}
