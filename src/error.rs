//! Errors raised while building or solving the optimisation problem.
use thiserror::Error;

/// An error detected while building the optimisation problem.
///
/// These are raised before anything is handed to a solver, so no partial model is ever produced.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    /// Input series are of the wrong length or contain malformed values
    #[error("Invalid time series data: {0}")]
    DataShape(String),
    /// The cost table does not match the set of technologies
    #[error("Invalid cost table: {0}")]
    Config(String),
    /// An operational or cost parameter is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// The reason a solve did not produce an optimal solution.
#[derive(Debug, Error, PartialEq)]
pub enum SolveFailure {
    /// No dispatch satisfies the constraints for any choice of capacities
    #[error("The problem is infeasible")]
    Infeasible,
    /// The objective can be decreased without limit
    #[error("The problem is unbounded")]
    Unbounded,
    /// The solver backend could not be invoked or failed internally
    #[error("Solver unavailable: {0}")]
    SolverUnavailable(String),
    /// The solver reached its time limit before finding an optimal solution
    #[error("The solver reached its time limit")]
    TimedOut,
}
