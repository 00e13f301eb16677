//! A solver backend using the HiGHS solver.
use super::{RawSolution, SolveOptions, SolverBackend};
use crate::error::SolveFailure;
use crate::lp::LinearProgram;
use highs::{HighsModelStatus, RowProblem as Problem, Sense, SolvedModel};
use log::debug;

/// Solves problems with HiGHS
#[derive(Debug, Clone, Copy, Default)]
pub struct HighsBackend;

impl SolverBackend for HighsBackend {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve(
        &self,
        problem: &LinearProgram,
        options: &SolveOptions,
    ) -> Result<RawSolution, SolveFailure> {
        // HiGHS aborts on an out-of-range option value
        if let Some(time_limit) = options.time_limit {
            check_time_limit(time_limit)?;
        }

        let mut solved = run_highs(problem, options, true)?;

        // Presolve can't always tell infeasible and unbounded problems apart, so try again
        // without it
        if solved.status() == HighsModelStatus::UnboundedOrInfeasible {
            debug!("Problem is infeasible or unbounded; retrying without presolve");
            solved = run_highs(problem, options, false)?;
        }

        match solved.status() {
            HighsModelStatus::Optimal => {
                let solution = solved.get_solution();
                Ok(RawSolution {
                    columns: solution.columns().to_vec(),
                    row_duals: solution.dual_rows().to_vec(),
                })
            }
            status => Err(status_to_failure(status)),
        }
    }
}

/// Check that the time limit is a finite, non-negative number of seconds
fn check_time_limit(time_limit: f64) -> Result<(), SolveFailure> {
    if time_limit.is_finite() && time_limit >= 0.0 {
        Ok(())
    } else {
        Err(SolveFailure::SolverUnavailable(format!(
            "Invalid time limit: {time_limit}"
        )))
    }
}

/// Convert a [`LinearProgram`] into a HiGHS problem
fn to_highs_problem(problem: &LinearProgram) -> Problem {
    let mut pb = Problem::default();

    let cols: Vec<_> = problem
        .columns()
        .iter()
        .map(|col| pb.add_column(col.cost, col.lower..=col.upper))
        .collect();

    for row in problem.rows() {
        pb.add_row(
            row.lower..=row.upper,
            row.terms
                .iter()
                .map(|(var, coeff)| (cols[var.index()], *coeff)),
        );
    }

    pb
}

/// Build and run a HiGHS model for the problem
fn run_highs(
    problem: &LinearProgram,
    options: &SolveOptions,
    presolve: bool,
) -> Result<SolvedModel, SolveFailure> {
    let mut model = to_highs_problem(problem).optimise(Sense::Minimise);

    // HiGHS writes its output directly to the console, not via our logger
    model.set_option("output_flag", options.verbose);
    model.set_option("log_to_console", options.verbose);

    if let Some(time_limit) = options.time_limit {
        model.set_option("time_limit", time_limit);
    }
    if !presolve {
        model.set_option("presolve", "off");
    }

    model
        .try_solve()
        .map_err(|status| SolveFailure::SolverUnavailable(format!("HiGHS failed: {status:?}")))
}

/// Map a non-optimal HiGHS model status onto a [`SolveFailure`]
fn status_to_failure(status: HighsModelStatus) -> SolveFailure {
    match status {
        HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => {
            SolveFailure::Infeasible
        }
        HighsModelStatus::Unbounded => SolveFailure::Unbounded,
        HighsModelStatus::ReachedTimeLimit => SolveFailure::TimedOut,
        status => SolveFailure::SolverUnavailable(format!("HiGHS stopped with status {status:?}")),
    }
}
