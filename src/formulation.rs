//! Code for building the capacity expansion and dispatch optimisation problem.
//!
//! The problem is a single linear program covering every hour of the horizon at once. Its decision
//! variables are:
//!
//! * `cap[tech]`: installed capacity for each [`Technology`]
//! * `soc[t]`: storage state of charge at hour `t` (GWh)
//! * `charge[t]`, `discharge[t]`: storage charge and discharge power at hour `t` (GW)
//! * `curtail[t]`: curtailed renewable generation at hour `t` (GW)
//!
//! all of which are non-negative. The objective is the total capital cost of installed capacity
//! plus the variable cost of storage discharge and curtailment over all hours.
use crate::error::BuildError;
use crate::lp::{LinearProgram, Variable};
use crate::parameters::OperationalParameters;
use crate::technology::{CostTable, Technology};
use crate::time_series::{CapacityFactors, TimeSeries};
use indexmap::IndexMap;
use log::debug;

pub mod constraints;
use constraints::{ConstraintKeys, Residuals, add_constraints};

/// The variables of the optimisation problem.
///
/// Used to define constraints and, once the problem is solved, to look up the values of variables.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableMap {
    /// Installed capacity for each technology
    pub capacity: IndexMap<Technology, Variable>,
    /// State of charge for each hour
    pub soc: Vec<Variable>,
    /// Charging power for each hour
    pub charge: Vec<Variable>,
    /// Discharging power for each hour
    pub discharge: Vec<Variable>,
    /// Curtailed generation for each hour
    pub curtail: Vec<Variable>,
}

impl VariableMap {
    /// Get the capacity variable for the given technology
    pub fn capacity(&self, tech: Technology) -> Variable {
        self.capacity[&tech]
    }
}

/// A fully specified optimisation problem, ready to be solved
#[derive(Debug, Clone)]
pub struct ModelSpec {
    problem: LinearProgram,
    variables: VariableMap,
    constraint_keys: ConstraintKeys,
    costs: CostTable,
    num_hours: usize,
}

impl ModelSpec {
    /// The linear program to hand to a solver
    pub fn problem(&self) -> &LinearProgram {
        &self.problem
    }

    /// The problem's variables
    pub fn variables(&self) -> &VariableMap {
        &self.variables
    }

    /// Row offsets for each family of constraints
    pub fn constraint_keys(&self) -> &ConstraintKeys {
        &self.constraint_keys
    }

    /// The validated capital costs used in the objective
    pub fn costs(&self) -> &CostTable {
        &self.costs
    }

    /// The number of hours in the horizon
    pub fn num_hours(&self) -> usize {
        self.num_hours
    }

    /// Calculate the largest violation of each family of constraints for the given column values.
    ///
    /// For a solution returned by a solver, all of these should be within the solver's tolerance.
    pub fn residuals(&self, values: &[f64]) -> Residuals {
        self.constraint_keys.residuals(&self.problem, values)
    }
}

/// Check that the input series all have the same, non-zero length and contain only finite values.
///
/// # Returns
///
/// The number of hours in the horizon.
fn check_data_shape(
    capacity_factors: &CapacityFactors,
    demand: &[f64],
) -> Result<usize, BuildError> {
    let num_hours = demand.len();
    if num_hours == 0 {
        return Err(BuildError::DataShape("Demand series is empty".into()));
    }

    for (name, series) in [
        ("wind", &capacity_factors.wind),
        ("solar", &capacity_factors.solar),
    ] {
        if series.len() != num_hours {
            return Err(BuildError::DataShape(format!(
                "The {name} series has {} values but the demand series has {num_hours}",
                series.len()
            )));
        }
    }

    for (name, series) in [
        ("wind", capacity_factors.wind.as_slice()),
        ("solar", capacity_factors.solar.as_slice()),
        ("demand", demand),
    ] {
        if let Some(hour) = series.iter().position(|value| !value.is_finite()) {
            return Err(BuildError::DataShape(format!(
                "The {name} series has a non-finite value at hour {hour}"
            )));
        }
    }

    Ok(num_hours)
}

/// Add variables to the optimisation problem.
///
/// # Arguments
///
/// * `problem` - The optimisation problem
/// * `costs` - Capital costs for each technology
/// * `params` - Operational parameters
/// * `num_hours` - The number of hours in the horizon
///
/// # Returns
///
/// A [`VariableMap`] containing the new variables.
fn add_variables(
    problem: &mut LinearProgram,
    costs: &CostTable,
    params: &OperationalParameters,
    num_hours: usize,
) -> VariableMap {
    // All variables are non-negative
    let capacity = costs
        .iter()
        .map(|(tech, cost)| (tech, problem.add_column(cost, 0.0..)))
        .collect();

    let mut add_hourly = |cost: f64| -> Vec<Variable> {
        (0..num_hours)
            .map(|_| problem.add_column(cost, 0.0..))
            .collect()
    };
    let soc = add_hourly(0.0);
    let charge = add_hourly(0.0);
    let discharge = add_hourly(params.discharge_cost);
    let curtail = add_hourly(params.curtailment_cost);

    VariableMap {
        capacity,
        soc,
        charge,
        discharge,
        curtail,
    }
}

/// Build the optimisation problem.
///
/// # Arguments
///
/// * `capacity_factors` - Hourly wind and solar capacity factors
/// * `demand` - Hourly demand
/// * `costs` - Capital cost for each technology, keyed by technology name
/// * `params` - Operational parameters
///
/// # Returns
///
/// The complete problem, or a [`BuildError`] if the inputs are inconsistent. No problem is built if
/// any check fails.
pub fn build(
    capacity_factors: &CapacityFactors,
    demand: &[f64],
    costs: &IndexMap<String, f64>,
    params: &OperationalParameters,
) -> Result<ModelSpec, BuildError> {
    let num_hours = check_data_shape(capacity_factors, demand)?;
    let costs = CostTable::from_raw(costs)?;
    params.validate()?;

    let mut problem = LinearProgram::default();
    let variables = add_variables(&mut problem, &costs, params, num_hours);
    let constraint_keys = add_constraints(
        &mut problem,
        &variables,
        capacity_factors,
        demand,
        params,
    );

    debug!(
        "Built problem with {} variables and {} constraints over {num_hours} hours",
        problem.num_columns(),
        problem.num_rows()
    );

    Ok(ModelSpec {
        problem,
        variables,
        constraint_keys,
        costs,
        num_hours,
    })
}

/// Build the optimisation problem from a [`TimeSeries`].
///
/// See [`build`].
pub fn build_from_time_series(
    time_series: &TimeSeries,
    costs: &IndexMap<String, f64>,
    params: &OperationalParameters,
) -> Result<ModelSpec, BuildError> {
    build(
        &time_series.capacity_factors,
        &time_series.demand,
        costs,
        params,
    )
}
