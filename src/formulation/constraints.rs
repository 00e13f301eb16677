//! Code for adding constraints to the optimisation problem.
//!
//! Every family of constraints has exactly one row per hour and the families are added one after
//! another, so each family is identified by the row offset of its first hour.
use super::VariableMap;
use crate::lp::{LinearProgram, Variable};
use crate::parameters::OperationalParameters;
use crate::technology::Technology;
use crate::time_series::{CapacityFactors, prev_hour};
use itertools::izip;
use serde::Serialize;

/// Row offsets for each family of constraints
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintKeys {
    /// Number of rows in each family
    num_hours: usize,
    /// Supply-demand balance
    pub power_balance: usize,
    /// Combined charge and discharge power limit
    pub storage_power: usize,
    /// Upper limit on state of charge
    pub soc_upper: usize,
    /// Lower limit on state of charge
    pub soc_lower: usize,
    /// State of charge recursion
    pub soc_balance: usize,
}

/// The largest violation of each family of constraints
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Residuals {
    /// Supply-demand balance
    pub power_balance: f64,
    /// Combined charge and discharge power limit
    pub storage_power: f64,
    /// Upper limit on state of charge
    pub soc_upper: f64,
    /// Lower limit on state of charge
    pub soc_lower: f64,
    /// State of charge recursion
    pub soc_balance: f64,
}

impl Residuals {
    /// The largest violation over all families
    pub fn max(&self) -> f64 {
        [
            self.power_balance,
            self.storage_power,
            self.soc_upper,
            self.soc_lower,
            self.soc_balance,
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }
}

impl ConstraintKeys {
    /// Zip the hours with the corresponding dual values of the power balance constraints
    pub fn zip_balance_duals<'a>(
        &'a self,
        duals: &'a [f64],
    ) -> impl Iterator<Item = (usize, f64)> + 'a {
        assert!(
            self.power_balance + self.num_hours <= duals.len(),
            "Bad constraint keys: dual rows out of range"
        );

        duals[self.power_balance..self.power_balance + self.num_hours]
            .iter()
            .copied()
            .enumerate()
    }

    /// Calculate the largest violation of each family of constraints
    pub fn residuals(&self, problem: &LinearProgram, values: &[f64]) -> Residuals {
        let max_violation = |offset: usize| {
            problem.rows()[offset..offset + self.num_hours]
                .iter()
                .map(|row| row.violation(values))
                .fold(0.0, f64::max)
        };

        Residuals {
            power_balance: max_violation(self.power_balance),
            storage_power: max_violation(self.storage_power),
            soc_upper: max_violation(self.soc_upper),
            soc_lower: max_violation(self.soc_lower),
            soc_balance: max_violation(self.soc_balance),
        }
    }
}

/// Add all constraints to the problem.
///
/// # Arguments
///
/// * `problem` - The optimisation problem
/// * `variables` - The variables in the problem
/// * `capacity_factors` - Hourly wind and solar capacity factors
/// * `demand` - Hourly demand
/// * `params` - Operational parameters
///
/// # Returns
///
/// The row offset of each family of constraints.
pub fn add_constraints(
    problem: &mut LinearProgram,
    variables: &VariableMap,
    capacity_factors: &CapacityFactors,
    demand: &[f64],
    params: &OperationalParameters,
) -> ConstraintKeys {
    let power_balance =
        add_power_balance_constraints(problem, variables, capacity_factors, demand);
    let storage_power = add_storage_power_constraints(problem, variables);
    let (soc_upper, soc_lower) = add_soc_limit_constraints(problem, variables, params.min_level);
    let soc_balance = add_soc_balance_constraints(problem, variables, params);

    ConstraintKeys {
        num_hours: demand.len(),
        power_balance,
        storage_power,
        soc_upper,
        soc_lower,
        soc_balance,
    }
}

/// Collect terms for a row, dropping any with a zero coefficient
fn non_zero_terms<const N: usize>(
    terms: [(Variable, f64); N],
) -> impl Iterator<Item = (Variable, f64)> {
    terms.into_iter().filter(|(_, coeff)| *coeff != 0.0)
}

/// Add supply-demand balance constraints.
///
/// For every hour, renewable generation plus storage discharge must equal demand plus storage
/// charge plus curtailment. There is no slack for unserved demand.
fn add_power_balance_constraints(
    problem: &mut LinearProgram,
    variables: &VariableMap,
    capacity_factors: &CapacityFactors,
    demand: &[f64],
) -> usize {
    // Row offset in problem. This line **must** come before we add more constraints.
    let offset = problem.num_rows();

    let solar_cap = variables.capacity(Technology::Solar);
    let wind_cap = variables.capacity(Technology::Wind);
    for (hour, (&solar, &wind, &demand)) in izip!(
        &capacity_factors.solar,
        &capacity_factors.wind,
        demand
    )
    .enumerate()
    {
        let terms = non_zero_terms([
            (solar_cap, solar),
            (wind_cap, wind),
            (variables.discharge[hour], 1.0),
            (variables.charge[hour], -1.0),
            (variables.curtail[hour], -1.0),
        ]);
        problem.add_row(demand..=demand, terms);
    }

    offset
}

/// Add constraints limiting combined charge and discharge power to the storage power capacity
fn add_storage_power_constraints(problem: &mut LinearProgram, variables: &VariableMap) -> usize {
    let offset = problem.num_rows();

    let power_cap = variables.capacity(Technology::StoragePower);
    for (&charge, &discharge) in variables.charge.iter().zip(&variables.discharge) {
        problem.add_row(..=0.0, [(charge, 1.0), (discharge, 1.0), (power_cap, -1.0)]);
    }

    offset
}

/// Add upper and lower limits on state of charge.
///
/// State of charge may not exceed the storage energy capacity, nor fall below `min_level` times
/// that capacity.
///
/// # Returns
///
/// The row offsets of the upper and lower limit constraints.
fn add_soc_limit_constraints(
    problem: &mut LinearProgram,
    variables: &VariableMap,
    min_level: f64,
) -> (usize, usize) {
    let energy_cap = variables.capacity(Technology::StorageEnergy);

    let upper_offset = problem.num_rows();
    for &soc in &variables.soc {
        problem.add_row(..=0.0, [(soc, 1.0), (energy_cap, -1.0)]);
    }

    let lower_offset = problem.num_rows();
    for &soc in &variables.soc {
        problem.add_row(0.0.., [(soc, 1.0), (energy_cap, -min_level)]);
    }

    (upper_offset, lower_offset)
}

/// Add the state of charge recursion.
///
/// The state of charge at each hour equals that of the previous hour, plus charged energy scaled
/// by charging efficiency, minus discharged energy divided by discharging efficiency. The first
/// hour follows on from the last, so storage operates on a repeating cycle.
fn add_soc_balance_constraints(
    problem: &mut LinearProgram,
    variables: &VariableMap,
    params: &OperationalParameters,
) -> usize {
    let offset = problem.num_rows();

    let num_hours = variables.soc.len();
    for hour in 0..num_hours {
        let prev = prev_hour(hour, num_hours);
        let storage_terms = [
            (variables.charge[hour], -params.charge_efficiency),
            (variables.discharge[hour], 1.0 / params.discharge_efficiency),
        ];

        // With a single hour, the state of charge terms cancel out
        if prev == hour {
            problem.add_row(0.0..=0.0, storage_terms);
        } else {
            let soc_terms = [(variables.soc[hour], 1.0), (variables.soc[prev], -1.0)];
            problem.add_row(0.0..=0.0, soc_terms.into_iter().chain(storage_terms));
        }
    }

    offset
}
