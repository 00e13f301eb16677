//! The results of the optimisation.
use crate::error::SolveFailure;
use crate::formulation::ModelSpec;
use crate::formulation::constraints::Residuals;
use crate::lp::Variable;
use crate::solver::RawSolution;
use crate::technology::Technology;
use crate::time_series::TimeSeries;
use indexmap::IndexMap;
use itertools::izip;
use serde::Serialize;

/// Hourly operation of the system
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dispatch {
    /// Storage state of charge (GWh)
    pub soc: Vec<f64>,
    /// Storage charging power (GW)
    pub charge: Vec<f64>,
    /// Storage discharging power (GW)
    pub discharge: Vec<f64>,
    /// Curtailed renewable generation (GW)
    pub curtail: Vec<f64>,
}

/// The optimal solution to the capacity expansion problem
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Installed capacity for each technology
    pub capacities: IndexMap<Technology, f64>,
    /// The optimal value of the objective (total system cost, $)
    pub objective: f64,
    /// The part of the objective due to capital costs ($)
    pub capital_cost: f64,
    /// Hourly dispatch
    pub dispatch: Dispatch,
    /// Marginal cost of meeting demand in each hour ($/GWh), from the power balance duals
    pub marginal_costs: Vec<f64>,
    /// The largest violation of each family of constraints
    pub residuals: Residuals,
}

/// Annual totals and costs for a solution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Total system cost ($)
    pub total_cost: f64,
    /// Capital cost of installed capacity ($)
    pub capital_cost: f64,
    /// Cost of storage discharge and curtailment ($)
    pub operating_cost: f64,
    /// Total demand (GWh)
    pub demand: f64,
    /// Total available wind generation (GWh)
    pub wind_generation: f64,
    /// Total available solar generation (GWh)
    pub solar_generation: f64,
    /// Total curtailed generation (GWh)
    pub curtailment: f64,
    /// Total energy charged into storage (GWh)
    pub storage_charge: f64,
    /// Total energy discharged from storage (GWh)
    pub storage_discharge: f64,
    /// Total cost per unit of demand served ($/GWh)
    pub cost_per_unit_demand: Option<f64>,
}

impl Solution {
    /// Extract the solution from the raw output of a solver.
    ///
    /// Returns [`SolveFailure::SolverUnavailable`] if the solver returned the wrong number of
    /// values.
    pub fn from_raw(spec: &ModelSpec, raw: RawSolution) -> Result<Self, SolveFailure> {
        let problem = spec.problem();
        if raw.columns.len() != problem.num_columns() || raw.row_duals.len() != problem.num_rows()
        {
            return Err(SolveFailure::SolverUnavailable(format!(
                "Solver returned {} column values and {} row duals for a problem with {} columns \
                and {} rows",
                raw.columns.len(),
                raw.row_duals.len(),
                problem.num_columns(),
                problem.num_rows()
            )));
        }

        let vars = spec.variables();
        let values = |vars: &[Variable]| -> Vec<f64> {
            vars.iter().map(|var| raw.columns[var.index()]).collect()
        };

        let capacities: IndexMap<_, _> = vars
            .capacity
            .iter()
            .map(|(tech, var)| (*tech, raw.columns[var.index()]))
            .collect();
        let capital_cost = spec
            .costs()
            .iter()
            .map(|(tech, cost)| capacities[&tech] * cost)
            .sum();
        let dispatch = Dispatch {
            soc: values(&vars.soc),
            charge: values(&vars.charge),
            discharge: values(&vars.discharge),
            curtail: values(&vars.curtail),
        };
        let marginal_costs = spec
            .constraint_keys()
            .zip_balance_duals(&raw.row_duals)
            .map(|(_, dual)| dual)
            .collect();

        Ok(Self {
            capacities,
            objective: problem.objective_value(&raw.columns),
            capital_cost,
            dispatch,
            marginal_costs,
            residuals: spec.residuals(&raw.columns),
        })
    }

    /// Get the installed capacity for the given technology
    pub fn capacity(&self, tech: Technology) -> f64 {
        self.capacities[&tech]
    }

    /// Iterate over hours as tuples of hour, state of charge, charge, discharge, curtailment and
    /// marginal cost
    pub fn iter_dispatch(&self) -> impl Iterator<Item = (usize, f64, f64, f64, f64, f64)> + '_ {
        izip!(
            &self.dispatch.soc,
            &self.dispatch.charge,
            &self.dispatch.discharge,
            &self.dispatch.curtail,
            &self.marginal_costs
        )
        .enumerate()
        .map(|(hour, (soc, charge, discharge, curtail, cost))| {
            (hour, *soc, *charge, *discharge, *curtail, *cost)
        })
    }

    /// Calculate annual totals for the solution
    ///
    /// # Arguments
    ///
    /// * `time_series` - The input data the problem was built from
    pub fn summarise(&self, time_series: &TimeSeries) -> Summary {
        let wind_cap = self.capacity(Technology::Wind);
        let solar_cap = self.capacity(Technology::Solar);
        let wind_generation = time_series
            .capacity_factors
            .wind
            .iter()
            .map(|cf| cf * wind_cap)
            .sum();
        let solar_generation = time_series
            .capacity_factors
            .solar
            .iter()
            .map(|cf| cf * solar_cap)
            .sum();

        let demand = time_series.total_demand();
        Summary {
            total_cost: self.objective,
            capital_cost: self.capital_cost,
            operating_cost: self.objective - self.capital_cost,
            demand,
            wind_generation,
            solar_generation,
            curtailment: self.dispatch.curtail.iter().sum(),
            storage_charge: self.dispatch.charge.iter().sum(),
            storage_discharge: self.dispatch.discharge.iter().sum(),
            cost_per_unit_demand: (demand > 0.0).then(|| self.objective / demand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{raw_costs, toy_time_series};
    use crate::formulation::build_from_time_series;
    use crate::parameters::OperationalParameters;
    use float_cmp::assert_approx_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn toy_spec(toy_time_series: TimeSeries, raw_costs: IndexMap<String, f64>) -> ModelSpec {
        build_from_time_series(
            &toy_time_series,
            &raw_costs,
            &OperationalParameters::default(),
        )
        .unwrap()
    }

    /// A hand-made solution for the toy problem which meets demand with solar then wind
    fn toy_raw_solution(spec: &ModelSpec) -> RawSolution {
        let vars = spec.variables();
        let mut columns = vec![0.0; spec.problem().num_columns()];
        columns[vars.capacity(Technology::Solar).index()] = 10.0;
        columns[vars.capacity(Technology::Wind).index()] = 10.0;
        columns[vars.curtail[0].index()] = 0.5;

        RawSolution {
            columns,
            row_duals: (0..spec.problem().num_rows()).map(|i| i as f64).collect(),
        }
    }

    #[rstest]
    fn test_from_raw(toy_spec: ModelSpec) {
        let raw = toy_raw_solution(&toy_spec);
        let solution = Solution::from_raw(&toy_spec, raw).unwrap();

        assert_eq!(solution.capacity(Technology::Solar), 10.0);
        assert_eq!(solution.capacity(Technology::Wind), 10.0);
        assert_eq!(solution.capacity(Technology::StoragePower), 0.0);
        assert_approx_eq!(f64, solution.capital_cost, 10.0 * 8.0e8 + 10.0 * 1.2e9);
        assert_approx_eq!(f64, solution.objective, solution.capital_cost + 0.5 * 1000.0);
        assert_eq!(solution.dispatch.curtail, vec![0.5, 0.0, 0.0, 0.0]);
        assert_eq!(solution.marginal_costs, vec![0.0, 1.0, 2.0, 3.0]);

        // Curtailment without extra generation unbalances the first hour
        assert_approx_eq!(f64, solution.residuals.power_balance, 0.5);
    }

    #[rstest]
    fn test_from_raw_wrong_length(toy_spec: ModelSpec) {
        let mut raw = toy_raw_solution(&toy_spec);
        raw.columns.pop();
        assert!(matches!(
            Solution::from_raw(&toy_spec, raw),
            Err(SolveFailure::SolverUnavailable(_))
        ));
    }

    #[rstest]
    fn test_iter_dispatch(toy_spec: ModelSpec) {
        let solution = Solution::from_raw(&toy_spec, toy_raw_solution(&toy_spec)).unwrap();
        let rows: Vec<_> = solution.iter_dispatch().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], (0, 0.0, 0.0, 0.0, 0.5, 0.0));
        assert_eq!(rows[3], (3, 0.0, 0.0, 0.0, 0.0, 3.0));
    }

    #[rstest]
    fn test_summarise(toy_spec: ModelSpec, toy_time_series: TimeSeries) {
        let solution = Solution::from_raw(&toy_spec, toy_raw_solution(&toy_spec)).unwrap();
        let summary = solution.summarise(&toy_time_series);

        assert_approx_eq!(f64, summary.demand, 40.0);
        assert_approx_eq!(f64, summary.wind_generation, 20.0);
        assert_approx_eq!(f64, summary.solar_generation, 20.0);
        assert_approx_eq!(f64, summary.curtailment, 0.5);
        assert_approx_eq!(f64, summary.operating_cost, 500.0, epsilon = 1e-3);
        assert_approx_eq!(
            f64,
            summary.cost_per_unit_demand.unwrap(),
            solution.objective / 40.0
        );
    }
}
