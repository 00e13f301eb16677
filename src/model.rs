//! The model's input data.
use crate::error::BuildError;
use crate::formulation::{ModelSpec, build_from_time_series};
use crate::parameters::OperationalParameters;
use crate::time_series::TimeSeries;
use indexmap::IndexMap;
use std::path::PathBuf;

/// Model definition
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Path to model folder
    pub model_dir: PathBuf,
    /// Hourly capacity factors and demand
    pub time_series: TimeSeries,
    /// Capital cost for each technology, keyed by technology name
    pub costs: IndexMap<String, f64>,
    /// Storage and curtailment parameters
    pub parameters: OperationalParameters,
}

impl Model {
    /// Build the optimisation problem for this model
    pub fn build(&self) -> Result<ModelSpec, BuildError> {
        build_from_time_series(&self.time_series, &self.costs, &self.parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{raw_costs, toy_time_series};
    use rstest::rstest;

    #[rstest]
    fn test_model_build(toy_time_series: TimeSeries, raw_costs: IndexMap<String, f64>) {
        let mut model = Model {
            model_dir: PathBuf::from("toy"),
            time_series: toy_time_series,
            costs: raw_costs,
            parameters: OperationalParameters::default(),
        };
        assert_eq!(model.build().unwrap().num_hours(), 4);

        model.costs.shift_remove("ESS_power_cap");
        assert!(matches!(model.build(), Err(BuildError::Config(_))));
    }
}
