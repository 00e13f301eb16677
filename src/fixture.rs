//! Fixtures for tests
use crate::time_series::{CapacityFactors, TimeSeries};
use indexmap::IndexMap;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Assert that building a model fails with the given [`crate::error::BuildError`]
macro_rules! assert_build_error {
    ($result:expr, $expected:expr) => {
        match $result {
            Ok(_) => panic!("Expected build to fail"),
            Err(err) => assert_eq!(err, $expected),
        }
    };
}
pub(crate) use assert_build_error;

/// Capital costs for each technology, keyed by name
#[fixture]
pub fn raw_costs() -> IndexMap<String, f64> {
    [
        ("w_cap", 1.2e9),
        ("s_cap", 8.0e8),
        ("ESS_power_cap", 2.0e8),
        ("ESS_energy_cap", 1.5e8),
    ]
    .into_iter()
    .map(|(name, cost)| (name.to_string(), cost))
    .collect()
}

/// A four-hour horizon where solar covers the first two hours and wind the last two
#[fixture]
pub fn toy_time_series() -> TimeSeries {
    TimeSeries {
        capacity_factors: CapacityFactors {
            wind: vec![0.0, 0.0, 1.0, 1.0],
            solar: vec![1.0, 1.0, 0.0, 0.0],
        },
        demand: vec![10.0; 4],
    }
}
