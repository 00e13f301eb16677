//! Hourly time series and the arithmetic on the hourly time index.
//!
//! Hours are 0-indexed and the horizon is treated as cyclic: the hour preceding the first hour is
//! the last hour of the horizon.
use itertools::izip;

/// The number of hours in a (non-leap) year, which is the length of input time series
pub const HOURS_PER_YEAR: usize = 8760;

/// Get the chronologically preceding hour, wrapping round from the first hour to the last.
///
/// # Arguments
///
/// * `hour` - The hour of interest (must be less than `num_hours`)
/// * `num_hours` - The number of hours in the horizon
pub fn prev_hour(hour: usize, num_hours: usize) -> usize {
    assert!(hour < num_hours, "Hour {hour} out of range");
    (hour + num_hours - 1) % num_hours
}

/// Hourly capacity factors for the variable renewable technologies.
///
/// Each value is the fraction of rated capacity available in that hour.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CapacityFactors {
    /// Wind capacity factor for each hour
    pub wind: Vec<f64>,
    /// Solar capacity factor for each hour
    pub solar: Vec<f64>,
}

/// All the hourly input data for a model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    /// Renewable capacity factors
    pub capacity_factors: CapacityFactors,
    /// Demand for each hour (GW)
    pub demand: Vec<f64>,
}

impl TimeSeries {
    /// The number of hours covered by the demand series
    pub fn num_hours(&self) -> usize {
        self.demand.len()
    }

    /// Iterate over hours as tuples of wind capacity factor, solar capacity factor and demand
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        izip!(
            self.capacity_factors.wind.iter().copied(),
            self.capacity_factors.solar.iter().copied(),
            self.demand.iter().copied()
        )
    }

    /// Total demand over the horizon (GWh)
    pub fn total_demand(&self) -> f64 {
        self.demand.iter().sum()
    }
}
