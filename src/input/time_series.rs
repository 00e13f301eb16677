//! Code for reading hourly capacity factors and demand from a CSV file.
use super::{input_err_msg, read_csv};
use crate::error::BuildError;
use crate::time_series::{CapacityFactors, HOURS_PER_YEAR, TimeSeries};
use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::path::Path;

/// A single hour's data, as read from the CSV file
#[derive(PartialEq, Debug, Deserialize)]
struct HourRaw {
    /// The hour of the year
    t: usize,
    /// Wind capacity factor
    wind: f64,
    /// Solar capacity factor
    solar: f64,
    /// Demand (GW)
    demand: f64,
}

/// Read hourly time series data from a CSV file.
///
/// The file must have columns `t`, `wind`, `solar` and `demand` (any other columns are ignored) and
/// one row for each hour of the year, in order.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_time_series(file_path: &Path) -> Result<TimeSeries> {
    // A file with no rows is reported as having the wrong number of hours
    let iter = read_csv(file_path)?;
    read_time_series_from_iter(iter).with_context(|| input_err_msg(file_path))
}

/// Read hourly time series data from an iterator of rows
fn read_time_series_from_iter<I>(iter: I) -> Result<TimeSeries>
where
    I: Iterator<Item = HourRaw>,
{
    let mut wind = Vec::with_capacity(HOURS_PER_YEAR);
    let mut solar = Vec::with_capacity(HOURS_PER_YEAR);
    let mut demand = Vec::with_capacity(HOURS_PER_YEAR);
    for (row, hour) in iter.enumerate() {
        if hour.t != row {
            Err(BuildError::DataShape(format!(
                "Hours must be listed in order starting from 0: expected {row}, found {}",
                hour.t
            )))?;
        }

        wind.push(hour.wind);
        solar.push(hour.solar);
        demand.push(hour.demand);
    }

    if demand.len() != HOURS_PER_YEAR {
        Err(BuildError::DataShape(format!(
            "Expected {HOURS_PER_YEAR} hours of data, found {}",
            demand.len()
        )))?;
    }

    // Out-of-range values are allowed, but probably indicate a problem with the data
    for (name, series) in [("wind", &wind), ("solar", &solar)] {
        let count = series.iter().filter(|cf| !(0.0..=1.0).contains(*cf)).count();
        if count > 0 {
            warn!("{count} hours have a {name} capacity factor outside the range [0, 1]");
        }
    }
    let count = demand.iter().filter(|d| **d < 0.0).count();
    if count > 0 {
        warn!("{count} hours have negative demand");
    }

    Ok(TimeSeries {
        capacity_factors: CapacityFactors { wind, solar },
        demand,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn hours(num_hours: usize) -> impl Iterator<Item = HourRaw> {
        (0..num_hours).map(|t| HourRaw {
            t,
            wind: 0.5,
            solar: if t % 24 < 12 { 0.8 } else { 0.0 },
            demand: 40.0,
        })
    }

    fn build_error(result: Result<TimeSeries>) -> BuildError {
        result
            .unwrap_err()
            .downcast::<BuildError>()
            .expect("Expected a BuildError")
    }

    #[test]
    fn test_read_time_series_from_iter() {
        let ts = read_time_series_from_iter(hours(HOURS_PER_YEAR)).unwrap();
        assert_eq!(ts.num_hours(), HOURS_PER_YEAR);
        assert_eq!(ts.capacity_factors.wind.len(), HOURS_PER_YEAR);
        assert_eq!(ts.capacity_factors.solar[11], 0.8);
        assert_eq!(ts.capacity_factors.solar[12], 0.0);
        assert_eq!(ts.demand[HOURS_PER_YEAR - 1], 40.0);
    }

    #[test]
    fn test_read_time_series_too_short() {
        assert_eq!(
            build_error(read_time_series_from_iter(hours(HOURS_PER_YEAR - 1))),
            BuildError::DataShape("Expected 8760 hours of data, found 8759".into())
        );
    }

    #[test]
    fn test_read_time_series_too_long() {
        assert!(matches!(
            build_error(read_time_series_from_iter(hours(HOURS_PER_YEAR + 1))),
            BuildError::DataShape(_)
        ));
    }

    #[test]
    fn test_read_time_series_out_of_order() {
        let iter = hours(HOURS_PER_YEAR).map(|mut hour| {
            if hour.t == 5 {
                hour.t = 6;
            }
            hour
        });
        assert_eq!(
            build_error(read_time_series_from_iter(iter)),
            BuildError::DataShape(
                "Hours must be listed in order starting from 0: expected 5, found 6".into()
            )
        );
    }

    #[test]
    fn test_read_time_series_out_of_range_allowed() {
        let iter = hours(HOURS_PER_YEAR).map(|mut hour| {
            hour.wind = 1.5;
            hour
        });
        assert!(read_time_series_from_iter(iter).is_ok());
    }

    #[test]
    fn test_read_time_series_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("time_series.csv");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "t,wind,solar,demand,year").unwrap();
            for t in 0..HOURS_PER_YEAR {
                writeln!(file, "{t},0.25,0.5,100,2022").unwrap();
            }
        }

        let ts = read_time_series(&file_path).unwrap();
        assert_eq!(ts.num_hours(), HOURS_PER_YEAR);
        assert!(ts.capacity_factors.wind.iter().all(|cf| *cf == 0.25));
    }

    #[test]
    fn test_read_time_series_file_short() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("time_series.csv");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "t,wind,solar,demand").unwrap();
            for t in 0..HOURS_PER_YEAR - 1 {
                writeln!(file, "{t},0.25,0.5,100").unwrap();
            }
        }

        // The error has the file path as context, but the underlying error is still available
        let err = read_time_series(&file_path).unwrap_err();
        assert_eq!(err.to_string(), input_err_msg(&file_path));
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::DataShape(_))
        ));
    }

    #[test]
    fn test_read_time_series_file_header_only() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("time_series.csv");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "t,wind,solar,demand").unwrap();
        }

        let err = read_time_series(&file_path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BuildError>(),
            Some(&BuildError::DataShape(
                "Expected 8760 hours of data, found 0".into()
            ))
        );
    }
}
