//! The module responsible for writing output data to disk.
use crate::solution::{Solution, Summary};
use crate::technology::{CostTable, Technology};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "wss_results";

/// The output file name for installed capacities
const CAPACITIES_FILE_NAME: &str = "capacities.csv";

/// The output file name for hourly dispatch
const DISPATCH_FILE_NAME: &str = "dispatch.csv";

/// The output file name for the summary of results
const SUMMARY_FILE_NAME: &str = "summary.toml";

/// The output file name for constraint residuals
const RESIDUALS_FILE_NAME: &str = "debug_residuals.toml";

/// Get the model name from the specified directory path
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Get the model name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors. Ugh.
    let model_dir = model_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create a new output directory for the model, optionally overwriting existing data.
///
/// # Arguments
///
/// * `output_dir` - The output directory to create
/// * `allow_overwrite` - Whether to delete and recreate the folder if it is non-empty
///
/// # Returns
///
/// `true` if an existing non-empty folder was overwritten, `false` otherwise.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Please delete the folder or pass the \
            --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the capacities CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CapacityRow {
    technology: Technology,
    capacity: f64,
    capital_cost: f64,
}

/// Represents a row in the dispatch CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct DispatchRow {
    t: usize,
    soc: f64,
    charge: f64,
    discharge: f64,
    curtail: f64,
    marginal_cost: f64,
}

/// Write installed capacities and their capital costs to a CSV file
///
/// # Arguments
///
/// * `output_path` - Folder where the file will be saved
/// * `solution` - The optimal solution
/// * `costs` - Capital cost per unit capacity for each technology
pub fn write_capacities(output_path: &Path, solution: &Solution, costs: &CostTable) -> Result<()> {
    let file_path = output_path.join(CAPACITIES_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)?;
    for (technology, capacity) in &solution.capacities {
        writer.serialize(CapacityRow {
            technology: *technology,
            capacity: *capacity,
            capital_cost: capacity * costs.get(*technology),
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Write hourly dispatch and marginal costs to a CSV file
pub fn write_dispatch(output_path: &Path, solution: &Solution) -> Result<()> {
    let file_path = output_path.join(DISPATCH_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)?;
    for (t, soc, charge, discharge, curtail, marginal_cost) in solution.iter_dispatch() {
        writer.serialize(DispatchRow {
            t,
            soc,
            charge,
            discharge,
            curtail,
            marginal_cost,
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the summary of results to a TOML file
pub fn write_summary(output_path: &Path, summary: &Summary) -> Result<()> {
    let file_path = output_path.join(SUMMARY_FILE_NAME);
    fs::write(&file_path, toml::to_string(summary)?)?;

    Ok(())
}

/// Write extra information for debugging the model
pub fn write_debug_info(output_path: &Path, solution: &Solution) -> Result<()> {
    let file_path = output_path.join(RESIDUALS_FILE_NAME);
    fs::write(&file_path, toml::to_string(&solution.residuals)?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::raw_costs;
    use crate::formulation::constraints::Residuals;
    use crate::solution::Dispatch;
    use indexmap::IndexMap;
    use itertools::Itertools;
    use rstest::{fixture, rstest};
    use strum::IntoEnumIterator;
    use tempfile::tempdir;

    #[fixture]
    fn solution() -> Solution {
        Solution {
            capacities: Technology::iter()
                .zip([2.0, 3.0, 1.0, 4.0])
                .collect::<IndexMap<_, _>>(),
            objective: 100.0,
            capital_cost: 90.0,
            dispatch: Dispatch {
                soc: vec![2.0, 3.0],
                charge: vec![1.0, 0.0],
                discharge: vec![0.0, 0.9],
                curtail: vec![0.5, 0.0],
            },
            marginal_costs: vec![10.0, 20.0],
            residuals: Residuals::default(),
        }
    }

    fn read_rows<T: for<'de> Deserialize<'de>>(file_path: &Path) -> Vec<T> {
        csv::Reader::from_path(file_path)
            .unwrap()
            .into_deserialize()
            .try_collect()
            .unwrap()
    }

    #[test]
    fn test_create_output_directory_new_directory() {
        let temp_dir = tempdir().unwrap();
        let output_dir = temp_dir.path().join("new_output");

        // Create a new directory should succeed and return false (no overwrite)
        let result = create_output_directory(&output_dir, false).unwrap();
        assert!(!result);
        assert!(output_dir.exists());
        assert!(output_dir.is_dir());
    }

    #[test]
    fn test_create_output_directory_existing_empty_directory() {
        let temp_dir = tempdir().unwrap();
        let output_dir = temp_dir.path().join("empty_output");
        fs::create_dir(&output_dir).unwrap();

        let result = create_output_directory(&output_dir, false).unwrap();
        assert!(!result);
        assert!(output_dir.is_dir());
    }

    #[test]
    fn test_create_output_directory_existing_with_files() {
        let temp_dir = tempdir().unwrap();
        let output_dir = temp_dir.path().join("output_with_files");
        fs::create_dir(&output_dir).unwrap();
        fs::write(output_dir.join("existing_file.txt"), "some content").unwrap();

        // Without overwrite this should fail and leave the file in place
        assert!(create_output_directory(&output_dir, false).is_err());
        assert!(output_dir.join("existing_file.txt").exists());

        // With overwrite the folder is emptied
        assert!(create_output_directory(&output_dir, true).unwrap());
        assert!(output_dir.is_dir());
        assert!(!output_dir.join("existing_file.txt").exists());
    }

    #[test]
    fn test_get_output_dir() {
        let temp_dir = tempdir().unwrap();
        let model_dir = temp_dir.path().join("my_model");
        fs::create_dir(&model_dir).unwrap();

        assert_eq!(
            get_output_dir(&model_dir).unwrap(),
            [OUTPUT_DIRECTORY_ROOT, "my_model"].iter().collect::<PathBuf>()
        );

        // The model folder must exist
        assert!(get_output_dir(&temp_dir.path().join("missing")).is_err());
    }

    #[rstest]
    fn test_write_capacities(solution: Solution, raw_costs: IndexMap<String, f64>) {
        let costs = CostTable::from_raw(&raw_costs).unwrap();
        let dir = tempdir().unwrap();
        write_capacities(dir.path(), &solution, &costs).unwrap();

        let records: Vec<CapacityRow> = read_rows(&dir.path().join(CAPACITIES_FILE_NAME));
        assert_eq!(
            records,
            [
                CapacityRow {
                    technology: Technology::Wind,
                    capacity: 2.0,
                    capital_cost: 2.4e9
                },
                CapacityRow {
                    technology: Technology::Solar,
                    capacity: 3.0,
                    capital_cost: 2.4e9
                },
                CapacityRow {
                    technology: Technology::StoragePower,
                    capacity: 1.0,
                    capital_cost: 2.0e8
                },
                CapacityRow {
                    technology: Technology::StorageEnergy,
                    capacity: 4.0,
                    capital_cost: 6.0e8
                },
            ]
        );

        // Technologies are written with the same names used in model files
        let contents = fs::read_to_string(dir.path().join(CAPACITIES_FILE_NAME)).unwrap();
        assert!(contents.starts_with("technology,capacity,capital_cost\nw_cap,"));
    }

    #[rstest]
    fn test_write_dispatch(solution: Solution) {
        let dir = tempdir().unwrap();
        write_dispatch(dir.path(), &solution).unwrap();

        let records: Vec<DispatchRow> = read_rows(&dir.path().join(DISPATCH_FILE_NAME));
        assert_eq!(
            records,
            [
                DispatchRow {
                    t: 0,
                    soc: 2.0,
                    charge: 1.0,
                    discharge: 0.0,
                    curtail: 0.5,
                    marginal_cost: 10.0
                },
                DispatchRow {
                    t: 1,
                    soc: 3.0,
                    charge: 0.0,
                    discharge: 0.9,
                    curtail: 0.0,
                    marginal_cost: 20.0
                }
            ]
        );
    }

    #[rstest]
    fn test_write_summary(solution: Solution) {
        let summary = Summary {
            total_cost: solution.objective,
            capital_cost: solution.capital_cost,
            operating_cost: 10.0,
            demand: 4.0,
            wind_generation: 2.0,
            solar_generation: 3.0,
            curtailment: 0.5,
            storage_charge: 1.0,
            storage_discharge: 0.9,
            cost_per_unit_demand: Some(25.0),
        };
        let dir = tempdir().unwrap();
        write_summary(dir.path(), &summary).unwrap();

        let contents: toml::Table =
            toml::from_str(&fs::read_to_string(dir.path().join(SUMMARY_FILE_NAME)).unwrap())
                .unwrap();
        assert_eq!(contents["total_cost"].as_float(), Some(100.0));
        assert_eq!(contents["cost_per_unit_demand"].as_float(), Some(25.0));
    }

    #[rstest]
    fn test_write_debug_info(solution: Solution) {
        let dir = tempdir().unwrap();
        write_debug_info(dir.path(), &solution).unwrap();

        let contents: toml::Table =
            toml::from_str(&fs::read_to_string(dir.path().join(RESIDUALS_FILE_NAME)).unwrap())
                .unwrap();
        assert_eq!(contents["soc_balance"].as_float(), Some(0.0));
    }
}
