//! Common routines for handling input data.
use crate::model::Model;
use anyhow::{Context, Result};
use itertools::Itertools;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub mod model_file;
use model_file::ModelFile;
pub mod time_series;
use time_series::read_time_series;

/// Read a series of type `T`s from a CSV file.
///
/// A file containing only column headers gives an empty iterator.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<'a, T: DeserializeOwned + 'a>(
    file_path: &'a Path,
) -> Result<impl Iterator<Item = T> + 'a> {
    let vec = csv::Reader::from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .process_results(|iter| iter.collect_vec())
        .with_context(|| input_err_msg(file_path))?;

    Ok(vec.into_iter())
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read a model from the specified directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// The model's input data. The data are read but the optimisation problem is not yet built.
pub fn load_model<P: AsRef<Path>>(model_dir: P) -> Result<Model> {
    let model_file = ModelFile::from_path(&model_dir)?;

    // NB: If the path is absolute, it is used as is
    let time_series_path = model_dir.as_ref().join(&model_file.time_series_file);
    let time_series = read_time_series(&time_series_path)?;

    Ok(Model {
        model_dir: model_dir.as_ref().to_path_buf(),
        time_series,
        costs: model_file.costs,
        parameters: model_file.operation,
    })
}
