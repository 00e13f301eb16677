//! Code for reading the model file.
use super::read_toml;
use crate::parameters::OperationalParameters;
use anyhow::Result;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The name of the model file in a model directory
pub const MODEL_FILE_NAME: &str = "model.toml";

/// The default name of the hourly time series file
const DEFAULT_TIME_SERIES_FILE_NAME: &str = "time_series.csv";

fn default_time_series_file() -> PathBuf {
    PathBuf::from(DEFAULT_TIME_SERIES_FILE_NAME)
}

/// Represents the contents of the entire model file.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelFile {
    /// Path to the hourly time series CSV file, relative to the model directory
    #[serde(default = "default_time_series_file")]
    pub time_series_file: PathBuf,
    /// Capital cost for each technology, keyed by technology name.
    ///
    /// These are checked against the set of technologies when the problem is built.
    pub costs: IndexMap<String, f64>,
    /// Storage and curtailment parameters
    #[serde(default)]
    pub operation: OperationalParameters,
}

impl ModelFile {
    /// Read a model file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelFile> {
        let file_path = model_dir.as_ref().join(MODEL_FILE_NAME);
        read_toml(&file_path)
    }
}
