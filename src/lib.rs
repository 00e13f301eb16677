//! Least-cost capacity expansion and hourly dispatch for a power system made up of wind, solar and
//! battery storage.
//!
//! The optimisation problem is built from hourly capacity factors and demand by
//! [`formulation::build`] and solved with [`solver::solve`].
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod error;
pub mod formulation;
pub mod input;
pub mod log;
pub mod lp;
pub mod model;
pub mod output;
pub mod parameters;
pub mod settings;
pub mod solution;
pub mod solver;
pub mod technology;
pub mod time_series;

#[cfg(test)]
mod fixture;

/// Get config dir for program.
///
/// This is the place where program settings are stored.
pub fn get_wss_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // If we can't find a config directory, use the current directory
        return PathBuf::default();
    };

    config_dir.push("wss");
    config_dir
}
