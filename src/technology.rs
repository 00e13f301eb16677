//! The technologies which can be invested in and their capital costs.
use crate::error::BuildError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// A technology with an installed capacity to be decided by the optimisation.
///
/// The string representations match the keys used in model files.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum Technology {
    /// Wind generation capacity (GW)
    #[strum(serialize = "w_cap")]
    #[serde(rename = "w_cap")]
    Wind,
    /// Solar generation capacity (GW)
    #[strum(serialize = "s_cap")]
    #[serde(rename = "s_cap")]
    Solar,
    /// Storage power capacity (GW)
    #[strum(serialize = "ESS_power_cap")]
    #[serde(rename = "ESS_power_cap")]
    StoragePower,
    /// Storage energy capacity (GWh)
    #[strum(serialize = "ESS_energy_cap")]
    #[serde(rename = "ESS_energy_cap")]
    StorageEnergy,
}

/// Capital cost per unit of installed capacity for every technology.
///
/// Guaranteed to contain exactly one non-negative, finite cost for each [`Technology`], in
/// declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct CostTable(IndexMap<Technology, f64>);

impl CostTable {
    /// Create a [`CostTable`] from a map of technology names to costs.
    ///
    /// # Arguments
    ///
    /// * `raw` - Costs keyed by technology name (e.g. `"w_cap"`)
    ///
    /// # Returns
    ///
    /// The validated cost table, or [`BuildError::Config`] if the set of keys does not match the
    /// set of technologies, or [`BuildError::InvalidParameter`] if a cost is negative or not finite.
    pub fn from_raw(raw: &IndexMap<String, f64>) -> Result<Self, BuildError> {
        let mut costs = IndexMap::new();
        for (name, cost) in raw {
            let tech = Technology::from_str(name)
                .map_err(|_| BuildError::Config(format!("Unknown technology '{name}'")))?;
            costs.insert(tech, *cost);
        }

        for tech in Technology::iter() {
            if !costs.contains_key(&tech) {
                return Err(BuildError::Config(format!(
                    "Missing cost for technology '{tech}'"
                )));
            }
        }

        for (tech, cost) in &costs {
            if !(cost.is_finite() && *cost >= 0.0) {
                return Err(BuildError::InvalidParameter(format!(
                    "Cost for technology '{tech}' must be a non-negative number (got {cost})"
                )));
            }
        }

        // Store in canonical order
        Ok(Self(
            Technology::iter().map(|tech| (tech, costs[&tech])).collect(),
        ))
    }

    /// Get the capital cost for the given technology
    pub fn get(&self, tech: Technology) -> f64 {
        self.0[&tech]
    }

    /// Iterate over technologies and their costs
    pub fn iter(&self) -> impl Iterator<Item = (Technology, f64)> + '_ {
        self.0.iter().map(|(tech, cost)| (*tech, *cost))
    }
}
