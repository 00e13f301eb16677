//! Operational parameters for energy storage and curtailment.
use crate::error::BuildError;
use serde::{Deserialize, Serialize};

/// Default minimum state of charge, as a fraction of installed energy capacity
const DEFAULT_MIN_LEVEL: f64 = 0.2;

/// Default fraction of charged energy which ends up in storage
const DEFAULT_CHARGE_EFFICIENCY: f64 = 0.95;

/// Default fraction of withdrawn stored energy which is delivered as discharge
const DEFAULT_DISCHARGE_EFFICIENCY: f64 = 0.9;

/// Default variable cost of storage discharge ($/GWh)
const DEFAULT_DISCHARGE_COST: f64 = 5000.0;

/// Default penalty for curtailed renewable energy ($/GWh)
const DEFAULT_CURTAILMENT_COST: f64 = 1000.0;

/// Parameters governing how storage operates and what operation costs.
///
/// Represents the `[operation]` section of the model file. Any field which is omitted takes its
/// default value.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OperationalParameters {
    /// Minimum state of charge as a fraction of installed energy capacity
    pub min_level: f64,
    /// Charging efficiency
    pub charge_efficiency: f64,
    /// Discharging efficiency
    pub discharge_efficiency: f64,
    /// Variable cost per unit of energy discharged from storage ($/GWh)
    pub discharge_cost: f64,
    /// Penalty per unit of curtailed energy ($/GWh)
    pub curtailment_cost: f64,
}

impl Default for OperationalParameters {
    fn default() -> Self {
        Self {
            min_level: DEFAULT_MIN_LEVEL,
            charge_efficiency: DEFAULT_CHARGE_EFFICIENCY,
            discharge_efficiency: DEFAULT_DISCHARGE_EFFICIENCY,
            discharge_cost: DEFAULT_DISCHARGE_COST,
            curtailment_cost: DEFAULT_CURTAILMENT_COST,
        }
    }
}

/// Check that a fraction lies in the range (0, 1]
fn check_fraction(name: &str, value: f64) -> Result<(), BuildError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(BuildError::InvalidParameter(format!(
            "{name} must be greater than zero and at most one (got {value})"
        )))
    }
}

/// Check that a cost is finite and not negative
fn check_cost(name: &str, value: f64) -> Result<(), BuildError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(BuildError::InvalidParameter(format!(
            "{name} must be a non-negative number (got {value})"
        )))
    }
}

impl OperationalParameters {
    /// Check that all parameters are within their valid ranges
    pub fn validate(&self) -> Result<(), BuildError> {
        check_fraction("min_level", self.min_level)?;
        check_fraction("charge_efficiency", self.charge_efficiency)?;
        check_fraction("discharge_efficiency", self.discharge_efficiency)?;
        check_cost("discharge_cost", self.discharge_cost)?;
        check_cost("curtailment_cost", self.curtailment_cost)
    }
}
