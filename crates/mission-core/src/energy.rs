//! Battery draw estimates for planned paths.

use crate::error::{PlanningError, Result};
use crate::models::FlightPath;
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Fraction of pack capacity above the reserve that still counts as marginal.
const WARN_MARGIN_FRACTION: f64 = 0.1;

/// Charge in amp-hours drawn at a constant `power_watts` from a `voltage`
/// supply over the path's estimated duration.
pub fn calculate_fuel_consumption(
    power_watts: f64,
    voltage: f64,
    flight_path: &FlightPath,
) -> Result<f64> {
    amp_hours(power_watts, voltage, flight_path.estimated_duration())
}

/// `power_watts / voltage * duration_s / 3600`.
pub fn amp_hours(power_watts: f64, voltage: f64, duration_s: f64) -> Result<f64> {
    if !voltage.is_finite() || voltage <= 0.0 {
        return Err(PlanningError::validation(format!(
            "voltage must be positive, got {voltage}"
        )));
    }
    if !power_watts.is_finite() || power_watts < 0.0 {
        return Err(PlanningError::validation(format!(
            "power draw cannot be negative, got {power_watts}"
        )));
    }
    if !duration_s.is_finite() || duration_s < 0.0 {
        return Err(PlanningError::validation(format!(
            "duration cannot be negative, got {duration_s}"
        )));
    }
    Ok(power_watts / voltage * (duration_s / SECONDS_PER_HOUR))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryPack {
    pub capacity_ah: f64,
    /// Share of capacity that must remain on landing, in [0, 1)
    #[serde(default)]
    pub reserve_fraction: f64,
}

impl BatteryPack {
    pub fn validate(&self) -> Result<()> {
        if !self.capacity_ah.is_finite() || self.capacity_ah <= 0.0 {
            return Err(PlanningError::validation(format!(
                "battery capacity must be positive, got {}",
                self.capacity_ah
            )));
        }
        if !(0.0..1.0).contains(&self.reserve_fraction) {
            return Err(PlanningError::validation(format!(
                "reserve fraction must be in [0, 1), got {}",
                self.reserve_fraction
            )));
        }
        Ok(())
    }

    pub fn reserve_ah(&self) -> f64 {
        self.capacity_ah * self.reserve_fraction
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnduranceStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnduranceCheck {
    pub status: EnduranceStatus,
    pub message: String,
    pub required_ah: f64,
    pub capacity_ah: f64,
    pub reserve_ah: f64,
    pub remaining_ah: f64,
}

/// Compare the path's draw against a battery pack and its landing reserve.
pub fn evaluate_endurance(
    power_watts: f64,
    voltage: f64,
    flight_path: &FlightPath,
    battery: &BatteryPack,
) -> Result<EnduranceCheck> {
    battery.validate()?;
    let required_ah = calculate_fuel_consumption(power_watts, voltage, flight_path)?;
    let reserve_ah = battery.reserve_ah();
    let remaining_ah = battery.capacity_ah - required_ah;

    let status = if remaining_ah < reserve_ah {
        EnduranceStatus::Fail
    } else if remaining_ah < reserve_ah + battery.capacity_ah * WARN_MARGIN_FRACTION {
        EnduranceStatus::Warn
    } else {
        EnduranceStatus::Pass
    };

    Ok(EnduranceCheck {
        status,
        message: format!(
            "Need {:.2} Ah | Remaining {:.2} Ah (reserve {:.2} Ah)",
            required_ah, remaining_ah, reserve_ah
        ),
        required_ah,
        capacity_ah: battery.capacity_ah,
        reserve_ah,
        remaining_ah,
    })
}
