//! Planner defaults from environment.

use mission_core::{AltitudeReference, CoincidentBearing, PlannerConfig};
use std::env;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub cruise_speed_mps: f64,
    pub loiter_time_s: f64,
    pub coincident_bearing: CoincidentBearing,
    pub altitude_reference: AltitudeReference,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset or unparseable values fall back to
    /// the planner defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = PlannerConfig::default();
        Self {
            cruise_speed_mps: lookup("MISSION_CRUISE_SPEED_MPS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.cruise_speed_mps),
            loiter_time_s: lookup("MISSION_LOITER_S")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.loiter_time_s),
            coincident_bearing: lookup("MISSION_COINCIDENT_BEARING")
                .and_then(|s| CoincidentBearing::parse(&s))
                .unwrap_or(defaults.coincident_bearing),
            altitude_reference: lookup("MISSION_ALTITUDE_REF")
                .and_then(|s| AltitudeReference::parse(&s))
                .unwrap_or(defaults.altitude_reference),
        }
    }

    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            cruise_speed_mps: self.cruise_speed_mps,
            loiter_time_s: self.loiter_time_s,
            coincident_bearing: self.coincident_bearing,
            altitude_reference: self.altitude_reference,
        }
    }
}
