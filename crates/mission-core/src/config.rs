//! Planner and coverage configuration.

use crate::altitude::AltitudeReference;
use crate::error::{PlanningError, Result};
use serde::{Deserialize, Serialize};

/// What a bearing query returns for two points with no horizontal separation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoincidentBearing {
    /// Report a bearing of 0 degrees.
    #[default]
    Zero,
    /// Fail with `PlanningError::DegenerateGeometry`.
    Error,
}

impl CoincidentBearing {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "zero" | "0" => Some(Self::Zero),
            "error" | "err" | "strict" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Configuration for path assembly and metric computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Horizontal cruise speed used for duration estimates
    pub cruise_speed_mps: f64,
    /// Hover time spent at every target waypoint (home excluded)
    pub loiter_time_s: f64,
    /// Bearing policy for coincident points
    pub coincident_bearing: CoincidentBearing,
    /// Datum for every waypoint altitude in the mission
    pub altitude_reference: AltitudeReference,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            cruise_speed_mps: 10.0,
            loiter_time_s: 0.0,
            coincident_bearing: CoincidentBearing::Zero,
            altitude_reference: AltitudeReference::HomeRelative,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.cruise_speed_mps.is_finite() || self.cruise_speed_mps <= 0.0 {
            return Err(PlanningError::validation(format!(
                "cruise speed must be positive, got {}",
                self.cruise_speed_mps
            )));
        }
        if !self.loiter_time_s.is_finite() || self.loiter_time_s < 0.0 {
            return Err(PlanningError::validation(format!(
                "loiter time cannot be negative, got {}",
                self.loiter_time_s
            )));
        }
        Ok(())
    }
}

/// Options controlling coverage waypoint emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Emit intermediate waypoints so no two consecutive waypoints on a
    /// scan line are further apart than the line spacing
    pub subdivide_lines: bool,
    /// Close the mission by flying back to the home point
    pub return_to_home: bool,
    /// Upper bound on generated coverage waypoints
    pub max_waypoints: usize,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            subdivide_lines: true,
            return_to_home: false,
            max_waypoints: 10_000,
        }
    }
}

impl GridOptions {
    /// Largest accepted `max_waypoints`.
    pub const WAYPOINT_CEILING: usize = 1_000_000;

    pub fn validate(&self) -> Result<()> {
        if !(1..=Self::WAYPOINT_CEILING).contains(&self.max_waypoints) {
            return Err(PlanningError::validation(format!(
                "waypoint limit must be between 1 and {}, got {}",
                Self::WAYPOINT_CEILING,
                self.max_waypoints
            )));
        }
        Ok(())
    }
}
