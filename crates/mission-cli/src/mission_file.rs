//! Mission description files.
//!
//! A mission is either a list of targets flown in order or a coverage grid;
//! both start from the same home point.

use anyhow::{bail, Context, Result};
use mission_core::{
    BatteryPack, GridOptions, GridPathPlanner, PathGenerator, PathPlanner, PlannerConfig, Waypoint,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionFile {
    pub home: Waypoint,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub grid: Option<GridSpec>,
    #[serde(default)]
    pub cruise_speed_mps: Option<f64>,
    #[serde(default)]
    pub loiter_time_s: Option<f64>,
    #[serde(default)]
    pub power: Option<PowerProfile>,
    #[serde(default)]
    pub battery: Option<BatteryPack>,
}

/// Coverage region as `[lat, lon]` corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub corners: Vec<[f64; 2]>,
    pub spacing_m: f64,
    pub altitude_m: f64,
    #[serde(flatten)]
    pub options: GridOptions,
}

/// Constant electrical draw used for consumption estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerProfile {
    pub power_watts: f64,
    pub voltage: f64,
}

impl Default for PowerProfile {
    fn default() -> Self {
        Self {
            power_watts: 500.0,
            voltage: 12.0,
        }
    }
}

impl MissionFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read mission file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid mission file {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("mission JSON does not match the expected layout")
    }

    /// Four-leg box hop around a Zurich test site, starting with a climb in place.
    pub fn demo() -> Self {
        let wp = |lat, lon, altitude_m| Waypoint {
            lat,
            lon,
            altitude_m,
        };
        Self {
            home: wp(47.3977419, 8.5455743, 400.0),
            waypoints: vec![
                wp(47.3977419, 8.5455743, 500.0),
                wp(47.3976900, 8.5456200, 550.0),
                wp(47.3976400, 8.5455700, 500.0),
                wp(47.3977419, 8.5455743, 400.0),
            ],
            grid: None,
            cruise_speed_mps: None,
            loiter_time_s: None,
            power: Some(PowerProfile::default()),
            battery: None,
        }
    }

    /// `base` with this mission's speed and loiter overrides applied.
    pub fn planner_config(&self, base: PlannerConfig) -> PlannerConfig {
        PlannerConfig {
            cruise_speed_mps: self.cruise_speed_mps.unwrap_or(base.cruise_speed_mps),
            loiter_time_s: self.loiter_time_s.unwrap_or(base.loiter_time_s),
            ..base
        }
    }

    pub fn is_coverage(&self) -> bool {
        self.grid.is_some()
    }

    /// Construct the planner this mission describes.
    pub fn build(&self, config: PlannerConfig) -> Result<Box<dyn PathGenerator>> {
        let home = self.home;
        match &self.grid {
            Some(grid) => {
                if !self.waypoints.is_empty() {
                    bail!("mission lists both waypoints and a grid; use one or the other");
                }
                let mut planner =
                    GridPathPlanner::with_config(home.lat, home.lon, home.altitude_m, config)
                        .context("invalid home position or planner settings")?
                        .with_options(grid.options.clone())
                        .context("invalid grid options")?;
                planner
                    .set_region(grid.corners.clone(), grid.spacing_m, grid.altitude_m)
                    .context("invalid coverage grid")?;
                Ok(Box::new(planner))
            }
            None => {
                let mut planner =
                    PathPlanner::with_config(home.lat, home.lon, home.altitude_m, config)
                        .context("invalid home position or planner settings")?;
                for (i, wp) in self.waypoints.iter().enumerate() {
                    planner
                        .add_waypoint(wp.lat, wp.lon, wp.altitude_m)
                        .with_context(|| format!("waypoint {} is invalid", i + 1))?;
                }
                Ok(Box::new(planner))
            }
        }
    }
}
