//! Core data models for mission planning.

use crate::altitude::AltitudeReference;
use crate::config::{CoincidentBearing, PlannerConfig};
use crate::error::{PlanningError, Result};
use crate::spatial::{bearing_with_policy, calculate_distance};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A single lat/lon/alt target in a mission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
    /// Meters above the mission's altitude reference
    #[serde(rename = "alt", alias = "altitude_m")]
    pub altitude_m: f64,
}

impl Waypoint {
    /// Create a waypoint, rejecting out-of-range or non-finite values.
    pub fn new(lat: f64, lon: f64, altitude_m: f64) -> Result<Self> {
        let waypoint = Self {
            lat,
            lon,
            altitude_m,
        };
        waypoint.validate()?;
        Ok(waypoint)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(PlanningError::validation(format!(
                "latitude {} outside [-90, 90]",
                self.lat
            )));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(PlanningError::validation(format!(
                "longitude {} outside [-180, 180]",
                self.lon
            )));
        }
        if !self.altitude_m.is_finite() {
            return Err(PlanningError::validation("altitude must be finite"));
        }
        Ok(())
    }
}

/// One segment between consecutive waypoints of a flight path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathLeg {
    pub from_index: usize,
    pub to_index: usize,
    pub distance_m: f64,
    pub bearing_deg: f64,
    pub altitude_change_m: f64,
}

/// The immutable result of planning: home followed by every target in
/// flight order, with aggregate metrics.
///
/// Only planners construct paths, so `total_distance` always equals the sum
/// of [`calculate_distance`] over consecutive waypoints of the stored
/// sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightPath {
    waypoints: Vec<Waypoint>,
    #[serde(rename = "total_distance")]
    total_distance_m: f64,
    #[serde(rename = "estimated_duration")]
    estimated_duration_s: f64,
    cruise_speed_mps: f64,
    altitude_reference: AltitudeReference,
}

impl FlightPath {
    /// Build a path from an already-validated sequence whose first element is home.
    pub(crate) fn assemble(waypoints: Vec<Waypoint>, config: &PlannerConfig) -> Self {
        let total_distance_m = path_distance(&waypoints);
        let targets = waypoints.len().saturating_sub(1);
        let estimated_duration_s =
            total_distance_m / config.cruise_speed_mps + config.loiter_time_s * targets as f64;

        Self {
            waypoints,
            total_distance_m,
            estimated_duration_s,
            cruise_speed_mps: config.cruise_speed_mps,
            altitude_reference: config.altitude_reference,
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// The launch point, always the first waypoint.
    pub fn home(&self) -> &Waypoint {
        &self.waypoints[0]
    }

    /// Number of waypoints including home.
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// Total great-circle distance in meters.
    pub fn total_distance(&self) -> f64 {
        self.total_distance_m
    }

    /// Estimated flight time in seconds.
    pub fn estimated_duration(&self) -> f64 {
        self.estimated_duration_s
    }

    pub fn cruise_speed_mps(&self) -> f64 {
        self.cruise_speed_mps
    }

    pub fn altitude_reference(&self) -> AltitudeReference {
        self.altitude_reference
    }

    /// Distance, bearing and climb for every consecutive pair.
    pub fn legs(&self, policy: CoincidentBearing) -> Result<Vec<PathLeg>> {
        self.waypoints
            .windows(2)
            .enumerate()
            .map(|(idx, pair)| {
                Ok(PathLeg {
                    from_index: idx,
                    to_index: idx + 1,
                    distance_m: calculate_distance(&pair[0], &pair[1]),
                    bearing_deg: bearing_with_policy(&pair[0], &pair[1], policy)?,
                    altitude_change_m: pair[1].altitude_m - pair[0].altitude_m,
                })
            })
            .collect()
    }

    /// Estimated arrival time when departing at `departure`. Fails when the
    /// arrival falls outside the representable calendar range.
    pub fn estimated_arrival(&self, departure: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let millis = (self.estimated_duration_s * 1000.0).round();
        let out_of_range = || {
            PlanningError::validation(format!(
                "estimated duration of {} s is out of range for an arrival time",
                self.estimated_duration_s
            ))
        };
        // i64::MAX as f64 rounds up, so the bound is exclusive.
        if !millis.is_finite() || millis >= i64::MAX as f64 {
            return Err(out_of_range());
        }
        TimeDelta::try_milliseconds(millis as i64)
            .and_then(|elapsed| departure.checked_add_signed(elapsed))
            .ok_or_else(out_of_range)
    }
}

fn path_distance(waypoints: &[Waypoint]) -> f64 {
    waypoints
        .windows(2)
        .map(|pair| calculate_distance(&pair[0], &pair[1]))
        .sum()
}
