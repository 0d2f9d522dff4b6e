//! Path assembly: turns a home position plus ordered targets into a
//! [`FlightPath`] with aggregate metrics.

use crate::config::PlannerConfig;
use crate::energy;
use crate::error::Result;
use crate::models::{FlightPath, PathLeg, Waypoint};
use crate::spatial;

/// Anything that can produce a flight path on demand.
pub trait PathGenerator {
    fn generate_path(&self) -> Result<FlightPath>;
}

/// Mutable mission builder.
///
/// Targets are flown in the order they were added; the planner never
/// reorders them.
#[derive(Debug, Clone)]
pub struct PathPlanner {
    home: Waypoint,
    pending: Vec<Waypoint>,
    config: PlannerConfig,
}

impl PathPlanner {
    /// Create a planner with the default configuration.
    pub fn new(home_lat: f64, home_lon: f64, home_alt: f64) -> Result<Self> {
        Self::with_config(home_lat, home_lon, home_alt, PlannerConfig::default())
    }

    pub fn with_config(
        home_lat: f64,
        home_lon: f64,
        home_alt: f64,
        config: PlannerConfig,
    ) -> Result<Self> {
        config.validate()?;
        let home = Waypoint::new(home_lat, home_lon, home_alt)?;
        Ok(Self {
            home,
            pending: Vec::new(),
            config,
        })
    }

    pub fn home(&self) -> &Waypoint {
        &self.home
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Targets added so far, in flight order.
    pub fn pending(&self) -> &[Waypoint] {
        &self.pending
    }

    /// Append a target. Out-of-range input is rejected and leaves the
    /// pending list untouched.
    pub fn add_waypoint(&mut self, lat: f64, lon: f64, alt: f64) -> Result<()> {
        let waypoint = Waypoint::new(lat, lon, alt).inspect_err(|err| {
            tracing::warn!(lat, lon, alt, error = %err, "rejected waypoint");
        })?;
        self.pending.push(waypoint);
        Ok(())
    }

    /// Build `[home] + pending` and compute its metrics.
    pub fn generate_path(&self) -> FlightPath {
        self.assemble(&self.pending)
    }

    /// Like [`generate_path`](Self::generate_path), but hands the pending
    /// list over to the path instead of copying it.
    pub fn into_path(self) -> FlightPath {
        let mut waypoints = Vec::with_capacity(self.pending.len() + 1);
        waypoints.push(self.home);
        waypoints.extend(self.pending);
        finish(waypoints, &self.config)
    }

    /// Assemble a path from this planner's home and an arbitrary target list.
    pub(crate) fn assemble(&self, targets: &[Waypoint]) -> FlightPath {
        let mut waypoints = Vec::with_capacity(targets.len() + 1);
        waypoints.push(self.home);
        waypoints.extend_from_slice(targets);
        finish(waypoints, &self.config)
    }

    pub fn calculate_distance(&self, p1: &Waypoint, p2: &Waypoint) -> f64 {
        spatial::calculate_distance(p1, p2)
    }

    /// Bearing under this planner's coincident-point policy.
    pub fn calculate_bearing(&self, p1: &Waypoint, p2: &Waypoint) -> Result<f64> {
        spatial::bearing_with_policy(p1, p2, self.config.coincident_bearing)
    }

    pub fn leg_summary(&self, flight_path: &FlightPath) -> Result<Vec<PathLeg>> {
        flight_path.legs(self.config.coincident_bearing)
    }

    /// Battery charge in amp-hours drawn while flying `flight_path`.
    pub fn calculate_fuel_consumption(
        &self,
        power_watts: f64,
        voltage: f64,
        flight_path: &FlightPath,
    ) -> Result<f64> {
        energy::calculate_fuel_consumption(power_watts, voltage, flight_path)
    }
}

impl PathGenerator for PathPlanner {
    fn generate_path(&self) -> Result<FlightPath> {
        Ok(PathPlanner::generate_path(self))
    }
}

fn finish(waypoints: Vec<Waypoint>, config: &PlannerConfig) -> FlightPath {
    let path = FlightPath::assemble(waypoints, config);
    tracing::debug!(
        waypoints = path.waypoint_count(),
        total_distance_m = path.total_distance(),
        estimated_duration_s = path.estimated_duration(),
        "generated flight path"
    );
    path
}
