//! Mission Core - flight path planning for UAV missions.
//!
//! Geodesy, waypoint/path models, sequential path assembly, boustrophedon
//! coverage generation and battery draw estimates. Everything here is pure,
//! synchronous computation; delivering a [`FlightPath`] to a vehicle is the
//! caller's job.

pub mod altitude;
pub mod config;
pub mod energy;
pub mod error;
pub mod grid;
pub mod models;
pub mod planner;
pub mod spatial;

pub use altitude::AltitudeReference;
pub use config::{CoincidentBearing, GridOptions, PlannerConfig};
pub use energy::{
    amp_hours, calculate_fuel_consumption, evaluate_endurance, BatteryPack, EnduranceCheck,
    EnduranceStatus,
};
pub use error::{PlanningError, Result};
pub use grid::{GridPathPlanner, GridRegion, ScanLine};
pub use models::{FlightPath, PathLeg, Waypoint};
pub use planner::{PathGenerator, PathPlanner};
pub use spatial::{
    bearing_with_policy, calculate_bearing, calculate_distance, haversine_distance,
    try_calculate_bearing,
};
