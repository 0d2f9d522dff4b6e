//! Spherical-earth geodesy for mission planning.
//!
//! Distances use the haversine formula on a sphere of mean radius
//! [`EARTH_RADIUS_M`]; bearings use the standard forward-azimuth formula.
//! The local metric helpers (meters per degree, offsets) are used by the
//! coverage planner to work in a flat east/north frame around a region.

use crate::config::CoincidentBearing;
use crate::error::{PlanningError, Result};
use crate::models::Waypoint;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Horizontal separation below which two points are treated as coincident
/// for bearing purposes.
pub const COINCIDENT_TOLERANCE_M: f64 = 1e-6;

/// Great-circle distance between two waypoints in meters.
///
/// Altitude is ignored. Symmetric in its arguments and exactly zero for
/// identical coordinates.
pub fn calculate_distance(p1: &Waypoint, p2: &Waypoint) -> f64 {
    haversine_distance(p1.lat, p1.lon, p2.lat, p2.lon)
}

/// Initial bearing from `p1` to `p2` in degrees, normalized to `[0, 360)`.
///
/// Returns `0.0` when the points share the same horizontal position (for
/// example a pure climb). Use [`try_calculate_bearing`] to get an error in
/// that case instead.
pub fn calculate_bearing(p1: &Waypoint, p2: &Waypoint) -> f64 {
    bearing_with_policy(p1, p2, CoincidentBearing::Zero).unwrap_or(0.0)
}

/// Initial bearing from `p1` to `p2`, failing with
/// [`PlanningError::DegenerateGeometry`] for coincident points.
pub fn try_calculate_bearing(p1: &Waypoint, p2: &Waypoint) -> Result<f64> {
    bearing_with_policy(p1, p2, CoincidentBearing::Error)
}

/// Initial bearing from `p1` to `p2` with an explicit coincident-point policy.
pub fn bearing_with_policy(
    p1: &Waypoint,
    p2: &Waypoint,
    policy: CoincidentBearing,
) -> Result<f64> {
    if calculate_distance(p1, p2) < COINCIDENT_TOLERANCE_M {
        return match policy {
            CoincidentBearing::Zero => Ok(0.0),
            CoincidentBearing::Error => Err(PlanningError::DegenerateGeometry {
                lat: p1.lat,
                lon: p1.lon,
            }),
        };
    }
    Ok(initial_bearing_deg(p1.lat, p1.lon, p2.lat, p2.lon))
}

/// Calculate distance between two points in meters using Haversine formula.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in meters
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // Rounding can push `a` a hair outside [0, 1] near antipodes.
    let a = a.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Forward azimuth from point 1 to point 2 in degrees, `[0, 360)`.
/// 0 = north, 90 = east.
pub fn initial_bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_degrees(x.atan2(y).to_degrees())
}

fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

// ==== Local metric frame ====
// Latitude-aware scaling between meters and degrees.

/// Meters per degree of latitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lat(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_132.954 - 559.822 * (2.0 * lat_rad).cos() + 1.175 * (4.0 * lat_rad).cos()
        - 0.0023 * (6.0 * lat_rad).cos()
}

/// Meters per degree of longitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos() + 0.118 * (5.0 * lat_rad).cos()
}

/// Convert a north/south offset in meters to degrees latitude.
pub fn meters_to_lat(meters: f64, ref_lat_deg: f64) -> f64 {
    let meters_per_deg = meters_per_deg_lat(ref_lat_deg).max(1e-9);
    meters / meters_per_deg
}

/// Convert an east/west offset in meters to degrees longitude.
/// Requires the reference latitude for proper scaling.
pub fn meters_to_lon(meters: f64, ref_lat_deg: f64) -> f64 {
    let meters_per_deg = meters_per_deg_lon(ref_lat_deg).max(1e-9);
    meters / meters_per_deg
}

/// Convert degrees latitude to meters using local scaling.
pub fn lat_to_meters(deg: f64, ref_lat_deg: f64) -> f64 {
    deg * meters_per_deg_lat(ref_lat_deg)
}

/// Convert degrees longitude to meters at a given latitude.
pub fn lon_to_meters(deg: f64, ref_lat_deg: f64) -> f64 {
    deg * meters_per_deg_lon(ref_lat_deg)
}
