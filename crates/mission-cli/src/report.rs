//! Planned mission summaries.

use crate::mission_file::PowerProfile;
use chrono::{DateTime, Utc};
use mission_core::{
    calculate_fuel_consumption, evaluate_endurance, BatteryPack, CoincidentBearing,
    EnduranceCheck, FlightPath, PathLeg,
};
use serde::Serialize;
use std::fmt::Write;

/// Everything the planner knows about a mission, ready for hand-off.
#[derive(Debug, Clone, Serialize)]
pub struct MissionReport {
    pub flight_path: FlightPath,
    pub legs: Vec<PathLeg>,
    pub power: PowerProfile,
    pub consumption_ah: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endurance: Option<EnduranceCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival: Option<DateTime<Utc>>,
}

impl MissionReport {
    pub fn build(
        flight_path: FlightPath,
        policy: CoincidentBearing,
        power: PowerProfile,
        battery: Option<&BatteryPack>,
        departure: Option<DateTime<Utc>>,
    ) -> mission_core::Result<Self> {
        let legs = flight_path.legs(policy)?;
        let consumption_ah =
            calculate_fuel_consumption(power.power_watts, power.voltage, &flight_path)?;
        let endurance = battery
            .map(|pack| evaluate_endurance(power.power_watts, power.voltage, &flight_path, pack))
            .transpose()?;
        let arrival = departure
            .map(|at| flight_path.estimated_arrival(at))
            .transpose()?;

        Ok(Self {
            flight_path,
            legs,
            power,
            consumption_ah,
            endurance,
            departure,
            arrival,
        })
    }

    pub fn render_text(&self) -> String {
        let path = &self.flight_path;
        let mut out = String::new();
        let _ = writeln!(out, "Flight path generated:");
        let _ = writeln!(out, "  Total distance: {:.2}m", path.total_distance());
        let _ = writeln!(out, "  Estimated duration: {:.2}s", path.estimated_duration());
        let _ = writeln!(out, "  Number of waypoints: {}", path.waypoint_count());

        for (i, wp) in path.waypoints().iter().enumerate() {
            let _ = write!(
                out,
                "  WP{}{}: ({:.6}, {:.6}) alt={}m",
                i,
                if i == 0 { " (HOME)" } else { "" },
                wp.lat,
                wp.lon,
                wp.altitude_m
            );
            if let Some(leg) = i.checked_sub(1).and_then(|prev| self.legs.get(prev)) {
                let _ = write!(
                    out,
                    " - distance={:.2}m, bearing={:.1}°",
                    leg.distance_m, leg.bearing_deg
                );
            }
            out.push('\n');
        }

        let _ = writeln!(
            out,
            "\nEstimated battery consumption: {:.2}Ah ({} W @ {} V)",
            self.consumption_ah, self.power.power_watts, self.power.voltage
        );
        if let Some(check) = &self.endurance {
            let _ = writeln!(out, "Endurance: {:?} - {}", check.status, check.message);
        }
        if let (Some(departure), Some(arrival)) = (self.departure, self.arrival) {
            let _ = writeln!(
                out,
                "Departure {} | Estimated arrival {}",
                departure.to_rfc3339(),
                arrival.to_rfc3339()
            );
        }
        out
    }
}
