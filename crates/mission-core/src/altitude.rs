//! Altitude reference handling.

use serde::{Deserialize, Serialize};

/// Datum that every altitude in a single mission is measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltitudeReference {
    /// Meters above the launch (home) point.
    #[default]
    HomeRelative,
    /// Meters above mean sea level.
    Amsl,
}

impl AltitudeReference {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "home" | "relative" | "home_relative" | "rel" => Some(Self::HomeRelative),
            "amsl" | "msl" => Some(Self::Amsl),
            _ => None,
        }
    }
}
