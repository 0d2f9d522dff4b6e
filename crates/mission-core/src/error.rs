//! Error type shared by every planning operation.

use thiserror::Error;

/// Errors produced while validating input or computing mission geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanningError {
    /// Invalid input: out-of-range coordinates, non-positive spacing/voltage,
    /// malformed region, and similar.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Bearing requested between two points with no horizontal separation.
    #[error("bearing undefined between coincident points ({lat:.7}, {lon:.7})")]
    DegenerateGeometry { lat: f64, lon: f64 },
}

impl PlanningError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_degenerate_geometry(&self) -> bool {
        matches!(self, Self::DegenerateGeometry { .. })
    }
}

pub type Result<T, E = PlanningError> = std::result::Result<T, E>;
