//! Mission CLI - plan UAV missions from JSON descriptions.
//!
//! Library half of the `plan_mission` binary:
//! - config: planner defaults from the environment
//! - mission_file: mission description loading and planner construction
//! - report: text and JSON rendering of a planned mission

pub mod config;
pub mod mission_file;
pub mod report;

pub use config::Config;
pub use mission_file::{GridSpec, MissionFile, PowerProfile};
pub use report::MissionReport;
