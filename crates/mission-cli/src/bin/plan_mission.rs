//! Plan a UAV mission and print the flight path.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use mission_cli::{Config, MissionFile, MissionReport, PowerProfile};
use mission_core::PathGenerator;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mission description (JSON). Runs the built-in demo mission when omitted.
    mission: Option<PathBuf>,

    /// Print the full report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Departure time (RFC 3339) used for the arrival estimate
    #[arg(long)]
    departure: Option<String>,

    /// Electrical draw in watts; overrides the mission file
    #[arg(long)]
    power_watts: Option<f64>,

    /// Supply voltage; overrides the mission file
    #[arg(long)]
    voltage: Option<f64>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mission_cli=info".parse()?)
                .add_directive("mission_core=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let env_config = Config::from_env();

    let mission = match &args.mission {
        Some(path) => MissionFile::load(path)?,
        None => {
            tracing::info!("No mission file given, planning the demo mission");
            MissionFile::demo()
        }
    };

    let departure = args
        .departure
        .as_deref()
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|at| at.with_timezone(&Utc))
                .with_context(|| format!("invalid departure time {raw:?}"))
        })
        .transpose()?;

    let config = mission.planner_config(env_config.planner_config());
    let policy = config.coincident_bearing;
    let generator = mission.build(config)?;
    let flight_path = generator.generate_path().context("path generation failed")?;
    tracing::info!(
        waypoints = flight_path.waypoint_count(),
        coverage = mission.is_coverage(),
        "Planned mission"
    );

    let base_power = mission.power.unwrap_or_default();
    let power = PowerProfile {
        power_watts: args.power_watts.unwrap_or(base_power.power_watts),
        voltage: args.voltage.unwrap_or(base_power.voltage),
    };

    let report = MissionReport::build(
        flight_path,
        policy,
        power,
        mission.battery.as_ref(),
        departure,
    )
    .context("failed to evaluate mission")?;

    if let Some(check) = &report.endurance {
        tracing::info!(
            status = ?check.status,
            remaining_ah = check.remaining_ah,
            "Endurance check"
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }

    Ok(())
}
