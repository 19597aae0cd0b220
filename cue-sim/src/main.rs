//! Headless shot runner: loads a rack layout, fires one cue shot and prints
//! where everything came to rest.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cue_core::collision::{DistanceMatrix, ImpulseResponse, RestitutionResponse};
use cue_core::rack::Rack;
use cue_core::simulation::{NullSink, Shot, ShotSimulator};
use cue_core::types::{Mat3, Vec3};

#[derive(Parser, Debug)]
#[command(about = "Simulate one billiards shot to rest")]
struct Args {
    /// Rack layout file
    #[arg(short, long, default_value = "racks/standard.yaml")]
    rack: String,

    /// Shot force level, 0..=7
    #[arg(short, long, default_value_t = 3)]
    force_level: u8,

    /// Aim angle in degrees, counterclockwise from +X in the table plane
    #[arg(short, long, default_value_t = 0.0)]
    aim_degrees: f64,

    /// Pace the loop at the interactive tick rate instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Use the legacy restitution collision model
    #[arg(long)]
    legacy_collisions: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let mut rack = Rack::from_file(&args.rack)
        .with_context(|| format!("failed to load rack from {}", args.rack))?;
    let mut distances = DistanceMatrix::new(rack.len());
    info!(balls = rack.len(), rack = %args.rack, "rack loaded");

    let direction = Mat3::rotation_y(args.aim_degrees.to_radians()) * Vec3::new(1.0, 0.0, 0.0);
    let shot = Shot::new(direction, args.force_level);

    let response: Box<dyn cue_core::collision::CollisionResponse + Send + Sync> =
        if args.legacy_collisions {
            Box::new(RestitutionResponse)
        } else {
            Box::new(ImpulseResponse)
        };
    let simulator = if args.realtime {
        ShotSimulator::realtime(response)
    } else {
        ShotSimulator::new(Duration::ZERO, response)
    };

    let stop = AtomicBool::new(false);
    let outcome = simulator
        .simulate_shot(&mut rack, &mut distances, shot, &mut NullSink, &stop)
        .context("shot did not complete")?;

    println!("settled after {} ticks", outcome.iterations);
    for ball in rack.iter() {
        let p = ball.position();
        println!("{:<12} ({:+.4}, {:+.4}, {:+.4})", ball.name(), p.x, p.y, p.z);
    }

    Ok(())
}
