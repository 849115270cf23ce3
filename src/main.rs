use anyhow::{ensure, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};

use cruise_sim::simulation::{
    millis_to_seconds, parse_speed_input, DistancePolicy, LaneChangeDirection, SimConfig, SimWorld,
};

#[derive(Parser)]
#[command(name = "cruise_sim")]
#[command(about = "Adaptive cruise control and lane change simulation, run headless")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "1800")]
    ticks: u32,

    /// Time per tick in milliseconds
    #[arg(long, default_value = "16.667")]
    delta_ms: f32,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Following distance kept by the cruise control (short, mid, long)
    #[arg(long, default_value = "short")]
    distance: DistancePolicy,

    /// Cruise speed to set at the start, in km/h (0-100)
    #[arg(long)]
    target_speed: Option<String>,

    /// Seconds between spawn requests, 0 disables spawning
    #[arg(long, default_value = "2.0")]
    spawn_every: f32,

    /// Speed of spawned vehicles in km/h, random when omitted
    #[arg(long)]
    spawn_speed: Option<u32>,

    /// Lane change to request during the run (left, right)
    #[arg(long)]
    lane_change: Option<LaneChangeDirection>,

    /// Simulated second at which the lane change control is pressed
    #[arg(long, default_value = "5.0")]
    lane_change_at: f32,

    /// Seconds the lane change control is held, at least one tick
    #[arg(long, default_value = "3.0")]
    lane_change_hold: f32,

    /// Print a summary every this many simulated seconds
    #[arg(long, default_value = "5.0")]
    summary_every: f32,

    /// Draw the road with every summary
    #[arg(long)]
    map: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let delta = millis_to_seconds(cli.delta_ms);
    ensure!(delta > 0.0, "Tick length must be positive, got {}ms", cli.delta_ms);

    let mut world = SimWorld::new(SimConfig {
        distance_policy: cli.distance,
        seed: cli.seed,
        ..SimConfig::default()
    });

    if let Some(text) = &cli.target_speed {
        let speed = parse_speed_input(text)?;
        world.set_cruise_speed(speed)?;
    }

    run_headless(&cli, world, delta);
    Ok(())
}

/// Convert a duration in simulated seconds into a tick count
fn seconds_to_ticks(seconds: f32, delta: f32) -> u32 {
    (seconds / delta).round().max(0.0) as u32
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli, mut world: SimWorld, delta: f32) {
    info!("Running cruise control simulation in headless mode...");
    info!("Ticks: {}, Delta: {:.4}s", cli.ticks, delta);

    let ticks_per_summary = seconds_to_ticks(cli.summary_every, delta).max(1);
    let ticks_per_spawn =
        (cli.spawn_every > 0.0).then(|| seconds_to_ticks(cli.spawn_every, delta).max(1));
    let lane_change_press = seconds_to_ticks(cli.lane_change_at, delta).max(1);
    // Held for at least the press tick
    let lane_change_release =
        lane_change_press + seconds_to_ticks(cli.lane_change_hold, delta).max(1);

    println!("Initial state:");
    world.print_summary();
    world.draw_road();

    for tick in 1..=cli.ticks {
        if let Some(every) = ticks_per_spawn {
            if tick % every == 0 {
                if let Err(e) = world.spawn_vehicle(cli.spawn_speed) {
                    warn!("Spawn skipped: {:#}", e);
                }
            }
        }

        if let Some(direction) = cli.lane_change {
            if tick == lane_change_press {
                world.request_lane_change(direction);
            } else if tick == lane_change_release {
                world.release_lane_change();
            }
        }

        world.tick(delta);

        if tick % ticks_per_summary == 0 {
            println!(
                "--- After tick {} ({:.1}s simulated time) ---",
                tick,
                world.time()
            );
            world.print_summary();
            if cli.map {
                world.draw_road();
            }
            println!();
        }
    }

    println!("=== Final State ===");
    world.print_summary();
    world.draw_road();

    world.finish();
}
