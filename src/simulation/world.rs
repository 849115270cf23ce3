//! Main simulation world that ties everything together
//!
//! `SimWorld` is the explicit simulation context: it owns the player, the
//! traffic, the active speed transition and the held lane change request,
//! and advances all of them one tick at a time. Every decision function is
//! evaluated against the state at the start of the tick before anything is
//! mutated.

use anyhow::{bail, ensure, Context, Result};
use log::{debug, info};
use ordered_float::OrderedFloat;
use rand::distr::uniform::{SampleRange, SampleUniform};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::ops::RangeInclusive;

use super::collision::footprints_overlap;
use super::following::{evaluate_following, find_lead_vehicle, gap_meters};
use super::kinematics::SpeedTransition;
use super::lane_change::{LaneChangeManeuver, ManeuverOutcome, ManeuverPhase};
use super::stats::SimStats;
use super::types::{
    DistancePolicy, Lane, LaneChangeDirection, SimId, VehicleId, CAR_HEIGHT, CAR_WIDTH,
    MAX_CRUISE_SPEED, MAX_VEHICLES_ON_SCREEN, PLAYER_START_LANE, PLAYER_START_SPEED,
    PLAYER_START_Y, SCREEN_HEIGHT,
};
use super::vehicle::Vehicle;

/// Placement attempts before a spawn request gives up
pub const MAX_SPAWN_ATTEMPTS: usize = 100;

/// First spot tried for a new vehicle
const SPAWN_LANE: Lane = Lane::Middle;
const SPAWN_Y: f32 = 200.0;

/// Lanes tried when the first spot is taken
const FALLBACK_SPAWN_LANES: [Lane; 2] = [Lane::Left, Lane::Right];

/// Range of rows tried when the first spot is taken
const FALLBACK_SPAWN_ROWS: RangeInclusive<u32> = 0..=800;

/// Random spawn speeds, in km/h
const SPAWN_SPEED_RANGE: RangeInclusive<u32> = 50..=100;

/// Height in pixels of one row of the terminal road map
const MAP_ROW_PIXELS: f32 = 30.0;

/// Road edges in pixels, used by the terminal road map
const ROAD_LEFT: f32 = 165.0;
const ROAD_RIGHT: f32 = 435.0;

/// Run configuration for a `SimWorld`
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Time gap the ACC keeps behind a lead vehicle
    pub distance_policy: DistancePolicy,
    /// Cap on cars on screen, player included
    pub max_vehicles: usize,
    /// Seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            distance_policy: DistancePolicy::default(),
            max_vehicles: MAX_VEHICLES_ON_SCREEN,
            seed: None,
        }
    }
}

/// Parse text typed into the cruise speed box.
/// Accepts whole numbers from 0 to `MAX_CRUISE_SPEED`.
pub fn parse_speed_input(text: &str) -> Result<u32> {
    let speed: u32 = text
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a whole number", text.trim()))?;
    ensure!(
        speed <= MAX_CRUISE_SPEED,
        "Cruise speed {} km/h is above the {} km/h limit",
        speed,
        MAX_CRUISE_SPEED
    );
    Ok(speed)
}

/// The main simulation world
pub struct SimWorld {
    /// The user-controlled vehicle
    pub player: Vehicle,

    /// All spawned traffic
    pub traffic: HashMap<VehicleId, Vehicle>,

    pub config: SimConfig,

    /// Counters for the run, including the simulation clock
    pub stats: SimStats,

    /// Speed change currently applied to the player
    transition: Option<SpeedTransition>,

    /// Lane change request currently held for the player
    maneuver: LaneChangeManeuver,

    /// Lead vehicle the ACC already matched speed with
    acc_lead: Option<VehicleId>,

    /// Next ID to assign
    next_id: usize,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl SimWorld {
    pub fn new(config: SimConfig) -> Self {
        let rng = config.seed.map(StdRng::seed_from_u64);
        let player_id = VehicleId(SimId(0));
        let player = Vehicle::new(
            player_id,
            PLAYER_START_LANE,
            PLAYER_START_Y,
            PLAYER_START_SPEED,
        );

        info!(
            "Simulation started: player at {:.0} km/h in the {} lane, {} following distance",
            player.speed, player.lane, config.distance_policy
        );

        Self {
            player,
            traffic: HashMap::new(),
            config,
            stats: SimStats::new(),
            transition: None,
            maneuver: LaneChangeManeuver::new(),
            acc_lead: None,
            next_id: 1,
            rng,
        }
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations
    pub fn with_seed(seed: u64) -> Self {
        Self::new(SimConfig {
            seed: Some(seed),
            ..SimConfig::default()
        })
    }

    /// End the run, logging the final report
    pub fn finish(self) -> SimStats {
        self.stats.log_report();
        self.stats
    }

    /// Get a random value in the given range, using seeded RNG if available
    fn random_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    /// Choose a random element from a slice, using seeded RNG if available
    fn choose_random<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        match &mut self.rng {
            Some(rng) => slice.choose(rng),
            None => slice.choose(&mut rand::rng()),
        }
    }

    fn next_vehicle_id(&mut self) -> VehicleId {
        let id = VehicleId(SimId(self.next_id));
        self.next_id += 1;
        id
    }

    /// Simulation time in seconds
    pub fn time(&self) -> f32 {
        self.stats.time
    }

    pub fn transition(&self) -> Option<&SpeedTransition> {
        self.transition.as_ref()
    }

    /// Lead vehicle the ACC has already matched speed with
    pub fn acc_lead(&self) -> Option<VehicleId> {
        self.acc_lead
    }

    pub fn lane_change_phase(&self) -> ManeuverPhase {
        self.maneuver.phase()
    }

    /// Cars on screen, player included
    pub fn vehicles_on_screen(&self) -> usize {
        self.traffic.len() + 1
    }

    /// The vehicle directly ahead of the player in its lane
    pub fn lead_vehicle(&self) -> Option<&Vehicle> {
        find_lead_vehicle(&self.player, self.traffic.values())
    }

    /// Set a new cruise speed for the player, in km/h
    pub fn set_cruise_speed(&mut self, speed_kmh: u32) -> Result<()> {
        ensure!(
            speed_kmh <= MAX_CRUISE_SPEED,
            "Cruise speed {} km/h is above the {} km/h limit",
            speed_kmh,
            MAX_CRUISE_SPEED
        );

        let transition = SpeedTransition::new(self.player.speed, speed_kmh as f32, self.time());
        info!(
            "Cruise speed set to {} km/h ({:.2}s ramp from {:.1} km/h)",
            speed_kmh,
            transition.duration(),
            self.player.speed
        );
        self.transition = Some(transition);
        // A new target from the driver lets the ACC step in again
        self.acc_lead = None;
        Ok(())
    }

    /// Spawn a traffic vehicle at `speed_kmh`, or at a random speed when none is given
    pub fn spawn_vehicle(&mut self, speed_kmh: Option<u32>) -> Result<VehicleId> {
        self.ensure_capacity()?;

        let speed = match speed_kmh {
            Some(speed) => speed,
            None => self.random_range(SPAWN_SPEED_RANGE),
        };

        let (lane, y) = match self.find_spawn_slot() {
            Some(slot) => slot,
            None => {
                self.stats.spawns_rejected += 1;
                bail!(
                    "No free spot for a new vehicle after {} attempts",
                    MAX_SPAWN_ATTEMPTS
                );
            }
        };

        let id = self.next_vehicle_id();
        let vehicle = Vehicle::new(id, lane, y, speed as f32);
        info!(
            "Spawned vehicle {} in the {} lane at y={:.0}, {} km/h",
            id, lane, y, speed
        );

        self.traffic.insert(id, vehicle);
        self.stats.vehicles_spawned += 1;
        Ok(id)
    }

    /// Spawn a vehicle at an explicit lane index and row.
    /// Rejects a full road, lane indices outside 0..=2 and occupied spots.
    pub fn spawn_vehicle_at(
        &mut self,
        lane_index: usize,
        y: f32,
        speed_kmh: u32,
    ) -> Result<VehicleId> {
        self.ensure_capacity()?;
        let lane = Lane::from_index(lane_index).context("Cannot place vehicle")?;
        ensure!(
            !self.is_occupied(lane.center_x(), y),
            "Spot in the {} lane at y={:.0} is taken",
            lane,
            y
        );

        let id = self.next_vehicle_id();
        self.traffic.insert(id, Vehicle::new(id, lane, y, speed_kmh as f32));
        self.stats.vehicles_spawned += 1;
        debug!("Placed vehicle {} in the {} lane at y={:.0}", id, lane, y);
        Ok(id)
    }

    /// Reject a spawn when the road already holds `max_vehicles` cars
    fn ensure_capacity(&mut self) -> Result<()> {
        if self.vehicles_on_screen() >= self.config.max_vehicles {
            self.stats.spawns_rejected += 1;
            bail!(
                "Road is full ({} of {} vehicles on screen)",
                self.vehicles_on_screen(),
                self.config.max_vehicles
            );
        }
        Ok(())
    }

    /// Pick a lane and row for a new vehicle that does not overlap anything
    fn find_spawn_slot(&mut self) -> Option<(Lane, f32)> {
        let mut lane = SPAWN_LANE;
        let mut y = SPAWN_Y;

        for _ in 0..MAX_SPAWN_ATTEMPTS {
            if !self.is_occupied(lane.center_x(), y) {
                return Some((lane, y));
            }
            lane = *self.choose_random(&FALLBACK_SPAWN_LANES)?;
            let row: u32 = self.random_range(FALLBACK_SPAWN_ROWS);
            y = row as f32;
        }

        None
    }

    /// Whether a standard footprint at `(x, y)` would overlap the player or any traffic
    fn is_occupied(&self, x: f32, y: f32) -> bool {
        std::iter::once(&self.player)
            .chain(self.traffic.values())
            .any(|v| {
                footprints_overlap(
                    (x, y, CAR_WIDTH, CAR_HEIGHT),
                    (v.position.x, v.position.y, v.width, v.height),
                )
            })
    }

    /// Start holding a lane change request for the player
    pub fn request_lane_change(&mut self, direction: LaneChangeDirection) {
        debug!("Lane change {} requested", direction);
        self.maneuver.request(direction);
    }

    /// Release the held lane change request. The player keeps any sideways progress.
    pub fn release_lane_change(&mut self) {
        if self.maneuver.is_active() {
            debug!("Lane change released at x={:.0}", self.player.position.x);
        }
        self.maneuver.cancel();
    }

    /// Main simulation tick
    pub fn tick(&mut self, delta_secs: f32) {
        self.stats.record_tick(delta_secs);
        let now = self.time();

        // Decisions read the state at the start of the tick
        self.update_cruise_control(now);
        self.update_lane_change();
        self.update_speed(now);

        self.move_traffic(delta_secs);
        self.despawn_out_of_view();
    }

    /// Brake for a slower lead vehicle that is too close
    fn update_cruise_control(&mut self, now: f32) {
        let lead = match find_lead_vehicle(&self.player, self.traffic.values()) {
            Some(lead) => lead,
            None => return,
        };

        // Already matched this one
        if self.acc_lead == Some(lead.id) {
            return;
        }

        let braking_time = evaluate_following(&self.player, lead, self.config.distance_policy);
        if braking_time <= 0.0 {
            return;
        }

        let (lead_id, lead_speed) = (lead.id, lead.speed);
        info!(
            "ACC braking for vehicle {}: {:.1} -> {:.1} km/h over {:.2}s",
            lead_id, self.player.speed, lead_speed, braking_time
        );

        self.acc_lead = Some(lead_id);
        self.stats.acc_engagements += 1;
        self.transition = Some(SpeedTransition::new(self.player.speed, lead_speed, now));
    }

    /// Apply the active speed transition to the player
    fn update_speed(&mut self, now: f32) {
        let transition = match self.transition {
            Some(transition) => transition,
            None => return,
        };

        self.player.speed = transition.speed_at(now);

        if transition.is_complete(now) {
            debug!("Reached {:.1} km/h", transition.target_kmh());
            self.transition = None;
        }
    }

    /// Re-check the held lane change and move the player sideways if allowed
    fn update_lane_change(&mut self) {
        if !self.maneuver.is_active() {
            return;
        }

        match self.maneuver.step(&mut self.player, self.traffic.values()) {
            ManeuverOutcome::Completed(lane) => {
                info!("Lane change completed into the {} lane", lane);
                self.stats.lane_changes_completed += 1;
                // New lane, new lead
                self.acc_lead = None;
            }
            ManeuverOutcome::Denied => {
                self.stats.lane_change_denials += 1;
            }
            ManeuverOutcome::Advanced | ManeuverOutcome::Idle => {}
        }
    }

    /// Move all traffic relative to the player
    fn move_traffic(&mut self, delta_secs: f32) {
        let player_speed = self.player.speed;
        for vehicle in self.traffic.values_mut() {
            vehicle.move_relative_to(player_speed, delta_secs);
        }
    }

    /// Remove traffic that left the visible road
    fn despawn_out_of_view(&mut self) {
        let gone: Vec<VehicleId> = self
            .traffic
            .values()
            .filter(|v| v.is_out_of_view())
            .map(|v| v.id)
            .collect();

        for id in gone {
            if self.traffic.remove(&id).is_some() {
                debug!("Vehicle {} left the screen", id);
                self.stats.vehicles_despawned += 1;
            }
            if self.acc_lead == Some(id) {
                self.acc_lead = None;
            }
        }
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Cruise Control Simulation Summary ===");
        println!("{}", self.stats.summary());
        println!(
            "Player: {:.1} km/h, {} lane, x={:.0}",
            self.player.speed, self.player.lane, self.player.position.x
        );

        if let Some(transition) = &self.transition {
            println!(
                "  Ramping {:.1} -> {:.1} km/h ({:.2}/{:.2}s)",
                transition.start_kmh(),
                transition.target_kmh(),
                transition.elapsed(self.time()),
                transition.duration()
            );
        }

        match self.maneuver.phase() {
            ManeuverPhase::Idle => {}
            ManeuverPhase::Requested(direction) => {
                println!("  Lane change {}: requested", direction)
            }
            ManeuverPhase::InProgress(direction) => {
                println!("  Lane change {}: in progress", direction)
            }
            ManeuverPhase::Denied(direction) => {
                println!("  Lane change {}: unsafe, holding", direction)
            }
        }

        if let Some(lead) = self.lead_vehicle() {
            println!(
                "  Lead vehicle {}: {:.0} km/h, {:.2} m ahead",
                lead.id,
                lead.speed,
                gap_meters(&self.player, lead)
            );
        }

        if !self.traffic.is_empty() {
            println!("--- Traffic ---");
            for vehicle in self.traffic_by_row() {
                println!(
                    "  Vehicle {}: speed={:.0}, lane={}, y={:.1}",
                    vehicle.id, vehicle.speed, vehicle.lane, vehicle.position.y
                );
            }
        }
    }

    /// Traffic sorted from the top of the screen down
    fn traffic_by_row(&self) -> Vec<&Vehicle> {
        let mut vehicles: Vec<&Vehicle> = self.traffic.values().collect();
        vehicles.sort_by_key(|v| (OrderedFloat(v.position.y), v.id));
        vehicles
    }

    /// Draw the visible road in the terminal
    pub fn draw_road(&self) {
        let rows = (SCREEN_HEIGHT / MAP_ROW_PIXELS) as usize;
        // Edge, 5 cells per lane, dividers, edge
        let width = 19;
        let mut grid = vec![vec![' '; width]; rows];

        for row in grid.iter_mut() {
            row[0] = '|';
            row[6] = ':';
            row[12] = ':';
            row[width - 1] = '|';
        }

        let to_col = |x: f32| -> usize {
            let t = ((x - ROAD_LEFT) / (ROAD_RIGHT - ROAD_LEFT)).clamp(0.0, 1.0);
            1 + ((t * (width - 2) as f32) as usize).min(width - 3)
        };

        let mut mark = |vehicle: &Vehicle, symbol: char| {
            let col = to_col(vehicle.position.x + vehicle.width / 2.0);
            let top = vehicle.position.y / MAP_ROW_PIXELS;
            let bottom = (vehicle.position.y + vehicle.height - 1.0) / MAP_ROW_PIXELS;
            if bottom < 0.0 {
                return;
            }
            for row in (top.max(0.0) as usize)..=(bottom as usize) {
                if row < rows {
                    grid[row][col] = symbol;
                }
            }
        };

        for vehicle in self.traffic_by_row() {
            mark(vehicle, 'C');
        }
        mark(&self.player, 'P');

        println!("\n=== Road ===");
        println!("Legend: P=Player, C=Car, :=Lane divider");
        for row in &grid {
            let line: String = row.iter().collect();
            println!("{}", line);
        }
        println!();
    }
}
