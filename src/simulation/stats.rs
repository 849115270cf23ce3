//! Run statistics for the cruise control simulation
//!
//! Counters updated by the world as things happen during a run.

use log::info;

/// Counters collected over one simulation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimStats {
    /// Simulation time in seconds
    pub time: f32,

    /// Ticks processed so far
    pub ticks: u64,

    /// Traffic vehicles spawned
    pub vehicles_spawned: usize,

    /// Traffic vehicles removed after leaving the screen
    pub vehicles_despawned: usize,

    /// Spawn requests that could not be placed
    pub spawns_rejected: usize,

    /// Times the ACC started braking for a lead vehicle
    pub acc_engagements: usize,

    /// Lane changes carried through to the destination lane
    pub lane_changes_completed: usize,

    /// Ticks on which a held lane change request was vetoed
    pub lane_change_denials: usize,
}

impl SimStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one tick
    pub fn record_tick(&mut self, delta_secs: f32) {
        self.time += delta_secs;
        self.ticks += 1;
    }

    /// Traffic vehicles currently alive according to the counters
    pub fn active_vehicles(&self) -> usize {
        self.vehicles_spawned - self.vehicles_despawned
    }

    /// Get a summary string for display
    pub fn summary(&self) -> String {
        format!(
            "Time: {:.1}s | Spawned: {} | Despawned: {} | ACC engagements: {} | Lane changes: {}",
            self.time,
            self.vehicles_spawned,
            self.vehicles_despawned,
            self.acc_engagements,
            self.lane_changes_completed
        )
    }

    /// Log the end-of-run report
    pub fn log_report(&self) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Elapsed time: {:.2}s", self.time);
        info!("Ticks: {}", self.ticks);
        info!("Total cars spawned: {}", self.vehicles_spawned);
        info!("Total cars despawned: {}", self.vehicles_despawned);
        info!("Spawns rejected: {}", self.spawns_rejected);
        info!("Active cars: {}", self.active_vehicles());
        info!("ACC engagements: {}", self.acc_engagements);
        info!("Lane changes completed: {}", self.lane_changes_completed);
        info!("Lane change denials: {}", self.lane_change_denials);
    }
}
