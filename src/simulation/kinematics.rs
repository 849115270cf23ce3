//! Speed ramp model
//!
//! Speed changes happen at a constant rate: `ACCEL` when speeding up and
//! `BRAKE` when slowing down. Braking is deliberately much stronger than
//! accelerating.

use super::units::{kmh_to_ms, ms_to_kmh};

/// Acceleration used when speeding up, in m/s²
pub const ACCEL: f32 = 3.3;

/// Acceleration used when slowing down, in m/s²
pub const BRAKE: f32 = -10.04;

/// Time in seconds needed to go from `current_kmh` to `target_kmh`.
///
/// Always non-negative. Equal speeds give exactly zero.
pub fn transition_duration(current_kmh: f32, target_kmh: f32) -> f32 {
    let current = kmh_to_ms(current_kmh);
    let target = kmh_to_ms(target_kmh);

    if current_kmh > target_kmh {
        // Both numerator and BRAKE are negative
        (target - current) / BRAKE
    } else if current_kmh < target_kmh {
        (target - current) / ACCEL
    } else {
        0.0
    }
}

/// Speed in km/h after ramping from `start_kmh` toward `target_kmh` for
/// `elapsed_secs`.
///
/// The result is exact at both ends of the ramp: `start_kmh` at zero elapsed
/// time and `target_kmh` once the full transition duration has passed. Callers
/// should still keep `elapsed_secs` inside `[0, duration]`.
pub fn interpolate_speed(start_kmh: f32, target_kmh: f32, elapsed_secs: f32) -> f32 {
    if elapsed_secs <= 0.0 {
        return start_kmh;
    }
    if elapsed_secs >= transition_duration(start_kmh, target_kmh) {
        return target_kmh;
    }

    let start = kmh_to_ms(start_kmh);
    let rate = if target_kmh > start_kmh { ACCEL } else { BRAKE };
    ms_to_kmh(start + rate * elapsed_secs)
}

/// An in-progress change of speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedTransition {
    start_kmh: f32,
    target_kmh: f32,
    /// Simulation time the transition began at, in seconds
    started_at: f32,
    duration: f32,
}

impl SpeedTransition {
    pub fn new(start_kmh: f32, target_kmh: f32, started_at: f32) -> Self {
        Self {
            start_kmh,
            target_kmh,
            started_at,
            duration: transition_duration(start_kmh, target_kmh),
        }
    }

    pub fn start_kmh(&self) -> f32 {
        self.start_kmh
    }

    pub fn target_kmh(&self) -> f32 {
        self.target_kmh
    }

    pub fn started_at(&self) -> f32 {
        self.started_at
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Time spent in the transition at `now`, clamped to `[0, duration]`
    pub fn elapsed(&self, now: f32) -> f32 {
        (now - self.started_at).clamp(0.0, self.duration)
    }

    pub fn is_complete(&self, now: f32) -> bool {
        now - self.started_at >= self.duration
    }

    /// Speed in km/h at simulation time `now`
    pub fn speed_at(&self, now: f32) -> f32 {
        if self.is_complete(now) {
            return self.target_kmh;
        }
        interpolate_speed(self.start_kmh, self.target_kmh, self.elapsed(now))
    }
}
