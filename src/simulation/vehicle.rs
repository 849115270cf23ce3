//! Vehicle state for the cruise control simulation
//!
//! Used for both the player and spawned traffic.

use super::types::{
    Lane, Position, VehicleId, CAR_HEIGHT, CAR_WIDTH, PIXELS_PER_METER, SCREEN_HEIGHT,
};
use super::units::kmh_to_ms;

/// A car on the road
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    /// Top-left corner of the footprint, in screen pixels
    pub position: Position,
    pub lane: Lane,
    /// Current speed in km/h
    pub speed: f32,
    pub width: f32,
    pub height: f32,
}

impl Vehicle {
    /// Create a vehicle centered in `lane` at screen row `y`
    pub fn new(id: VehicleId, lane: Lane, y: f32, speed: f32) -> Self {
        Self {
            id,
            position: Position::new(lane.center_x(), y),
            lane,
            speed: speed.max(0.0),
            width: CAR_WIDTH,
            height: CAR_HEIGHT,
        }
    }

    /// Whether both vehicles sit on the same lane track
    pub fn is_aligned_with(&self, other: &Vehicle) -> bool {
        self.lane == other.lane && self.position.x == other.position.x
    }

    /// Whether the vehicle is currently sitting on its lane center
    pub fn is_centered(&self) -> bool {
        self.position.x == self.lane.center_x()
    }

    /// Whether the vehicle has left the visible part of the road
    pub fn is_out_of_view(&self) -> bool {
        self.position.y + self.height > SCREEN_HEIGHT || self.position.y < 0.0
    }

    /// Move this vehicle relative to the player.
    ///
    /// Slower traffic drifts down the screen, faster traffic pulls away. Uses
    /// the same screen scale as the following distance model.
    pub fn move_relative_to(&mut self, player_speed: f32, delta_secs: f32) {
        let closing = kmh_to_ms(player_speed - self.speed);
        self.position.y += closing * PIXELS_PER_METER * delta_secs;
    }

    /// Snap the vehicle onto the center of `lane`
    pub fn place_in_lane(&mut self, lane: Lane) {
        self.lane = lane;
        self.position.x = lane.center_x();
    }
}
