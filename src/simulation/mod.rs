//! Standalone cruise control simulation module
//!
//! This module contains the kinematics and decision engine: speed ramps,
//! proximity checks, following distance evaluation and lane change
//! arbitration, plus the world that runs them tick by tick. Nothing here
//! draws to a screen or reads input devices.

mod collision;
mod following;
mod kinematics;
mod lane_change;
mod stats;
mod types;
mod units;
mod vehicle;
mod world;

pub use collision::{overlaps, vehicles_overlap};
pub use following::{evaluate_following, find_lead_vehicle, gap_meters};
pub use kinematics::{interpolate_speed, transition_duration, SpeedTransition, ACCEL, BRAKE};
pub use lane_change::{
    is_lane_change_safe, LaneChangeManeuver, LaneGroups, ManeuverOutcome, ManeuverPhase,
    DANGER_ZONE_LENGTHS, MAX_CLOSING_SPEED,
};
pub use stats::SimStats;
pub use types::{
    DistancePolicy, Lane, LaneChangeDirection, Position, SimId, VehicleId, CAR_HEIGHT, CAR_WIDTH,
    LANE_CENTERS, LANE_CHANGE_STEP, MAX_CRUISE_SPEED, MAX_VEHICLES_ON_SCREEN, PIXELS_PER_METER,
    PLAYER_START_LANE, PLAYER_START_SPEED, PLAYER_START_Y, SAFETY_MARGIN, SCREEN_HEIGHT,
};
pub use units::{kmh_to_ms, millis_to_seconds, ms_to_kmh};
pub use vehicle::Vehicle;
pub use world::{parse_speed_input, SimConfig, SimWorld, MAX_SPAWN_ATTEMPTS};
