//! Core types for the cruise control simulation
//!
//! These are standalone types shared by the decision engine and the world.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimId(pub usize);

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub SimId);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0 .0)
    }
}

/// One of the three parallel lanes of the road, numbered 0 (left) to 2 (right)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    Left,
    Middle,
    Right,
}

impl Lane {
    /// Convert a raw lane index into a lane.
    /// Anything outside 0..=2 is a caller bug and is rejected.
    pub fn from_index(index: usize) -> Result<Lane> {
        match index {
            0 => Ok(Lane::Left),
            1 => Ok(Lane::Middle),
            2 => Ok(Lane::Right),
            _ => bail!("Invalid lane index {} (expected 0, 1 or 2)", index),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Middle => 1,
            Lane::Right => 2,
        }
    }

    /// Screen x-coordinate of the lane center
    pub fn center_x(self) -> f32 {
        LANE_CENTERS[self.index()]
    }

    /// The lane next to this one in the given direction, or `None` past the road edge
    pub fn adjacent(self, direction: LaneChangeDirection) -> Option<Lane> {
        match (self, direction) {
            (Lane::Left, LaneChangeDirection::Left) => None,
            (Lane::Left, LaneChangeDirection::Right) => Some(Lane::Middle),
            (Lane::Middle, LaneChangeDirection::Left) => Some(Lane::Left),
            (Lane::Middle, LaneChangeDirection::Right) => Some(Lane::Right),
            (Lane::Right, LaneChangeDirection::Left) => Some(Lane::Middle),
            (Lane::Right, LaneChangeDirection::Right) => None,
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lane::Left => "left",
            Lane::Middle => "middle",
            Lane::Right => "right",
        };
        f.write_str(name)
    }
}

/// Direction of a requested lane change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneChangeDirection {
    /// Toward the lower lane index
    Left,
    /// Toward the higher lane index
    Right,
}

impl FromStr for LaneChangeDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(LaneChangeDirection::Left),
            "right" => Ok(LaneChangeDirection::Right),
            other => bail!("Unknown lane change direction '{}' (expected left or right)", other),
        }
    }
}

impl fmt::Display for LaneChangeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneChangeDirection::Left => f.write_str("left"),
            LaneChangeDirection::Right => f.write_str("right"),
        }
    }
}

/// Minimum following time the ACC keeps behind a lead vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistancePolicy {
    #[default]
    Short,
    Mid,
    Long,
}

impl DistancePolicy {
    /// Time gap in seconds
    pub fn seconds(self) -> f32 {
        match self {
            DistancePolicy::Short => 2.0,
            DistancePolicy::Mid => 3.0,
            DistancePolicy::Long => 4.0,
        }
    }
}

impl fmt::Display for DistancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistancePolicy::Short => f.write_str("short"),
            DistancePolicy::Mid => f.write_str("mid"),
            DistancePolicy::Long => f.write_str("long"),
        }
    }
}

impl FromStr for DistancePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(DistancePolicy::Short),
            "mid" => Ok(DistancePolicy::Mid),
            "long" => Ok(DistancePolicy::Long),
            other => bail!("Unknown distance policy '{}' (expected short, mid or long)", other),
        }
    }
}

/// A 2D position on the screen, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Screen x-coordinates of the three lane centers, indexed by lane
pub const LANE_CENTERS: [f32; 3] = [180.0, 280.0, 380.0];

/// Vehicle footprint width in pixels
pub const CAR_WIDTH: f32 = 42.0;

/// Vehicle footprint height in pixels
pub const CAR_HEIGHT: f32 = 60.0;

/// Clearance added around each footprint by the proximity test
pub const SAFETY_MARGIN: f32 = 10.0;

/// Fixed screen scale
pub const PIXELS_PER_METER: f32 = 12.0;

/// Height of the visible road in pixels
pub const SCREEN_HEIGHT: f32 = 900.0;

/// Lateral distance covered per tick while changing lanes
pub const LANE_CHANGE_STEP: f32 = 2.0;

/// Highest speed accepted as a cruise target, in km/h
pub const MAX_CRUISE_SPEED: u32 = 100;

/// Cap on cars on screen, player included
pub const MAX_VEHICLES_ON_SCREEN: usize = 10;

/// Where the player starts
pub const PLAYER_START_LANE: Lane = Lane::Middle;
pub const PLAYER_START_Y: f32 = 800.0;

/// Player speed at the start of a run, in km/h
pub const PLAYER_START_SPEED: f32 = 75.0;
