//! Lane change safety arbitration and the lane change maneuver
//!
//! A lane change request is re-checked every tick while it is held. The
//! vehicle only moves sideways on ticks where the check passes.

use super::types::{Lane, LaneChangeDirection, LANE_CHANGE_STEP};
use super::units::kmh_to_ms;
use super::vehicle::Vehicle;

/// Half-length of the danger zone, in vehicle lengths
pub const DANGER_ZONE_LENGTHS: f32 = 3.0;

/// Traffic ahead closing faster than this (m/s) vetoes a lane change
pub const MAX_CLOSING_SPEED: f32 = 20.0;

/// Road vehicles split into disjoint per-lane groups
#[derive(Debug, Default)]
pub struct LaneGroups<'a> {
    groups: [Vec<&'a Vehicle>; 3],
}

impl<'a> LaneGroups<'a> {
    pub fn partition<I>(vehicles: I) -> Self
    where
        I: IntoIterator<Item = &'a Vehicle>,
    {
        let mut groups: [Vec<&'a Vehicle>; 3] = Default::default();
        for vehicle in vehicles {
            groups[vehicle.lane.index()].push(vehicle);
        }
        Self { groups }
    }

    pub fn in_lane(&self, lane: Lane) -> &[&'a Vehicle] {
        &self.groups[lane.index()]
    }
}

/// Decide whether `requester` may currently move one lane in `direction`.
///
/// Denied when the move would leave the road, when any vehicle in the
/// destination lane sits inside the danger zone around the requester, or
/// when a vehicle ahead in that lane is faster than the requester by more
/// than `MAX_CLOSING_SPEED`.
pub fn is_lane_change_safe<'a, I>(
    direction: LaneChangeDirection,
    requester: &Vehicle,
    vehicles: I,
) -> bool
where
    I: IntoIterator<Item = &'a Vehicle>,
{
    let groups = LaneGroups::partition(vehicles);

    let destination = match requester.lane.adjacent(direction) {
        Some(lane) => lane,
        None => return false,
    };

    let requester_speed = kmh_to_ms(requester.speed);
    let reach = DANGER_ZONE_LENGTHS * requester.height;
    let lower = requester.position.y - reach;
    let upper = requester.position.y + reach;

    for vehicle in groups.in_lane(destination) {
        if vehicle.id == requester.id {
            continue;
        }

        let y = vehicle.position.y;
        if y >= lower && y <= upper {
            return false;
        }

        let relative_speed = kmh_to_ms(vehicle.speed) - requester_speed;
        if relative_speed > MAX_CLOSING_SPEED && y < requester.position.y {
            return false;
        }
    }

    true
}

/// Where a lane change request currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManeuverPhase {
    #[default]
    Idle,
    /// Requested but not yet evaluated
    Requested(LaneChangeDirection),
    /// Approved on the last evaluation, vehicle moving sideways
    InProgress(LaneChangeDirection),
    /// Rejected on the last evaluation, still held
    Denied(LaneChangeDirection),
}

/// Result of advancing a maneuver by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManeuverOutcome {
    /// Nothing requested
    Idle,
    /// Approved, vehicle moved one step
    Advanced,
    /// Rejected this tick, vehicle held its position
    Denied,
    /// Vehicle reached the destination lane
    Completed(Lane),
}

/// A held lane change request and its progress
///
/// Progress is never rolled back: if the request is denied or released half
/// way, the vehicle keeps its lateral offset and its old lane index
/// until a later request carries it across.
#[derive(Debug, Clone, Default)]
pub struct LaneChangeManeuver {
    phase: ManeuverPhase,
}

impl LaneChangeManeuver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ManeuverPhase {
        self.phase
    }

    pub fn direction(&self) -> Option<LaneChangeDirection> {
        match self.phase {
            ManeuverPhase::Idle => None,
            ManeuverPhase::Requested(direction)
            | ManeuverPhase::InProgress(direction)
            | ManeuverPhase::Denied(direction) => Some(direction),
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase != ManeuverPhase::Idle
    }

    /// Start holding a request, replacing any other one
    pub fn request(&mut self, direction: LaneChangeDirection) {
        self.phase = ManeuverPhase::Requested(direction);
    }

    /// Release the request. Lateral progress already made is kept.
    pub fn cancel(&mut self) {
        self.phase = ManeuverPhase::Idle;
    }

    /// Re-evaluate the request against `traffic` and move `vehicle` one step
    /// if it is still safe.
    pub fn step<'a, I>(&mut self, vehicle: &mut Vehicle, traffic: I) -> ManeuverOutcome
    where
        I: IntoIterator<Item = &'a Vehicle>,
    {
        let direction = match self.direction() {
            Some(direction) => direction,
            None => return ManeuverOutcome::Idle,
        };

        let destination = match vehicle.lane.adjacent(direction) {
            Some(lane) => lane,
            None => return self.deny(direction),
        };
        if !is_lane_change_safe(direction, vehicle, traffic) {
            return self.deny(direction);
        }

        self.phase = ManeuverPhase::InProgress(direction);

        let target_x = destination.center_x();
        let crossed = match direction {
            LaneChangeDirection::Left => {
                vehicle.position.x -= LANE_CHANGE_STEP;
                vehicle.position.x <= target_x
            }
            LaneChangeDirection::Right => {
                vehicle.position.x += LANE_CHANGE_STEP;
                vehicle.position.x >= target_x
            }
        };

        if crossed {
            vehicle.place_in_lane(destination);
            self.phase = ManeuverPhase::Idle;
            return ManeuverOutcome::Completed(destination);
        }

        ManeuverOutcome::Advanced
    }

    fn deny(&mut self, direction: LaneChangeDirection) -> ManeuverOutcome {
        self.phase = ManeuverPhase::Denied(direction);
        ManeuverOutcome::Denied
    }
}
