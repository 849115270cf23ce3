//! Following distance (adaptive cruise control) evaluation
//!
//! Decides whether a follower has to brake for a slower lead vehicle in its
//! lane. The follower brakes when the lead sits within the configured time
//! gap of the distance that would be closed while slowing down to the lead's
//! speed.

use ordered_float::OrderedFloat;

use super::kinematics::transition_duration;
use super::types::{DistancePolicy, PIXELS_PER_METER};
use super::units::kmh_to_ms;
use super::vehicle::Vehicle;

/// Braking time in seconds the follower needs to match the lead's speed, or
/// zero when no braking is needed.
pub fn evaluate_following(follower: &Vehicle, lead: &Vehicle, policy: DistancePolicy) -> f32 {
    let follower_speed = kmh_to_ms(follower.speed);
    let lead_speed = kmh_to_ms(lead.speed);

    // Lead pulls away on its own
    if follower_speed < lead_speed {
        return 0.0;
    }

    let braking_time = transition_duration(follower.speed, lead.speed);

    // Distance closed while braking, averaged over a uniform deceleration
    let closing_distance = ((follower_speed - lead_speed) / 2.0) * braking_time * PIXELS_PER_METER;

    let gap = (follower.position.y - lead.position.y).abs();
    if follower.is_aligned_with(lead) && gap <= policy.seconds() * closing_distance {
        return braking_time;
    }

    // Lead is slower but still far enough away
    0.0
}

/// The closest vehicle strictly ahead of `follower` in its lane.
/// Ties go to the lowest id.
pub fn find_lead_vehicle<'a, I>(follower: &Vehicle, traffic: I) -> Option<&'a Vehicle>
where
    I: IntoIterator<Item = &'a Vehicle>,
{
    traffic
        .into_iter()
        .filter(|v| v.id != follower.id && v.lane == follower.lane)
        .filter(|v| v.position.y < follower.position.y)
        .min_by_key(|v| (OrderedFloat(follower.position.y - v.position.y), v.id))
}

/// Straight-line distance between two vehicles in meters
pub fn gap_meters(a: &Vehicle, b: &Vehicle) -> f32 {
    a.position.distance(&b.position) / PIXELS_PER_METER
}
