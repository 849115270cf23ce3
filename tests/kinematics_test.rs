//! Speed ramp, unit conversion and proximity checks

use cruise_sim::simulation::{
    interpolate_speed, kmh_to_ms, millis_to_seconds, ms_to_kmh, overlaps, transition_duration,
    vehicles_overlap, Lane, SimId, SpeedTransition, Vehicle, VehicleId,
};

fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} to be within {} of {}",
        actual,
        tolerance,
        expected
    );
}

const SPEED_PAIRS: [(f32, f32); 6] = [
    (100.0, 50.0),
    (75.0, 0.0),
    (80.5, 80.0),
    (30.0, 29.0),
    (1.0, 0.0),
    (100.0, 99.5),
];

#[test]
fn test_unit_conversions() {
    assert_close(kmh_to_ms(36.0), 10.0, 1e-5);
    assert_close(ms_to_kmh(10.0), 36.0, 1e-5);
    assert_close(ms_to_kmh(kmh_to_ms(72.0)), 72.0, 1e-4);
    assert_eq!(millis_to_seconds(1500.0), 1.5);
    assert_eq!(millis_to_seconds(0.0), 0.0);
}

#[test]
fn test_slowing_down_takes_positive_time() {
    for (fast, slow) in SPEED_PAIRS {
        assert!(
            transition_duration(fast, slow) > 0.0,
            "{} -> {} should take time",
            fast,
            slow
        );
    }
}

#[test]
fn test_speeding_up_takes_positive_time() {
    for (fast, slow) in SPEED_PAIRS {
        assert!(
            transition_duration(slow, fast) > 0.0,
            "{} -> {} should take time",
            slow,
            fast
        );
    }
}

#[test]
fn test_equal_speeds_take_no_time() {
    for speed in [0.0, 37.5, 50.0, 100.0] {
        assert_eq!(transition_duration(speed, speed), 0.0);
    }
}

#[test]
fn test_braking_is_faster_than_accelerating() {
    // 100 -> 50 km/h is 13.89 m/s at 10.04 m/s²
    assert_close(transition_duration(100.0, 50.0), 1.3834, 1e-3);
    // 0 -> 36 km/h is 10 m/s at 3.3 m/s²
    assert_close(transition_duration(0.0, 36.0), 3.0303, 1e-3);
    assert!(transition_duration(100.0, 50.0) < transition_duration(50.0, 100.0));
}

#[test]
fn test_interpolation_snaps_to_target_at_full_duration() {
    for (fast, slow) in SPEED_PAIRS {
        assert_eq!(interpolate_speed(fast, slow, transition_duration(fast, slow)), slow);
        assert_eq!(interpolate_speed(slow, fast, transition_duration(slow, fast)), fast);
    }
}

#[test]
fn test_interpolation_starts_at_start_speed() {
    for (fast, slow) in SPEED_PAIRS {
        assert_eq!(interpolate_speed(fast, slow, 0.0), fast);
        assert_eq!(interpolate_speed(slow, fast, 0.0), slow);
    }
}

#[test]
fn test_interpolation_midway() {
    // 3.3 m/s after one second from standstill
    assert_close(interpolate_speed(0.0, 36.0, 1.0), 11.88, 1e-3);
    // 27.78 - 10.04 m/s after one second of braking from 100 km/h
    assert_close(interpolate_speed(100.0, 50.0, 1.0), 63.856, 1e-2);
}

#[test]
fn test_interpolation_past_duration_holds_target() {
    assert_eq!(interpolate_speed(100.0, 50.0, 10.0), 50.0);
    assert_eq!(interpolate_speed(20.0, 90.0, 60.0), 90.0);
}

#[test]
fn test_speed_transition_follows_ramp() {
    let transition = SpeedTransition::new(100.0, 50.0, 0.0);

    assert_eq!(transition.duration(), transition_duration(100.0, 50.0));
    assert_eq!(transition.speed_at(0.0), 100.0);
    // Before it started it still reports the start speed
    assert_eq!(transition.speed_at(-1.0), 100.0);

    let halfway = transition.speed_at(transition.duration() / 2.0);
    assert!(halfway < 100.0 && halfway > 50.0);
    assert!(!transition.is_complete(0.5));

    let end = transition.duration();
    assert!(transition.is_complete(end));
    assert_eq!(transition.speed_at(end), 50.0);
    assert_eq!(transition.speed_at(100.0), 50.0);
    assert_eq!(transition.elapsed(100.0), transition.duration());
}

#[test]
fn test_speed_transition_keeps_its_start_time() {
    let transition = SpeedTransition::new(40.0, 80.0, 12.5);
    assert_eq!(transition.started_at(), 12.5);
    assert_eq!(transition.start_kmh(), 40.0);
    assert_eq!(transition.target_kmh(), 80.0);
    assert_eq!(transition.speed_at(12.5), 40.0);
    assert!(transition.speed_at(13.5) > 40.0);
    assert_eq!(transition.speed_at(30.0), 80.0);
}

#[test]
fn test_zero_length_transition_is_complete_immediately() {
    let transition = SpeedTransition::new(60.0, 60.0, 5.0);
    assert_eq!(transition.duration(), 0.0);
    assert!(transition.is_complete(5.0));
    assert_eq!(transition.speed_at(5.0), 60.0);
}

#[test]
fn test_overlap_is_symmetric() {
    let points = [
        (180.0, 200.0),
        (280.0, 200.0),
        (280.0, 265.0),
        (280.0, 270.0),
        (230.0, 150.0),
        (380.0, 800.0),
        (190.0, 140.0),
    ];
    for a in points {
        for b in points {
            assert_eq!(
                overlaps(a.0, a.1, b.0, b.1),
                overlaps(b.0, b.1, a.0, a.1),
                "asymmetric for {:?} and {:?}",
                a,
                b
            );
        }
    }
}

#[test]
fn test_overlap_with_itself() {
    for (x, y) in [(180.0, 0.0), (280.0, 450.0), (380.0, 840.0)] {
        assert!(overlaps(x, y, x, y));
    }
}

#[test]
fn test_overlap_margin_edges() {
    // Neighbouring lanes never touch
    assert!(!overlaps(180.0, 200.0, 280.0, 200.0));
    // Inside the 60 + 10 pixel reach
    assert!(overlaps(280.0, 200.0, 280.0, 265.0));
    // Exactly at the reach is clear
    assert!(!overlaps(280.0, 200.0, 280.0, 270.0));
}

#[test]
fn test_vehicle_overlap_uses_each_footprint() {
    let car = Vehicle::new(VehicleId(SimId(1)), Lane::Middle, 300.0, 60.0);
    let mut truck = Vehicle::new(VehicleId(SimId(2)), Lane::Middle, 200.0, 60.0);

    // Standard footprints 100 px apart are clear
    assert!(!vehicles_overlap(&truck, &car));

    truck.height = 120.0;
    assert!(vehicles_overlap(&truck, &car));
    assert!(vehicles_overlap(&car, &truck));

    // Clear again once the car is past the longer tail plus margin
    let behind = Vehicle::new(VehicleId(SimId(3)), Lane::Middle, 330.0, 60.0);
    assert!(!vehicles_overlap(&truck, &behind));
}
