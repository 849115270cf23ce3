//! Unit conversion helpers
//!
//! Speeds are stored in km/h, physics runs in m/s.

/// Convert km/h to m/s
pub fn kmh_to_ms(speed_kmh: f32) -> f32 {
    speed_kmh * (5.0 / 18.0)
}

/// Convert m/s to km/h
pub fn ms_to_kmh(speed_ms: f32) -> f32 {
    speed_ms * (18.0 / 5.0)
}

pub fn millis_to_seconds(millis: f32) -> f32 {
    millis / 1000.0
}
