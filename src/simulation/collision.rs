//! Proximity test between vehicle footprints

use super::types::{CAR_HEIGHT, CAR_WIDTH, SAFETY_MARGIN};
use super::vehicle::Vehicle;

/// Check whether two standard footprints anchored at `(a_x, a_y)` and
/// `(b_x, b_y)` come within `SAFETY_MARGIN` of each other.
///
/// Symmetric, and a footprint always overlaps itself.
pub fn overlaps(a_x: f32, a_y: f32, b_x: f32, b_y: f32) -> bool {
    footprints_overlap(
        (a_x, a_y, CAR_WIDTH, CAR_HEIGHT),
        (b_x, b_y, CAR_WIDTH, CAR_HEIGHT),
    )
}

/// Proximity test for two vehicles, each with its own footprint size
pub fn vehicles_overlap(a: &Vehicle, b: &Vehicle) -> bool {
    footprints_overlap(
        (a.position.x, a.position.y, a.width, a.height),
        (b.position.x, b.position.y, b.width, b.height),
    )
}

/// Footprints as `(x, y, width, height)`, each inflated by the margin
pub(super) fn footprints_overlap(a: (f32, f32, f32, f32), b: (f32, f32, f32, f32)) -> bool {
    let (a_x, a_y, a_w, a_h) = a;
    let (b_x, b_y, b_w, b_h) = b;

    (a_x + a_w + SAFETY_MARGIN > b_x)
        && (a_x < b_x + b_w + SAFETY_MARGIN)
        && (a_y < b_y + b_h + SAFETY_MARGIN)
        && (a_y + a_h + SAFETY_MARGIN > b_y)
}
