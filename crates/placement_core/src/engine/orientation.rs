//! Angle composition and planar rotation
//!
//! ## Conventions
//! - Angles are degrees. Composed angles are normalized to `[0, 360)`.
//! - Offsets rotate in the x/z ground plane. The anchor yaw is **negated**
//!   before rotating: a positive world yaw turns offsets the opposite way
//!   round in x/z polar terms.

use crate::models::Orientation;

/// One full turn in degrees
pub const FULL_TURN_DEG: f64 = 360.0;

/// `(original + delta) mod 360`, normalized to `[0, 360)`.
///
/// Used for every orientation axis, not only yaw.
pub fn compose_yaw(original: f64, delta: f64) -> f64 {
    let angle = (original + delta).rem_euclid(FULL_TURN_DEG);
    // rem_euclid can round up to exactly 360 for tiny negative inputs,
    // and keeps the sign of -0.0
    if angle >= FULL_TURN_DEG || angle == 0.0 {
        0.0
    } else {
        angle
    }
}

/// Component-wise [`compose_yaw`] of two yaw-pitch-roll triplets.
pub fn compose_orientation(original: Orientation, delta: Orientation) -> Orientation {
    Orientation {
        yaw: compose_yaw(original.yaw, delta.yaw),
        pitch: compose_yaw(original.pitch, delta.pitch),
        roll: compose_yaw(original.roll, delta.roll),
    }
}

/// Rotate a ground-plane offset by `-yaw_delta_deg`.
///
/// The offset is taken to polar form (`r`, `θ = atan2(z, x)`) and rebuilt at
/// `θ - yaw` with the same radius. A zero offset stays `(0, 0)`.
pub fn rotate_offset(offset_x: f64, offset_z: f64, yaw_delta_deg: f64) -> (f64, f64) {
    let radius = offset_x.hypot(offset_z);
    let initial_angle = offset_z.atan2(offset_x);
    let yaw_radians = (-yaw_delta_deg).to_radians();
    let angle = initial_angle + yaw_radians;

    (radius * angle.cos(), radius * angle.sin())
}
