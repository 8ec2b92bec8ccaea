//! Geometry: angle composition, planar rotation and item re-anchoring.

pub mod orientation;
pub mod reanchor;

pub use orientation::{compose_orientation, compose_yaw, rotate_offset, FULL_TURN_DEG};
pub use reanchor::{reanchor, AnchorMove};
