//! Position / orientation value types
//!
//! ## Axes
//! - Position: `x`, `z` span the ground plane, `y` is vertical.
//! - Orientation: `(yaw, pitch, roll)` in degrees. Yaw turns about `y`.
//!
//! Both serialize as plain 3-element arrays so the registry table stays compact.

use serde::{Deserialize, Serialize};

/// World position in map units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Ground-plane distance, ignoring the vertical axis.
    pub fn planar_distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.z - other.z)
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Position {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Position> for [f64; 3] {
    fn from(p: Position) -> Self {
        p.to_array()
    }
}

/// Orientation in degrees, stored yaw-pitch-roll
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Orientation {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl Orientation {
    pub const fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Build from a scene triplet stored roll-pitch-yaw.
    pub fn from_rpy([roll, pitch, yaw]: [f64; 3]) -> Self {
        Self { yaw, pitch, roll }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.yaw, self.pitch, self.roll]
    }
}

impl From<[f64; 3]> for Orientation {
    fn from([yaw, pitch, roll]: [f64; 3]) -> Self {
        Self { yaw, pitch, roll }
    }
}

impl From<Orientation> for [f64; 3] {
    fn from(o: Orientation) -> Self {
        o.to_array()
    }
}

/// Position + orientation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Position,
    pub orientation: Orientation,
}

impl Pose {
    pub const fn new(position: Position, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }
}
