//! Re-anchoring of contained items onto a moved anchor
//!
//! ## Steps
//! 1. Ground-plane offset of the item from the anchor baseline (`x`, `z`).
//! 2. Rotate that offset by the new anchor yaw (see [`rotate_offset`]).
//! 3. New position = new anchor position + rotated offset; the vertical
//!    offset is carried over unrotated.
//! 4. New orientation = item orientation composed with the full new anchor
//!    orientation, axis by axis.
//!
//! Only the new anchor orientation feeds the math. Baseline anchor
//! orientations are authored as zero.

use super::orientation::{compose_orientation, rotate_offset};
use crate::models::{Pose, Position};

/// An anchor relocation from its baseline pose to a new world pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorMove {
    pub original: Pose,
    pub target: Pose,
}

impl AnchorMove {
    pub fn new(original: Pose, target: Pose) -> Self {
        Self { original, target }
    }

    /// Re-derive one item's pose under this move.
    pub fn apply(&self, item: &Pose) -> Pose {
        reanchor(&self.original, &self.target, item)
    }
}

/// Compute an item's pose after its anchor moved from `anchor_original` to
/// `anchor_new`. Pure and total for finite inputs.
pub fn reanchor(anchor_original: &Pose, anchor_new: &Pose, item_original: &Pose) -> Pose {
    let offset_x = item_original.position.x - anchor_original.position.x;
    let offset_z = item_original.position.z - anchor_original.position.z;
    let vertical = item_original.position.y - anchor_original.position.y;

    let (rotated_x, rotated_z) = rotate_offset(offset_x, offset_z, anchor_new.orientation.yaw);

    let position = Position {
        x: anchor_new.position.x + rotated_x,
        y: anchor_new.position.y + vertical,
        z: anchor_new.position.z + rotated_z,
    };
    let orientation = compose_orientation(item_original.orientation, anchor_new.orientation);

    Pose {
        position,
        orientation,
    }
}
