//! Anchor / contained-item definitions
//!
//! Item poses are stored in the same world frame as their anchor's baseline
//! pose (not anchor-relative); the offset is derived when reanchoring.

use super::pose::Pose;
use serde::{Deserialize, Serialize};

/// A contained item authored against an anchor baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Raw config type, usually carrying the `_Placement` marker
    pub type_name: String,
    #[serde(flatten)]
    pub original: Pose,
}

/// An anchor type with its baseline pose and ordered items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorDefinition {
    pub type_id: String,
    #[serde(flatten)]
    pub original: Pose,
    #[serde(default)]
    pub items: Vec<ItemDefinition>,
}

impl AnchorDefinition {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
