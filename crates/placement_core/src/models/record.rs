//! Output records
//!
//! One `OutputRecord` per contained item of a matched anchor. Field names are
//! the ones the loot spawner config expects; `POS` / `ORI` are always written
//! with exactly [`OUTPUT_PRECISION`] fractional digits.

use serde::ser::{Error as _, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;

use super::pose::Pose;
use crate::engine::FULL_TURN_DEG;

/// Decimal digits kept on `POS` / `ORI`
pub const OUTPUT_PRECISION: usize = 6;

/// Constant bookkeeping fields copied into every record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    pub unlock_time: i64,
    pub reset_timer: i64,
    pub key_item: String,
    pub is_active: i64,
    pub reset_player_check: i64,
    pub exact_placing: i64,
    pub container_toggleable: i64,
    pub action_id: i64,
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            unlock_time: 1,
            reset_timer: 1,
            key_item: String::new(),
            is_active: 1,
            reset_player_check: 0,
            exact_placing: 1,
            container_toggleable: 1,
            action_id: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    #[serde(rename = "LocationName")]
    pub location_name: String,
    #[serde(rename = "ContainerName")]
    pub container_name: String,
    #[serde(rename = "LootTable")]
    pub loot_table: String,
    #[serde(rename = "UnlockTime")]
    pub unlock_time: i64,
    #[serde(rename = "ResetTimer")]
    pub reset_timer: i64,
    #[serde(rename = "POS", serialize_with = "serialize_fixed")]
    pub position: [f64; 3],
    #[serde(rename = "KeyItem")]
    pub key_item: String,
    #[serde(rename = "IsActive")]
    pub is_active: i64,
    #[serde(rename = "ORI", serialize_with = "serialize_fixed")]
    pub orientation: [f64; 3],
    #[serde(rename = "ResetPlayerCheck")]
    pub reset_player_check: i64,
    #[serde(rename = "ExactPlacing")]
    pub exact_placing: i64,
    #[serde(rename = "ContainerToggleable")]
    pub container_toggleable: i64,
    #[serde(rename = "ActionID")]
    pub action_id: i64,
}

impl OutputRecord {
    /// Assemble a record, rounding the pose to [`OUTPUT_PRECISION`].
    pub fn new(
        location_name: &str,
        container_name: String,
        loot_table: String,
        pose: &Pose,
        settings: &ContainerSettings,
    ) -> Self {
        Self {
            location_name: location_name.to_string(),
            container_name,
            loot_table,
            unlock_time: settings.unlock_time,
            reset_timer: settings.reset_timer,
            position: pose.position.to_array().map(round_output),
            key_item: settings.key_item.clone(),
            is_active: settings.is_active,
            orientation: pose.orientation.to_array().map(round_angle_output),
            reset_player_check: settings.reset_player_check,
            exact_placing: settings.exact_placing,
            container_toggleable: settings.container_toggleable,
            action_id: settings.action_id,
        }
    }
}

/// Round to [`OUTPUT_PRECISION`] decimals. `-0.0` collapses to `0.0`.
///
/// Rounds from the exact binary value, so inputs sitting just under a
/// decimal midpoint round down.
pub fn round_output(value: f64) -> f64 {
    format_fixed(value).parse().unwrap_or(value)
}

/// [`round_output`] for angles: a value that rounds up to a full turn is `0.0`.
pub fn round_angle_output(value: f64) -> f64 {
    let rounded = round_output(value);
    if rounded >= FULL_TURN_DEG {
        0.0
    } else {
        rounded
    }
}

fn format_fixed(value: f64) -> String {
    let text = format!("{:.*}", OUTPUT_PRECISION, value);
    // "-0.000000"
    if text.starts_with('-') && text[1..].bytes().all(|b| b == b'0' || b == b'.') {
        text[1..].to_string()
    } else {
        text
    }
}

fn serialize_fixed<S: Serializer>(values: &[f64; 3], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(values.len()))?;
    for value in values {
        let raw = RawValue::from_string(format_fixed(*value)).map_err(S::Error::custom)?;
        seq.serialize_element(&raw)?;
    }
    seq.end()
}
