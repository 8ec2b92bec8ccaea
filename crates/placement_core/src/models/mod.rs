//! Data model shared by the engine, registry and batch driver.

pub mod anchor;
pub mod pose;
pub mod record;

pub use anchor::{AnchorDefinition, ItemDefinition};
pub use pose::{Orientation, Pose, Position};
pub use record::{
    round_angle_output, round_output, ContainerSettings, OutputRecord, OUTPUT_PRECISION,
};
