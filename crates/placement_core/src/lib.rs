//! # placement_core - Loot Container Re-anchoring Engine
//!
//! Buildings ("anchors") get moved around a map; the loot containers authored
//! inside them have to follow. This crate re-derives every container's pose
//! from the building's baseline pose and its new pose in the scene.
//!
//! ## Features
//! - Planar (yaw-only) re-anchoring with orientation composition mod 360
//! - Embedded anchor table (39 building types), swappable for an external file
//! - Container → loot table classification with a triage fallback
//! - `mapgrouppos.xml` reader, append-only JSON sinks
//! - Deterministic, order-preserving batch runs (optionally on rayon)
//! - Prompt/answer protocol for authoring new anchor definitions

pub mod authoring;
pub mod batch;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod models;
pub mod scene;
pub mod sink;

pub use authoring::{render_registry_entry, Answer, AuthoringSession, Prompt};
pub use batch::{BatchProcessor, BatchStats};
pub use config::{PlacementConfig, CONFIG_PATH_ENV};
pub use data::{
    classify, embedded_registry, load_registry, AnchorRegistry, LootTableResolver,
    RegistrySource, UNCLASSIFIED_LOOT_TABLE,
};
pub use engine::{compose_orientation, compose_yaw, reanchor, rotate_offset, AnchorMove};
pub use error::{AuthoringError, PlacementError, RecordError, Result};
pub use models::{
    AnchorDefinition, ContainerSettings, ItemDefinition, Orientation, OutputRecord, Pose,
    Position,
};
pub use scene::{SceneDocument, SceneRecord};
pub use sink::{
    sink_for, JsonArraySink, JsonFragmentSink, JsonLinesSink, OutputFormat, RecordSink,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
