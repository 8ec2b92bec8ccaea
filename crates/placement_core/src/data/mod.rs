//! Reference data
//!
//! - Anchor registry (embedded `data/anchors.yaml`, or an external file)
//! - Container → loot table classification

pub mod loot_tables;
pub mod registry;

pub use loot_tables::{
    classify, default_resolver, LootTableResolver, LOOT_TABLES, PLACEMENT_SUFFIX,
    UNCLASSIFIED_LOOT_TABLE,
};
pub use registry::{
    embedded_registry, load_registry, AnchorRegistry, RegistryFile, RegistrySource,
    ANCHORS_YAML, REGISTRY_PATH_ENV,
};
