//! # Run configuration
//!
//! Optional YAML file; every field has a default so an empty file (or no file)
//! reproduces the stock behavior.
//!
//! ```yaml
//! registry_path: ./anchors.custom.yaml
//! fallback_loot_table: CHANGEME
//! loot_table_overrides:
//!   Fridge: FoodLoot
//! container:
//!   reset_timer: 30
//! parallel: true
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::data::{LootTableResolver, PLACEMENT_SUFFIX, UNCLASSIFIED_LOOT_TABLE};
use crate::error::{PlacementError, Result};
use crate::models::ContainerSettings;

/// Env var pointing at a config file
pub const CONFIG_PATH_ENV: &str = "PLACEMENT_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// External anchor table replacing the embedded one
    pub registry_path: Option<PathBuf>,
    /// Marker stripped from item type names before classification
    pub placement_suffix: String,
    /// Loot table for unknown containers
    pub fallback_loot_table: String,
    /// Extra container → loot table entries
    pub loot_table_overrides: BTreeMap<String, String>,
    /// Constant bookkeeping fields on every output record
    pub container: ContainerSettings,
    /// Fan scene records out over rayon (output order unchanged)
    pub parallel: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            registry_path: None,
            placement_suffix: PLACEMENT_SUFFIX.to_string(),
            fallback_loot_table: UNCLASSIFIED_LOOT_TABLE.to_string(),
            loot_table_overrides: BTreeMap::new(),
            container: ContainerSettings::default(),
            parallel: false,
        }
    }
}

impl PlacementConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(PlacementError::Config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Explicit path, else `PLACEMENT_CONFIG`, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_path(Path::new(path.trim())),
            _ => Ok(Self::default()),
        }
    }

    /// Classifier built from the suffix / fallback / override settings.
    pub fn loot_table_resolver(&self) -> LootTableResolver {
        LootTableResolver::new(&self.placement_suffix, &self.fallback_loot_table)
            .with_overrides(&self.loot_table_overrides)
    }
}
