//! Container → loot table classification
//!
//! Exact, case-sensitive lookup after stripping the placement marker.
//! Unknown containers resolve to [`UNCLASSIFIED_LOOT_TABLE`] so they can be
//! triaged by hand later.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Marker carried by placement config types
pub const PLACEMENT_SUFFIX: &str = "_Placement";

/// Loot table for containers with no known mapping
pub const UNCLASSIFIED_LOOT_TABLE: &str = "CHANGEME";

/// Built-in container → loot table mappings
pub const LOOT_TABLES: &[(&str, &str)] = &[
    ("Medical_Bag", "MedicalBagLoot"),
    ("SLC_Ammo_Box", "AmmoCanLoot"),
    ("SLC_Filing_Cabinet", "FillingCabinetLoot"),
    ("WeaponCrate", "WeaponCrateLoot"),
    ("ConsumableCrate", "DuffleLoot"),
    ("DrugCrate", "DuffleLoot"),
    ("MilitaryCrate", "MilitaryCrateLoot"),
    ("Computer_Tower", "Computer_Tower_Loot"),
    ("MedicalCrate", "MedicalBagLoot"),
    ("Building", "Building"),
    ("Safe", "SafeLoot"),
    ("Toolbox", "ToolBoxLoot"),
    ("Jacket_SLC", "JacketLoot"),
    ("Duffle_Bag", "DuffleLoot"),
    ("SLC_Wooden_Crate", "WoodenCrateLoot"),
    ("BuildingCrate_HackableCrate", "Locked_Crates"),
    ("SLC_Hidden_Stash", "Hidden_Stashes_Tisy"),
    ("SLC_Brief_Case", "BriefCaseLoot"),
];

static DEFAULT_RESOLVER: OnceLock<LootTableResolver> = OnceLock::new();

/// Resolves container names to loot tables
#[derive(Debug, Clone)]
pub struct LootTableResolver {
    tables: FxHashMap<String, String>,
    suffix: String,
    fallback: String,
}

impl Default for LootTableResolver {
    fn default() -> Self {
        Self {
            tables: LOOT_TABLES
                .iter()
                .map(|(container, table)| (container.to_string(), table.to_string()))
                .collect(),
            suffix: PLACEMENT_SUFFIX.to_string(),
            fallback: UNCLASSIFIED_LOOT_TABLE.to_string(),
        }
    }
}

impl LootTableResolver {
    pub fn new(suffix: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            fallback: fallback.into(),
            ..Self::default()
        }
    }

    /// Layer extra mappings on top of the built-in table. Later entries win.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (container, table) in overrides {
            self.tables.insert(container.clone(), table.clone());
        }
        self
    }

    /// Drop the first occurrence of the placement marker.
    pub fn container_name(&self, type_name: &str) -> String {
        if self.suffix.is_empty() {
            return type_name.to_string();
        }
        type_name.replacen(&self.suffix, "", 1)
    }

    /// Loot table for an already-stripped container name.
    pub fn loot_table(&self, container_name: &str) -> &str {
        self.tables
            .get(container_name)
            .map(String::as_str)
            .unwrap_or(self.fallback.as_str())
    }

    /// Strip the marker, then look up the loot table.
    pub fn classify(&self, type_name: &str) -> &str {
        self.loot_table(&self.container_name(type_name))
    }

    pub fn is_unclassified(&self, loot_table: &str) -> bool {
        loot_table == self.fallback
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

/// Shared resolver over the built-in table
pub fn default_resolver() -> &'static LootTableResolver {
    DEFAULT_RESOLVER.get_or_init(LootTableResolver::default)
}

/// Classify with the built-in table.
pub fn classify(type_name: &str) -> &'static str {
    default_resolver().classify(type_name)
}
