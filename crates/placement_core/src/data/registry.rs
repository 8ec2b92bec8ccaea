//! Anchor registry
//!
//! Baseline poses for every known anchor type and the items authored against
//! them. The table ships embedded (`data/anchors.yaml`) and can be swapped for
//! an external file with the same layout.
//!
//! ## Resolution order (see [`load_registry`])
//! 1. explicit path (CLI flag / config)
//! 2. `PLACEMENT_REGISTRY_PATH`
//! 3. embedded table

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{PlacementError, Result};
use crate::models::AnchorDefinition;

/// Env var for overriding the registry file.
pub const REGISTRY_PATH_ENV: &str = "PLACEMENT_REGISTRY_PATH";

/// Embedded anchor table (compiled into the binary)
pub const ANCHORS_YAML: &str = include_str!("../../../../data/anchors.yaml");

static EMBEDDED_REGISTRY: OnceLock<AnchorRegistry> = OnceLock::new();

/// On-disk layout of the registry file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryFile {
    pub anchors: Vec<AnchorDefinition>,
}

/// Where a registry was loaded from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum RegistrySource {
    Embedded,
    File(PathBuf),
}

/// Read-only type id → anchor definition lookup
#[derive(Debug, Clone)]
pub struct AnchorRegistry {
    anchors: Vec<AnchorDefinition>,
    index: FxHashMap<String, usize>,
    source: RegistrySource,
}

impl AnchorRegistry {
    /// Build from definitions. Duplicate type ids are rejected.
    pub fn from_definitions(anchors: Vec<AnchorDefinition>) -> Result<Self> {
        let mut index = FxHashMap::default();
        for (i, anchor) in anchors.iter().enumerate() {
            if index.insert(anchor.type_id.clone(), i).is_some() {
                return Err(PlacementError::DuplicateAnchor {
                    type_id: anchor.type_id.clone(),
                });
            }
        }
        Ok(Self {
            anchors,
            index,
            source: RegistrySource::Embedded,
        })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: RegistryFile = serde_yaml::from_str(yaml).map_err(PlacementError::Registry)?;
        Self::from_definitions(file.anchors)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        let mut registry = Self::from_yaml_str(&yaml)?;
        registry.source = RegistrySource::File(path.to_path_buf());
        Ok(registry)
    }

    pub fn lookup(&self, type_id: &str) -> Option<&AnchorDefinition> {
        self.index.get(type_id).map(|&i| &self.anchors[i])
    }

    /// Definitions in table order
    pub fn iter(&self) -> impl Iterator<Item = &AnchorDefinition> {
        self.anchors.iter()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn source(&self) -> &RegistrySource {
        &self.source
    }
}

/// Embedded registry, parsed on first use.
///
/// # Panics
///
/// Panics if the embedded YAML is malformed (not possible in a normal build).
pub fn embedded_registry() -> &'static AnchorRegistry {
    EMBEDDED_REGISTRY.get_or_init(|| {
        AnchorRegistry::from_yaml_str(ANCHORS_YAML).expect("Embedded anchors.yaml is corrupted")
    })
}

fn resolve_registry_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    env::var(REGISTRY_PATH_ENV)
        .ok()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}

/// Load the registry for a run. Falls back to the embedded table when no
/// path is configured; a configured path that fails to load is an error.
pub fn load_registry(explicit: Option<&Path>) -> Result<AnchorRegistry> {
    match resolve_registry_path(explicit) {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading anchor registry");
            AnchorRegistry::from_path(&path)
        }
        None => Ok(embedded_registry().clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Orientation, Position};
    use std::io::Write;

    const SMALL: &str = r#"
anchors:
  - type_id: Land_Shed
    position: [10.0, 1.0, 20.0]
    orientation: [0.0, 0.0, 0.0]
    items:
      - type_name: Safe_Placement
        position: [12.0, 0.5, 20.0]
        orientation: [90.0, 0.0, 0.0]
      - type_name: Toolbox_Placement
        position: [10.0, 0.5, 25.0]
        orientation: [0.0, 0.0, 0.0]
  - type_id: Land_Empty
    position: [0.0, 0.0, 0.0]
    orientation: [0.0, 0.0, 0.0]
"#;

    #[test]
    fn test_embedded_table_loads() {
        let registry = embedded_registry();
        assert_eq!(registry.len(), 39);

        let workshop = registry.lookup("Land_Workshop2").unwrap();
        assert_eq!(
            workshop.original.position,
            Position::new(10938.900391, 7.30765, 2695.0)
        );
        assert_eq!(workshop.items.len(), 3);
        assert_eq!(workshop.items[0].type_name, "Medical_Bag_Placement");
        assert_eq!(
            workshop.items[0].original.orientation,
            Orientation::new(178.740952, 0.0, 0.0)
        );
        assert_eq!(workshop.items[2].type_name, "WeaponCrate_Placement");
    }

    #[test]
    fn test_embedded_baselines_are_unrotated() {
        for anchor in embedded_registry().iter() {
            assert_eq!(
                anchor.original.orientation,
                Orientation::default(),
                "{} has a rotated baseline",
                anchor.type_id
            );
        }
    }

    #[test]
    fn test_lookup_keeps_item_order() {
        let registry = AnchorRegistry::from_yaml_str(SMALL).unwrap();
        let shed = registry.lookup("Land_Shed").unwrap();
        let names: Vec<_> = shed.items.iter().map(|i| i.type_name.as_str()).collect();
        assert_eq!(names, ["Safe_Placement", "Toolbox_Placement"]);
        assert!(registry.lookup("Land_Empty").unwrap().items.is_empty());
        assert!(registry.lookup("Land_Missing").is_none());
        assert_eq!(registry.source(), &RegistrySource::Embedded);
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let yaml = r#"
anchors:
  - type_id: Land_Shed
    position: [0.0, 0.0, 0.0]
    orientation: [0.0, 0.0, 0.0]
  - type_id: Land_Shed
    position: [1.0, 0.0, 0.0]
    orientation: [0.0, 0.0, 0.0]
"#;
        let err = AnchorRegistry::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, PlacementError::DuplicateAnchor { ref type_id } if type_id == "Land_Shed"));
    }

    #[test]
    fn test_malformed_yaml_is_registry_error() {
        let err = AnchorRegistry::from_yaml_str("anchors: [ { type_id: 3").unwrap_err();
        assert!(matches!(err, PlacementError::Registry(_)));
    }

    #[test]
    fn test_explicit_path_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SMALL.as_bytes()).unwrap();

        let registry = load_registry(Some(file.path())).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.source(),
            &RegistrySource::File(file.path().to_path_buf())
        );
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let err = load_registry(Some(Path::new("/nonexistent/anchors.yaml"))).unwrap_err();
        assert!(matches!(err, PlacementError::Io(_)));
    }
}
