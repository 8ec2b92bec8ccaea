//! Scene document reader (`mapgrouppos.xml`)
//!
//! ```xml
//! <map>
//!     <group name="Land_Workshop2" pos="100.0 7.3 200.0" rpy="0 0 90" a="-90" />
//! </map>
//! ```
//!
//! Document-level problems (unreadable file, bad XML, wrong root) are fatal.
//! Each `<group>` is kept as a raw attribute map and converted to a typed
//! [`SceneRecord`] lazily, so one bad group only costs that record.

use roxmltree::Document;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{PlacementError, RecordError, Result};
use crate::models::{Orientation, Pose, Position};

pub const ROOT_ELEMENT: &str = "map";
pub const GROUP_ELEMENT: &str = "group";
pub const NAME_ATTR: &str = "name";
pub const POS_ATTR: &str = "pos";
pub const RPY_ATTR: &str = "rpy";

/// Attribute name → raw string value of one group element
pub type AttributeMap = BTreeMap<String, String>;

/// One anchor instance placed in the world
#[derive(Debug, Clone, PartialEq)]
pub struct SceneRecord {
    pub type_id: String,
    pub position: Position,
    /// Orientation as stored in the scene: roll, pitch, yaw
    pub rotation_rpy: [f64; 3],
}

impl SceneRecord {
    pub fn new(type_id: impl Into<String>, position: Position, rotation_rpy: [f64; 3]) -> Self {
        Self {
            type_id: type_id.into(),
            position,
            rotation_rpy,
        }
    }

    pub fn from_attributes(attrs: &AttributeMap) -> std::result::Result<Self, RecordError> {
        let type_id = attrs
            .get(NAME_ATTR)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(RecordError::MissingAttribute { attr: NAME_ATTR })?;
        let pos = parse_triplet(attrs, POS_ATTR)?;
        let rpy = parse_triplet(attrs, RPY_ATTR)?;

        Ok(Self::new(type_id, Position::from(pos), rpy))
    }

    /// New anchor pose, with the scene's roll-pitch-yaw reordered to yaw-pitch-roll.
    pub fn anchor_pose(&self) -> Pose {
        Pose::new(self.position, Orientation::from_rpy(self.rotation_rpy))
    }
}

fn parse_triplet(attrs: &AttributeMap, attr: &'static str) -> std::result::Result<[f64; 3], RecordError> {
    let raw = attrs
        .get(attr)
        .ok_or(RecordError::MissingAttribute { attr })?;

    let values = raw
        .split_whitespace()
        .map(|part| {
            part.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| RecordError::InvalidNumber {
                    attr,
                    value: part.to_string(),
                })
        })
        .collect::<std::result::Result<Vec<f64>, RecordError>>()?;

    match values.as_slice() {
        [a, b, c] => Ok([*a, *b, *c]),
        other => Err(RecordError::ComponentCount {
            attr,
            found: other.len(),
        }),
    }
}

/// Parsed scene document: group elements in document order
#[derive(Debug, Clone, Default)]
pub struct SceneDocument {
    pub groups: Vec<AttributeMap>,
}

impl SceneDocument {
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();
        if root.tag_name().name() != ROOT_ELEMENT {
            return Err(PlacementError::InvalidScene(format!(
                "Expected root element '{}', found '{}'",
                ROOT_ELEMENT,
                root.tag_name().name()
            )));
        }

        let groups = root
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == GROUP_ELEMENT)
            .map(|node| {
                node.attributes()
                    .map(|a| (a.name().to_string(), a.value().to_string()))
                    .collect::<AttributeMap>()
            })
            .collect();

        Ok(Self { groups })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(&xml)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Typed records in document order; bad groups surface as `Err` items.
    pub fn records(&self) -> impl Iterator<Item = std::result::Result<SceneRecord, RecordError>> + '_ {
        self.groups.iter().map(SceneRecord::from_attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> AttributeMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_record_from_attributes() {
        let record = SceneRecord::from_attributes(&attrs(&[
            ("name", "Land_Workshop2"),
            ("pos", "100.0 7.30765 200.0"),
            ("rpy", "-0.5 1.25 90"),
            ("a", "-90"),
        ]))
        .unwrap();

        assert_eq!(record.type_id, "Land_Workshop2");
        assert_eq!(record.position, Position::new(100.0, 7.30765, 200.0));
        let pose = record.anchor_pose();
        assert_eq!(pose.orientation, Orientation::new(90.0, 1.25, -0.5));
    }

    #[test]
    fn test_missing_and_bad_fields() {
        let missing = SceneRecord::from_attributes(&attrs(&[("name", "X"), ("pos", "1 2 3")]));
        assert_eq!(missing, Err(RecordError::MissingAttribute { attr: "rpy" }));

        let bad = SceneRecord::from_attributes(&attrs(&[
            ("name", "X"),
            ("pos", "1 two 3"),
            ("rpy", "0 0 0"),
        ]));
        assert_eq!(
            bad,
            Err(RecordError::InvalidNumber {
                attr: "pos",
                value: "two".to_string()
            })
        );

        let short = SceneRecord::from_attributes(&attrs(&[
            ("name", "X"),
            ("pos", "1 2 3"),
            ("rpy", "0 0"),
        ]));
        assert_eq!(
            short,
            Err(RecordError::ComponentCount {
                attr: "rpy",
                found: 2
            })
        );

        let nameless = SceneRecord::from_attributes(&attrs(&[("pos", "1 2 3"), ("rpy", "0 0 0")]));
        assert_eq!(nameless, Err(RecordError::MissingAttribute { attr: "name" }));
    }

    #[test]
    fn test_name_is_kept_verbatim() {
        let record = SceneRecord::from_attributes(&attrs(&[
            ("name", "Land_Workshop2 "),
            ("pos", "0 0 0"),
            ("rpy", "0 0 0"),
        ]))
        .unwrap();
        assert_eq!(record.type_id, "Land_Workshop2 ");
        assert!(crate::data::embedded_registry()
            .lookup(&record.type_id)
            .is_none());
    }

    #[test]
    fn test_non_finite_rejected() {
        let record = SceneRecord::from_attributes(&attrs(&[
            ("name", "X"),
            ("pos", "NaN 0 0"),
            ("rpy", "0 0 0"),
        ]));
        assert!(matches!(record, Err(RecordError::InvalidNumber { attr: "pos", .. })));
    }

    #[test]
    fn test_document_keeps_group_order() {
        let doc = SceneDocument::parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<map>
    <group name="B" pos="1 2 3" rpy="0 0 0" a="0"/>
    <!-- comment -->
    <group name="A" pos="4 5 6" rpy="0 0 45" a="0"/>
    <other name="C"/>
</map>"#,
        )
        .unwrap();

        assert_eq!(doc.len(), 2);
        let names: Vec<String> = doc.records().map(|r| r.unwrap().type_id).collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn test_wrong_root_is_fatal() {
        let err = SceneDocument::parse("<world><group name=\"A\"/></world>").unwrap_err();
        assert!(matches!(err, PlacementError::InvalidScene(_)));
    }

    #[test]
    fn test_bad_xml_is_fatal() {
        let err = SceneDocument::parse("<map><group name=\"A\"></map>").unwrap_err();
        assert!(matches!(err, PlacementError::Xml(_)));
    }
}
