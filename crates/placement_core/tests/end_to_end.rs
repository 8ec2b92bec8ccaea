//! End-to-end: mapgrouppos.xml → embedded registry → JSON output

use placement_core::{
    embedded_registry, BatchProcessor, JsonArraySink, JsonFragmentSink, LootTableResolver,
    PlacementConfig, RecordSink, SceneDocument,
};
use std::fs::File;
use std::io::{BufWriter, Write};

const SCENE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>
<map>
    <group name="Land_Workshop2" pos="100.000000 7.307650 200.000000" rpy="0.000000 0.000000 90.000000" a="-90.000000" />
    <group name="Land_Misc_Bench" pos="5.0 1.0 5.0" rpy="0 0 0" a="0" />
    <group name="Land_House_1W02" pos="0.0 10.5655 0.0" rpy="0 0 0" a="0" />
</map>
"#;

fn run_to_json(xml: &str) -> (serde_json::Value, String) {
    let document = SceneDocument::parse(xml).unwrap();
    let resolver = LootTableResolver::default();
    let processor = BatchProcessor::new(embedded_registry(), &resolver);

    let mut sink = JsonArraySink::new(Vec::new());
    processor.run(&document, &mut sink).unwrap();
    let text = String::from_utf8(sink.into_inner()).unwrap();
    (serde_json::from_str(&text).unwrap(), text)
}

#[test]
fn test_workshop_quarter_turn_end_to_end() {
    let (value, text) = run_to_json(SCENE);
    let records = value.as_array().unwrap();

    // 3 workshop items + 5 house items; the bench is unknown
    assert_eq!(records.len(), 8);

    let bag = &records[0];
    assert_eq!(bag["LocationName"], "Land_Workshop2");
    assert_eq!(bag["ContainerName"], "Medical_Bag");
    assert_eq!(bag["LootTable"], "MedicalBagLoot");
    assert_eq!(bag["POS"][0], 99.340088);
    assert_eq!(bag["POS"][1], 6.11882);
    assert_eq!(bag["POS"][2], 198.0);
    assert_eq!(bag["ORI"][0], 268.740952);
    assert_eq!(bag["UnlockTime"], 1);
    assert_eq!(bag["KeyItem"], "");
    assert_eq!(bag["ResetPlayerCheck"], 0);

    let crate_rec = &records[1];
    assert_eq!(crate_rec["ContainerName"], "MedicalCrate");
    assert_eq!(crate_rec["LootTable"], "MedicalBagLoot");
    assert_eq!(crate_rec["POS"][0], 98.780029);
    assert_eq!(crate_rec["POS"][2], 201.700196);
    assert_eq!(crate_rec["ORI"][0], 179.366951);

    let weapons = &records[2];
    assert_eq!(weapons["LootTable"], "WeaponCrateLoot");
    assert_eq!(weapons["POS"][0], 101.850098);
    assert_eq!(weapons["POS"][2], 199.700196);
    assert_eq!(weapons["ORI"][0], 0.0);

    assert!(records[3..]
        .iter()
        .all(|r| r["LocationName"] == "Land_House_1W02"));

    // fixed six-digit rendering
    assert!(text.contains("198.000000"));
    assert!(text.contains("6.118820"));
}

#[test]
fn test_unrotated_house_only_translates() {
    let (value, _) = run_to_json(SCENE);
    let records = value.as_array().unwrap();

    // Land_House_1W02 baseline x=10366.400391, z=2017.160034; first item is a
    // duffle bag at x=10370.400391, z=2020.219971
    let duffle = &records[3];
    assert_eq!(duffle["ContainerName"], "Duffle_Bag");
    assert_eq!(duffle["LootTable"], "DuffleLoot");
    assert_eq!(duffle["POS"][0], 4.0);
    assert_eq!(duffle["POS"][2], 3.059937);
    // -118.529884 normalized into [0, 360)
    assert_eq!(duffle["ORI"][0], 241.470116);
}

#[test]
fn test_scene_with_no_known_anchors() {
    let (value, text) = run_to_json(
        r#"<map><group name="Land_Nowhere" pos="1 2 3" rpy="0 0 0"/></map>"#,
    );
    assert_eq!(value.as_array().unwrap().len(), 0);
    assert_eq!(text, "[]\n");
}

#[test]
fn test_file_roundtrip_with_config() {
    let dir = tempfile::tempdir().unwrap();
    let scene_path = dir.path().join("mapgrouppos.xml");
    let out_path = dir.path().join("output.json");
    std::fs::write(&scene_path, SCENE).unwrap();

    let config = PlacementConfig::from_yaml_str(
        "fallback_loot_table: TRIAGE\ncontainer:\n  reset_timer: 600\n",
    )
    .unwrap();
    let resolver = config.loot_table_resolver();
    let processor = BatchProcessor::new(embedded_registry(), &resolver)
        .with_settings(config.container.clone());

    let document = SceneDocument::from_path(&scene_path).unwrap();
    {
        let file = File::create(&out_path).unwrap();
        let mut sink = JsonFragmentSink::new(BufWriter::new(file));
        let stats = processor.run(&document, &mut sink).unwrap();
        assert_eq!(stats.records_emitted, 8);
        assert_eq!(stats.unknown_anchors, 1);
        assert_eq!(stats.unclassified_items, 0);
        sink.finish().unwrap();
        sink.into_inner().flush().unwrap();
    }

    let text = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(text.matches("\"ResetTimer\": 600").count(), 8);
    assert!(text.trim_end().ends_with("},"));
}
