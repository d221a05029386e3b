//! Integration tests for parameter maps
//!
//! These tests cover JSON files on disk and building maps from event files.

use flowgate::binary::BinaryEventCodec;
use flowgate::error::{CodecError, ErrorCategory};
use flowgate::event_table::EventTable;
use flowgate::format::FileFormat;
use flowgate::json::{JsonParameterMapCodec, VERSION_TOKEN};
use flowgate::parameter_map::{ParameterMap, ParameterMapEntry};
use flowgate::transform::{Transform, TransformKind};
use std::fs;
use tempfile::tempdir;

fn panel_map() -> ParameterMap {
    let mut map = ParameterMap::new();
    map.set_name("T cell panel");
    map.set_description("Four-color panel");
    map.set_creator_software_name("flowgate tests");
    map.add_parameter(ParameterMapEntry::new("FSC-A").visible_for_gating(false))
        .unwrap();
    map.add_parameter(
        ParameterMapEntry::new("FL1-A")
            .long_name("CD3 FITC")
            .description("T cells")
            .default_transform(
                Transform::logicle(262144.0, 0.0, 4.5, 0.5).with_name("FL1 logicle"),
            ),
    )
    .unwrap();
    map.add_parameter(
        ParameterMapEntry::new("FL2-A")
            .long_name("CD4 PE")
            .default_transform(Transform::asinh(262144.0, 0.0, 4.0)),
    )
    .unwrap();
    map
}

#[test]
fn test_save_load_cycle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("panel.json");

    let original = panel_map();
    let mut writer = JsonParameterMapCodec::with_map(&original);
    writer.save(&path).unwrap();
    assert!(writer.file_log().is_empty());

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains(VERSION_TOKEN));
    assert!(text.contains("\"transformType\": \"Logicle\""));

    let mut reader = JsonParameterMapCodec::new();
    let loaded = reader.load(&path).unwrap();
    let loaded = loaded.borrow();

    assert_eq!(loaded.name(), "T cell panel");
    assert_eq!(loaded.description(), "Four-color panel");
    assert_eq!(loaded.creator_software_name(), "flowgate tests");
    assert_eq!(loaded.sorted_parameter_names(), vec!["FL1-A", "FL2-A", "FSC-A"]);
    for name in original.parameter_names() {
        assert_eq!(loaded.get(name), original.get(name), "entry {}", name);
    }
    assert!(!loaded.find_visible_for_gating("FSC-A"));
    assert_eq!(
        loaded.find_default_transform("FL2-A").and_then(Transform::kind),
        Some(TransformKind::ParameterizedInverseHyperbolicSine)
    );
}

#[test]
fn test_map_extension_is_accepted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("panel.map");

    JsonParameterMapCodec::with_map(&panel_map())
        .save(&path)
        .unwrap();
    assert_eq!(FileFormat::from_path(&path), Some(FileFormat::ParameterMap));

    let mut reader = JsonParameterMapCodec::new();
    let loaded = reader.load(&path).unwrap();
    assert_eq!(loaded.borrow().number_of_parameters(), 3);
    assert_eq!(loaded.borrow().file_name(), "panel.map");
}

#[test]
fn test_map_from_event_file() {
    let dir = tempdir().unwrap();
    let events = dir.path().join("cells.fgb");

    let columns = vec![vec![1.0f32, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
    let mut table = EventTable::from_float_columns(&["FSC-A", "FL1-A", "FL3-A"], columns).unwrap();
    table.set_long_name(1, "CD3 FITC (acquired)").unwrap();
    table.set_long_name(2, "CD8 PerCP").unwrap();
    BinaryEventCodec::with_table(&table)
        .save(&events, None)
        .unwrap();

    // Header-only load is enough to enumerate parameters
    let mut event_codec = BinaryEventCodec::new();
    let header = event_codec.load(&events, Some(0)).unwrap();

    let mut map = panel_map();
    let added = map.copy_from_source(&*header.borrow());
    assert_eq!(added, 1);
    assert_eq!(map.number_of_parameters(), 4);

    // Existing entries keep their annotations; only the long name follows the file
    assert_eq!(map.find_long_name("FL1-A"), "CD3 FITC (acquired)");
    assert_eq!(map.find_description("FL1-A"), "T cells");
    assert!(map.find_default_transform("FL1-A").is_some());
    assert!(!map.find_visible_for_gating("FSC-A"));

    // New entries get defaults
    assert_eq!(map.find_long_name("FL3-A"), "CD8 PerCP");
    assert!(map.find_visible_for_gating("FL3-A"));
    assert!(map.find_default_transform("FL3-A").is_none());
    assert_eq!(map.display_name("FL3-A"), "CD8 PerCP");
}

#[test]
fn test_load_rejects_other_version() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("future.json");
    fs::write(
        &path,
        r#"{"version": "FlowGateJsonParameterMap_9.0", "parameters": []}"#,
    )
    .unwrap();

    let mut reader = JsonParameterMapCodec::with_map(&panel_map());
    let err = reader.load(&path).unwrap_err();
    assert!(matches!(err, CodecError::Unsupported(_)));
    assert_eq!(err.category(), ErrorCategory::Unsupported);
    assert!(reader.file_log().has_errors());

    // The previously held map is untouched
    assert_eq!(reader.parameter_map().borrow().number_of_parameters(), 3);
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let mut reader = JsonParameterMapCodec::new();
    let err = reader.load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, CodecError::NotFound(_)));
    assert_eq!(err.category(), ErrorCategory::Access);
}

#[test]
fn test_save_replaces_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("panel.json");
    fs::write(&path, "stale contents that are much longer than a compact map ".repeat(50)).unwrap();

    let mut map = ParameterMap::new();
    map.add_parameter(ParameterMapEntry::new("SSC-A")).unwrap();
    JsonParameterMapCodec::with_map(&map)
        .save_with_indent(&path, 0)
        .unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains("stale"));
    assert!(!text.contains('\n'));

    let mut reader = JsonParameterMapCodec::new();
    let loaded = reader.load(&path).unwrap();
    assert!(loaded.borrow().is_parameter("SSC-A"));
}

#[test]
fn test_file_format_detection() {
    assert_eq!(FileFormat::from_path("a/b/cells.FGB"), Some(FileFormat::BinaryEvents));
    assert_eq!(FileFormat::from_path("panel.json"), Some(FileFormat::ParameterMap));
    assert_eq!(FileFormat::from_path("notes.txt"), None);
    assert_eq!(FileFormat::from_path("no_extension"), None);
}
