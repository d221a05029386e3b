//! Integration tests for the binary event codec
//!
//! These tests go through real files in a temporary directory.

use flowgate::binary::{BinaryCodecConfig, BinaryEventCodec, ByteOrder, VERSION_TOKEN};
use flowgate::diagnostics::{ATTR_BYTE_ORDER, ATTR_NUMBER_OF_EVENTS, ATTR_NUMBER_OF_EVENTS_IN_FILE};
use flowgate::error::{CodecError, ErrorCategory};
use flowgate::event_table::{EventTable, NumberFormat};
use std::fs;
use tempfile::tempdir;

/// Three scatter/fluorescence channels with a ramp of values
fn ramp_table(number_of_events: usize) -> EventTable {
    let columns = (0..3)
        .map(|p| {
            (0..number_of_events)
                .map(|e| (e * 10 + p) as f32 + 0.25)
                .collect()
        })
        .collect();
    let mut table = EventTable::from_float_columns(&["FSC-A", "SSC-A", "FL1-A"], columns).unwrap();
    table.set_long_name(0, "Forward Scatter").unwrap();
    table.set_long_name(2, "CD3 FITC").unwrap();
    for p in 0..3 {
        table.set_specified_range(p, 0.0, 262144.0).unwrap();
    }
    table
}

#[test]
fn test_save_load_cycle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cells.fgb");

    let original = ramp_table(1_000);
    let mut writer = BinaryEventCodec::with_table(&original);
    writer.save(&path, None).unwrap();
    assert!(writer.file_log().is_empty());

    // The file starts with the padded version field
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(VERSION_TOKEN.as_bytes()));

    let mut reader = BinaryEventCodec::new();
    let loaded = reader.load(&path, None).unwrap();
    let loaded = loaded.borrow();

    assert_eq!(loaded.number_format(), NumberFormat::Float);
    assert_eq!(loaded.number_of_events(), 1_000);
    assert_eq!(loaded.number_of_parameters(), 3);
    for p in 0..3 {
        assert_eq!(loaded.float_column(p), original.float_column(p));
    }

    let names: Vec<_> = loaded.short_names().collect();
    assert_eq!(names, vec!["FSC-A", "SSC-A", "FL1-A"]);
    assert_eq!(loaded.parameter(0).unwrap().long_name, "Forward Scatter");
    assert_eq!(loaded.parameter(1).unwrap().long_name, "");
    assert_eq!(loaded.parameter(2).unwrap().specified_maximum, 262144.0);
    assert_eq!(loaded.parameter(0).unwrap().data_minimum, Some(0.25));
    assert_eq!(loaded.parameter(2).unwrap().data_maximum, Some(9_992.25));

    assert!(reader.file_log().is_empty());
    assert_eq!(reader.file_attributes().get(ATTR_NUMBER_OF_EVENTS), Some("1000"));
}

#[test]
fn test_partial_load_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cells.fgb");
    BinaryEventCodec::with_table(&ramp_table(500))
        .save(&path, None)
        .unwrap();

    let mut reader = BinaryEventCodec::new();
    let head = reader.load(&path, Some(7)).unwrap();
    let head = head.borrow();
    assert_eq!(head.number_of_events(), 7);
    assert_eq!(head.value(2, 6), Some(62.25));

    let attributes = reader.file_attributes();
    assert_eq!(attributes.get(ATTR_NUMBER_OF_EVENTS), Some("7"));
    assert_eq!(attributes.get(ATTR_NUMBER_OF_EVENTS_IN_FILE), Some("500"));
}

#[test]
fn test_truncating_copy_in_other_byte_order() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("full.fgb");
    let output = dir.path().join("head.fgb");

    let original = ramp_table(100);
    BinaryEventCodec::with_table(&original)
        .save(&input, None)
        .unwrap();

    let mut reader = BinaryEventCodec::new();
    let table = reader.load(&input, None).unwrap();

    let foreign = match ByteOrder::native() {
        ByteOrder::Lsbf => ByteOrder::Msbf,
        ByteOrder::Msbf => ByteOrder::Lsbf,
    };
    let mut writer = BinaryEventCodec::with_config(BinaryCodecConfig::with_byte_order(foreign));
    writer.set_event_table(table);
    writer.save(&output, Some(10)).unwrap();

    let mut check = BinaryEventCodec::new();
    let head = check.load(&output, None).unwrap();
    assert_eq!(check.file_attributes().get(ATTR_BYTE_ORDER), Some(foreign.as_str()));
    assert_eq!(*head.borrow(), original.truncated(10));
}

#[test]
fn test_double_table_cycle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("time.fgb");

    let time: Vec<f64> = (0..64).map(|i| i as f64 * 0.001).collect();
    let intensity: Vec<f64> = (0..64).map(|i| (i as f64).sqrt() * 1e5).collect();
    let table =
        EventTable::from_double_columns(&["Time", "FL2-A"], vec![time.clone(), intensity.clone()])
            .unwrap();

    BinaryEventCodec::with_table(&table).save(&path, None).unwrap();

    let mut reader = BinaryEventCodec::new();
    let loaded = reader.load(&path, None).unwrap();
    let loaded = loaded.borrow();
    assert_eq!(loaded.number_format(), NumberFormat::Double);
    assert_eq!(loaded.double_column(0), Some(time.as_slice()));
    assert_eq!(loaded.double_column(1), Some(intensity.as_slice()));
}

#[test]
fn test_truncated_file_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cut.fgb");
    BinaryEventCodec::with_table(&ramp_table(50))
        .save(&path, None)
        .unwrap();

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

    let mut reader = BinaryEventCodec::new();
    let err = reader.load(&path, None).unwrap_err();
    assert!(matches!(err, CodecError::Truncated(_)));
    assert_eq!(err.category(), ErrorCategory::Truncated);
    assert!(reader.file_log().has_errors());
    assert!(reader.event_table().is_none());

    // The header alone is intact
    let header_only = reader.load(&path, Some(0)).unwrap();
    assert_eq!(header_only.borrow().number_of_parameters(), 3);
}

#[test]
fn test_failed_save_keeps_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("keep.fgb");
    BinaryEventCodec::with_table(&ramp_table(5))
        .save(&path, None)
        .unwrap();
    let before = fs::read(&path).unwrap();

    let empty = EventTable::new(NumberFormat::Float, &["FSC-A"], 0).unwrap();
    let err = BinaryEventCodec::with_table(&empty)
        .save(&path, None)
        .unwrap_err();
    assert!(matches!(err, CodecError::InvalidArgument(_)));
    assert_eq!(fs::read(&path).unwrap(), before);
}
