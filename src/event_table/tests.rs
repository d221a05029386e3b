use super::*;

#[test]
fn test_new_is_zero_filled() {
    let table = EventTable::new(NumberFormat::Double, &["FSC-A", "SSC-A", "FL1-A"], 4).unwrap();
    assert_eq!(table.number_format(), NumberFormat::Double);
    assert_eq!(table.number_of_events(), 4);
    assert_eq!(table.number_of_parameters(), 3);
    assert_eq!(table.double_column(2), Some(&[0.0; 4][..]));
    assert_eq!(table.float_column(0), None);
    assert_eq!(table.parameter_index("SSC-A"), Some(1));
    assert_eq!(table.parameter_index("missing"), None);
}

#[test]
fn test_rejects_bad_names() {
    assert_eq!(
        EventTable::new(NumberFormat::Float, &["A", ""], 1).unwrap_err(),
        EventTableError::EmptyShortName(1)
    );
    assert_eq!(
        EventTable::new(NumberFormat::Float, &["A", "B", "A"], 1).unwrap_err(),
        EventTableError::DuplicateShortName("A".to_string())
    );
}

#[test]
fn test_from_columns_checks_lengths() {
    let err = EventTable::from_float_columns(&["A", "B"], vec![vec![1.0, 2.0], vec![1.0]])
        .unwrap_err();
    assert!(matches!(
        err,
        EventTableError::ColumnLengthMismatch { expected: 2, actual: 1, .. }
    ));

    let err = EventTable::from_double_columns(&["A", "B"], vec![vec![1.0]]).unwrap_err();
    assert_eq!(
        err,
        EventTableError::ColumnCountMismatch {
            parameters: 2,
            columns: 1
        }
    );

    let table =
        EventTable::from_double_columns(&["A", "B"], vec![vec![1.0, 2.0], vec![3.0, 4.0]])
            .unwrap();
    assert_eq!(table.number_of_events(), 2);
    assert_eq!(table.value(1, 0), Some(3.0));
    assert_eq!(table.value(2, 0), None);
}

#[test]
fn test_data_ranges_ignore_nan() {
    let mut table = EventTable::from_float_columns(
        &["A", "B", "C"],
        vec![
            vec![3.0, f32::NAN, -1.5],
            vec![f32::NAN, f32::NAN, f32::NAN],
            vec![0.0, 10.0, 5.0],
        ],
    )
    .unwrap();
    table.compute_data_ranges();

    let a = table.parameter(0).unwrap();
    assert_eq!(a.data_minimum, Some(-1.5));
    assert_eq!(a.data_maximum, Some(3.0));
    assert_eq!(table.parameter(1).unwrap().data_minimum, None);
    assert_eq!(table.parameter(2).unwrap().data_maximum, Some(10.0));
}

#[test]
fn test_metadata_setters() {
    let mut table = EventTable::new(NumberFormat::Float, &["FL1-A"], 0).unwrap();
    table.set_long_name(0, "CD3 FITC").unwrap();
    table.set_specified_range(0, 0.0, 262144.0).unwrap();

    let p = table.parameter(0).unwrap();
    assert_eq!(p.long_name, "CD3 FITC");
    assert_eq!(p.specified_maximum, 262144.0);

    assert_eq!(
        table.set_long_name(3, "x").unwrap_err(),
        EventTableError::IndexOutOfRange { index: 3, count: 1 }
    );
}

#[test]
fn test_truncated() {
    let mut table =
        EventTable::from_double_columns(&["A", "B"], vec![vec![1.0, 2.0, 3.0], vec![6.0, 5.0, 4.0]])
            .unwrap();
    table.set_long_name(1, "Bee").unwrap();

    let head = table.truncated(2);
    assert_eq!(head.number_of_events(), 2);
    assert_eq!(head.double_column(1), Some(&[6.0, 5.0][..]));
    assert_eq!(head.parameter(1).unwrap().long_name, "Bee");
    assert_eq!(head.parameter(1).unwrap().data_minimum, Some(5.0));

    assert_eq!(table.truncated(10).number_of_events(), 3);
}
