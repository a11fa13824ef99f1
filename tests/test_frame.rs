// Frame construction and mutation tests
// Author: Gabriel Demetrios Lafis

use rust_frame_engine::{
    data::{infer_kind, DataType, Frame, Row, Value},
    utils::{FillPolicy, FrameError},
};

fn people() -> Frame {
    Frame::from_columns(vec![
        ("Name", vec![Value::from("Alice"), Value::from("Bob"), Value::from("Charlie")]),
        ("Age", vec![Value::Integer(25), Value::Integer(30), Value::Integer(35)]),
        ("City", vec![Value::from("NYC"), Value::from("LA"), Value::from("NYC")]),
    ])
    .unwrap()
}

#[test]
fn test_with_header_rejects_duplicates_and_empty() {
    assert!(matches!(
        Frame::with_header(&["a", "b", "a"]),
        Err(FrameError::DuplicateColumn(name)) if name == "a"
    ));

    let empty: [&str; 0] = [];
    assert!(matches!(Frame::with_header(&empty), Err(FrameError::EmptySchema)));
}

#[test]
fn test_from_columns_checks_lengths() {
    let result = Frame::from_columns(vec![
        ("a", vec![Value::Integer(1), Value::Integer(2)]),
        ("b", vec![Value::Integer(1)]),
    ]);

    assert!(matches!(
        result,
        Err(FrameError::RowCountMismatch { expected: 2, actual: 1, .. })
    ));

    // No columns at all is a valid, empty frame
    let empty: Vec<(&str, Vec<Value>)> = Vec::new();
    let frame = Frame::from_columns(empty).unwrap();
    assert_eq!(frame.row_count(), 0);
    assert_eq!(frame.column_count(), 0);
}

#[test]
fn test_push_row() {
    let mut frame = Frame::with_header(&["id", "name"]).unwrap();
    frame.push_row(vec![Value::Integer(1), Value::from("Alice")]).unwrap();
    frame.push_row(Row::new(vec![Value::Integer(2), Value::from("Bob")])).unwrap();

    assert_eq!(frame.row_count(), 2);
    assert_eq!(frame.value(1, "name"), Some(&Value::from("Bob")));

    // Wrong arity leaves the frame untouched
    let result = frame.push_row(vec![Value::Integer(3)]);
    assert!(matches!(result, Err(FrameError::SchemaMismatch(_))));
    assert_eq!(frame.row_count(), 2);

    let mut headless = Frame::new();
    assert!(matches!(
        headless.push_row(vec![Value::Integer(1)]),
        Err(FrameError::EmptySchema)
    ));
}

#[test]
fn test_from_rows_is_all_or_nothing() {
    let rows = vec![
        Row::new(vec![Value::Integer(1), Value::Integer(2)]),
        Row::new(vec![Value::Integer(3)]),
    ];
    assert!(Frame::from_rows(&["x", "y"], rows).is_err());

    let rows = vec![Row::new(vec![Value::Integer(1), Value::Integer(2)])];
    let frame = Frame::from_rows(&["x", "y"], rows).unwrap();
    assert_eq!(frame.cell(0, 1), Some(&Value::Integer(2)));
}

#[test]
fn test_add_column() {
    let mut frame = people();
    frame
        .add_column("Score", vec![Value::Float(1.5), Value::Float(2.5), Value::Null])
        .unwrap();
    assert_eq!(frame.header(), &["Name", "Age", "City", "Score"]);

    let duplicate = frame.add_column("Age", vec![Value::Null; 3]);
    assert!(matches!(duplicate, Err(FrameError::DuplicateColumn(_))));

    let short = frame.add_column("Short", vec![Value::Null; 2]);
    assert!(matches!(
        short,
        Err(FrameError::RowCountMismatch { expected: 3, actual: 2, .. })
    ));
    assert_eq!(frame.column_count(), 4);

    // The first column of an empty frame sets the row count
    let mut empty = Frame::new();
    empty.add_column("a", vec![Value::Integer(1), Value::Integer(2)]).unwrap();
    assert_eq!(empty.row_count(), 2);
}

#[test]
fn test_add_then_remove_restores_frame() {
    let original = people();
    let mut frame = original.clone();

    frame.add_column("Tmp", vec![Value::Null; 3]).unwrap();
    let removed = frame.remove_column("Tmp").unwrap();

    assert_eq!(removed.len(), 3);
    assert_eq!(frame, original);
}

#[test]
fn test_remove_column_keeps_order() {
    let mut frame = people();
    frame.remove_column("Age").unwrap();
    assert_eq!(frame.header(), &["Name", "City"]);

    assert!(matches!(
        frame.remove_column("Age"),
        Err(FrameError::ColumnNotFound(name)) if name == "Age"
    ));
}

#[test]
fn test_modify_column() {
    let mut frame = people();
    frame
        .modify_column("Age", vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)])
        .unwrap();
    assert_eq!(frame.header(), &["Name", "Age", "City"]);
    assert_eq!(frame.value(2, "Age"), Some(&Value::Integer(3)));

    assert!(matches!(
        frame.modify_column("Missing", vec![Value::Null; 3]),
        Err(FrameError::ColumnNotFound(_))
    ));
    assert!(matches!(
        frame.modify_column("Age", vec![Value::Null]),
        Err(FrameError::RowCountMismatch { .. })
    ));
    assert_eq!(frame.value(0, "Age"), Some(&Value::Integer(1)));
}

#[test]
fn test_reorder_columns() {
    let mut frame = people();
    frame.reorder_columns(&["City", "Name", "Age"]).unwrap();

    assert_eq!(frame.header(), &["City", "Name", "Age"]);
    let first: Vec<&Value> = frame.row(0).unwrap().values().collect();
    assert_eq!(first, vec![&Value::from("NYC"), &Value::from("Alice"), &Value::Integer(25)]);

    assert!(matches!(
        frame.reorder_columns(&["City", "Name"]),
        Err(FrameError::SchemaMismatch(_))
    ));
    assert!(matches!(
        frame.reorder_columns(&["City", "City", "Age"]),
        Err(FrameError::SchemaMismatch(_))
    ));
    assert!(matches!(
        frame.reorder_columns(&["City", "Name", "Height"]),
        Err(FrameError::SchemaMismatch(_))
    ));
    assert_eq!(frame.header(), &["City", "Name", "Age"]);
}

#[test]
fn test_rename_column() {
    let mut frame = people();
    frame.rename_column("City", "Town").unwrap();

    assert_eq!(frame.header(), &["Name", "Age", "Town"]);
    assert_eq!(frame.value(1, "Town"), Some(&Value::from("LA")));
    assert!(!frame.has_column("City"));

    assert!(matches!(
        frame.rename_column("Town", "Name"),
        Err(FrameError::DuplicateColumn(_))
    ));
}

#[test]
fn test_row_views() {
    let frame = people();
    let row = frame.row(1).unwrap();

    assert_eq!(row.index(), 1);
    assert_eq!(row.len(), 3);
    assert_eq!(row.get("Name"), Some(&Value::from("Bob")));
    assert_eq!(row.value(1), Some(&Value::Integer(30)));
    assert_eq!(row.get("Missing"), None);
    assert_eq!(row.to_row().values.len(), 3);

    assert!(frame.row(3).is_none());
    assert_eq!(frame.rows().count(), 3);
}

#[test]
fn test_fill_missing_strict() {
    let mut frame = Frame::from_columns(vec![
        ("a", vec![Value::Integer(1), Value::Null, Value::Integer(3)]),
        ("b", vec![Value::Float(0.5), Value::Null, Value::Null]),
        ("c", vec![Value::Null, Value::Null, Value::Null]),
    ])
    .unwrap();

    let filled = frame.fill_missing(Value::Integer(0)).unwrap();
    assert_eq!(filled, 6);
    assert_eq!(frame.value(1, "a"), Some(&Value::Integer(0)));
    // Integer default is widened for a float column
    assert_eq!(frame.value(1, "b"), Some(&Value::Float(0.0)));
    assert_eq!(frame.value(0, "c"), Some(&Value::Integer(0)));
}

#[test]
fn test_fill_missing_strict_rejects_mismatch_without_writing() {
    let mut frame = Frame::from_columns(vec![
        ("a", vec![Value::Integer(1), Value::Null]),
        ("b", vec![Value::from("x"), Value::Null]),
    ])
    .unwrap();

    let result = frame.fill_missing(Value::Integer(0));
    assert!(matches!(
        result,
        Err(FrameError::UnsupportedValueKind { column, kind: DataType::Integer }) if column == "b"
    ));
    // Column 'a' was not filled either
    assert_eq!(frame.value(1, "a"), Some(&Value::Null));

    let filled = frame
        .fill_missing_with(Value::Integer(0), FillPolicy::Permissive)
        .unwrap();
    assert_eq!(filled, 2);
    assert_eq!(frame.value(1, "b"), Some(&Value::Integer(0)));
}

#[test]
fn test_infer_kind() {
    let ints = vec![Value::from("1"), Value::from("2"), Value::Null];
    let floats = vec![Value::from("1"), Value::from("2.5")];
    let bools = vec![Value::from("true"), Value::from("FALSE")];
    let dates = vec![Value::from("2024-01-02"), Value::from("2024-01-03T10:00:00")];
    let text = vec![Value::from("1"), Value::from("abc")];

    assert_eq!(infer_kind(&ints), DataType::Integer);
    assert_eq!(infer_kind(&floats), DataType::Float);
    assert_eq!(infer_kind(&bools), DataType::Boolean);
    assert_eq!(infer_kind(&dates), DataType::DateTime);
    assert_eq!(infer_kind(&text), DataType::String);
    assert_eq!(infer_kind(&[Value::Null, Value::Null]), DataType::Null);
}

#[test]
fn test_infer_kinds_in_header_order() {
    let frame = people();
    let kinds = frame.infer_kinds();

    assert_eq!(
        kinds,
        vec![
            ("Name".to_string(), DataType::String),
            ("Age".to_string(), DataType::Integer),
            ("City".to_string(), DataType::String),
        ]
    );
}

#[test]
fn test_convert_column() {
    let mut frame = Frame::from_columns(vec![(
        "n",
        vec![Value::from("1"), Value::from(" 2 "), Value::Null],
    )])
    .unwrap();

    frame.convert_column("n", DataType::Integer).unwrap();
    assert_eq!(
        frame.column("n").unwrap(),
        &[Value::Integer(1), Value::Integer(2), Value::Null]
    );

    frame.convert_column("n", DataType::Float).unwrap();
    assert_eq!(frame.value(0, "n"), Some(&Value::Float(1.0)));
}

#[test]
fn test_convert_column_is_all_or_nothing() {
    let mut frame = Frame::from_columns(vec![(
        "n",
        vec![Value::from("1"), Value::from("two"), Value::from("3")],
    )])
    .unwrap();

    let result = frame.convert_column("n", DataType::Integer);
    assert!(matches!(
        result,
        Err(FrameError::ConversionError { value, kind: DataType::Integer }) if value == "two"
    ));
    assert_eq!(frame.value(0, "n"), Some(&Value::from("1")));
}

#[test]
fn test_schema_reports_storage_kinds() {
    let mut frame = people();
    frame
        .add_column("Score", vec![Value::Integer(1), Value::Float(2.5), Value::Null])
        .unwrap();

    let schema = frame.schema();
    assert_eq!(schema.len(), 4);
    assert_eq!(schema.get_field_by_name("Age").unwrap().data_type, DataType::Integer);

    let score = schema.get_field_by_name("Score").unwrap();
    assert_eq!(score.data_type, DataType::Float);
    assert!(score.nullable);
}

#[test]
fn test_value_equality_and_ordering() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    assert_eq!(Value::Float(-0.0), Value::Float(0.0));
    assert_ne!(Value::Integer(1), Value::Float(1.0));

    assert!(Value::Integer(1).try_cmp(&Value::Float(1.5)).unwrap().is_lt());
    assert!(Value::Null.try_cmp(&Value::Null).unwrap().is_eq());
    assert!(matches!(
        Value::Integer(1).try_cmp(&Value::from("1")),
        Err(FrameError::IncomparableValues {
            left: DataType::Integer,
            right: DataType::String
        })
    ));
    assert!(!Value::Null.is_comparable_with(&Value::Integer(0)));
}

#[test]
fn test_mixed_numeric_ordering_is_exact_for_large_integers() {
    let limit = 1i64 << 53;
    let below = Value::Integer(limit);
    let above = Value::Integer(limit + 1);
    let float = Value::Float(limit as f64);

    assert!(below.try_cmp(&float).unwrap().is_eq());
    assert!(above.try_cmp(&float).unwrap().is_gt());
    assert!(float.try_cmp(&above).unwrap().is_lt());
    assert!(below.try_cmp(&above).unwrap().is_lt());

    assert!(Value::Integer(i64::MAX).try_cmp(&Value::Float(i64::MAX as f64)).unwrap().is_lt());
    assert!(Value::Integer(i64::MIN).try_cmp(&Value::Float(i64::MIN as f64)).unwrap().is_eq());
    assert!(Value::Integer(0).try_cmp(&Value::Float(-0.0)).unwrap().is_eq());
    assert!(Value::Integer(3).try_cmp(&Value::Float(f64::NAN)).unwrap().is_lt());
}
