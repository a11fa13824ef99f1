// Transform tests
// Author: Gabriel Demetrios Lafis

use rust_frame_engine::{
    data::{DataType, Frame, Value},
    utils::{ConstantColumnPolicy, FrameError},
};

fn colors() -> Frame {
    Frame::from_columns(vec![
        ("Id", vec![Value::Integer(1), Value::Integer(2), Value::Integer(3), Value::Integer(4)]),
        (
            "Color",
            vec![Value::from("Red"), Value::from("Blue"), Value::Null, Value::from("Red")],
        ),
    ])
    .unwrap()
}

#[test]
fn test_normalize_numeric_columns() {
    let frame = Frame::from_columns(vec![
        ("a", vec![Value::Integer(10), Value::Integer(20), Value::Null, Value::Integer(30)]),
        ("b", vec![Value::Float(-1.0), Value::Float(1.0), Value::Float(0.0), Value::Float(0.5)]),
        ("c", vec![Value::from("x"), Value::from("y"), Value::from("z"), Value::from("w")]),
    ])
    .unwrap();

    let normalized = frame.normalize_numeric_columns().unwrap();

    assert_eq!(
        normalized.column("a").unwrap(),
        &[Value::Float(0.0), Value::Float(0.5), Value::Null, Value::Float(1.0)]
    );
    assert_eq!(
        normalized.column("b").unwrap(),
        &[Value::Float(0.0), Value::Float(1.0), Value::Float(0.5), Value::Float(0.75)]
    );
    assert_eq!(normalized.column("c").unwrap(), frame.column("c").unwrap());
    assert_eq!(normalized.header(), frame.header());

    // The source keeps its integers
    assert_eq!(frame.value(0, "a"), Some(&Value::Integer(10)));
}

#[test]
fn test_normalize_constant_column() {
    let frame = Frame::from_columns(vec![(
        "k",
        vec![Value::Integer(5), Value::Null, Value::Integer(5)],
    )])
    .unwrap();

    let zeroed = frame.normalize_numeric_columns().unwrap();
    assert_eq!(
        zeroed.column("k").unwrap(),
        &[Value::Float(0.0), Value::Null, Value::Float(0.0)]
    );

    assert!(matches!(
        frame.normalize_numeric_columns_with(ConstantColumnPolicy::Fail),
        Err(FrameError::ConstantColumn(name)) if name == "k"
    ));
}

#[test]
fn test_normalize_rejects_non_finite_values() {
    let frame = Frame::from_columns(vec![
        ("ok", vec![Value::Float(1.0), Value::Float(3.0), Value::Float(2.0)]),
        ("v", vec![Value::Float(1.0), Value::Float(2.0), Value::Float(f64::INFINITY)]),
    ])
    .unwrap();

    // An infinity is not a missing spread, under either policy
    for policy in [ConstantColumnPolicy::Zero, ConstantColumnPolicy::Fail] {
        assert!(matches!(
            frame.normalize_numeric_columns_with(policy),
            Err(FrameError::NonFiniteValue(name)) if name == "v"
        ));
    }

    let with_nan = Frame::from_columns(vec![(
        "n",
        vec![Value::Float(f64::NAN), Value::Float(0.0)],
    )])
    .unwrap();
    assert!(matches!(
        with_nan.normalize_numeric_columns(),
        Err(FrameError::NonFiniteValue(_))
    ));
}

#[test]
fn test_one_hot_encode() {
    let frame = colors();
    let encoded = frame.one_hot_encode("Color").unwrap();

    assert_eq!(encoded.header(), &["Id", "Color_Red", "Color_Blue"]);
    assert_eq!(
        encoded.column("Color_Red").unwrap(),
        &[Value::Integer(1), Value::Integer(0), Value::Integer(0), Value::Integer(1)]
    );
    assert_eq!(
        encoded.column("Color_Blue").unwrap(),
        &[Value::Integer(0), Value::Integer(1), Value::Integer(0), Value::Integer(0)]
    );

    // Every non-null row has exactly one indicator set
    for row in encoded.rows() {
        let ones: i64 = ["Color_Red", "Color_Blue"]
            .iter()
            .filter_map(|c| row.get(c))
            .filter_map(|v| v.as_f64())
            .map(|v| v as i64)
            .sum();
        let original_null = frame.value(row.index(), "Color").map_or(true, Value::is_null);
        assert_eq!(ones, if original_null { 0 } else { 1 });
    }

    assert!(frame.has_column("Color"));
}

#[test]
fn test_one_hot_encode_errors() {
    let frame = colors();

    assert!(matches!(
        frame.one_hot_encode("Id"),
        Err(FrameError::UnsupportedValueKind { kind: DataType::Integer, .. })
    ));
    assert!(matches!(
        frame.one_hot_encode("Shape"),
        Err(FrameError::ColumnNotFound(_))
    ));

    let mut clash = colors();
    clash.add_column("Color_Red", vec![Value::Null; 4]).unwrap();
    assert!(matches!(
        clash.one_hot_encode("Color"),
        Err(FrameError::DuplicateColumn(name)) if name == "Color_Red"
    ));
}

#[test]
fn test_prepare_features() {
    let frame = Frame::from_columns(vec![
        ("Age", vec![Value::Integer(20), Value::Integer(40)]),
        ("City", vec![Value::from("NYC"), Value::from("LA")]),
        ("Active", vec![Value::Boolean(true), Value::Boolean(false)]),
    ])
    .unwrap();

    let features = frame.prepare_features().unwrap();

    assert_eq!(features.header(), &["Age", "Active", "City_NYC", "City_LA"]);
    assert_eq!(features.column("Age").unwrap(), &[Value::Float(0.0), Value::Float(1.0)]);
    assert_eq!(features.value(1, "City_LA"), Some(&Value::Integer(1)));
    assert_eq!(features.value(0, "Active"), Some(&Value::Boolean(true)));
}
