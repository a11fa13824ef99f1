// Serialization and import tests
// Author: Gabriel Demetrios Lafis

use std::io::Write;

use chrono::NaiveDate;
use rust_frame_engine::{
    data::{CsvSource, DataType, DelimitedSink, Frame, FrameSink, FrameSource, RecordSink, Value},
    utils::{Config, FrameError},
};
use tempfile::NamedTempFile;

fn sample() -> Frame {
    Frame::from_columns(vec![
        ("Name", vec![Value::from("Alice"), Value::from("Bob")]),
        ("Age", vec![Value::Integer(25), Value::Null]),
        ("Score", vec![Value::Float(30.0), Value::Float(2.5)]),
        ("Active", vec![Value::Boolean(true), Value::Boolean(false)]),
    ])
    .unwrap()
}

#[test]
fn test_delimited_text() {
    let text = sample().to_delimited_text().unwrap();

    assert_eq!(
        text,
        "Name,Age,Score,Active\n\"Alice\",25,30.0,true\n\"Bob\",,2.5,false\n"
    );
}

#[test]
fn test_delimited_text_follows_header_order() {
    let mut frame = sample();
    frame.reorder_columns(&["Active", "Name", "Age", "Score"]).unwrap();

    let text = frame.to_delimited_text().unwrap();
    assert!(text.starts_with("Active,Name,Age,Score\ntrue,\"Alice\",25,30.0\n"));
}

#[test]
fn test_delimited_sink_from_config() {
    let config = Config::from_json_str(r#"{"export": {"delimiter": ";", "quote": "'"}}"#).unwrap();
    let sink = DelimitedSink::from_config(&config.export);

    let frame = Frame::from_columns(vec![
        ("a", vec![Value::from("x")]),
        ("b", vec![Value::Integer(1)]),
    ])
    .unwrap();

    assert_eq!(sink.render(&frame).unwrap(), "a;b\n'x';1\n");

    let mut out: Vec<u8> = Vec::new();
    sink.write(&frame, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "a;b\n'x';1\n");
}

#[test]
fn test_delimited_single_column_keeps_null_blank() {
    let frame = Frame::from_columns(vec![(
        "v",
        vec![Value::Integer(1), Value::Null, Value::from("")],
    )])
    .unwrap();

    assert_eq!(frame.to_delimited_text().unwrap(), "v\n1\n\n\"\"\n");
}

#[test]
fn test_delimited_text_does_not_escape() {
    let frame = Frame::from_columns(vec![
        ("a", vec![Value::from("x,y")]),
        ("b", vec![Value::Null]),
        ("c", vec![Value::Float(0.5)]),
    ])
    .unwrap();

    assert_eq!(frame.to_delimited_text().unwrap(), "a,b,c\n\"x,y\",,0.5\n");
}

#[test]
fn test_record_sink_writes_to_writer() {
    let mut out: Vec<u8> = Vec::new();
    RecordSink::new(false).write(&sample(), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, sample().to_record_text().unwrap());
    // Keys keep header order
    assert!(text.starts_with(r#"[{"Name":"Alice","Age":25,"Score":30.0,"Active":true}"#));
}

#[test]
fn test_record_text() {
    let text = sample().to_record_text().unwrap();

    assert_eq!(
        text,
        concat!(
            r#"[{"Name":"Alice","Age":25,"Score":30.0,"Active":true},"#,
            r#"{"Name":"Bob","Age":null,"Score":2.5,"Active":false}]"#
        )
    );

    // The output is valid JSON
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed[1]["Score"], serde_json::json!(2.5));
}

#[test]
fn test_record_text_escapes_and_edge_cases() {
    let frame = Frame::from_columns(vec![
        ("quote\"d", vec![Value::from("say \"hi\"")]),
        ("nan", vec![Value::Float(f64::NAN)]),
        (
            "when",
            vec![Value::DateTime(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(12, 30, 0).unwrap(),
            )],
        ),
    ])
    .unwrap();

    let text = frame.to_record_text().unwrap();
    assert_eq!(
        text,
        r#"[{"quote\"d":"say \"hi\"","nan":null,"when":"2024-03-01T12:30:00"}]"#
    );

    let empty = Frame::with_header(&["a"]).unwrap();
    assert_eq!(empty.to_record_text().unwrap(), "[]");
}

#[test]
fn test_pretty_records_parse() {
    let text = RecordSink::new(true).render(&sample()).unwrap();
    assert!(text.starts_with("[\n  {"));

    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(2));
}

#[test]
fn test_csv_source_infers_types() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "Name,Age,Score,Joined,Note\nAlice,25,1.5,2024-01-02,x\nBob,,2,,\n"
    )
    .unwrap();

    let frame = CsvSource::new(file.path(), true, ',')
        .infer_types(true)
        .read()
        .unwrap();

    assert_eq!(frame.header(), &["Name", "Age", "Score", "Joined", "Note"]);
    assert_eq!(frame.row_count(), 2);
    assert_eq!(frame.column("Age").unwrap(), &[Value::Integer(25), Value::Null]);
    assert_eq!(frame.column("Score").unwrap(), &[Value::Float(1.5), Value::Float(2.0)]);
    assert_eq!(frame.value(1, "Note"), Some(&Value::Null));

    let kinds: Vec<DataType> = frame.schema().fields.iter().map(|f| f.data_type).collect();
    assert_eq!(
        kinds,
        vec![
            DataType::String,
            DataType::Integer,
            DataType::Float,
            DataType::DateTime,
            DataType::String,
        ]
    );
}

#[test]
fn test_csv_source_without_header() {
    let source = CsvSource::new("unused.csv", false, ';');
    let frame = source.read_from("1;a\n2;b\n".as_bytes()).unwrap();

    assert_eq!(frame.header(), &["column_0", "column_1"]);
    assert_eq!(frame.value(1, "column_0"), Some(&Value::from("2")));

    assert!(matches!(
        source.read_from("".as_bytes()),
        Err(FrameError::Parse(_))
    ));
}

#[test]
fn test_csv_source_missing_file() {
    let source = CsvSource::new("/definitely/not/here.csv", true, ',');
    assert!(matches!(source.read(), Err(FrameError::Io(_))));
}
