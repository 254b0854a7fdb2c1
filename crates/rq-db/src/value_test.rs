use super::*;

#[test]
fn test_invariant_text_numbers_use_dot() {
    assert_eq!(SqlValue::Float(3.25).invariant_text(), "3.25");
    assert_eq!(SqlValue::Float(-0.5).invariant_text(), "-0.5");
    assert_eq!(SqlValue::Int(-42).invariant_text(), "-42");
}

#[test]
fn test_invariant_text_null_is_empty() {
    assert_eq!(SqlValue::Null.invariant_text(), "");
}

#[test]
fn test_invariant_text_dates_are_iso() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    assert_eq!(SqlValue::Date(date).invariant_text(), "2024-03-09");

    let ts = date.and_hms_opt(7, 5, 0).unwrap();
    assert_eq!(SqlValue::Timestamp(ts).invariant_text(), "2024-03-09 07:05:00");
}

#[test]
fn test_invariant_text_blob_is_hex() {
    assert_eq!(
        SqlValue::Blob(vec![0x0a, 0xff]).invariant_text(),
        "\\x0aff"
    );
}

#[test]
fn test_option_conversion() {
    assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
    assert_eq!(SqlValue::from(Some("x")), SqlValue::Text("x".to_string()));
}

#[test]
fn test_json_conversion() {
    assert_eq!(SqlValue::Int(7).to_json(), serde_json::json!(7));
    assert_eq!(SqlValue::Float(f64::NAN).to_json(), serde_json::Value::Null);
    assert_eq!(
        SqlValue::from_json(&serde_json::json!(1.5)),
        SqlValue::Float(1.5)
    );
    assert_eq!(
        SqlValue::from_json(&serde_json::json!({"a": 1})),
        SqlValue::Text("{\"a\":1}".to_string())
    );
}

#[test]
fn test_param_new() {
    let p = Param::new("@id", 5);
    assert_eq!(p.name, "@id");
    assert_eq!(p.value, SqlValue::Int(5));
}
