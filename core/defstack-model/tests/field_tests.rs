use chrono::{DateTime, TimeDelta, Utc};
use defstack_model::{
    DefError, DefRef, DefResult, Field, Resources, ScalarKind, Shape, parse_time_span,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

/// Resources for scalar-only documents: any reference is an error.
struct NoResources;

impl Resources for NoResources {
    fn load(&mut self, path: &str) -> DefResult<DefRef> {
        Err(DefError::ResourceNotFound(path.to_owned()))
    }

    fn instantiate(&mut self, _source: &Value) -> DefResult<DefRef> {
        Err(DefError::UnknownType("none".to_owned()))
    }
}

fn get<T: Field>(source: &Value, field: &str) -> DefResult<T> {
    let resources: &mut dyn Resources = &mut NoResources;
    resources.get(source, field)
}

// ── Missing fields ───────────────────────────────────────────────

#[test]
fn missing_field_yields_zero_values() {
    let doc = json!({});
    assert_eq!(get::<i32>(&doc, "n").unwrap(), 0);
    assert_eq!(get::<f64>(&doc, "n").unwrap(), 0.0);
    assert_eq!(get::<String>(&doc, "n").unwrap(), "");
    assert!(!get::<bool>(&doc, "n").unwrap());
    assert_eq!(get::<Uuid>(&doc, "n").unwrap(), Uuid::nil());
    assert_eq!(get::<TimeDelta>(&doc, "n").unwrap(), TimeDelta::zero());
    assert!(get::<Vec<i32>>(&doc, "n").unwrap().is_empty());
}

#[test]
fn get_on_non_object_is_type_mismatch() {
    let err = get::<i32>(&json!([1, 2]), "n").unwrap_err();
    assert!(matches!(err.root_cause(), DefError::TypeMismatch { expected, found }
        if expected == "object" && found == "array"));
}

// ── Scalars ──────────────────────────────────────────────────────

#[test]
fn integers_decode_in_range() {
    let doc = json!({"a": -5, "b": 255, "c": 9_000_000_000_i64, "d": 18_446_744_073_709_551_615_u64});
    assert_eq!(get::<i32>(&doc, "a").unwrap(), -5);
    assert_eq!(get::<u8>(&doc, "b").unwrap(), 255);
    assert_eq!(get::<i64>(&doc, "c").unwrap(), 9_000_000_000);
    assert_eq!(get::<u64>(&doc, "d").unwrap(), u64::MAX);
}

#[test]
fn integer_out_of_range_fails() {
    let doc = json!({"b": 256, "neg": -1});
    let err = get::<u8>(&doc, "b").unwrap_err();
    assert!(matches!(err.root_cause(), DefError::ScalarConversion { expected: ScalarKind::U8, .. }));
    assert!(get::<u32>(&doc, "neg").is_err());
}

#[test]
fn fractional_number_is_not_an_integer() {
    let err = get::<i32>(&json!({"n": 1.5}), "n").unwrap_err();
    match err.root_cause() {
        DefError::ScalarConversion { expected, found } => {
            assert_eq!(*expected, ScalarKind::I32);
            assert_eq!(found, "number 1.5");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn integral_floats_decode_as_integers() {
    let doc = json!({"n": 5.0, "k": 1e3, "neg": -2.0, "big": 300.0});
    assert_eq!(get::<i32>(&doc, "n").unwrap(), 5);
    assert_eq!(get::<i64>(&doc, "k").unwrap(), 1000);
    assert_eq!(get::<i8>(&doc, "neg").unwrap(), -2);
    assert!(get::<u8>(&doc, "big").is_err());
    assert!(get::<u32>(&doc, "neg").is_err());
}

#[test]
fn floats_accept_integers() {
    let doc = json!({"f": 3, "g": 2.5});
    assert_eq!(get::<f64>(&doc, "f").unwrap(), 3.0);
    assert_eq!(get::<f32>(&doc, "g").unwrap(), 2.5);
}

#[test]
fn f32_rejects_overflow() {
    let err = get::<f32>(&json!({"g": 1e300}), "g").unwrap_err();
    assert!(matches!(err.root_cause(), DefError::ScalarConversion { expected: ScalarKind::F32, .. }));
    assert_eq!(get::<f64>(&json!({"g": 1e300}), "g").unwrap(), 1e300);
}

#[test]
fn string_for_number_fails() {
    let err = get::<f64>(&json!({"f": "3"}), "f").unwrap_err();
    assert!(matches!(err.root_cause(), DefError::ScalarConversion { expected: ScalarKind::F64, .. }));
}

#[test]
fn bool_and_string_decode() {
    let doc = json!({"b": true, "s": "hello"});
    assert!(get::<bool>(&doc, "b").unwrap());
    assert_eq!(get::<String>(&doc, "s").unwrap(), "hello");
    assert!(get::<bool>(&doc, "s").is_err());
    assert!(get::<String>(&doc, "b").is_err());
}

#[test]
fn null_scalar_fails() {
    let err = get::<String>(&json!({"s": null}), "s").unwrap_err();
    assert!(matches!(err.root_cause(), DefError::ScalarConversion { .. }));
}

#[test]
fn char_requires_single_character() {
    let doc = json!({"one": "x", "two": "xy", "empty": ""});
    assert_eq!(get::<char>(&doc, "one").unwrap(), 'x');
    assert!(get::<char>(&doc, "two").is_err());
    assert!(get::<char>(&doc, "empty").is_err());
}

#[test]
fn datetime_parses_rfc3339() {
    let doc = json!({"at": "2024-03-01T12:30:00+02:00"});
    let at: DateTime<Utc> = get(&doc, "at").unwrap();
    assert_eq!(at.to_rfc3339(), "2024-03-01T10:30:00+00:00");
    assert!(get::<DateTime<Utc>>(&json!({"at": "yesterday"}), "at").is_err());
}

#[test]
fn datetime_without_offset_is_utc() {
    let doc = json!({"at": "2024-03-01T12:30:00", "frac": "2024-03-01T12:30:00.250", "day": "2024-03-01"});
    let at: DateTime<Utc> = get(&doc, "at").unwrap();
    assert_eq!(at.to_rfc3339(), "2024-03-01T12:30:00+00:00");
    let frac: DateTime<Utc> = get(&doc, "frac").unwrap();
    assert_eq!(frac.timestamp_subsec_millis(), 250);
    let day: DateTime<Utc> = get(&doc, "day").unwrap();
    assert_eq!(day.to_rfc3339(), "2024-03-01T00:00:00+00:00");
}

#[test]
fn guid_parses() {
    let id = Uuid::new_v4();
    let doc = json!({"id": id.to_string()});
    assert_eq!(get::<Uuid>(&doc, "id").unwrap(), id);
    assert!(get::<Uuid>(&json!({"id": "not-a-guid"}), "id").is_err());
}

#[test]
fn time_span_forms() {
    assert_eq!(parse_time_span("01:02:03"), Some(TimeDelta::seconds(3723)));
    assert_eq!(parse_time_span("1.00:00:01"), Some(TimeDelta::seconds(86_401)));
    assert_eq!(parse_time_span("00:00:00.25"), Some(TimeDelta::milliseconds(250)));
    assert_eq!(parse_time_span("-00:01"), Some(TimeDelta::seconds(-60)));
    assert_eq!(parse_time_span("3"), Some(TimeDelta::days(3)));
    assert_eq!(parse_time_span("24:00:00"), None);
    assert_eq!(parse_time_span("00:60"), None);
    assert_eq!(parse_time_span("soon"), None);
}

#[test]
fn errors_name_the_field() {
    let err = get::<i32>(&json!({"count": "many"}), "count").unwrap_err();
    assert_eq!(err.to_string(), "field 'count': cannot convert string \"many\" to i32");
}

// ── Shapes ───────────────────────────────────────────────────────

#[test]
fn shapes_follow_static_types() {
    assert_eq!(i32::shape(), Shape::Scalar(ScalarKind::I32));
    assert_eq!(<Vec<String>>::shape().rank(), 1);
    assert_eq!(<defstack_model::Array2<u8>>::shape().rank(), 2);
    assert_eq!(<defstack_model::Array3<u8>>::shape().rank(), 3);
    assert_eq!(
        <Vec<defstack_model::Array2<i32>>>::shape().to_string(),
        "[[i32; 2d]]"
    );
    assert_eq!(
        <Vec<Vec<bool>>>::shape().element(),
        Some(&Shape::Array1(Box::new(Shape::Scalar(ScalarKind::Bool))))
    );
}

// ── Arrays ───────────────────────────────────────────────────────

#[test]
fn array1_decodes_each_element() {
    let doc = json!({"xs": [1, 2, 3]});
    assert_eq!(get::<Vec<i32>>(&doc, "xs").unwrap(), vec![1, 2, 3]);
}

#[test]
fn nested_vectors_may_be_jagged() {
    let doc = json!({"xs": [[1], [2, 3], []]});
    assert_eq!(get::<Vec<Vec<i32>>>(&doc, "xs").unwrap(), vec![vec![1], vec![2, 3], vec![]]);
}

#[test]
fn array1_requires_array_token() {
    let err = get::<Vec<i32>>(&json!({"xs": 5}), "xs").unwrap_err();
    assert!(matches!(err.root_cause(), DefError::ShapeMismatch { found, .. } if found == "number"));
}

#[test]
fn array1_element_error_reports_index() {
    let err = get::<Vec<i32>>(&json!({"xs": [1, "two"]}), "xs").unwrap_err();
    assert_eq!(
        err.to_string(),
        "field 'xs': element [1]: cannot convert string \"two\" to i32"
    );
}
