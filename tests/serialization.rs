//! Integration tests for serde support: JSON round trips for batches and
//! values, order preservation, and factory handling.

use batchr::prelude::*;

fn nested() -> Batch {
    Batch::from_pairs([
        ("count", Value::Int(3)),
        ("ratio", Value::Float(0.5)),
        ("name", Value::from("run")),
        ("flag", Value::Bool(true)),
        ("nothing", Value::Null),
        ("seq", Value::from(vec![1, 2, 3])),
        (
            "sub",
            Value::Batch(Batch::from_pairs([("x", Value::from(vec![4, 5]))])),
        ),
    ])
}

#[test]
fn test_json_round_trip() {
    let original = nested();
    let json = serde_json::to_string(&original).unwrap();
    let restored: Batch = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn test_json_preserves_key_order() {
    let json = serde_json::to_string(&nested()).unwrap();
    let restored: Batch = serde_json::from_str(&json).unwrap();
    let keys: Vec<&str> = restored.keys().collect();
    assert_eq!(
        keys,
        ["count", "ratio", "name", "flag", "nothing", "seq", "sub"]
    );
}

#[test]
fn test_json_shape() {
    let batch = Batch::from_pairs([("a", Value::Int(1)), ("s", Value::Batch(Batch::new()))]);
    let json = serde_json::to_string(&batch).unwrap();
    assert_eq!(json, r#"{"a":1,"s":{}}"#);
}

#[test]
fn test_deserialize_nested_maps_become_batches() {
    let batch: Batch = serde_json::from_str(r#"{"a": {"b": {"c": 1}}}"#).unwrap();
    assert_eq!(batch.get("a.b.c").unwrap(), Value::Int(1));
}

#[test]
fn test_value_variants_round_trip() {
    let values = [
        Value::Null,
        Value::Bool(false),
        Value::Int(-7),
        Value::Float(1.25),
        Value::from("text"),
        Value::List(vec![Value::Int(1), Value::from("two"), Value::Null]),
    ];
    for value in values {
        let json = serde_json::to_string(&value).unwrap();
        let restored: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, value, "round trip of {json}");
    }
}

#[test]
fn test_factory_is_not_serialized() {
    let batch = Batch::with_default(|| Value::Int(0));
    let json = serde_json::to_string(&batch).unwrap();
    let restored: Batch = serde_json::from_str(&json).unwrap();
    // The restored batch carries no factory: missing keys fail again.
    assert!(restored.get("anything").is_err());
}
