//! Integration tests for batch construction: pairs, dicts, tensors, batch
//! lists, copies, and the mapping interface.

use batchr::prelude::*;
use indexmap::IndexMap;

#[test]
fn test_from_pairs() {
    let batch = Batch::from_pairs([("a", 1), ("b", 2)]);
    assert_eq!(batch.get("a").unwrap(), Value::Int(1));
    assert_eq!(batch.get("b").unwrap(), Value::Int(2));
}

#[test]
fn test_from_dict_round_trip() {
    let mut map = IndexMap::new();
    map.insert("a".to_string(), Value::Int(1));
    map.insert("b".to_string(), Value::Int(2));

    let batch = Batch::from_dict(map.clone());
    assert_eq!(batch.get("a").unwrap(), Value::Int(1));
    assert_eq!(batch.to_dict(), map);
}

#[test]
fn test_nested_construction() {
    let inner = Batch::from_pairs([("x", 1)]);
    let batch = Batch::from_pairs([("outer", Value::Batch(inner))]);
    assert_eq!(batch.get("outer.x").unwrap(), Value::Int(1));
}

#[test]
fn test_insertion_order_preserved() {
    let batch = Batch::from_pairs([("z", 1), ("a", 2), ("m", 3)]);
    let keys: Vec<&str> = batch.keys().collect();
    assert_eq!(keys, ["z", "a", "m"]);
}

#[test]
fn test_order_survives_removal() {
    let mut batch = Batch::from_pairs([("z", 1), ("a", 2), ("m", 3)]);
    batch.remove("a").unwrap();
    let keys: Vec<&str> = batch.keys().collect();
    assert_eq!(keys, ["z", "m"]);
}

#[test]
fn test_from_tensor_flat() {
    let data = Value::from(vec![1, 2, 3, 4, 5]);
    let sizes = SizeMap::new().width("a", 2).width("b", 3);
    let batch = Batch::from_tensor(&data, &sizes, 0, split_list).unwrap();

    assert_eq!(batch.get("a").unwrap(), Value::from(vec![1, 2]));
    assert_eq!(batch.get("b").unwrap(), Value::from(vec![3, 4, 5]));
}

#[test]
fn test_from_tensor_order_determines_slices() {
    let data = Value::from(vec![1, 2, 3, 4, 5]);
    let sizes = SizeMap::new().width("b", 3).width("a", 2);
    let batch = Batch::from_tensor(&data, &sizes, 0, split_list).unwrap();

    assert_eq!(batch.get("b").unwrap(), Value::from(vec![1, 2, 3]));
    assert_eq!(batch.get("a").unwrap(), Value::from(vec![4, 5]));
}

#[test]
fn test_from_tensor_nested_threads_remainder() {
    let data = Value::from(vec![1, 2, 3, 4, 5, 6]);
    let sizes = SizeMap::new()
        .width("head", 1)
        .nested("mid", SizeMap::new().width("a", 2).width("b", 1))
        .width("tail", 2);
    let batch = Batch::from_tensor(&data, &sizes, 0, split_list).unwrap();

    assert_eq!(batch.get("head").unwrap(), Value::from(vec![1]));
    assert_eq!(batch.get("mid.a").unwrap(), Value::from(vec![2, 3]));
    assert_eq!(batch.get("mid.b").unwrap(), Value::from(vec![4]));
    assert_eq!(batch.get("tail").unwrap(), Value::from(vec![5, 6]));
}

#[test]
fn test_from_tensor_custom_split_fn() {
    fn reversing_split(data: &Value, size: usize, dim: usize) -> Result<(Value, Value)> {
        let (head, tail) = split_list(data, size, dim)?;
        match head {
            Value::List(mut items) => {
                items.reverse();
                Ok((Value::List(items), tail))
            }
            other => Ok((other, tail)),
        }
    }

    let data = Value::from(vec![1, 2, 3]);
    let sizes = SizeMap::new().width("a", 3);
    let batch = Batch::from_tensor(&data, &sizes, 0, reversing_split).unwrap();
    assert_eq!(batch.get("a").unwrap(), Value::from(vec![3, 2, 1]));
}

#[test]
fn test_from_batch_list_gathers_per_key() {
    let merged = Batch::from_batch_list(&[
        Batch::from_pairs([("a", 1)]),
        Batch::from_pairs([("a", 2)]),
    ]);
    assert_eq!(merged.get("a").unwrap(), Value::from(vec![1, 2]));
}

#[test]
fn test_from_batch_list_skips_absent_keys() {
    let merged = Batch::from_batch_list(&[
        Batch::from_pairs([("a", 1), ("b", 10)]),
        Batch::from_pairs([("a", 2)]),
        Batch::from_pairs([("b", 20)]),
    ]);
    assert_eq!(merged.get("a").unwrap(), Value::from(vec![1, 2]));
    assert_eq!(merged.get("b").unwrap(), Value::from(vec![10, 20]));
}

#[test]
fn test_from_batch_list_merges_nested_batches() {
    let merged = Batch::from_batch_list(&[
        Batch::from_pairs([("sub", Batch::from_pairs([("x", 1)]))]),
        Batch::from_pairs([("sub", Batch::from_pairs([("x", 2)]))]),
    ]);
    assert_eq!(merged.get("sub.x").unwrap(), Value::from(vec![1, 2]));
}

#[test]
fn test_copy_is_independent() {
    let original = Batch::from_pairs([("sub", Batch::from_pairs([("x", 1)]))]);
    let mut copied = original.copy(true);
    copied.set("sub.x", Value::Int(99)).unwrap();

    assert_eq!(original.get("sub.x").unwrap(), Value::Int(1));
    assert_eq!(copied.get("sub.x").unwrap(), Value::Int(99));

    let shallow = original.copy(false);
    assert_eq!(shallow, original);
}

#[test]
fn test_default_factory_on_read() {
    let batch = Batch::with_default(|| Value::List(vec![]));
    assert_eq!(batch.get("missing").unwrap(), Value::List(vec![]));
    // `get` synthesizes without storing
    assert_eq!(batch.len(), 0);
}

#[test]
fn test_default_factory_materializes_on_get_mut() {
    let mut batch = Batch::with_default(|| Value::Int(0));
    *batch.get_mut("count").unwrap() = Value::Int(5);
    assert_eq!(batch.get("count").unwrap(), Value::Int(5));
    assert_eq!(batch.len(), 1);
}

#[test]
fn test_update_replaces_on_collision() {
    let mut batch = Batch::from_pairs([("a", 1), ("b", 2)]);
    batch.update(Batch::from_pairs([("b", 20), ("c", 30)]));

    assert_eq!(batch.get("a").unwrap(), Value::Int(1));
    assert_eq!(batch.get("b").unwrap(), Value::Int(20));
    assert_eq!(batch.get("c").unwrap(), Value::Int(30));
}

#[test]
fn test_pop() {
    let mut batch = Batch::from_pairs([("a", 1)]);
    assert_eq!(batch.pop("a").unwrap(), Value::Int(1));
    assert!(matches!(batch.pop("a"), Err(Error::KeyNotFound { .. })));
}

#[test]
fn test_keys_deep() {
    let batch = Batch::from_pairs([
        ("top", Value::Int(1)),
        (
            "sub",
            Value::Batch(Batch::from_pairs([
                ("leaf", Value::Int(2)),
                ("deeper", Value::Batch(Batch::from_pairs([("x", 3)]))),
            ])),
        ),
    ]);

    assert_eq!(batch.keys_deep(0), ["top", "sub"]);
    assert_eq!(batch.keys_deep(1), ["top", "sub.leaf", "sub.deeper"]);
    assert_eq!(batch.keys_deep(-1), ["top", "sub.leaf", "sub.deeper.x"]);
}

#[test]
fn test_display() {
    let batch = Batch::from_pairs([("a", Value::Int(1)), ("b", Value::from("x"))]);
    assert_eq!(batch.to_string(), "Batch({a: 1, b: \"x\"})");
}
