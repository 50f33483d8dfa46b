//! Collation bridge for record-like objects
//!
//! Optional adapter plugging [`Batch`] into tensor-collation pipelines: given
//! a list of uniformly-shaped records and a per-field aggregation function,
//! [`collate`] produces one batch whose fields are the aggregation of each
//! field across the inputs. The core container does not depend on this
//! module; it is a narrow bridge with a function-pointer-style contract.

use crate::batch::Batch;
use crate::error::{Error, Result};
use crate::value::Value;

/// A record-like object exposing named fields
///
/// Field names starting with an underscore are treated as private and skipped
/// by [`collate`].
pub trait Record {
    /// Names of the record's fields, in a stable order
    fn field_names(&self) -> Vec<String>;

    /// The value of a named field, or `None` if the record lacks it
    fn field(&self, name: &str) -> Option<Value>;
}

impl Record for Batch {
    fn field_names(&self) -> Vec<String> {
        self.keys().map(str::to_string).collect()
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).ok()
    }
}

/// Aggregate a list of uniformly-shaped records into one batch
///
/// The field set is taken from the first record, skipping underscore-prefixed
/// names. For each field, the values across all records are handed to
/// `aggregate`, and its result becomes the field's value in the output batch.
///
/// # Errors
///
/// An empty record list is an [`Error::Invariant`]; a record missing a field
/// the first record has is an [`Error::AttributeNotFound`] naming the record's
/// position.
///
/// # Example
///
/// ```
/// use batchr::prelude::*;
///
/// let records = vec![
///     Batch::from_pairs([("x", 1), ("y", 10)]),
///     Batch::from_pairs([("x", 2), ("y", 20)]),
/// ];
/// let batch = collate(&records, |values| Ok(Value::List(values)))?;
/// assert_eq!(batch.get("x")?, Value::from(vec![1, 2]));
/// # Ok::<(), batchr::error::Error>(())
/// ```
pub fn collate<R, F>(records: &[R], aggregate: F) -> Result<Batch>
where
    R: Record,
    F: Fn(Vec<Value>) -> Result<Value>,
{
    let Some(first) = records.first() else {
        return Err(Error::Invariant {
            msg: "cannot collate an empty record list".to_string(),
        });
    };

    let mut out = Batch::new();
    for name in first.field_names() {
        if name.starts_with('_') {
            continue;
        }
        let mut values = Vec::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            match record.field(&name) {
                Some(value) => values.push(value),
                None => {
                    return Err(Error::AttributeNotFound {
                        name: name.clone(),
                        key: position.to_string(),
                        type_name: "record",
                    })
                }
            }
        }
        out.insert(name, aggregate(values)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        x: i64,
        tag: &'static str,
    }

    impl Record for Sample {
        fn field_names(&self) -> Vec<String> {
            vec!["x".to_string(), "tag".to_string(), "_hidden".to_string()]
        }

        fn field(&self, name: &str) -> Option<Value> {
            match name {
                "x" => Some(Value::Int(self.x)),
                "tag" => Some(Value::from(self.tag)),
                "_hidden" => Some(Value::Int(-1)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_collate_skips_private_fields() {
        let records = vec![Sample { x: 1, tag: "a" }, Sample { x: 2, tag: "b" }];
        let batch = collate(&records, |values| Ok(Value::List(values))).unwrap();
        assert_eq!(batch.get("x").unwrap(), Value::from(vec![1i64, 2]));
        assert_eq!(
            batch.get("tag").unwrap(),
            Value::List(vec![Value::from("a"), Value::from("b")])
        );
        assert!(batch.get("_hidden").is_err());
    }

    #[test]
    fn test_collate_empty_input() {
        let records: Vec<Batch> = vec![];
        assert!(matches!(
            collate(&records, |values| Ok(Value::List(values))),
            Err(Error::Invariant { .. })
        ));
    }
}
