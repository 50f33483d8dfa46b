//! Fixed operator tables and per-leaf application
//!
//! Operator behavior is bound statically here: one enum per arity, one match
//! table per operator. The broadcast layer recurses into nested batches and
//! only ever hands leaves to these functions.

use super::Value;
use crate::error::{Error, Result};

/// Binary operation kind
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition: a + b (numeric), concatenation (strings, lists)
    Add,
    /// Subtraction: a - b
    Sub,
    /// Multiplication: a * b
    Mul,
    /// True division: a / b (always floating-point)
    Div,
    /// Floor division: a // b
    FloorDiv,
    /// Remainder with the divisor's sign convention of floor division
    Rem,
    /// Power: a^b
    Pow,
    /// Bitwise and (integers), logical and (booleans)
    BitAnd,
    /// Bitwise or (integers), logical or (booleans)
    BitOr,
    /// Bitwise xor (integers), logical xor (booleans)
    BitXor,
    /// Left shift
    Shl,
    /// Right shift
    Shr,
    /// Equality, producing a boolean per member
    Eq,
    /// Concatenation (strings, lists)
    Concat,
}

impl BinaryOp {
    /// Canonical operation name, used for named invocation and in errors
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::FloorDiv => "floordiv",
            BinaryOp::Rem => "rem",
            BinaryOp::Pow => "pow",
            BinaryOp::BitAnd => "bitand",
            BinaryOp::BitOr => "bitor",
            BinaryOp::BitXor => "bitxor",
            BinaryOp::Shl => "shl",
            BinaryOp::Shr => "shr",
            BinaryOp::Eq => "eq",
            BinaryOp::Concat => "concat",
        }
    }

    /// Look up an operation by its canonical name
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "add" => BinaryOp::Add,
            "sub" => BinaryOp::Sub,
            "mul" => BinaryOp::Mul,
            "div" => BinaryOp::Div,
            "floordiv" => BinaryOp::FloorDiv,
            "rem" => BinaryOp::Rem,
            "pow" => BinaryOp::Pow,
            "bitand" => BinaryOp::BitAnd,
            "bitor" => BinaryOp::BitOr,
            "bitxor" => BinaryOp::BitXor,
            "shl" => BinaryOp::Shl,
            "shr" => BinaryOp::Shr,
            "eq" => BinaryOp::Eq,
            "concat" => BinaryOp::Concat,
            _ => return None,
        })
    }
}

/// Unary operation kind
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation: -a
    Neg,
    /// Identity: +a
    Pos,
    /// Absolute value: |a|
    Abs,
    /// Logical not of the value's truthiness
    Not,
    /// Bitwise inversion: !a
    Invert,
}

impl UnaryOp {
    /// Canonical operation name, used for named invocation and in errors
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Pos => "pos",
            UnaryOp::Abs => "abs",
            UnaryOp::Not => "not",
            UnaryOp::Invert => "invert",
        }
    }

    /// Look up an operation by its canonical name
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "neg" => UnaryOp::Neg,
            "pos" => UnaryOp::Pos,
            "abs" => UnaryOp::Abs,
            "not" => UnaryOp::Not,
            "invert" => UnaryOp::Invert,
            _ => return None,
        })
    }
}

fn unsupported(name: &'static str, value: &Value) -> Error {
    // The member key is filled in by the broadcast layer.
    Error::AttributeNotFound {
        name: name.to_string(),
        key: String::new(),
        type_name: value.type_name(),
    }
}

/// Apply a binary operation to a pair of leaf values
///
/// Integer pairs stay integral (except `Div`, which always produces a float);
/// mixed integer/float pairs promote to float. `Add` doubles as concatenation
/// for strings and lists. Unsupported combinations produce
/// [`Error::AttributeNotFound`] naming the operation and the left-hand type.
/// Integer division by zero, out-of-range results, and invalid shift amounts
/// are [`Error::Invariant`], never a panic.
pub fn apply_binary(op: BinaryOp, a: &Value, b: &Value) -> Result<Value> {
    use Value::*;
    if op == BinaryOp::Eq {
        return Ok(Bool(loosely_eq(a, b)));
    }
    match (a, b) {
        (Int(x), Int(y)) => match binary_int(op, *x, *y) {
            Some(result) => result,
            None => Err(unsupported(op.name(), a)),
        },
        (Int(x), Float(y)) => {
            binary_float(op, *x as f64, *y).ok_or_else(|| unsupported(op.name(), a))
        }
        (Float(x), Int(y)) => {
            binary_float(op, *x, *y as f64).ok_or_else(|| unsupported(op.name(), a))
        }
        (Float(x), Float(y)) => binary_float(op, *x, *y).ok_or_else(|| unsupported(op.name(), a)),
        (Bool(x), Bool(y)) => match op {
            BinaryOp::BitAnd => Ok(Bool(x & y)),
            BinaryOp::BitOr => Ok(Bool(x | y)),
            BinaryOp::BitXor => Ok(Bool(x ^ y)),
            _ => Err(unsupported(op.name(), a)),
        },
        (Str(x), Str(y)) => match op {
            BinaryOp::Add | BinaryOp::Concat => Ok(Str(format!("{x}{y}"))),
            _ => Err(unsupported(op.name(), a)),
        },
        (List(x), List(y)) => match op {
            BinaryOp::Add | BinaryOp::Concat => {
                let mut out = x.clone();
                out.extend(y.iter().cloned());
                Ok(List(out))
            }
            _ => Err(unsupported(op.name(), a)),
        },
        _ => Err(unsupported(op.name(), a)),
    }
}

// `None` means the operation does not apply to integers; arithmetic that
// cannot produce an in-range result surfaces as `Err`, never a panic.
fn binary_int(op: BinaryOp, x: i64, y: i64) -> Option<Result<Value>> {
    let checked = |value: Option<i64>| match value {
        Some(v) => Ok(Value::Int(v)),
        None => Err(Error::Invariant {
            msg: if y == 0 && matches!(op, BinaryOp::FloorDiv | BinaryOp::Rem) {
                format!("division by zero in '{}'", op.name())
            } else {
                format!("integer overflow in '{}' of {x} and {y}", op.name())
            },
        }),
    };
    Some(match op {
        BinaryOp::Add => checked(x.checked_add(y)),
        BinaryOp::Sub => checked(x.checked_sub(y)),
        BinaryOp::Mul => checked(x.checked_mul(y)),
        BinaryOp::Div => Ok(Value::Float(x as f64 / y as f64)),
        BinaryOp::FloorDiv => checked(x.checked_div_euclid(y)),
        BinaryOp::Rem => checked(x.checked_rem_euclid(y)),
        BinaryOp::Pow => {
            if y >= 0 {
                checked(u32::try_from(y).ok().and_then(|e| x.checked_pow(e)))
            } else {
                Ok(Value::Float((x as f64).powf(y as f64)))
            }
        }
        BinaryOp::BitAnd => Ok(Value::Int(x & y)),
        BinaryOp::BitOr => Ok(Value::Int(x | y)),
        BinaryOp::BitXor => Ok(Value::Int(x ^ y)),
        BinaryOp::Shl | BinaryOp::Shr => {
            let shifted = u32::try_from(y).ok().and_then(|s| {
                if op == BinaryOp::Shl {
                    x.checked_shl(s)
                } else {
                    x.checked_shr(s)
                }
            });
            match shifted {
                Some(v) => Ok(Value::Int(v)),
                None => Err(Error::Invariant {
                    msg: format!("invalid shift amount {y} in '{}'", op.name()),
                }),
            }
        }
        _ => return None,
    })
}

fn binary_float(op: BinaryOp, x: f64, y: f64) -> Option<Value> {
    Some(match op {
        BinaryOp::Add => Value::Float(x + y),
        BinaryOp::Sub => Value::Float(x - y),
        BinaryOp::Mul => Value::Float(x * y),
        BinaryOp::Div => Value::Float(x / y),
        BinaryOp::FloorDiv => Value::Float((x / y).floor()),
        BinaryOp::Rem => Value::Float(x - y * (x / y).floor()),
        BinaryOp::Pow => Value::Float(x.powf(y)),
        _ => return None,
    })
}

/// Equality with numeric cross-type comparison (`Int(2) == Float(2.0)`)
pub(crate) fn loosely_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => *x as f64 == *y,
        _ => a == b,
    }
}

/// Apply a unary operation to a leaf value
pub fn apply_unary(op: UnaryOp, a: &Value) -> Result<Value> {
    use Value::*;
    match op {
        UnaryOp::Neg => match a {
            Int(x) => Ok(Int(-x)),
            Float(x) => Ok(Float(-x)),
            _ => Err(unsupported(op.name(), a)),
        },
        UnaryOp::Pos => match a {
            Int(_) | Float(_) => Ok(a.clone()),
            _ => Err(unsupported(op.name(), a)),
        },
        UnaryOp::Abs => match a {
            Int(x) => Ok(Int(x.abs())),
            Float(x) => Ok(Float(x.abs())),
            _ => Err(unsupported(op.name(), a)),
        },
        UnaryOp::Not => Ok(Bool(!a.truthy())),
        UnaryOp::Invert => match a {
            Int(x) => Ok(Int(!x)),
            Bool(x) => Ok(Bool(!x)),
            _ => Err(unsupported(op.name(), a)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_arithmetic() {
        let (a, b) = (Value::Int(7), Value::Int(2));
        assert_eq!(apply_binary(BinaryOp::Add, &a, &b).unwrap(), Value::Int(9));
        assert_eq!(apply_binary(BinaryOp::Sub, &a, &b).unwrap(), Value::Int(5));
        assert_eq!(apply_binary(BinaryOp::Mul, &a, &b).unwrap(), Value::Int(14));
        assert_eq!(
            apply_binary(BinaryOp::Div, &a, &b).unwrap(),
            Value::Float(3.5)
        );
        assert_eq!(
            apply_binary(BinaryOp::FloorDiv, &a, &b).unwrap(),
            Value::Int(3)
        );
        assert_eq!(apply_binary(BinaryOp::Rem, &a, &b).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_floor_division_negatives() {
        let (a, b) = (Value::Int(-7), Value::Int(3));
        assert_eq!(
            apply_binary(BinaryOp::FloorDiv, &a, &b).unwrap(),
            Value::Int(-3)
        );
        assert_eq!(apply_binary(BinaryOp::Rem, &a, &b).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_mixed_promotes_to_float() {
        let out = apply_binary(BinaryOp::Add, &Value::Int(1), &Value::Float(0.5)).unwrap();
        assert_eq!(out, Value::Float(1.5));
    }

    #[test]
    fn test_concat() {
        let out = apply_binary(BinaryOp::Add, &Value::from("ab"), &Value::from("cd")).unwrap();
        assert_eq!(out, Value::from("abcd"));
        let out = apply_binary(
            BinaryOp::Concat,
            &Value::from(vec![1, 2]),
            &Value::from(vec![3]),
        )
        .unwrap();
        assert_eq!(out, Value::from(vec![1, 2, 3]));
    }

    #[test]
    fn test_eq_cross_type() {
        assert_eq!(
            apply_binary(BinaryOp::Eq, &Value::Int(2), &Value::Float(2.0)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            apply_binary(BinaryOp::Eq, &Value::Int(2), &Value::from("2")).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_unsupported_combination() {
        let err = apply_binary(BinaryOp::Sub, &Value::from("a"), &Value::from("b")).unwrap_err();
        assert!(matches!(err, Error::AttributeNotFound { type_name: "str", .. }));
    }

    #[test]
    fn test_unary() {
        assert_eq!(apply_unary(UnaryOp::Neg, &Value::Int(3)).unwrap(), Value::Int(-3));
        assert_eq!(
            apply_unary(UnaryOp::Abs, &Value::Float(-1.5)).unwrap(),
            Value::Float(1.5)
        );
        assert_eq!(
            apply_unary(UnaryOp::Not, &Value::Int(0)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            apply_unary(UnaryOp::Invert, &Value::Int(0)).unwrap(),
            Value::Int(-1)
        );
        assert!(apply_unary(UnaryOp::Neg, &Value::from("x")).is_err());
    }

    #[test]
    fn test_division_by_zero_errors() {
        for op in [BinaryOp::FloorDiv, BinaryOp::Rem] {
            assert!(matches!(
                apply_binary(op, &Value::Int(1), &Value::Int(0)),
                Err(Error::Invariant { .. })
            ));
        }
    }

    #[test]
    fn test_integer_overflow_errors() {
        assert!(matches!(
            apply_binary(BinaryOp::Add, &Value::Int(i64::MAX), &Value::Int(1)),
            Err(Error::Invariant { .. })
        ));
        assert!(matches!(
            apply_binary(BinaryOp::Mul, &Value::Int(i64::MAX), &Value::Int(2)),
            Err(Error::Invariant { .. })
        ));
        assert!(matches!(
            apply_binary(BinaryOp::Pow, &Value::Int(10), &Value::Int(100)),
            Err(Error::Invariant { .. })
        ));
        assert!(matches!(
            apply_binary(BinaryOp::FloorDiv, &Value::Int(i64::MIN), &Value::Int(-1)),
            Err(Error::Invariant { .. })
        ));
    }

    #[test]
    fn test_invalid_shift_amounts_error() {
        assert!(matches!(
            apply_binary(BinaryOp::Shl, &Value::Int(1), &Value::Int(64)),
            Err(Error::Invariant { .. })
        ));
        assert!(matches!(
            apply_binary(BinaryOp::Shr, &Value::Int(1), &Value::Int(-1)),
            Err(Error::Invariant { .. })
        ));
    }

    #[test]
    fn test_name_round_trip() {
        for op in [
            BinaryOp::Add,
            BinaryOp::FloorDiv,
            BinaryOp::Shl,
            BinaryOp::Eq,
        ] {
            assert_eq!(BinaryOp::from_name(op.name()), Some(op));
        }
        assert_eq!(UnaryOp::from_name("abs"), Some(UnaryOp::Abs));
        assert_eq!(UnaryOp::from_name("bogus"), None);
    }
}
