//! Member-wise broadcasting
//!
//! Broadcasting is explicit dispatch: a fixed operator table
//! ([`BinaryOp`]/[`UnaryOp`]) applied uniformly per member, an explicit
//! [`Batch::attr`]/[`Batch::invoke`] pair for named access, and
//! [`Batch::call`] for broadcasting caller-supplied functions. Operator
//! behavior is bound at the type level once; nothing is attached dynamically.
//!
//! A broadcast that fails partway through an in-place operation leaves the
//! batch partially updated; there is no rollback.

use super::Batch;
use crate::error::{Error, Result};
use crate::value::{apply_binary, apply_unary, BinaryOp, UnaryOp, Value};

/// Right-hand operand of a broadcast binary operation
///
/// A batch operand is indexed per member key, so each member receives its own
/// corresponding argument; any other value is passed to every member
/// unchanged.
#[derive(Clone, Copy)]
pub enum Operand<'a> {
    /// A plain value, handed to every member as-is (a `Value::Batch` is
    /// still sliced per key)
    Value(&'a Value),
    /// A batch, sliced per member key
    Batch(&'a Batch),
}

impl<'a> From<&'a Value> for Operand<'a> {
    fn from(value: &'a Value) -> Self {
        Operand::Value(value)
    }
}

impl<'a> From<&'a Batch> for Operand<'a> {
    fn from(batch: &'a Batch) -> Self {
        Operand::Batch(batch)
    }
}

impl Operand<'_> {
    fn for_key(&self, key: &str) -> Result<Value> {
        match self {
            Operand::Batch(b) => b.get_key(key),
            Operand::Value(Value::Batch(b)) => b.get_key(key),
            Operand::Value(v) => Ok((*v).clone()),
        }
    }
}

impl Batch {
    /// Broadcast a data-attribute lookup across all members
    ///
    /// For every member, `name` is resolved on that member: a nested batch
    /// resolves it as a key (falling back to broadcasting into its own
    /// members), while a leaf has no named attributes and produces
    /// [`Error::AttributeNotFound`] naming the member and its type.
    /// Broadcasting over an empty batch is disallowed.
    ///
    /// # Example
    ///
    /// ```
    /// use batchr::prelude::*;
    ///
    /// let batch = Batch::from_pairs([
    ///     ("a", Batch::from_pairs([("x", 1)])),
    ///     ("b", Batch::from_pairs([("x", 2)])),
    /// ]);
    /// let xs = batch.attr("x")?;
    /// assert_eq!(xs.get("a")?, Value::Int(1));
    /// assert_eq!(xs.get("b")?, Value::Int(2));
    /// # Ok::<(), batchr::error::Error>(())
    /// ```
    pub fn attr(&self, name: &str) -> Result<Batch> {
        if self.is_empty() {
            return Err(Error::EmptyBatch {
                name: name.to_string(),
            });
        }
        let mut out = Batch::new();
        for (key, value) in self.iter() {
            let member = match value {
                Value::Batch(sub) => match sub.entries.get(name) {
                    Some(found) => found.clone(),
                    None => Value::Batch(sub.attr(name)?),
                },
                leaf => {
                    return Err(Error::AttributeNotFound {
                        name: name.to_string(),
                        key: key.clone(),
                        type_name: leaf.type_name(),
                    })
                }
            };
            out.insert(key.clone(), member);
        }
        Ok(out)
    }

    /// Broadcast a named operation across all members
    ///
    /// `name` is looked up in the fixed operator tables: unary names (`neg`,
    /// `pos`, `abs`, `not`, `invert`) take no arguments, binary names (`add`,
    /// `sub`, `mul`, `div`, `floordiv`, `rem`, `pow`, `bitand`, `bitor`,
    /// `bitxor`, `shl`, `shr`, `eq`, `concat`) take exactly one. A name
    /// matching neither table falls back to [`Batch::attr`].
    ///
    /// # Example
    ///
    /// ```
    /// use batchr::prelude::*;
    ///
    /// let a = Batch::from_pairs([("x", 1), ("y", 2)]);
    /// let b = Batch::from_pairs([("x", 3), ("y", 4)]);
    /// let sum = a.invoke("add", &[Value::Batch(b)])?;
    /// assert_eq!(sum.get("x")?, Value::Int(4));
    /// assert_eq!(sum.get("y")?, Value::Int(6));
    /// # Ok::<(), batchr::error::Error>(())
    /// ```
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Batch> {
        if self.is_empty() {
            return Err(Error::EmptyBatch {
                name: name.to_string(),
            });
        }
        if let Some(op) = UnaryOp::from_name(name) {
            if !args.is_empty() {
                return Err(Error::Invariant {
                    msg: format!("operator '{name}' takes no arguments"),
                });
            }
            return self.broadcast_unary(op);
        }
        if let Some(op) = BinaryOp::from_name(name) {
            let [rhs] = args else {
                return Err(Error::Invariant {
                    msg: format!("operator '{name}' takes exactly one argument"),
                });
            };
            return self.broadcast_binary(op, rhs.into());
        }
        self.attr(name)
    }

    /// In-place variant of [`Batch::invoke`] for the operator names
    ///
    /// Mutates the batch member by member; on error the batch is left
    /// partially updated.
    pub fn invoke_in_place(&mut self, name: &str, args: &[Value]) -> Result<()> {
        if let Some(op) = BinaryOp::from_name(name) {
            let [rhs] = args else {
                return Err(Error::Invariant {
                    msg: format!("operator '{name}' takes exactly one argument"),
                });
            };
            return self.broadcast_binary_assign(op, rhs.into());
        }
        if let Some(op) = UnaryOp::from_name(name) {
            if !args.is_empty() {
                return Err(Error::Invariant {
                    msg: format!("operator '{name}' takes no arguments"),
                });
            }
            let result = self.broadcast_unary(op)?;
            self.entries = result.entries;
            return Ok(());
        }
        Err(Error::AttributeNotFound {
            name: name.to_string(),
            key: String::new(),
            type_name: "batch",
        })
    }

    /// Broadcast a function call across all members
    ///
    /// For every member, arguments that are batches are indexed per the
    /// member's key so each member is called with its own slice; other
    /// arguments pass unchanged. Nested batch members recurse with their
    /// sliced arguments. Results collect into a new batch.
    ///
    /// # Example
    ///
    /// ```
    /// use batchr::prelude::*;
    ///
    /// let batch = Batch::from_pairs([("a", 10), ("b", 20)]);
    /// let offsets = Batch::from_pairs([("a", 1), ("b", 2)]);
    /// let shifted = batch.call(&[Value::Batch(offsets)], &|member, args| {
    ///     match (member, &args[0]) {
    ///         (Value::Int(m), Value::Int(o)) => Ok(Value::Int(m + o)),
    ///         _ => Ok(Value::Null),
    ///     }
    /// })?;
    /// assert_eq!(shifted.get("b")?, Value::Int(22));
    /// # Ok::<(), batchr::error::Error>(())
    /// ```
    pub fn call<F>(&self, args: &[Value], f: &F) -> Result<Batch>
    where
        F: Fn(&Value, &[Value]) -> Result<Value>,
    {
        let mut out = Batch::new();
        for (key, value) in self.iter() {
            let sliced = slice_args(args, key)?;
            let result = match value {
                Value::Batch(sub) => Value::Batch(sub.call(&sliced, f)?),
                leaf => f(leaf, &sliced).map_err(|e| e.with_key(key))?,
            };
            out.insert(key.clone(), result);
        }
        Ok(out)
    }

    /// In-place variant of [`Batch::call`]
    ///
    /// On error the batch is left partially updated.
    pub fn call_in_place<F>(&mut self, args: &[Value], f: &F) -> Result<()>
    where
        F: Fn(&Value, &[Value]) -> Result<Value>,
    {
        let keys: Vec<String> = self.keys().map(str::to_string).collect();
        for key in keys {
            let sliced = slice_args(args, &key)?;
            let current = self
                .entries
                .get_mut(&key)
                .expect("keys were just enumerated");
            match current {
                Value::Batch(sub) => sub.call_in_place(&sliced, f)?,
                leaf => {
                    let result = f(leaf, &sliced).map_err(|e| e.with_key(&key))?;
                    *leaf = result;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn broadcast_binary(&self, op: BinaryOp, rhs: Operand<'_>) -> Result<Batch> {
        if self.is_empty() {
            return Err(Error::EmptyBatch {
                name: op.name().to_string(),
            });
        }
        let mut out = Batch::new();
        for (key, value) in self.iter() {
            let arg = rhs.for_key(key)?;
            let result = match value {
                Value::Batch(sub) => Value::Batch(sub.broadcast_binary(op, (&arg).into())?),
                leaf => apply_binary(op, leaf, &arg).map_err(|e| e.with_key(key))?,
            };
            out.insert(key.clone(), result);
        }
        Ok(out)
    }

    pub(crate) fn broadcast_binary_assign(&mut self, op: BinaryOp, rhs: Operand<'_>) -> Result<()> {
        if self.is_empty() {
            return Err(Error::EmptyBatch {
                name: op.name().to_string(),
            });
        }
        let keys: Vec<String> = self.keys().map(str::to_string).collect();
        for key in keys {
            let arg = rhs.for_key(&key)?;
            let current = self
                .entries
                .get_mut(&key)
                .expect("keys were just enumerated");
            match current {
                Value::Batch(sub) => sub.broadcast_binary_assign(op, (&arg).into())?,
                leaf => {
                    let result = apply_binary(op, leaf, &arg).map_err(|e| e.with_key(&key))?;
                    *leaf = result;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn broadcast_unary(&self, op: UnaryOp) -> Result<Batch> {
        if self.is_empty() {
            return Err(Error::EmptyBatch {
                name: op.name().to_string(),
            });
        }
        let mut out = Batch::new();
        for (key, value) in self.iter() {
            let result = match value {
                Value::Batch(sub) => Value::Batch(sub.broadcast_unary(op)?),
                leaf => apply_unary(op, leaf).map_err(|e| e.with_key(key))?,
            };
            out.insert(key.clone(), result);
        }
        Ok(out)
    }
}

fn slice_args(args: &[Value], key: &str) -> Result<Vec<Value>> {
    args.iter()
        .map(|arg| match arg {
            Value::Batch(b) => b.get_key(key),
            other => Ok(other.clone()),
        })
        .collect()
}

macro_rules! binary_method {
    ($(#[$doc:meta])* $method:ident, $op:ident) => {
        $(#[$doc])*
        pub fn $method<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Batch> {
            self.broadcast_binary(BinaryOp::$op, rhs.into())
        }
    };
}

impl Batch {
    binary_method!(
        /// Member-wise addition (fallible)
        ///
        /// A batch right-hand side is sliced per key so each member meets its
        /// own counterpart; any other value broadcasts unchanged.
        ///
        /// # Example
        ///
        /// ```
        /// use batchr::prelude::*;
        ///
        /// let a = Batch::from_pairs([("x", 1), ("y", 2)]);
        /// let b = Batch::from_pairs([("x", 3), ("y", 4)]);
        /// assert_eq!(a.try_add(&b)?.get("x")?, Value::Int(4));
        /// assert_eq!(a.try_add(&Value::Int(10))?.get("y")?, Value::Int(12));
        /// # Ok::<(), batchr::error::Error>(())
        /// ```
        try_add, Add
    );
    binary_method!(
        /// Member-wise subtraction (fallible)
        try_sub, Sub
    );
    binary_method!(
        /// Member-wise multiplication (fallible)
        try_mul, Mul
    );
    binary_method!(
        /// Member-wise true division (fallible); integer members divide to
        /// floats
        try_div, Div
    );
    binary_method!(
        /// Member-wise floor division (fallible)
        try_floordiv, FloorDiv
    );
    binary_method!(
        /// Member-wise remainder (fallible), with floor-division sign
        /// convention
        try_rem, Rem
    );
    binary_method!(
        /// Member-wise power (fallible)
        try_pow, Pow
    );
    binary_method!(
        /// Member-wise bitwise/logical and (fallible)
        try_bitand, BitAnd
    );
    binary_method!(
        /// Member-wise bitwise/logical or (fallible)
        try_bitor, BitOr
    );
    binary_method!(
        /// Member-wise bitwise/logical xor (fallible)
        try_bitxor, BitXor
    );
    binary_method!(
        /// Member-wise left shift (fallible)
        try_shl, Shl
    );
    binary_method!(
        /// Member-wise right shift (fallible)
        try_shr, Shr
    );
    binary_method!(
        /// Member-wise concatenation of strings or lists (fallible)
        try_concat, Concat
    );
    binary_method!(
        /// Member-wise equality, producing a batch of booleans
        ///
        /// Distinct from `PartialEq` on `Batch`, which compares structurally.
        try_eq, Eq
    );

    /// Member-wise negation (fallible)
    pub fn try_neg(&self) -> Result<Batch> {
        self.broadcast_unary(UnaryOp::Neg)
    }

    /// Member-wise identity for numeric members (fallible)
    pub fn try_pos(&self) -> Result<Batch> {
        self.broadcast_unary(UnaryOp::Pos)
    }

    /// Member-wise absolute value (fallible)
    pub fn try_abs(&self) -> Result<Batch> {
        self.broadcast_unary(UnaryOp::Abs)
    }

    /// Member-wise logical not of each member's truthiness (fallible)
    pub fn try_not(&self) -> Result<Batch> {
        self.broadcast_unary(UnaryOp::Not)
    }

    /// Member-wise bitwise inversion (fallible)
    pub fn try_invert(&self) -> Result<Batch> {
        self.broadcast_unary(UnaryOp::Invert)
    }
}

macro_rules! impl_std_binary {
    ($trait:ident, $method:ident, $try_method:ident) => {
        impl std::ops::$trait<&Batch> for &Batch {
            type Output = Batch;

            /// Member-wise operator
            ///
            /// # Panics
            ///
            /// Panics on broadcast failure; use the fallible `try_` method to
            /// handle errors.
            fn $method(self, rhs: &Batch) -> Batch {
                self.$try_method(rhs)
                    .unwrap_or_else(|e| panic!("batch {}: {e}", stringify!($method)))
            }
        }

        impl std::ops::$trait<&Value> for &Batch {
            type Output = Batch;

            /// Member-wise operator against a broadcast scalar
            ///
            /// # Panics
            ///
            /// Panics on broadcast failure; use the fallible `try_` method to
            /// handle errors.
            fn $method(self, rhs: &Value) -> Batch {
                self.$try_method(rhs)
                    .unwrap_or_else(|e| panic!("batch {}: {e}", stringify!($method)))
            }
        }
    };
}

impl_std_binary!(Add, add, try_add);
impl_std_binary!(Sub, sub, try_sub);
impl_std_binary!(Mul, mul, try_mul);
impl_std_binary!(Div, div, try_div);
impl_std_binary!(Rem, rem, try_rem);
impl_std_binary!(BitAnd, bitand, try_bitand);
impl_std_binary!(BitOr, bitor, try_bitor);
impl_std_binary!(BitXor, bitxor, try_bitxor);
impl_std_binary!(Shl, shl, try_shl);
impl_std_binary!(Shr, shr, try_shr);

macro_rules! impl_std_assign {
    ($trait:ident, $method:ident, $op:ident) => {
        impl std::ops::$trait<&Batch> for Batch {
            /// In-place member-wise operator
            ///
            /// # Panics
            ///
            /// Panics on broadcast failure, possibly after a partial update;
            /// use [`Batch::invoke_in_place`] to handle errors.
            fn $method(&mut self, rhs: &Batch) {
                self.broadcast_binary_assign(BinaryOp::$op, rhs.into())
                    .unwrap_or_else(|e| panic!("batch {}: {e}", stringify!($method)))
            }
        }

        impl std::ops::$trait<&Value> for Batch {
            /// In-place member-wise operator against a broadcast scalar
            ///
            /// # Panics
            ///
            /// Panics on broadcast failure, possibly after a partial update;
            /// use [`Batch::invoke_in_place`] to handle errors.
            fn $method(&mut self, rhs: &Value) {
                self.broadcast_binary_assign(BinaryOp::$op, rhs.into())
                    .unwrap_or_else(|e| panic!("batch {}: {e}", stringify!($method)))
            }
        }
    };
}

impl_std_assign!(AddAssign, add_assign, Add);
impl_std_assign!(SubAssign, sub_assign, Sub);
impl_std_assign!(MulAssign, mul_assign, Mul);
impl_std_assign!(DivAssign, div_assign, Div);
impl_std_assign!(RemAssign, rem_assign, Rem);
impl_std_assign!(BitAndAssign, bitand_assign, BitAnd);
impl_std_assign!(BitOrAssign, bitor_assign, BitOr);
impl_std_assign!(BitXorAssign, bitxor_assign, BitXor);
impl_std_assign!(ShlAssign, shl_assign, Shl);
impl_std_assign!(ShrAssign, shr_assign, Shr);

impl std::ops::Neg for &Batch {
    type Output = Batch;

    /// Member-wise negation
    ///
    /// # Panics
    ///
    /// Panics on broadcast failure; use [`Batch::try_neg`] to handle errors.
    fn neg(self) -> Batch {
        self.try_neg().unwrap_or_else(|e| panic!("batch neg: {e}"))
    }
}

impl std::ops::Not for &Batch {
    type Output = Batch;

    /// Member-wise logical not
    ///
    /// # Panics
    ///
    /// Panics on broadcast failure; use [`Batch::try_not`] to handle errors.
    fn not(self) -> Batch {
        self.try_not().unwrap_or_else(|e| panic!("batch not: {e}"))
    }
}
