//! Argument types for clause keys, values, and range operators.
//!
//! Builder methods accept anything convertible into [`OneOrMany`], so the
//! same call handles a single field or a list of fields, and a single value
//! or a list of values:
//!
//! ```
//! use esmapper::{Keys, Values};
//!
//! let one: Keys = "name".into();
//! let many: Keys = vec!["name", "email"].into();
//! assert!(!one.is_many());
//! assert!(many.is_many());
//!
//! let values: Values = [1, 2, 3].into();
//! assert_eq!(values.len(), 3);
//! ```

use serde_json::Value;

use crate::op::RangeOp;

/// A scalar JSON value: string, number, boolean, or null.
///
/// Only scalar Rust types convert into `Scalar`, so list-shaped values can
/// never be passed where a single value is expected.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar(Value);

impl Scalar {
    /// The JSON `null` value.
    pub fn null() -> Self {
        Scalar(Value::Null)
    }

    /// Returns the underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the scalar, returning the underlying JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Returns the string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Surrounds string and number values with the given text.
    ///
    /// Booleans and null are returned unchanged.
    pub(crate) fn decorate(self, prefix: &str, suffix: &str) -> Self {
        match self.0 {
            Value::String(s) => Scalar(Value::String(format!("{prefix}{s}{suffix}"))),
            Value::Number(n) => Scalar(Value::String(format!("{prefix}{n}{suffix}"))),
            other => Scalar(other),
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        s.0
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar(Value::String(s.to_string()))
    }
}

impl From<&String> for Scalar {
    fn from(s: &String) -> Self {
        Scalar(Value::String(s.clone()))
    }
}

/// A single item or an ordered list of items.
#[derive(Debug, Clone, PartialEq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

/// One or more field names.
pub type Keys = OneOrMany<String>;

/// One or more scalar values.
pub type Values = OneOrMany<Scalar>;

/// One or more range operators.
pub type RangeOps = OneOrMany<RangeOp>;

impl<T> OneOrMany<T> {
    /// Returns `true` if this holds a list (even a list of one).
    pub fn is_many(&self) -> bool {
        matches!(self, OneOrMany::Many(_))
    }

    /// Number of items; a single item counts as one.
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    /// Returns `true` if this is an empty list.
    pub fn is_empty(&self) -> bool {
        matches!(self, OneOrMany::Many(items) if items.is_empty())
    }

    /// Returns the items as a list, in order.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }

    /// Applies `f` to every item, keeping the shape.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> OneOrMany<U> {
        match self {
            OneOrMany::One(item) => OneOrMany::One(f(item)),
            OneOrMany::Many(items) => OneOrMany::Many(items.into_iter().map(f).collect()),
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

// Keys

impl From<&str> for Keys {
    fn from(key: &str) -> Self {
        OneOrMany::One(key.to_string())
    }
}

impl From<String> for Keys {
    fn from(key: String) -> Self {
        OneOrMany::One(key)
    }
}

impl From<&String> for Keys {
    fn from(key: &String) -> Self {
        OneOrMany::One(key.clone())
    }
}

impl From<Vec<&str>> for Keys {
    fn from(keys: Vec<&str>) -> Self {
        OneOrMany::Many(keys.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Keys {
    fn from(keys: &[&str]) -> Self {
        OneOrMany::Many(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Keys {
    fn from(keys: [&str; N]) -> Self {
        OneOrMany::Many(keys.iter().map(|k| k.to_string()).collect())
    }
}

// Values

impl From<Scalar> for Values {
    fn from(value: Scalar) -> Self {
        OneOrMany::One(value)
    }
}

impl From<&str> for Values {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.into())
    }
}

impl From<&String> for Values {
    fn from(value: &String) -> Self {
        OneOrMany::One(value.into())
    }
}

impl From<Vec<&str>> for Values {
    fn from(values: Vec<&str>) -> Self {
        OneOrMany::Many(values.into_iter().map(Scalar::from).collect())
    }
}

impl From<&[&str]> for Values {
    fn from(values: &[&str]) -> Self {
        OneOrMany::Many(values.iter().map(|v| Scalar::from(*v)).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Values {
    fn from(values: [&str; N]) -> Self {
        OneOrMany::Many(values.iter().map(|v| Scalar::from(*v)).collect())
    }
}

macro_rules! scalar_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Scalar {
                fn from(v: $t) -> Self {
                    Scalar(Value::from(v))
                }
            }

            impl From<$t> for Values {
                fn from(v: $t) -> Self {
                    OneOrMany::One(Scalar::from(v))
                }
            }

            impl From<Vec<$t>> for Values {
                fn from(values: Vec<$t>) -> Self {
                    OneOrMany::Many(values.into_iter().map(Scalar::from).collect())
                }
            }

            impl From<&[$t]> for Values {
                fn from(values: &[$t]) -> Self {
                    OneOrMany::Many(values.iter().cloned().map(Scalar::from).collect())
                }
            }

            impl<const N: usize> From<[$t; N]> for Values {
                fn from(values: [$t; N]) -> Self {
                    OneOrMany::Many(values.into_iter().map(Scalar::from).collect())
                }
            }
        )*
    };
}

scalar_from!(String, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

// Range operators

impl From<RangeOp> for RangeOps {
    fn from(op: RangeOp) -> Self {
        OneOrMany::One(op)
    }
}

impl From<&[RangeOp]> for RangeOps {
    fn from(ops: &[RangeOp]) -> Self {
        OneOrMany::Many(ops.to_vec())
    }
}

impl<const N: usize> From<[RangeOp; N]> for RangeOps {
    fn from(ops: [RangeOp; N]) -> Self {
        OneOrMany::Many(ops.to_vec())
    }
}
