//! The [`Member`] trait and its implementations for plain values.
//!
//! Domain models implement [`Identify`] plus [`Member`]; untyped collections
//! can hold `serde_json::Value`, `String`, integers or booleans directly.

use std::cmp::Ordering;

use serde_json::Value;

use super::identity::{Identify, Key};
use crate::array_error::CastError;

/// A value that can live in a [`ModelArray`](super::ModelArray).
///
/// `PartialEq` backs the structural-equality fallback used for members that
/// carry no primitive identity.
pub trait Member: Identify + PartialEq + Sized {
    /// Absorbs a newer representation of the same identity in place.
    ///
    /// Returns `None` when the update was applied. The default hands `newer`
    /// back, which makes the collection replace `self` at its position.
    fn update(&mut self, newer: Self) -> Option<Self> {
        Some(newer)
    }

    /// Default sort order: by value identity, members without one first and
    /// equal among themselves, so a stable sort leaves them in place.
    fn compare(&self, other: &Self) -> Ordering {
        self.value_key().cmp(&other.value_key())
    }

    /// Builds a member from raw JSON when the collection declares no member type.
    fn from_raw(raw: Value) -> Result<Self, CastError> {
        let _ = raw;
        Err(CastError::Untyped(std::any::type_name::<Self>()))
    }

    /// Null members are skipped on insertion.
    fn is_null(&self) -> bool {
        false
    }
}

impl Identify for Value {
    fn id(&self) -> Option<Key> {
        self.get("id").and_then(Key::from_json)
    }

    fn cid(&self) -> Option<Key> {
        self.get("cid").and_then(Key::from_json)
    }

    fn value_key(&self) -> Option<Key> {
        Key::from_json(self)
    }
}

impl Member for Value {
    /// Scalars order among their own kind; kinds order as null, bool,
    /// number, string, array, object. Arrays and objects compare equal.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                let a = a.as_f64().unwrap_or_default();
                let b = b.as_f64().unwrap_or_default();
                a.total_cmp(&b)
            }
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            _ => json_rank(self).cmp(&json_rank(other)),
        }
    }

    fn from_raw(raw: Value) -> Result<Self, CastError> {
        Ok(raw)
    }

    fn is_null(&self) -> bool {
        Value::is_null(self)
    }
}

fn json_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

macro_rules! primitive_member {
    ($($t:ty),*) => {
        $(
            impl Identify for $t {
                fn value_key(&self) -> Option<Key> {
                    Some(Key::from(self.clone()))
                }
            }

            impl Member for $t {
                fn compare(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }

                fn from_raw(raw: Value) -> Result<Self, CastError> {
                    Ok(serde_json::from_value(raw)?)
                }
            }
        )*
    };
}

primitive_member!(String, bool, i32, i64, u32, u64, usize);
