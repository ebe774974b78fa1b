//! Collection keys
//!
//! A key is either a non-negative integer position or a string name. Strings
//! that spell a canonical non-negative integer (`"7"`, but not `"07"` or
//! `"-7"`) are normalized to integer keys, so `"7"` and `7` address the same
//! entry.

use serde::{Serialize, Serializer};
use std::fmt;

use super::value::Value;

/// Key of a collection entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Int(u64),
    Str(String),
}

impl Key {
    /// Build a key from a string, normalizing canonical integers
    pub fn parse(s: &str) -> Self {
        match canonical_index(s) {
            Some(n) => Key::Int(n),
            None => Key::Str(s.to_string()),
        }
    }

    /// Derive a key from a stored value.
    ///
    /// Returns `None` for values that cannot address an entry (nested
    /// collections). Booleans map to `0`/`1`, floats truncate toward zero,
    /// `Null` maps to the empty string.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Key::Str(String::new())),
            Value::Bool(b) => Some(Key::Int(u64::from(*b))),
            Value::Int(n) => Some(Key::from(*n)),
            Value::Float(f) if f.is_finite() => Some(Key::from(f.trunc() as i64)),
            Value::Float(f) => Some(Key::Str(f.to_string())),
            Value::Str(s) => Some(Key::parse(s)),
            Value::Collection(_) => None,
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Key::Int(_))
    }

    pub fn as_int(&self) -> Option<u64> {
        match self {
            Key::Int(n) => Some(*n),
            Key::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            Key::Int(_) => None,
        }
    }

    /// The key as a storable value (used by `keys()` and `flip()`)
    pub fn to_value(&self) -> Value {
        match self {
            Key::Int(n) => i64::try_from(*n)
                .map(Value::Int)
                .unwrap_or_else(|_| Value::Str(n.to_string())),
            Key::Str(s) => Value::Str(s.clone()),
        }
    }
}

fn canonical_index(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{}", n),
            Key::Str(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Key::Int(n) => serializer.serialize_u64(*n),
            Key::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::parse(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        match canonical_index(&s) {
            Some(n) => Key::Int(n),
            None => Key::Str(s),
        }
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key::parse(s)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

impl From<u64> for Key {
    fn from(n: u64) -> Self {
        Key::Int(n)
    }
}

impl From<usize> for Key {
    fn from(n: usize) -> Self {
        Key::Int(n as u64)
    }
}

impl From<u32> for Key {
    fn from(n: u32) -> Self {
        Key::Int(u64::from(n))
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        u64::try_from(n)
            .map(Key::Int)
            .unwrap_or_else(|_| Key::Str(n.to_string()))
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::from(i64::from(n))
    }
}
