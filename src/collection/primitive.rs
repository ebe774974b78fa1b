//! Primitive export tree
//!
//! [`Primitive`] is what `Collection::to_array` produces: scalars, ordered
//! sequences and ordered mappings, with no collection types left anywhere in
//! the tree. Encoders and dumpers consume this shape.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::core::Collection;
use super::key::Key;
use super::value::Value;

#[derive(Debug, Clone)]
pub enum Primitive {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Primitive>),
    Map(IndexMap<Key, Primitive>),
}

impl Primitive {
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Primitive::List(_) | Primitive::Map(_))
    }
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Primitive::Null, Primitive::Null) => true,
            (Primitive::Bool(a), Primitive::Bool(b)) => a == b,
            (Primitive::Int(a), Primitive::Int(b)) => a == b,
            (Primitive::Float(a), Primitive::Float(b)) => a == b,
            (Primitive::Str(a), Primitive::Str(b)) => a == b,
            (Primitive::List(a), Primitive::List(b)) => a == b,
            // mappings are ordered, so compare entry by entry
            (Primitive::Map(a), Primitive::Map(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            _ => false,
        }
    }
}

impl From<&Value> for Primitive {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Primitive::Null,
            Value::Bool(b) => Primitive::Bool(*b),
            Value::Int(n) => Primitive::Int(*n),
            Value::Float(f) => Primitive::Float(*f),
            Value::Str(s) => Primitive::Str(s.clone()),
            Value::Collection(c) => c.to_array(),
        }
    }
}

impl From<Primitive> for Value {
    fn from(p: Primitive) -> Self {
        match p {
            Primitive::Null => Value::Null,
            Primitive::Bool(b) => Value::Bool(b),
            Primitive::Int(n) => Value::Int(n),
            Primitive::Float(f) => Value::Float(f),
            Primitive::Str(s) => Value::Str(s),
            tree => Value::Collection(Collection::from(tree)),
        }
    }
}

impl Serialize for Primitive {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Primitive::Null => serializer.serialize_unit(),
            Primitive::Bool(b) => serializer.serialize_bool(*b),
            Primitive::Int(n) => serializer.serialize_i64(*n),
            Primitive::Float(f) => serializer.serialize_f64(*f),
            Primitive::Str(s) => serializer.serialize_str(s),
            Primitive::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Primitive::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
