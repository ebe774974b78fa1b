//! Collection struct definition
//!
//! A Collection is an ordered mapping from [`Key`] to [`Value`]. Keys are
//! unique and insertion order is observable. Every operation either returns a
//! fresh collection (taking `&self`) or mutates the receiver (taking
//! `&mut self`); the receiver type tells which.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Index;

use super::key::Key;
use super::primitive::Primitive;
use super::value::Value;
use crate::error::Result;
use crate::output::dump::Dumper;
use crate::output::json::{Encoder, JsonEncoder, JsonOptions};

/// Ordered associative collection
#[derive(Debug, Clone, Default)]
pub struct Collection {
    items: IndexMap<Key, Value>,
}

impl Collection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: IndexMap::with_capacity(capacity),
        }
    }

    /// Create a sequence (keys `0..n`) from values
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        values.into_iter().map(Into::<Value>::into).collect()
    }

    /// Create a mapping from key/value pairs; later duplicates overwrite
    /// earlier ones in place
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| -> (Key, Value) { (k.into(), v.into()) })
            .collect()
    }

    /// Build a collection from a JSON document; a scalar document becomes a
    /// one-element sequence
    pub fn from_json(json: serde_json::Value) -> Self {
        match Value::from(json) {
            Value::Collection(c) => c,
            scalar => Self::from_values([scalar]),
        }
    }

    /// Sequence `1..=n`; empty when `n < 1`
    pub fn times(n: i64) -> Self {
        Self::times_with(n, Value::from)
    }

    /// Sequence `1..=n` mapped through `f`; empty when `n < 1`
    pub fn times_with<F, V>(n: i64, mut f: F) -> Self
    where
        F: FnMut(i64) -> V,
        V: Into<Value>,
    {
        if n < 1 {
            return Self::new();
        }
        (1..=n).map(|i| -> Value { f(i).into() }).collect()
    }

    /// The underlying ordered mapping
    pub fn all(&self) -> &IndexMap<Key, Value> {
        &self.items
    }

    pub fn into_inner(self) -> IndexMap<Key, Value> {
        self.items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.items.iter()
    }

    /// Entry at an insertion-order position
    pub fn get_index(&self, index: usize) -> Option<(&Key, &Value)> {
        self.items.get_index(index)
    }

    /// True when the keys are exactly `0..n` in order
    pub fn is_list(&self) -> bool {
        self.items
            .keys()
            .enumerate()
            .all(|(i, k)| k.as_int() == Some(i as u64))
    }

    /// Recursively convert into a plain tree with no collection values left.
    ///
    /// Sequences export as [`Primitive::List`], everything else as an
    /// ordered [`Primitive::Map`].
    pub fn to_array(&self) -> Primitive {
        if self.is_list() {
            Primitive::List(self.items.values().map(Primitive::from).collect())
        } else {
            Primitive::Map(
                self.items
                    .iter()
                    .map(|(k, v)| (k.clone(), Primitive::from(v)))
                    .collect(),
            )
        }
    }

    /// Encode `to_array()` as JSON
    pub fn to_json(&self, options: JsonOptions) -> Result<String> {
        self.encode_with(&JsonEncoder::new(options))
    }

    /// Encode `to_array()` with a caller-selected encoder
    pub fn encode_with(&self, encoder: &dyn Encoder) -> Result<String> {
        encoder.encode(&self.to_array())
    }

    /// Hand the collection to a registered dumper.
    ///
    /// With `plain` the dumper receives `to_array()`, otherwise the
    /// collection itself. Without a dumper this does nothing.
    pub fn dump(&self, dumper: Option<&dyn Dumper>, plain: bool) -> &Self {
        if let Some(dumper) = dumper {
            if plain {
                dumper.dump_tree(&self.to_array());
            } else {
                dumper.dump_collection(self);
            }
        }
        self
    }

    /// Dump, then ask the dumper to halt
    pub fn dd(&self, dumper: Option<&dyn Dumper>, plain: bool) {
        if let Some(dumper) = dumper {
            self.dump(Some(dumper), plain);
            dumper.halt();
        }
    }

    pub(crate) fn items_mut(&mut self) -> &mut IndexMap<Key, Value> {
        &mut self.items
    }

    /// Next free integer key: one past the largest integer key, or 0
    pub(crate) fn next_index(&self) -> u64 {
        self.items
            .keys()
            .filter_map(Key::as_int)
            .max()
            .map_or(0, |n| n + 1)
    }

    /// Renumber integer keys `0..` in order, keeping string keys
    pub(crate) fn renumbered(self) -> Self {
        let mut next = 0u64;
        self.items
            .into_iter()
            .map(|(k, v)| match k {
                Key::Int(_) => {
                    let key = Key::Int(next);
                    next += 1;
                    (key, v)
                }
                named => (named, v),
            })
            .collect()
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self.items.iter().zip(other.items.iter()).all(|(a, b)| a == b)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_list() {
            write!(f, "[")?;
            for (i, value) in self.items.values().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", value)?;
            }
            write!(f, "]")
        } else {
            write!(f, "{{")?;
            for (i, (key, value)) in self.items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", key, value)?;
            }
            write!(f, "}}")
        }
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}

impl FromIterator<Value> for Collection {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self {
            items: iter
                .into_iter()
                .enumerate()
                .map(|(i, v)| (Key::Int(i as u64), v))
                .collect(),
        }
    }
}

impl FromIterator<(Key, Value)> for Collection {
    fn from_iter<T: IntoIterator<Item = (Key, Value)>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl Extend<(Key, Value)> for Collection {
    fn extend<T: IntoIterator<Item = (Key, Value)>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}

impl Extend<Value> for Collection {
    fn extend<T: IntoIterator<Item = Value>>(&mut self, iter: T) {
        let mut next = self.next_index();
        for value in iter {
            self.items.insert(Key::Int(next), value);
            next += 1;
        }
    }
}

impl IntoIterator for Collection {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<K: Into<Key>> Index<K> for Collection {
    type Output = Value;

    /// Panics when the key is absent; use `get` for a fallible read
    fn index(&self, key: K) -> &Value {
        let key = key.into();
        match self.items.get(&key) {
            Some(value) => value,
            None => panic!("no entry for key `{}`", key),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Collection {
    fn from(values: Vec<T>) -> Self {
        Self::from_values(values)
    }
}

impl From<IndexMap<Key, Value>> for Collection {
    fn from(items: IndexMap<Key, Value>) -> Self {
        Self { items }
    }
}

impl From<Primitive> for Collection {
    fn from(tree: Primitive) -> Self {
        match tree {
            Primitive::List(items) => items.into_iter().map(Value::from).collect(),
            Primitive::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect(),
            scalar => Self::from_values([Value::from(scalar)]),
        }
    }
}

impl From<serde_json::Value> for Collection {
    fn from(json: serde_json::Value) -> Self {
        Self::from_json(json)
    }
}
