//! Set and sequence algebra
//!
//! Value comparisons use [`Value`] equality, so `1` and `1.0` match while
//! `1` and `"1"` do not.

use super::core::Collection;
use super::index::ValueIndex;
use super::key::Key;
use super::reshape::merge_all;
use super::value::Value;
use crate::error::{KollectError, Result};

impl Collection {
    /// Receiver entries, then entries of `other` whose keys are new
    pub fn union(&self, other: &Collection) -> Collection {
        let mut result = self.clone();
        for (key, value) in other.iter() {
            if !result.has(key) {
                result.put(key.clone(), value.clone());
            }
        }
        result
    }

    /// Concatenate with `other`: integer keys are appended and renumbered,
    /// string keys from `other` overwrite the receiver's
    pub fn merge(&self, other: &Collection) -> Collection {
        merge_all([self, other])
    }

    /// Entries whose value does not occur in `other`
    pub fn diff(&self, other: &Collection) -> Collection {
        let index: ValueIndex = other.iter().map(|(_, v)| v).collect();
        self.filter(|value, _| !index.contains(value))
    }

    /// Entries whose key is absent from `other` or maps to a different value
    pub fn diff_assoc(&self, other: &Collection) -> Collection {
        self.filter(|value, key| other.get(key) != Some(value))
    }

    /// Entries whose key is absent from `other`
    pub fn diff_keys(&self, other: &Collection) -> Collection {
        self.filter(|_, key| !other.has(key))
    }

    /// Entries whose value occurs in `other`
    pub fn intersect(&self, other: &Collection) -> Collection {
        let index: ValueIndex = other.iter().map(|(_, v)| v).collect();
        self.filter(|value, _| index.contains(value))
    }

    /// Entries whose key occurs in `other`
    pub fn intersect_by_keys(&self, other: &Collection) -> Collection {
        self.filter(|_, key| other.has(key))
    }

    /// Use the receiver's values as keys for `values`, position by position.
    ///
    /// Fails with `LengthMismatch` when the counts differ and with
    /// `InvalidArgument` when a receiver value cannot be a key.
    pub fn combine(&self, values: &Collection) -> Result<Collection> {
        if self.count() != values.count() {
            return Err(KollectError::LengthMismatch {
                keys: self.count(),
                values: values.count(),
            });
        }

        let mut result = Collection::with_capacity(self.count());
        for ((_, key), (_, value)) in self.iter().zip(values.iter()) {
            let key = Key::from_value(key).ok_or_else(|| {
                KollectError::InvalidArgument(format!("{} cannot be used as a key", key))
            })?;
            result.put(key, value.clone());
        }
        Ok(result)
    }

    /// Append the values of `values` after the receiver's entries
    pub fn concat(&self, values: &Collection) -> Collection {
        let mut result = self.clone();
        result.extend(values.iter().map(|(_, v)| v.clone()));
        result
    }

    /// First occurrence of each distinct value, keys preserved
    pub fn unique(&self) -> Collection {
        let mut seen = ValueIndex::new();
        let mut result = Collection::new();
        for (key, value) in self.iter() {
            if seen.insert(value) == result.count() {
                result.put(key.clone(), value.clone());
            }
        }
        result
    }

    /// New collection starting with `key => value`; an existing entry under
    /// `key` is replaced by the new one at the front
    pub fn prepend(&self, key: impl Into<Key>, value: impl Into<Value>) -> Collection {
        let key = key.into();
        let mut result = Collection::with_capacity(self.count() + 1);
        result.put(key.clone(), value);
        for (k, v) in self.iter() {
            if *k != key {
                result.put(k.clone(), v.clone());
            }
        }
        result
    }

    /// Append `value` under the next free integer key
    pub fn push(&mut self, value: impl Into<Value>) -> &mut Self {
        let key = Key::Int(self.next_index());
        self.items_mut().insert(key, value.into());
        self
    }

    /// Set `key` to `value`; an existing key keeps its position
    pub fn put(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> &mut Self {
        self.items_mut().insert(key.into(), value.into());
        self
    }

    /// Remove and return the last value
    pub fn pop(&mut self) -> Option<Value> {
        self.items_mut().pop().map(|(_, v)| v)
    }

    /// Remove and return the first value; remaining integer keys are
    /// renumbered from 0
    pub fn shift(&mut self) -> Option<Value> {
        let (_, value) = self.items_mut().shift_remove_index(0)?;
        let rest = std::mem::take(self);
        *self = rest.renumbered();
        Some(value)
    }
}
