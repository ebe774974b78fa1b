//! Hashed lookup of values by equality
//!
//! [`Value`] has no `Hash` impl because `1 == 1.0`. Values are bucketed by a
//! hash that agrees with equality and compared with `==` inside a bucket.

use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::BuildHasher;

use super::value::Value;

#[derive(Hash)]
enum Bucket<'v> {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(&'v str),
    Collection(usize),
}

fn bucket(value: &Value) -> Bucket<'_> {
    // 2^63
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    match value {
        Value::Null => Bucket::Null,
        Value::Bool(b) => Bucket::Bool(*b),
        Value::Int(n) => Bucket::Int(*n),
        // integral floats share a bucket with the integer they equal
        Value::Float(f) if f.fract() == 0.0 && *f >= -LIMIT && *f < LIMIT => {
            Bucket::Int(*f as i64)
        }
        Value::Float(f) => Bucket::Float(f.to_bits()),
        Value::Str(s) => Bucket::Str(s),
        Value::Collection(c) => Bucket::Collection(c.count()),
    }
}

/// Distinct values in first-seen order, each with its position
#[derive(Default)]
pub(crate) struct ValueIndex<'a> {
    hasher: RandomState,
    buckets: HashMap<u64, Vec<(&'a Value, usize)>>,
    len: usize,
}

impl<'a> ValueIndex<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of distinct values
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn position(&self, value: &Value) -> Option<usize> {
        let slot = self.hasher.hash_one(bucket(value));
        self.buckets
            .get(&slot)?
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, position)| *position)
    }

    pub(crate) fn contains(&self, value: &Value) -> bool {
        self.position(value).is_some()
    }

    /// Position of `value`, adding it at the end when it is new
    pub(crate) fn insert(&mut self, value: &'a Value) -> usize {
        let slot = self.hasher.hash_one(bucket(value));
        let entries = self.buckets.entry(slot).or_default();
        if let Some((_, position)) = entries.iter().find(|(v, _)| *v == value) {
            return *position;
        }
        let position = self.len;
        entries.push((value, position));
        self.len += 1;
        position
    }
}

impl<'a> FromIterator<&'a Value> for ValueIndex<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Value>>(iter: I) -> Self {
        let mut index = ValueIndex::new();
        for value in iter {
            index.insert(value);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_follow_first_occurrence() {
        let values = [Value::from("a"), Value::from(1), Value::from("a"), Value::from(2)];
        let index: ValueIndex = values.iter().collect();
        assert_eq!(index.len(), 3);
        assert_eq!(index.position(&Value::from("a")), Some(0));
        assert_eq!(index.position(&Value::from(2)), Some(2));
        assert_eq!(index.position(&Value::from("b")), None);
    }

    #[test]
    fn test_lookup_agrees_with_equality() {
        let values = [Value::from(3), Value::from(0.5), Value::from(collection![1, 2])];
        let index: ValueIndex = values.iter().collect();
        assert!(index.contains(&Value::from(3.0)));
        assert!(index.contains(&Value::from(0.5)));
        assert!(index.contains(&Value::from(collection![1.0, 2])));
        assert!(!index.contains(&Value::from("3")));
        assert!(!index.contains(&Value::from(collection![2, 1])));

        let zero = [Value::from(0)];
        let index: ValueIndex = zero.iter().collect();
        assert!(index.contains(&Value::from(-0.0)));
    }
}
