//! Reshaping operations
//!
//! Chunking, flattening, grouping and re-keying. None of these mutate the
//! receiver. Operations that read records (`group_by`, `key_by`, `pluck`,
//! `implode`) look fields up on collection-valued entries and skip or default
//! entries that are not records.

use indexmap::IndexMap;
use tracing::trace;

use super::core::Collection;
use super::key::Key;
use super::value::Value;
use crate::error::{KollectError, Result};

impl Collection {
    /// Sequential groups of at most `size` entries, original keys kept inside
    /// each group. A size of zero yields an empty collection.
    pub fn chunk(&self, size: usize) -> Collection {
        if size == 0 {
            return Collection::new();
        }
        let entries: Vec<(&Key, &Value)> = self.iter().collect();
        entries
            .chunks(size)
            .map(|chunk| {
                Value::Collection(
                    chunk
                        .iter()
                        .map(|(k, v)| ((*k).clone(), (*v).clone()))
                        .collect(),
                )
            })
            .collect()
    }

    /// Chunk into groups of `ceil(count / groups)` entries.
    ///
    /// This yields at most `groups` chunks; fewer when the count does not
    /// divide evenly (five entries split three ways gives chunks of 2, 2, 1,
    /// but split four ways gives 2, 2, 1 as well). An empty receiver or zero
    /// groups yields an empty collection.
    pub fn split(&self, groups: usize) -> Collection {
        if self.is_empty() || groups == 0 {
            return Collection::new();
        }
        self.chunk(self.count().div_ceil(groups))
    }

    /// Concatenate nested collections one level deep.
    ///
    /// Integer keys are renumbered in order; string keys overwrite earlier
    /// entries with the same name. Scalar values are dropped.
    pub fn collapse(&self) -> Collection {
        merge_all(self.iter().filter_map(|(key, value)| {
            let nested = value.as_collection();
            if nested.is_none() {
                trace!(key = %key, "collapse: skipping scalar value");
            }
            nested
        }))
    }

    /// Flatten nested collections into one sequence, discarding all keys
    pub fn flatten(&self) -> Collection {
        self.flatten_depth(usize::MAX)
    }

    /// Flatten at most `depth` levels; depth 0 only renumbers
    pub fn flatten_depth(&self, depth: usize) -> Collection {
        let mut out = Vec::new();
        flatten_into(&mut out, self, depth);
        out.into_iter().collect()
    }

    /// Group records by the value of `key`, in order of first occurrence.
    ///
    /// Entries without the field (or whose field is itself a collection) are
    /// grouped under the empty-string key.
    pub fn group_by(&self, key: impl Into<Key>) -> Collection {
        let key = key.into();
        let mut groups: IndexMap<Key, Collection> = IndexMap::new();
        for (_, value) in self.iter() {
            let group = value
                .field(&key)
                .and_then(Key::from_value)
                .unwrap_or_else(|| {
                    trace!(field = %key, "group_by: entry has no usable field");
                    Key::Str(String::new())
                });
            groups.entry(group).or_default().push(value.clone());
        }
        groups
            .into_iter()
            .map(|(k, group)| (k, Value::Collection(group)))
            .collect()
    }

    /// Re-key records by the value of `key`; later duplicates win
    pub fn key_by(&self, key: impl Into<Key>) -> Collection {
        self.key_by_with(key, Value::clone)
    }

    /// Re-key records by `f(field)`; later duplicates win
    pub fn key_by_with<F, V>(&self, key: impl Into<Key>, mut f: F) -> Collection
    where
        F: FnMut(&Value) -> V,
        V: Into<Value>,
    {
        let key = key.into();
        let mut result = Collection::new();
        for (_, value) in self.iter() {
            let Some(field) = value.field(&key) else {
                trace!(field = %key, "key_by: entry has no such field");
                continue;
            };
            match Key::from_value(&f(field).into()) {
                Some(derived) => {
                    result.put(derived, value.clone());
                }
                None => trace!(field = %key, "key_by: derived key is not a scalar"),
            }
        }
        result
    }

    /// `[passing, failing]`, each keeping the original keys
    pub fn partition<F>(&self, mut f: F) -> Collection
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        let mut passing = Collection::new();
        let mut failing = Collection::new();
        for (key, value) in self.iter() {
            let side = if f(value, key) { &mut passing } else { &mut failing };
            side.put(key.clone(), value.clone());
        }
        Collection::from_values([passing, failing])
    }

    /// Sequence of the `key` field of every record that has it
    pub fn pluck(&self, key: impl Into<Key>) -> Collection {
        let key = key.into();
        self.iter()
            .filter_map(|(_, value)| value.field(&key).cloned())
            .collect()
    }

    /// Cartesian product of `lists` only, as a sequence of tuples
    pub fn cross_join(&self, lists: &[Collection]) -> Collection {
        product(vec![Vec::new()], lists)
    }

    /// Cartesian product of the receiver followed by `lists`.
    ///
    /// Receiver values that are themselves collections are partial tuples and
    /// get extended, so chained calls build flat tuples.
    pub fn cross_joins(&self, lists: &[Collection]) -> Collection {
        let seeds = self
            .iter()
            .map(|(_, value)| match value {
                Value::Collection(tuple) => tuple.iter().map(|(_, v)| v.clone()).collect(),
                scalar => vec![scalar.clone()],
            })
            .collect();
        product(seeds, lists)
    }

    /// Join values into a string.
    ///
    /// When entries are records, plucks `key` and joins with `glue`;
    /// otherwise `key` is the glue between scalar values.
    pub fn implode(&self, key: &str, glue: Option<&str>) -> String {
        let (values, glue) = match self.first() {
            Some(Value::Collection(_)) => (self.pluck(key), glue.unwrap_or("")),
            _ => (self.clone(), key),
        };
        values
            .iter()
            .map(|(_, v)| v.to_text())
            .collect::<Vec<_>>()
            .join(glue)
    }

    /// Every `step`-th value starting at position `offset`, renumbered
    pub fn nth(&self, step: usize, offset: usize) -> Result<Collection> {
        if step == 0 {
            return Err(KollectError::InvalidArgument(
                "nth requires a step of at least 1".to_string(),
            ));
        }
        Ok(self
            .iter()
            .enumerate()
            .filter(|(position, _)| position % step == offset)
            .map(|(_, (_, v))| v.clone())
            .collect())
    }

    /// Swap keys and values; values that cannot be keys are skipped
    pub fn flip(&self) -> Collection {
        let mut result = Collection::new();
        for (key, value) in self.iter() {
            if let Some(flipped) = Key::from_value(value) {
                result.put(flipped, key.to_value());
            }
        }
        result
    }

    /// Entries from `offset`, keys preserved.
    ///
    /// A negative offset counts from the end. `len` limits the number of
    /// entries; a negative `len` stops that many entries before the end.
    pub fn slice(&self, offset: i64, len: Option<i64>) -> Collection {
        let count = self.count() as i64;
        let start = if offset < 0 {
            (count + offset).max(0)
        } else {
            offset.min(count)
        };
        let end = match len {
            None => count,
            Some(n) if n < 0 => (count + n).max(start),
            Some(n) => start.saturating_add(n).min(count),
        };
        self.iter()
            .skip(start as usize)
            .take((end - start) as usize)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// First `limit` entries, or the last `-limit` entries when negative
    pub fn take(&self, limit: i64) -> Collection {
        if limit < 0 {
            self.slice(limit, Some(limit.checked_neg().unwrap_or(i64::MAX)))
        } else {
            self.slice(0, Some(limit))
        }
    }

    /// Page `page` (1-based) of `per_page` entries. A page whose offset
    /// does not fit in `i64` is empty.
    pub fn for_page(&self, page: i64, per_page: i64) -> Collection {
        match page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(per_page))
        {
            Some(offset) => self.slice(offset, Some(per_page)),
            None => Collection::new(),
        }
    }
}

/// Merge collections the way list/map concatenation works: integer keys are
/// appended and renumbered, string keys overwrite in place.
pub(crate) fn merge_all<'a, I>(parts: I) -> Collection
where
    I: IntoIterator<Item = &'a Collection>,
{
    let mut result = Collection::new();
    let mut next = 0u64;
    for part in parts {
        for (key, value) in part.iter() {
            match key {
                Key::Int(_) => {
                    result.items_mut().insert(Key::Int(next), value.clone());
                    next += 1;
                }
                named => {
                    result.items_mut().insert(named.clone(), value.clone());
                }
            }
        }
    }
    result
}

fn flatten_into(out: &mut Vec<Value>, collection: &Collection, depth: usize) {
    for (_, value) in collection.iter() {
        match value {
            Value::Collection(inner) if depth == 1 => {
                out.extend(inner.iter().map(|(_, v)| v.clone()));
            }
            Value::Collection(inner) if depth > 1 => flatten_into(out, inner, depth - 1),
            other => out.push(other.clone()),
        }
    }
}

fn product(seeds: Vec<Vec<Value>>, lists: &[Collection]) -> Collection {
    let mut results = seeds;
    for list in lists {
        let mut extended = Vec::with_capacity(results.len() * list.count());
        for tuple in &results {
            for (_, item) in list.iter() {
                let mut next = tuple.clone();
                next.push(item.clone());
                extended.push(next);
            }
        }
        results = extended;
    }
    results
        .into_iter()
        .map(|tuple| Value::Collection(Collection::from_values(tuple)))
        .collect()
}
