//! Aggregation and ordering

use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;

use super::core::Collection;
use super::index::ValueIndex;
use super::key::Key;
use super::value::Value;

/// How `sort_by` compares computed sort keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortFlags {
    /// [`Value::compare`]
    #[default]
    Regular,
    /// Numeric view of each key, non-numeric values as 0
    Numeric,
    /// Text of each key, byte-wise
    String,
    /// Text of each key, ignoring ASCII case
    StringCaseInsensitive,
    /// Text of each key with digit runs compared as numbers (`"a2" < "a10"`)
    Natural,
}

impl SortFlags {
    pub fn compare(self, a: &Value, b: &Value) -> Ordering {
        match self {
            SortFlags::Regular => a.compare(b),
            SortFlags::Numeric => {
                let x = a.as_f64().unwrap_or(0.0);
                let y = b.as_f64().unwrap_or(0.0);
                x.total_cmp(&y)
            }
            SortFlags::String => a.to_text().cmp(&b.to_text()),
            SortFlags::StringCaseInsensitive => a
                .to_text()
                .to_ascii_lowercase()
                .cmp(&b.to_text().to_ascii_lowercase()),
            SortFlags::Natural => natural_cmp(&a.to_text(), &b.to_text()),
        }
    }
}

impl Collection {
    /// Numeric sum of the values; `0` when empty.
    ///
    /// Integers (and booleans, and integer strings) sum to an integer;
    /// any float, float string or overflow makes the result a float.
    /// Non-numeric values count as zero.
    pub fn sum(&self) -> Value {
        sum_values(self.iter().map(|(_, v)| v))
    }

    /// Sum of the `key` field of each record
    pub fn sum_by(&self, key: impl Into<Key>) -> Value {
        self.pluck(key).sum()
    }

    /// Arithmetic mean, `None` when empty
    pub fn avg(&self) -> Option<Value> {
        if self.is_empty() {
            return None;
        }
        let count = self.count();
        Some(match self.sum() {
            Value::Int(total) if total % count as i64 == 0 => Value::Int(total / count as i64),
            total => Value::Float(total.as_f64().unwrap_or(0.0) / count as f64),
        })
    }

    /// Mean of the `key` field of each record
    pub fn avg_by(&self, key: impl Into<Key>) -> Option<Value> {
        self.pluck(key).avg()
    }

    /// Middle value after an ascending sort; the mean of the two middle
    /// values for an even count. `None` when empty.
    pub fn median(&self) -> Option<Value> {
        if self.is_empty() {
            return None;
        }
        let sorted = self.sort().values();
        let count = sorted.count();
        let middle = count / 2;
        if count % 2 == 1 {
            return sorted.get(middle).cloned();
        }
        let pair = Collection::from_values([
            sorted.get_or(middle - 1, Value::Null),
            sorted.get_or(middle, Value::Null),
        ]);
        pair.avg()
    }

    /// Median of the `key` field of each record
    pub fn median_by(&self, key: impl Into<Key>) -> Option<Value> {
        self.pluck(key).median()
    }

    /// Most frequent value, `None` when empty.
    ///
    /// Which of several equally frequent values is returned is unspecified.
    pub fn mode(&self) -> Option<Value> {
        let mut index = ValueIndex::new();
        let mut counts: Vec<(&Value, usize)> = Vec::new();
        for (_, value) in self.iter() {
            let position = index.insert(value);
            if position == counts.len() {
                counts.push((value, 0));
            }
            counts[position].1 += 1;
        }
        counts.sort_by_key(|(_, n)| *n);
        counts.last().map(|(v, _)| (*v).clone())
    }

    /// Mode of the `key` field of each record
    pub fn mode_by(&self, key: impl Into<Key>) -> Option<Value> {
        self.pluck(key).mode()
    }

    pub fn min(&self) -> Option<Value> {
        self.iter().map(|(_, v)| v).min_by(|a, b| a.compare(b)).cloned()
    }

    pub fn max(&self) -> Option<Value> {
        self.iter().map(|(_, v)| v).max_by(|a, b| a.compare(b)).cloned()
    }

    /// Ascending stable sort by value, keys travel with their values
    pub fn sort(&self) -> Collection {
        self.sort_with(Value::compare)
    }

    /// Stable sort with a comparator, keys travel with their values
    pub fn sort_with<F>(&self, mut compare: F) -> Collection
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        let mut entries: Vec<(&Key, &Value)> = self.iter().collect();
        entries.sort_by(|(_, a), (_, b)| compare(a, b));
        entries
            .into_iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Sort by the key `f(value, key)` computes for each entry.
    ///
    /// Sort keys are computed once, sorted with `flags`, and the original
    /// values are then fetched back in that order. Ties keep their relative
    /// order in both directions.
    pub fn sort_by<F, V>(&self, mut f: F, flags: SortFlags, descending: bool) -> Collection
    where
        F: FnMut(&Value, &Key) -> V,
        V: Into<Value>,
    {
        let mut computed: Vec<(&Key, Value)> = self
            .iter()
            .map(|(k, v)| (k, f(v, k).into()))
            .collect();

        if descending {
            computed.sort_by(|(_, a), (_, b)| flags.compare(b, a));
        } else {
            computed.sort_by(|(_, a), (_, b)| flags.compare(a, b));
        }

        computed
            .into_iter()
            .filter_map(|(k, _)| self.get(k).map(|v| (k.clone(), v.clone())))
            .collect()
    }

    /// [`sort_by`](Self::sort_by) in descending order
    pub fn sort_by_desc<F, V>(&self, f: F, flags: SortFlags) -> Collection
    where
        F: FnMut(&Value, &Key) -> V,
        V: Into<Value>,
    {
        self.sort_by(f, flags, true)
    }

    /// Reverse order, keys travel with their values
    pub fn reverse(&self) -> Collection {
        self.iter()
            .rev()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Randomly permute the entries in place
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        let mut entries: Vec<(Key, Value)> = std::mem::take(self).into_iter().collect();
        entries.shuffle(rng);
        *self = entries.into_iter().collect();
        self
    }
}

fn sum_values<'a, I>(values: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut int_total: Option<i64> = Some(0);
    let mut float_total = 0.0;

    for value in values {
        let int_part = match value {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Str(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        match int_part {
            Some(n) => {
                int_total = int_total.and_then(|t| t.checked_add(n));
                float_total += n as f64;
            }
            None => {
                if let Some(f) = value.as_f64() {
                    int_total = None;
                    float_total += f;
                }
            }
        }
    }

    match int_total {
        Some(total) => Value::Int(total),
        None => Value::Float(float_total),
    }
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let mut xs = String::new();
                while let Some(c) = left.next_if(char::is_ascii_digit) {
                    xs.push(c);
                }
                let mut ys = String::new();
                while let Some(c) = right.next_if(char::is_ascii_digit) {
                    ys.push(c);
                }
                let xs_trimmed = xs.trim_start_matches('0');
                let ys_trimmed = ys.trim_start_matches('0');
                let ordering = xs_trimmed
                    .len()
                    .cmp(&ys_trimmed.len())
                    .then_with(|| xs_trimmed.cmp(ys_trimmed));
                if ordering.is_ne() {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                left.next();
                right.next();
            }
        }
    }
}
