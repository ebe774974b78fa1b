//! Transformation operations: map, filter and reduce family

use super::core::Collection;
use super::key::Key;
use super::value::Value;

impl Collection {
    /// New collection with the same keys, each value replaced by `f(value, key)`
    pub fn map<F, V>(&self, mut f: F) -> Collection
    where
        F: FnMut(&Value, &Key) -> V,
        V: Into<Value>,
    {
        self.iter()
            .map(|(k, v)| -> (Key, Value) { (k.clone(), f(v, k).into()) })
            .collect()
    }

    /// Merge the pairs returned by `f` for every entry into one collection.
    /// Colliding keys are overwritten by later entries.
    pub fn map_with_keys<F, I, K, V>(&self, mut f: F) -> Collection
    where
        F: FnMut(&Value, &Key) -> I,
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let mut result = Collection::new();
        for (key, value) in self.iter() {
            for (k, v) in f(value, key) {
                result.put(k, v);
            }
        }
        result
    }

    /// `map` followed by one level of `collapse`
    pub fn flat_map<F, V>(&self, f: F) -> Collection
    where
        F: FnMut(&Value, &Key) -> V,
        V: Into<Value>,
    {
        self.map(f).collapse()
    }

    /// Call `f` for each entry in order until it returns `false`
    pub fn each<F>(&self, mut f: F) -> &Self
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        for (key, value) in self.iter() {
            if !f(value, key) {
                break;
            }
        }
        self
    }

    /// Like [`each`](Self::each), spreading each tuple-shaped value into a
    /// slice of its elements. Scalars are passed as a one-element slice.
    pub fn each_spread<F>(&self, mut f: F) -> &Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        self.each(|value, _| match value {
            Value::Collection(tuple) => {
                let args: Vec<Value> = tuple.iter().map(|(_, v)| v.clone()).collect();
                f(&args)
            }
            scalar => f(std::slice::from_ref(scalar)),
        })
    }

    /// True when every entry satisfies `f`; true for an empty collection
    pub fn every<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        self.iter().all(|(k, v)| f(v, k))
    }

    /// Entries for which `f` holds, keys preserved
    pub fn filter<F>(&self, mut f: F) -> Collection
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        self.iter()
            .filter(|(k, v)| f(v, k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Entries whose value is truthy, keys preserved
    pub fn filter_truthy(&self) -> Collection {
        self.filter(|v, _| v.is_truthy())
    }

    /// Left fold over the values in order
    pub fn reduce<A, F>(&self, mut f: F, initial: A) -> A
    where
        F: FnMut(A, &Value) -> A,
    {
        self.iter().fold(initial, |acc, (_, v)| f(acc, v))
    }

    /// Replace every value in place with `f(value, key)`
    pub fn transform<F, V>(&mut self, mut f: F) -> &mut Self
    where
        F: FnMut(&Value, &Key) -> V,
        V: Into<Value>,
    {
        for (key, value) in self.items_mut().iter_mut() {
            *value = f(value, key).into();
        }
        self
    }

    /// Hand a copy to `f` and return the receiver unchanged
    pub fn tap<F>(&self, f: F) -> &Self
    where
        F: FnOnce(Collection),
    {
        f(self.clone());
        self
    }

    /// `f(self)` when `condition` holds, otherwise `self`
    pub fn when<F>(self, condition: bool, f: F) -> Collection
    where
        F: FnOnce(Collection) -> Collection,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    /// `f(self)` when `condition` holds, otherwise `otherwise(self)`
    pub fn when_else<F, G>(self, condition: bool, f: F, otherwise: G) -> Collection
    where
        F: FnOnce(Collection) -> Collection,
        G: FnOnce(Collection) -> Collection,
    {
        if condition {
            f(self)
        } else {
            otherwise(self)
        }
    }
}
