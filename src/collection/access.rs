//! Access and key operations

use rand::Rng;
use std::collections::HashSet;
use tracing::trace;

use super::core::Collection;
use super::key::Key;
use super::value::Value;
use crate::error::{KollectError, Result};

impl Collection {
    /// Value at `key`, or `None` when absent
    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        self.all().get(&key.into())
    }

    /// Value at `key`, or `default` when absent
    pub fn get_or(&self, key: impl Into<Key>, default: impl Into<Value>) -> Value {
        match self.get(key) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    pub fn has(&self, key: impl Into<Key>) -> bool {
        self.all().contains_key(&key.into())
    }

    /// Same as [`has`](Self::has)
    pub fn search(&self, key: impl Into<Key>) -> bool {
        self.has(key)
    }

    /// New collection with only the listed keys, in receiver order
    pub fn only<I, K>(&self, keys: I) -> Collection
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        let wanted: HashSet<Key> = keys.into_iter().map(Into::into).collect();
        self.iter()
            .filter(|(k, _)| wanted.contains(*k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Remove the listed keys in place.
    ///
    /// A key that is not present at the top level is read as a dotted path
    /// (`"a.b.c"`) into nested collections; the walk stops silently when a
    /// segment is missing or not a collection. Fails when no keys are given.
    pub fn except<I, K>(&mut self, keys: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        let keys: Vec<Key> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Err(KollectError::InvalidArgument(
                "except requires at least one key".to_string(),
            ));
        }

        for key in keys {
            if self.items_mut().shift_remove(&key).is_some() {
                continue;
            }
            if let Key::Str(path) = &key {
                if !forget_path(self, path) {
                    trace!(path = %path, "except: path not found");
                }
            }
        }

        Ok(self)
    }

    /// Remove top-level keys in place; missing keys are ignored
    pub fn forget<I, K>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        for key in keys {
            self.items_mut().shift_remove(&key.into());
        }
        self
    }

    /// Remove `key` and return its value
    pub fn pull(&mut self, key: impl Into<Key>) -> Option<Value> {
        self.items_mut().shift_remove(&key.into())
    }

    /// Sequence of the keys
    pub fn keys(&self) -> Collection {
        self.iter().map(|(k, _)| k.to_value()).collect()
    }

    /// Sequence of the values, renumbered from 0
    pub fn values(&self) -> Collection {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn first(&self) -> Option<&Value> {
        self.all().first().map(|(_, v)| v)
    }

    pub fn last(&self) -> Option<&Value> {
        self.all().last().map(|(_, v)| v)
    }

    /// Uniformly chosen value, `None` when empty
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Value> {
        if self.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.count());
        self.get_index(index).map(|(_, v)| v)
    }
}

fn forget_path(collection: &mut Collection, path: &str) -> bool {
    let segments: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };

    let mut current = collection;
    for segment in parents {
        match current
            .items_mut()
            .get_mut(&Key::from(*segment))
            .and_then(Value::as_collection_mut)
        {
            Some(nested) => current = nested,
            None => return false,
        }
    }

    current.items_mut().shift_remove(&Key::from(*last)).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_get_and_default() {
        let c = collection!{"a" => 1};
        assert_eq!(c.get("a"), Some(&Value::from(1)));
        assert_eq!(c.get("b"), None);
        assert_eq!(c.get_or("b", "fallback"), Value::from("fallback"));
        assert_eq!(c.get_or("a", 0), Value::from(1));
    }

    #[test]
    fn test_has_and_search() {
        let c = collection![10, 20];
        assert!(c.has(1));
        assert!(c.has("1"));
        assert!(!c.has(2));
        assert!(c.search(0));
    }

    #[test]
    fn test_only_keeps_receiver_order() {
        let c = collection!{"a" => 1, "b" => 2, "c" => 3};
        assert_eq!(c.only(["c", "a", "zz"]), collection!{"a" => 1, "c" => 3});
    }

    #[test]
    fn test_except_top_level() {
        let mut c = collection!{"a" => 1, "b" => 2};
        c.except(["a"]).unwrap();
        assert_eq!(c, collection!{"b" => 2});
    }

    #[test]
    fn test_except_dotted_path() {
        let mut c = collection!{
            "user" => collection!{"name" => "ada", "meta" => collection!{"token" => "t", "age" => 36}},
            "id" => 1
        };
        c.except(["user.meta.token"]).unwrap();
        assert_eq!(
            c,
            collection!{
                "user" => collection!{"name" => "ada", "meta" => collection!{"age" => 36}},
                "id" => 1
            }
        );
    }

    #[test]
    fn test_except_path_through_scalar_is_noop() {
        let mut c = collection!{"a" => 1, "b" => collection!{"c" => 2}};
        let before = c.clone();
        c.except(["a.x", "b.c.d", "missing.key"]).unwrap();
        assert_eq!(c, before);
    }

    #[test]
    fn test_except_path_with_numeric_segment() {
        let mut c = collection!{"rows" => collection![collection!{"x" => 1, "y" => 2}]};
        c.except(["rows.0.y"]).unwrap();
        assert_eq!(c, collection!{"rows" => collection![collection!{"x" => 1}]});
    }

    #[test]
    fn test_except_requires_keys() {
        let mut c = collection!{"a" => 1};
        let result = c.except(Vec::<Key>::new());
        assert!(matches!(result, Err(KollectError::InvalidArgument(_))));
    }

    #[test]
    fn test_forget_has_no_path_support() {
        let mut c = collection!{"a" => collection!{"b" => 1}, "c" => 2};
        c.forget(["a.b", "c", "nope"]);
        assert_eq!(c, collection!{"a" => collection!{"b" => 1}});
    }

    #[test]
    fn test_pull() {
        let mut c = collection!{"a" => 1, "b" => 2};
        assert_eq!(c.pull("a"), Some(Value::from(1)));
        assert_eq!(c.pull("a"), None);
        assert_eq!(c, collection!{"b" => 2});
    }

    #[test]
    fn test_keys_and_values() {
        let c = collection!{"x" => 1, 7 => 2};
        assert_eq!(c.keys(), collection!["x", 7]);
        assert_eq!(c.values(), collection![1, 2]);
    }

    #[test]
    fn test_first_last() {
        let c = collection!{"z" => 1, "a" => 2};
        assert_eq!(c.first(), Some(&Value::from(1)));
        assert_eq!(c.last(), Some(&Value::from(2)));
        assert_eq!(Collection::new().first(), None);
        assert_eq!(Collection::new().last(), None);
    }

    #[test]
    fn test_random_is_member_and_seeded() {
        let c = collection![1, 2, 3, 4, 5];
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let picked = c.random(&mut a).cloned();
        assert!(picked.is_some());
        assert!(c.values().iter().any(|(_, v)| Some(v) == picked.as_ref()));
        assert_eq!(picked.as_ref(), c.random(&mut b));
        assert_eq!(Collection::new().random(&mut a), None);
    }
}
