//! Construction macro

/// Build a [`Collection`](crate::Collection) in place.
///
/// `collection![a, b, c]` builds a sequence, `collection!{k => v, ...}` a
/// mapping. Values go through `Into<Value>` and keys through `Into<Key>`.
///
/// ```
/// use kollect::collection;
///
/// let scores = collection!{"alice" => 3, "bob" => 5};
/// assert_eq!(scores.sum(), 8.into());
///
/// let nested = collection![collection![1, 2], collection![3, 4]];
/// assert_eq!(nested.collapse().count(), 4);
/// ```
#[macro_export]
macro_rules! collection {
    () => {
        $crate::Collection::new()
    };
    ($($key:tt => $value:expr),+ $(,)?) => {{
        let mut c = $crate::Collection::new();
        $( c.put($key, $value); )+
        c
    }};
    ($($value:expr),+ $(,)?) => {{
        let mut c = $crate::Collection::new();
        $( c.push($value); )+
        c
    }};
}
