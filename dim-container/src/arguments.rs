//! Sparse, insertion-ordered argument maps.
//!
//! An [`ArgumentMap`] carries the values a caller supplies for specific
//! parameters, keyed by parameter name or position. Keys need not cover
//! every parameter; whatever is missing is filled from defaults or the
//! container during resolution.

use std::fmt;

use indexmap::IndexMap;

use crate::key::ArgumentKey;
use crate::value::Value;

/// Builds an [`ArgumentMap`] from `key => value` pairs.
///
/// Keys convert into [`ArgumentKey`] (`usize` positions, `&str`/`String`
/// names). Values are wrapped with [`Value::new`], so existing `Value`s
/// pass through unchanged.
///
/// ```
/// use dim_container::args;
///
/// let arguments = args! { "bar" => "bar", 2 => "foobar" };
/// assert_eq!(arguments.len(), 2);
/// assert!(arguments.get_name("bar").is_some());
/// assert!(arguments.get_position(2).is_some());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::arguments::ArgumentMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::arguments::ArgumentMap::new();
        $( map.insert($key, $crate::value::Value::new($value)); )+
        map
    }};
}

/// Insertion-ordered map from [`ArgumentKey`] to [`Value`].
///
/// Inserting an existing key replaces its value in place. [`push`] appends
/// under the next free position, one past the greatest position key so
/// far, so a map written as `{3: 4, 5, 6}` holds `{3: 4, 4: 5, 5: 6}`.
///
/// [`push`]: ArgumentMap::push
#[derive(Clone, Default)]
pub struct ArgumentMap {
    entries: IndexMap<ArgumentKey, Value>,
}

impl ArgumentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map holding `values` at positions `0..n`.
    ///
    /// ```
    /// use dim_container::arguments::ArgumentMap;
    /// use dim_container::value::Value;
    ///
    /// let arguments = ArgumentMap::positional([Value::new(1), Value::new(2)]);
    /// assert_eq!(arguments.get_position(1).unwrap().cast::<i32>().unwrap(), 2);
    /// ```
    pub fn positional(values: impl IntoIterator<Item = Value>) -> Self {
        let mut map = Self::new();
        for value in values {
            map.push(value);
        }
        map
    }

    /// Inserts or replaces the value under `key`, returning the old value.
    pub fn insert(&mut self, key: impl Into<ArgumentKey>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    /// Builder-style [`insert`](ArgumentMap::insert) that wraps `value`.
    ///
    /// ```
    /// use dim_container::arguments::ArgumentMap;
    ///
    /// let arguments = ArgumentMap::new().with("bar", "bar").with(1, 42u8);
    /// assert_eq!(arguments.len(), 2);
    /// ```
    pub fn with<T>(mut self, key: impl Into<ArgumentKey>, value: T) -> Self
    where
        T: std::any::Any + Send + Sync,
    {
        self.insert(key, Value::new(value));
        self
    }

    /// Appends `value` under the next free position and returns that position.
    pub fn push(&mut self, value: Value) -> usize {
        let position = self.next_position();
        self.entries.insert(ArgumentKey::Position(position), value);
        position
    }

    fn next_position(&self) -> usize {
        self.entries
            .keys()
            .filter_map(ArgumentKey::position)
            .max()
            .map_or(0, |max| max + 1)
    }

    pub fn get(&self, key: &ArgumentKey) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_name(&self, name: &str) -> Option<&Value> {
        self.entries.get(&ArgumentKey::Name(name.to_string()))
    }

    pub fn get_position(&self, position: usize) -> Option<&Value> {
        self.entries.get(&ArgumentKey::Position(position))
    }

    /// The entry at `index` in insertion order, whatever its key.
    pub fn get_index(&self, index: usize) -> Option<(&ArgumentKey, &Value)> {
        self.entries.get_index(index)
    }

    pub fn contains_key(&self, key: &ArgumentKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &ArgumentKey) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, ArgumentKey, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, ArgumentKey, Value> {
        self.entries.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, ArgumentKey, Value> {
        self.entries.values()
    }

    /// Shallow, key-wise union where `self` wins.
    ///
    /// Entries of `self` come first, in their order; entries of `defaults`
    /// whose key is not in `self` follow, in theirs. Values are never
    /// merged or inspected.
    ///
    /// ```
    /// use dim_container::args;
    ///
    /// let call = args! { 0 => 4, 1 => 5 };
    /// let defaults = args! { 0 => 1, 1 => 2, 2 => 3 };
    /// let merged = call.overlay(&defaults);
    ///
    /// let values: Vec<i32> = merged.values().map(|v| v.cast().unwrap()).collect();
    /// assert_eq!(values, vec![4, 5, 3]);
    /// ```
    pub fn overlay(mut self, defaults: &ArgumentMap) -> ArgumentMap {
        for (key, value) in &defaults.entries {
            self.entries
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        self
    }
}

impl fmt::Debug for ArgumentMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<ArgumentKey>> FromIterator<(K, Value)> for ArgumentMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<ArgumentKey>> Extend<(K, Value)> for ArgumentMap {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for ArgumentMap {
    type Item = (ArgumentKey, Value);
    type IntoIter = indexmap::map::IntoIter<ArgumentKey, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ArgumentMap {
    type Item = (&'a ArgumentKey, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, ArgumentKey, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(map: &ArgumentMap) -> Vec<(ArgumentKey, i32)> {
        map.iter()
            .map(|(k, v)| (k.clone(), v.cast::<i32>().unwrap()))
            .collect()
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut map = args! { "a" => 1, "b" => 2 };
        let old = map.insert("a", Value::new(10));
        assert_eq!(old.unwrap().cast::<i32>().unwrap(), 1);
        assert_eq!(
            ints(&map),
            vec![(ArgumentKey::from("a"), 10), (ArgumentKey::from("b"), 2)]
        );
    }

    #[test]
    fn push_continues_after_greatest_position() {
        let mut map = args! { 3 => 4 };
        assert_eq!(map.push(Value::new(5)), 4);
        assert_eq!(map.push(Value::new(6)), 5);
        assert_eq!(map.get_position(4).unwrap().cast::<i32>().unwrap(), 5);
    }

    #[test]
    fn push_ignores_named_keys() {
        let mut map = args! { "name" => 1 };
        assert_eq!(map.push(Value::new(2)), 0);
    }

    #[test]
    fn overlay_call_time_fully_overrides() {
        let call = args! { 0 => 4, 1 => 5, 2 => 6 };
        let defaults = args! { 0 => 1, 1 => 2, 2 => 3 };
        let merged = call.overlay(&defaults);
        assert_eq!(
            ints(&merged),
            vec![
                (ArgumentKey::from(0), 4),
                (ArgumentKey::from(1), 5),
                (ArgumentKey::from(2), 6),
            ]
        );
    }

    #[test]
    fn overlay_keeps_default_only_keys() {
        let mut call = args! { 3 => 4 };
        call.push(Value::new(5));
        call.push(Value::new(6));
        let defaults = ArgumentMap::positional([Value::new(1), Value::new(2), Value::new(3)]);

        let merged = call.overlay(&defaults);
        assert_eq!(
            ints(&merged),
            vec![
                (ArgumentKey::from(3), 4),
                (ArgumentKey::from(4), 5),
                (ArgumentKey::from(5), 6),
                (ArgumentKey::from(0), 1),
                (ArgumentKey::from(1), 2),
                (ArgumentKey::from(2), 3),
            ]
        );
    }

    #[test]
    fn overlay_is_shallow_and_key_wise() {
        // a name key and a position key never shadow each other
        let call = args! { "foo" => 1 };
        let defaults = args! { 0 => 2 };
        let merged = call.overlay(&defaults);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn remove_and_contains() {
        let mut map = args! { "a" => 1, 1 => 2 };
        assert!(map.contains_key(&ArgumentKey::from(1)));
        assert!(map.remove(&ArgumentKey::from(1)).is_some());
        assert!(!map.contains_key(&ArgumentKey::from(1)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut map = args! { "a" => 1, "b" => 2, "c" => 3 };
        map.remove(&ArgumentKey::from("a"));
        assert_eq!(
            ints(&map),
            vec![(ArgumentKey::from("b"), 2), (ArgumentKey::from("c"), 3)]
        );
        assert_eq!(map.get_index(0).unwrap().0, &ArgumentKey::from("b"));
    }

    #[test]
    fn get_index_follows_insertion_order() {
        let mut map = args! { 2 => 10, "name" => 20 };
        map.insert(2, Value::new(30));
        let (key, value) = map.get_index(0).unwrap();
        assert_eq!(key, &ArgumentKey::from(2));
        assert_eq!(value.cast::<i32>().unwrap(), 30);
        assert!(map.get_index(2).is_none());
    }

    #[test]
    fn with_chains_inserts() {
        let map = ArgumentMap::new()
            .with("a", 1)
            .with(0, 2)
            .with("a", 3);
        assert_eq!(
            ints(&map),
            vec![(ArgumentKey::from("a"), 3), (ArgumentKey::from(0), 2)]
        );
    }

    #[test]
    fn collect_from_pairs() {
        let map: ArgumentMap = vec![("a", Value::new(1)), ("a", Value::new(2))]
            .into_iter()
            .collect();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get_name("a").unwrap().cast::<i32>().unwrap(), 2);
    }

    #[test]
    fn debug_lists_entries() {
        let map = args! { "a" => 1 };
        assert_eq!(format!("{map:?}"), "{\"a\": Value(i32)}");
    }
}
