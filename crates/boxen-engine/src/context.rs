use std::collections::BTreeMap;

use serde_json::Value;

/// Session-lifetime key/value state shared by every menu level.
///
/// Keys used to hand a value from one scope to the next must be taken with
/// [`Context::take_str`] or [`Context::remove`] by the receiving scope so
/// they are gone before it descends any further.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: BTreeMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Removes `key` and returns it when it held a string.
    pub fn take_str(&mut self, key: &str) -> Option<String> {
        match self.values.remove(key)? {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
