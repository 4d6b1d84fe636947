use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Typed key/value access the host provides per player, world or item.
///
/// Getters return the caller-supplied default when a key is missing or holds
/// a value of another type.
pub trait KvStore {
    fn get_int(&self, key: &str, default: i64) -> i64;
    fn get_float(&self, key: &str, default: f64) -> f64;
    fn get_bool(&self, key: &str, default: bool) -> bool;
    fn get_string(&self, key: &str, default: &str) -> String;

    fn set_int(&mut self, key: &str, value: i64);
    fn set_float(&mut self, key: &str, value: f64);
    fn set_bool(&mut self, key: &str, value: bool);
    fn set_string(&mut self, key: &str, value: &str);

    fn contains(&self, key: &str) -> bool;

    /// Returns true if a value was removed.
    fn remove(&mut self, key: &str) -> bool;
}

/// One stored scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoredValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// In-memory store. Serializable so a whole store can be written as a save file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    values: BTreeMap<String, StoredValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&StoredValue> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: StoredValue) {
        self.values.insert(key.to_string(), value);
    }
}

impl KvStore for MemoryStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.values.get(key) {
            Some(StoredValue::Int(v)) => *v,
            _ => default,
        }
    }

    fn get_float(&self, key: &str, default: f64) -> f64 {
        match self.values.get(key) {
            Some(StoredValue::Float(v)) if v.is_finite() => *v,
            _ => default,
        }
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(StoredValue::Bool(v)) => *v,
            _ => default,
        }
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            Some(StoredValue::Text(v)) => v.clone(),
            _ => default.to_string(),
        }
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.set(key, StoredValue::Int(value));
    }

    fn set_float(&mut self, key: &str, value: f64) {
        self.set(key, StoredValue::Float(value));
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, StoredValue::Bool(value));
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.set(key, StoredValue::Text(value.to_string()));
    }

    fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }
}
