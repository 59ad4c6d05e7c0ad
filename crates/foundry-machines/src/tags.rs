//! Host-owned key/value state attached to items and block entities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Int(i64),
    Str(String),
    Ints(Vec<i64>),
    List(Vec<String>),
}

/// Versioned tag map. Reads of missing or mistyped keys yield zero/empty;
/// every write bumps [`TagRecord::version`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    #[serde(default)]
    version: u64,
    #[serde(default)]
    values: BTreeMap<String, TagValue>,
}

impl TagRecord {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.values.get(key)
    }

    pub fn get_int(&self, key: &str) -> i64 {
        match self.values.get(key) {
            Some(TagValue::Int(v)) => *v,
            _ => 0,
        }
    }

    pub fn get_str(&self, key: &str) -> String {
        match self.values.get(key) {
            Some(TagValue::Str(s)) => s.clone(),
            _ => String::new(),
        }
    }

    pub fn get_ints(&self, key: &str) -> Vec<i64> {
        match self.values.get(key) {
            Some(TagValue::Ints(v)) => v.clone(),
            _ => Vec::new(),
        }
    }

    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.values.get(key) {
            Some(TagValue::List(v)) => v.clone(),
            _ => Vec::new(),
        }
    }

    pub fn put(&mut self, key: impl Into<String>, value: TagValue) {
        self.values.insert(key.into(), value);
        self.version += 1;
    }

    pub fn put_int(&mut self, key: impl Into<String>, value: i64) {
        self.put(key, TagValue::Int(value));
    }

    pub fn put_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.put(key, TagValue::Str(value.into()));
    }

    pub fn put_ints(&mut self, key: impl Into<String>, value: Vec<i64>) {
        self.put(key, TagValue::Ints(value));
    }

    pub fn put_list(&mut self, key: impl Into<String>, value: Vec<String>) {
        self.put(key, TagValue::List(value));
    }

    pub fn remove(&mut self, key: &str) -> Option<TagValue> {
        let old = self.values.remove(key);
        if old.is_some() {
            self.version += 1;
        }
        old
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
