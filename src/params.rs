//! Ordered, multi-valued query parameter store.
//!
//! Keys keep first-seen order and duplicate keys accumulate values instead of
//! being deduplicated, so `a=1&b=2&a=3` survives a decode/encode round trip
//! with both `a` values intact. Encoding is deterministic: keys in insertion
//! order, values in append order.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Query parameters as an insertion-ordered multimap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    entries: Vec<(String, Vec<String>)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All values recorded for `key`, in append order.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Appends a value for `key`, creating the key if it is new.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Parses an `a=b&c=d` form into the store, appending to existing entries.
    ///
    /// Percent- and `+`-decoding follow `application/x-www-form-urlencoded`
    /// rules; a key without `=` decodes to an empty value.
    pub fn decode(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            self.add(key.into_owned(), value.into_owned());
        }
    }

    /// Serializes the store back to `a=b&c=d` form.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.entries {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// Unions `other` into `self`: value sequences concatenate per key, and
    /// keys new to `self` are appended in `other`'s order.
    pub fn merge(&mut self, other: Params) {
        for (key, values) in other.entries {
            match self.entries.iter_mut().find(|(k, _)| *k == key) {
                Some((_, existing)) => existing.extend(values),
                None => self.entries.push((key, values)),
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl From<Vec<(String, String)>> for Params {
    fn from(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.add(key, value);
        }
        params
    }
}
