//! Raw records decoded from an RT response body.
//!
//! A [`Record`] is one entity's worth of `key: value` pairs, in the order the
//! server sent them. Lookups ignore ASCII case, because RT is not consistent
//! about key capitalization between endpoints (`id` vs `Id`, `CF.{Team}` vs
//! `CF.{team}`).

use serde::ser::{Serialize, SerializeMap, Serializer};

/// An ordered mapping from field name to raw string value.
///
/// Keys keep the spelling they had on the wire (trimmed). Values may contain
/// embedded newlines from continuation lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field value, ignoring ASCII case and surrounding whitespace in `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.fields[i].1.as_str())
    }

    /// Returns true if the record has a field called `name` (case-insensitive).
    pub fn contains_key(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterates over `(key, value)` pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates over the keys in wire order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Inserts a field. A key that is already present (ignoring case) keeps
    /// its position and takes the new value.
    pub(crate) fn insert(&mut self, key: String, value: String) {
        match self.position(&key) {
            Some(i) => self.fields[i].1 = value,
            None => self.fields.push((key, value)),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.fields
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k.into().trim().to_string(), v.into());
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
