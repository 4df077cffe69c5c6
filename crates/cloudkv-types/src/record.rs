use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Customer-provided values stored under a key. Opaque to cloudkv.
pub type Values = BTreeMap<String, String>;

/// Version metadata attached to a record. Owned by the conflict resolver;
/// the store engine only passes it through.
pub type Version = BTreeMap<String, String>;

/// A stored entry: the caller's values plus resolver-defined version metadata.
///
/// Records are immutable once built. An update produces a new `Record`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    values: Values,
    /// Older blobs were written without versions.
    #[serde(default)]
    version: Version,
}

impl Record {
    pub fn new(values: Values, version: Version) -> Self {
        Self { values, version }
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Split the record into its values and version.
    pub fn into_parts(self) -> (Values, Version) {
        (self.values, self.version)
    }
}

/// The decoded content of one blob: logical key to [`Record`].
///
/// Keys are unique within a set. Iteration is in key order, so encoding the
/// same set twice yields identical text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: BTreeMap<String, Record>,
}

impl RecordSet {
    /// Create an empty record set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Insert a record, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, record: Record) -> Option<Record> {
        self.records.insert(key.into(), record)
    }

    pub fn remove(&mut self, key: &str) -> Option<Record> {
        self.records.remove(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Record> {
        self.records.iter()
    }

    /// Remove every record, leaving the set empty.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Move every record of `other` into this set, replacing existing keys.
    pub fn absorb(&mut self, other: RecordSet) {
        self.records.extend(other.records);
    }

    /// Encode as the JSON blob wire format.
    pub fn encode(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(|e| CodecError::Encode(e.to_string()))
    }

    /// Decode a blob's JSON content.
    ///
    /// Fails with [`CodecError::Malformed`] if the text is not a JSON object
    /// of records whose `values` (and optional `version`) are string maps.
    pub fn decode(content: &str) -> Result<Self, CodecError> {
        serde_json::from_str(content).map_err(|e| CodecError::Malformed(e.to_string()))
    }
}

impl IntoIterator for RecordSet {
    type Item = (String, Record);
    type IntoIter = btree_map::IntoIter<String, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = (&'a String, &'a Record);
    type IntoIter = btree_map::Iter<'a, String, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<(String, Record)> for RecordSet {
    fn from_iter<I: IntoIterator<Item = (String, Record)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
