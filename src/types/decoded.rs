//! Decoded field values handed to callers

use serde::Serialize;
use serde::ser::Serializer;

use super::Value;

/// One named field decoded from a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct DecodedField {
    pub name: String,
    pub description: String,
    pub unit: String,
    pub value: Value,
}

/// Value and unit of a field inside a [`DecodedRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct FieldValue {
    pub value: Value,
    pub unit: String,
}

/// Every decodable field of one record, in catalog declaration order.
///
/// Serializes as a map of `name -> { value, unit }`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedRecord {
    entries: Vec<(String, FieldValue)>,
}

impl DecodedRecord {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    pub(crate) fn push(&mut self, name: String, field: FieldValue) {
        self.entries.push((name, field));
    }

    /// Get a field by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name.eq_ignore_ascii_case(name))
            .map(|(_, field)| field)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> + '_ {
        self.entries.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for DecodedRecord {
    type Item = (String, FieldValue);
    type IntoIter = std::vec::IntoIter<(String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for DecodedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(name, field)| (name, field)))
    }
}
