use super::catalog::FieldKey;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Typed value accepted by a sink custom field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    /// Option identifier of an enum field.
    Enum(String),
    Date(DateValue),
}

impl FieldValue {
    pub fn date(iso: impl Into<String>) -> Self {
        Self::Date(DateValue { date: iso.into() })
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) | Self::Enum(value) => Some(value),
            Self::Date(value) => Some(&value.date),
            _ => None,
        }
    }
}

/// Date-typed wrapper; the sink rejects bare strings on date fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateValue {
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedField {
    pub key: FieldKey,
    pub id: String,
    pub value: FieldValue,
}

/// Insertion-ordered field map. Serializes as `{ "<field id>": <value>, ... }`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedFieldSet {
    entries: Vec<NormalizedField>,
}

impl NormalizedFieldSet {
    pub(crate) fn insert(&mut self, key: FieldKey, id: &str, value: FieldValue) {
        let field = NormalizedField {
            key,
            id: id.to_string(),
            value,
        };
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(existing) => *existing = field,
            None => self.entries.push(field),
        }
    }

    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedField> {
        self.entries.iter()
    }

    pub fn keys(&self) -> Vec<FieldKey> {
        self.entries.iter().map(|entry| entry.key).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for NormalizedFieldSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.id, &entry.value)?;
        }
        map.end()
    }
}
