use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::models::field::FieldId;

/// A captured answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// No answer (single-choice list without options)
    Null,
    Integer(i64),
    Text(String),
    Choices(Vec<String>),
}

/// Raw answers as submitted, keyed by field id
pub type AnswerInputs = HashMap<FieldId, AnswerValue>;

/// Answers keyed by field name, in field order.
///
/// A repeated name replaces the earlier value in its original slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMap {
    entries: Vec<(String, AnswerValue)>,
}

impl ResponseMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the value it overwrote
    pub fn insert(&mut self, name: impl Into<String>, value: AnswerValue) -> Option<AnswerValue> {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&AnswerValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Structured text rendering shown after submission
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for ResponseMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
