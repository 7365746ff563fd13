use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Allowed range for `min_length`
pub const MIN_LENGTH_RANGE: RangeInclusive<u32> = 0..=1000;
/// Allowed range for `max_length`
pub const MAX_LENGTH_RANGE: RangeInclusive<u32> = 1..=5000;

pub const DEFAULT_MIN_LENGTH: u32 = 0;
pub const DEFAULT_MAX_LENGTH: u32 = 200;

/// Stable field identifier, assigned once at creation and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub u64);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable list option identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub u64);

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Field kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text
    #[default]
    Text,
    /// Integer input
    Number,
    /// Multi-line text
    TextArea,
    /// Single or multiple choice over `options`
    List,
}

impl FieldKind {
    /// Selector order
    pub const ALL: [FieldKind; 4] = [
        FieldKind::Text,
        FieldKind::Number,
        FieldKind::TextArea,
        FieldKind::List,
    ];

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::Text => "Texto",
            FieldKind::Number => "Número",
            FieldKind::TextArea => "Área de texto",
            FieldKind::List => "Lista",
        }
    }
}

/// One choice of a `List` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOption {
    pub id: OptionId,
    pub text: String,
}

/// One form field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: FieldId,
    /// Label and response-map key
    pub name: String,
    pub kind: FieldKind,
    /// Only meaningful for `List`; order is display order
    #[serde(default)]
    pub options: Vec<ListOption>,
    /// Only meaningful for `List`
    #[serde(default)]
    pub allow_multiple: bool,
    /// Only meaningful for `Text`
    pub min_length: u32,
    /// Only meaningful for `Text`; not required to be >= `min_length`
    pub max_length: u32,
}

impl FieldDescriptor {
    /// A default `Text` field
    pub fn new(id: FieldId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: FieldKind::Text,
            options: Vec::new(),
            allow_multiple: false,
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Option texts in display order
    pub fn option_texts(&self) -> Vec<String> {
        self.options.iter().map(|o| o.text.clone()).collect()
    }

    pub fn option_position(&self, option: OptionId) -> Option<usize> {
        self.options.iter().position(|o| o.id == option)
    }

    /// Sets `min_length`, clamped into [`MIN_LENGTH_RANGE`]
    pub fn set_min_length(&mut self, value: i64) {
        self.min_length = clamp_to(value, &MIN_LENGTH_RANGE);
    }

    /// Sets `max_length`, clamped into [`MAX_LENGTH_RANGE`]
    pub fn set_max_length(&mut self, value: i64) {
        self.max_length = clamp_to(value, &MAX_LENGTH_RANGE);
    }
}

/// Clamp a raw control value into a `u32` range
pub fn clamp_to(value: i64, range: &RangeInclusive<u32>) -> u32 {
    let lo = i64::from(*range.start());
    let hi = i64::from(*range.end());
    // lo..=hi fits in u32
    value.clamp(lo, hi) as u32
}

/// Default name for the field created when the schema holds `len` fields
pub fn default_field_name(len: usize) -> String {
    format!("Campo {}", len + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_descriptor_defaults() {
        let field = FieldDescriptor::new(FieldId(7), "Campo 1");
        assert_eq!(field.kind, FieldKind::Text);
        assert_eq!(field.min_length, 0);
        assert_eq!(field.max_length, 200);
        assert!(field.options.is_empty());
        assert!(!field.allow_multiple);
    }

    #[test]
    fn test_length_setters_clamp() {
        let mut field = FieldDescriptor::new(FieldId(1), "x");
        field.set_min_length(-5);
        assert_eq!(field.min_length, 0);
        field.set_min_length(2000);
        assert_eq!(field.min_length, 1000);
        field.set_max_length(0);
        assert_eq!(field.max_length, 1);
        field.set_max_length(9999);
        assert_eq!(field.max_length, 5000);
        field.set_max_length(300);
        assert_eq!(field.max_length, 300);
    }

    #[test]
    fn test_kind_labels() {
        let labels: Vec<&str> = FieldKind::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["Texto", "Número", "Área de texto", "Lista"]);
    }

    #[test]
    fn test_min_may_exceed_max() {
        let mut field = FieldDescriptor::new(FieldId(1), "x");
        field.set_min_length(900);
        field.set_max_length(10);
        assert!(field.min_length > field.max_length);
    }
}
