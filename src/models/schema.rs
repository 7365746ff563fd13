//! Form schema - the ordered, session-owned list of field descriptors

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::models::field::{default_field_name, FieldDescriptor, FieldId, FieldKind, ListOption, OptionId};

/// Lifecycle state derived from the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    Empty,
    HasFields,
}

/// Ordered field descriptors; insertion order is display order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    fields: Vec<FieldDescriptor>,
    /// Next id handed out to a field or option
    next_id: u64,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn state(&self) -> FormState {
        if self.fields.is_empty() {
            FormState::Empty
        } else {
            FormState::HasFields
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Appends a default `Text` field named `Campo N` (N = len + 1)
    pub fn add_field(&mut self) -> FieldId {
        let id = FieldId(self.allocate_id());
        let name = default_field_name(self.fields.len());
        self.fields.push(FieldDescriptor::new(id, name));
        id
    }

    /// Appends a fully configured field; ids are reassigned from this schema
    pub fn push_configured(
        &mut self,
        name: impl Into<String>,
        kind: FieldKind,
        options: &[String],
        allow_multiple: bool,
        min_length: i64,
        max_length: i64,
    ) -> FieldId {
        let id = FieldId(self.allocate_id());
        let mut field = FieldDescriptor::new(id, name);
        field.kind = kind;
        field.allow_multiple = allow_multiple;
        field.set_min_length(min_length);
        field.set_max_length(max_length);
        for text in options {
            let option = OptionId(self.allocate_id());
            field.options.push(ListOption {
                id: option,
                text: text.clone(),
            });
        }
        self.fields.push(field);
        id
    }

    /// Removes the field at `index`, shifting later fields down.
    /// The schema is untouched on error.
    pub fn remove_field(&mut self, index: usize) -> Result<FieldDescriptor, SchemaError> {
        if index >= self.fields.len() {
            return Err(SchemaError::IndexOutOfRange {
                index: i64::try_from(index).unwrap_or(i64::MAX),
                len: self.fields.len(),
            });
        }
        Ok(self.fields.remove(index))
    }

    /// Positional removal from an untrusted signed index
    pub fn remove_field_at(&mut self, index: i64) -> Result<FieldDescriptor, SchemaError> {
        match usize::try_from(index) {
            Ok(index) => self.remove_field(index),
            Err(_) => Err(SchemaError::IndexOutOfRange {
                index,
                len: self.fields.len(),
            }),
        }
    }

    pub fn position_of(&self, field: FieldId) -> Option<usize> {
        self.fields.iter().position(|f| f.id == field)
    }

    pub fn field(&self, field: FieldId) -> Result<&FieldDescriptor, SchemaError> {
        self.fields
            .iter()
            .find(|f| f.id == field)
            .ok_or(SchemaError::FieldNotFound { field })
    }

    pub fn field_mut(&mut self, field: FieldId) -> Result<&mut FieldDescriptor, SchemaError> {
        self.fields
            .iter_mut()
            .find(|f| f.id == field)
            .ok_or(SchemaError::FieldNotFound { field })
    }

    pub fn remove_field_by_id(&mut self, field: FieldId) -> Result<FieldDescriptor, SchemaError> {
        let index = self
            .position_of(field)
            .ok_or(SchemaError::FieldNotFound { field })?;
        self.remove_field(index)
    }

    fn list_field_mut(&mut self, field: FieldId) -> Result<&mut FieldDescriptor, SchemaError> {
        let descriptor = self.field_mut(field)?;
        if descriptor.kind != FieldKind::List {
            return Err(SchemaError::WrongKind {
                field,
                expected: FieldKind::List,
                actual: descriptor.kind,
            });
        }
        Ok(descriptor)
    }

    /// Appends the trimmed text as a new option.
    /// Blank input is ignored and yields `Ok(None)`.
    pub fn add_option(&mut self, field: FieldId, text: &str) -> Result<Option<OptionId>, SchemaError> {
        let text = text.trim();
        self.list_field_mut(field)?;
        if text.is_empty() {
            return Ok(None);
        }
        let option = OptionId(self.allocate_id());
        self.list_field_mut(field)?.options.push(ListOption {
            id: option,
            text: text.to_string(),
        });
        Ok(Some(option))
    }

    /// Replaces an option's text in place (no trimming, matching a free text control)
    pub fn edit_option(&mut self, field: FieldId, option: OptionId, text: &str) -> Result<(), SchemaError> {
        let descriptor = self.list_field_mut(field)?;
        let entry = descriptor
            .options
            .iter_mut()
            .find(|o| o.id == option)
            .ok_or(SchemaError::OptionNotFound { field, option })?;
        entry.text = text.to_string();
        Ok(())
    }

    /// Removes an option, shifting later options down
    pub fn remove_option(&mut self, field: FieldId, option: OptionId) -> Result<ListOption, SchemaError> {
        let descriptor = self.list_field_mut(field)?;
        let position = descriptor
            .option_position(option)
            .ok_or(SchemaError::OptionNotFound { field, option })?;
        Ok(descriptor.options.remove(position))
    }
}
