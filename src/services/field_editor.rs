//! Field editor - applies editing actions and derives the editing controls
//!
//! Every control key is built from the stable ids of the field (and option)
//! it is bound to, so removing an element never rebinds a control to a
//! different descriptor.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppResult;
use crate::models::field::{MAX_LENGTH_RANGE, MIN_LENGTH_RANGE};
use crate::models::{FieldDescriptor, FieldId, FieldKind, FormSchema, OptionId};

/// One editing action, as dispatched by an editor control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditorAction {
    AddField,
    RemoveField { field: FieldId },
    /// Positional removal; negative or past-the-end indices are rejected
    RemoveFieldAt { index: i64 },
    Rename { field: FieldId, name: String },
    ChangeKind { field: FieldId, kind: FieldKind },
    SetMinLength { field: FieldId, value: i64 },
    SetMaxLength { field: FieldId, value: i64 },
    AddOption { field: FieldId, text: String },
    EditOption { field: FieldId, option: OptionId, text: String },
    RemoveOption { field: FieldId, option: OptionId },
    SetAllowMultiple { field: FieldId, allow_multiple: bool },
}

// ========== View model ==========

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextControl {
    pub key: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberControl {
    pub key: String,
    pub label: String,
    pub min: u32,
    pub max: u32,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectControl {
    pub key: String,
    pub label: String,
    pub options: Vec<String>,
    pub selected: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckboxControl {
    pub key: String,
    pub label: String,
    pub checked: bool,
}

/// A button bound to the action it dispatches
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionControl {
    pub key: String,
    pub label: String,
    pub action: EditorAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextConfigView {
    pub min_length: NumberControl,
    pub max_length: NumberControl,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionEditorView {
    pub id: OptionId,
    pub text: TextControl,
    pub remove: ActionControl,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListConfigView {
    pub new_option: TextControl,
    /// Dispatched with the text typed into `new_option`
    pub add_option: ActionControl,
    pub options: Vec<OptionEditorView>,
    pub allow_multiple: CheckboxControl,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldEditorView {
    pub id: FieldId,
    pub heading: String,
    pub name: TextControl,
    pub kind: SelectControl,
    pub remove: ActionControl,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_config: Option<TextConfigView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_config: Option<ListConfigView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorFooter {
    /// Divider followed by "add field", below the last field
    AddField { action: ActionControl },
    /// Shown instead of the field list when the schema is empty
    Empty { message: String, action: ActionControl },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorView {
    pub fields: Vec<FieldEditorView>,
    pub footer: EditorFooter,
}

pub const EMPTY_SCHEMA_MESSAGE: &str =
    "Nenhum campo adicionado ainda. Clique abaixo para começar!";

/// Field editor service
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldEditor;

impl FieldEditor {
    pub fn new() -> Self {
        Self
    }

    /// Applies one action to a snapshot and returns the next snapshot.
    /// On error the input snapshot is the one still in effect.
    pub fn apply(&self, schema: &FormSchema, action: EditorAction) -> AppResult<FormSchema> {
        let mut next = schema.clone();
        match action {
            EditorAction::AddField => {
                let id = next.add_field();
                debug!("added field {} (len {})", id, next.len());
            }
            EditorAction::RemoveField { field } => {
                let removed = next.remove_field_by_id(field)?;
                debug!("removed field {} '{}'", removed.id, removed.name);
            }
            EditorAction::RemoveFieldAt { index } => {
                let removed = next.remove_field_at(index)?;
                debug!("removed field at {} ('{}')", index, removed.name);
            }
            EditorAction::Rename { field, name } => {
                next.field_mut(field)?.name = name;
            }
            EditorAction::ChangeKind { field, kind } => {
                next.field_mut(field)?.kind = kind;
            }
            EditorAction::SetMinLength { field, value } => {
                next.field_mut(field)?.set_min_length(value);
            }
            EditorAction::SetMaxLength { field, value } => {
                next.field_mut(field)?.set_max_length(value);
            }
            EditorAction::AddOption { field, text } => {
                if next.add_option(field, &text)?.is_none() {
                    debug!("ignored blank option for field {}", field);
                }
            }
            EditorAction::EditOption {
                field,
                option,
                text,
            } => {
                next.edit_option(field, option, &text)?;
            }
            EditorAction::RemoveOption { field, option } => {
                next.remove_option(field, option)?;
            }
            EditorAction::SetAllowMultiple {
                field,
                allow_multiple,
            } => {
                next.field_mut(field)?.allow_multiple = allow_multiple;
            }
        }
        Ok(next)
    }

    /// Derives the editing controls for every field
    pub fn view(&self, schema: &FormSchema) -> EditorView {
        let fields: Vec<FieldEditorView> = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(position, field)| self.field_view(position, field))
            .collect();

        let footer = if fields.is_empty() {
            EditorFooter::Empty {
                message: EMPTY_SCHEMA_MESSAGE.to_string(),
                action: ActionControl {
                    key: "add_first_field".to_string(),
                    label: "➕ Adicionar primeiro campo".to_string(),
                    action: EditorAction::AddField,
                },
            }
        } else {
            EditorFooter::AddField {
                action: ActionControl {
                    key: "add_field".to_string(),
                    label: "➕ Adicionar novo campo".to_string(),
                    action: EditorAction::AddField,
                },
            }
        };

        EditorView { fields, footer }
    }

    fn field_view(&self, position: usize, field: &FieldDescriptor) -> FieldEditorView {
        let id = field.id;
        let selected = FieldKind::ALL
            .iter()
            .position(|kind| *kind == field.kind)
            .unwrap_or(0);

        let text_config = (field.kind == FieldKind::Text).then(|| TextConfigView {
            min_length: NumberControl {
                key: format!("min_{id}"),
                label: "Mínimo de caracteres".to_string(),
                min: *MIN_LENGTH_RANGE.start(),
                max: *MIN_LENGTH_RANGE.end(),
                value: field.min_length,
            },
            max_length: NumberControl {
                key: format!("max_{id}"),
                label: "Máximo de caracteres".to_string(),
                min: *MAX_LENGTH_RANGE.start(),
                max: *MAX_LENGTH_RANGE.end(),
                value: field.max_length,
            },
        });

        let list_config = (field.kind == FieldKind::List).then(|| self.list_view(field));

        FieldEditorView {
            id,
            heading: format!("Campo {}", position + 1),
            name: TextControl {
                key: format!("nome_{id}"),
                label: "Nome do campo".to_string(),
                value: field.name.clone(),
            },
            kind: SelectControl {
                key: format!("tipo_{id}"),
                label: "Tipo do campo".to_string(),
                options: FieldKind::ALL.iter().map(|k| k.label().to_string()).collect(),
                selected,
            },
            remove: ActionControl {
                key: format!("remover_{id}"),
                label: "🗑️".to_string(),
                action: EditorAction::RemoveField { field: id },
            },
            text_config,
            list_config,
        }
    }

    fn list_view(&self, field: &FieldDescriptor) -> ListConfigView {
        let id = field.id;
        let options = field
            .options
            .iter()
            .enumerate()
            .map(|(j, option)| OptionEditorView {
                id: option.id,
                text: TextControl {
                    key: format!("opcao_{id}_{}", option.id),
                    label: format!("Opção {}", j + 1),
                    value: option.text.clone(),
                },
                remove: ActionControl {
                    key: format!("del_opcao_{id}_{}", option.id),
                    label: "🗑️".to_string(),
                    action: EditorAction::RemoveOption {
                        field: id,
                        option: option.id,
                    },
                },
            })
            .collect();

        ListConfigView {
            new_option: TextControl {
                key: format!("nova_opcao_{id}"),
                label: "Nova opção".to_string(),
                value: String::new(),
            },
            add_option: ActionControl {
                key: format!("add_opcao_{id}"),
                label: "➕ Adicionar opção".to_string(),
                action: EditorAction::AddOption {
                    field: id,
                    text: String::new(),
                },
            },
            options,
            allow_multiple: CheckboxControl {
                key: format!("multi_{id}"),
                label: "Permitir seleção múltipla".to_string(),
                checked: field.allow_multiple,
            },
        }
    }
}
