//! Form renderer - answer controls, answer collection and submission
//!
//! Text length bounds are carried by the descriptors but are not checked
//! against answers here.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{AnswerInputs, AnswerValue, FieldDescriptor, FieldId, FieldKind, FormSchema, ResponseMap};

pub const FORM_HEADING: &str = "📋 Preencha o Formulário";
pub const SUBMIT_LABEL: &str = "✅ Enviar Respostas";
pub const SUCCESS_MESSAGE: &str = "Respostas registradas com sucesso!";

/// Warning shown for a single-choice list without options
pub fn missing_options_warning(name: &str) -> String {
    format!("O campo '{}' não tem opções.", name)
}

/// One answer control
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputControl {
    TextInput {
        field: FieldId,
        key: String,
        label: String,
        value: String,
    },
    NumberInput {
        field: FieldId,
        key: String,
        label: String,
        step: i64,
        value: i64,
    },
    TextArea {
        field: FieldId,
        key: String,
        label: String,
        value: String,
    },
    SingleChoice {
        field: FieldId,
        key: String,
        label: String,
        options: Vec<String>,
        selected: usize,
    },
    MultiChoice {
        field: FieldId,
        key: String,
        label: String,
        options: Vec<String>,
        selected: Vec<String>,
    },
    /// Single-choice list with no options: no control, only a warning
    MissingOptions {
        field: FieldId,
        label: String,
        warning: String,
    },
}

impl InputControl {
    pub fn field(&self) -> FieldId {
        match self {
            InputControl::TextInput { field, .. }
            | InputControl::NumberInput { field, .. }
            | InputControl::TextArea { field, .. }
            | InputControl::SingleChoice { field, .. }
            | InputControl::MultiChoice { field, .. }
            | InputControl::MissingOptions { field, .. } => *field,
        }
    }

    /// The value this control reports when the user leaves it untouched
    pub fn initial_value(&self) -> AnswerValue {
        match self {
            InputControl::TextInput { value, .. } | InputControl::TextArea { value, .. } => {
                AnswerValue::Text(value.clone())
            }
            InputControl::NumberInput { value, .. } => AnswerValue::Integer(*value),
            InputControl::SingleChoice {
                options, selected, ..
            } => options
                .get(*selected)
                .map(|o| AnswerValue::Text(o.clone()))
                .unwrap_or(AnswerValue::Null),
            InputControl::MultiChoice { selected, .. } => AnswerValue::Choices(selected.clone()),
            InputControl::MissingOptions { .. } => AnswerValue::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RendererView {
    pub heading: String,
    pub controls: Vec<InputControl>,
    pub warnings: Vec<String>,
    pub submit_label: String,
}

/// Result of an explicit submit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub message: String,
    pub responses: ResponseMap,
    /// `responses` as pretty-printed JSON
    pub rendered: String,
    pub warnings: Vec<String>,
    /// Names shared by several fields; only the last answer survives
    pub overwritten: Vec<String>,
}

/// Form renderer service
#[derive(Debug, Clone, Copy, Default)]
pub struct FormRenderer;

impl FormRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Answer controls for every field, `None` for an empty schema
    pub fn view(&self, schema: &FormSchema) -> Option<RendererView> {
        if schema.is_empty() {
            return None;
        }

        let controls: Vec<InputControl> = schema.fields().iter().map(Self::control_for).collect();
        let warnings = controls
            .iter()
            .filter_map(|control| match control {
                InputControl::MissingOptions { warning, .. } => Some(warning.clone()),
                _ => None,
            })
            .collect();

        Some(RendererView {
            heading: FORM_HEADING.to_string(),
            controls,
            warnings,
            submit_label: SUBMIT_LABEL.to_string(),
        })
    }

    fn control_for(field: &FieldDescriptor) -> InputControl {
        let id = field.id;
        let key = format!("resposta_{id}");
        let label = field.name.clone();
        match field.kind {
            FieldKind::Text => InputControl::TextInput {
                field: id,
                key,
                label,
                value: String::new(),
            },
            FieldKind::Number => InputControl::NumberInput {
                field: id,
                key,
                label,
                step: 1,
                value: 0,
            },
            FieldKind::TextArea => InputControl::TextArea {
                field: id,
                key,
                label,
                value: String::new(),
            },
            FieldKind::List if field.allow_multiple => {
                let options = field.option_texts();
                InputControl::MultiChoice {
                    field: id,
                    key,
                    label,
                    selected: options.clone(),
                    options,
                }
            }
            FieldKind::List if field.options.is_empty() => InputControl::MissingOptions {
                field: id,
                warning: missing_options_warning(&field.name),
                label,
            },
            FieldKind::List => InputControl::SingleChoice {
                field: id,
                key,
                label,
                options: field.option_texts(),
                selected: 0,
            },
        }
    }

    /// Builds the response map from live control values.
    ///
    /// Returns the map plus the names that were overwritten by a later
    /// field with the same name.
    pub fn collect(
        &self,
        schema: &FormSchema,
        inputs: &AnswerInputs,
    ) -> AppResult<(ResponseMap, Vec<String>)> {
        for field in inputs.keys() {
            if schema.position_of(*field).is_none() {
                warn!("ignoring answer for unknown field {}", field);
            }
        }

        let mut responses = ResponseMap::new();
        let mut overwritten: Vec<String> = Vec::new();

        for descriptor in schema.fields() {
            let control = Self::control_for(descriptor);
            let value = match inputs.get(&descriptor.id) {
                Some(raw) => Self::accept(descriptor, &control, raw)?,
                None => control.initial_value(),
            };
            if responses.insert(descriptor.name.clone(), value).is_some()
                && !overwritten.contains(&descriptor.name)
            {
                warn!("duplicate field name '{}', earlier answer overwritten", descriptor.name);
                overwritten.push(descriptor.name.clone());
            }
        }

        Ok((responses, overwritten))
    }

    /// Checks a raw answer against what its control can produce
    fn accept(field: &FieldDescriptor, control: &InputControl, raw: &AnswerValue) -> AppResult<AnswerValue> {
        match (control, raw) {
            (InputControl::TextInput { .. }, AnswerValue::Text(_))
            | (InputControl::TextArea { .. }, AnswerValue::Text(_))
            | (InputControl::NumberInput { .. }, AnswerValue::Integer(_)) => Ok(raw.clone()),
            (InputControl::TextInput { .. }, _) | (InputControl::TextArea { .. }, _) => {
                Err(AppError::invalid_answer(&field.name, "text"))
            }
            (InputControl::NumberInput { .. }, _) => {
                Err(AppError::invalid_answer(&field.name, "an integer"))
            }
            (InputControl::SingleChoice { options, .. }, AnswerValue::Text(choice))
                if options.contains(choice) =>
            {
                Ok(raw.clone())
            }
            (InputControl::SingleChoice { .. }, _) => {
                Err(AppError::invalid_answer(&field.name, "one of the field's options"))
            }
            (InputControl::MultiChoice { options, .. }, AnswerValue::Choices(choices))
                if choices.iter().all(|c| options.contains(c)) =>
            {
                Ok(raw.clone())
            }
            (InputControl::MultiChoice { .. }, _) => Err(AppError::invalid_answer(
                &field.name,
                "a list of the field's options",
            )),
            (InputControl::MissingOptions { .. }, _) => {
                debug!("field '{}' has no options, answer recorded as null", field.name);
                Ok(AnswerValue::Null)
            }
        }
    }

    /// Explicit submit: collect, acknowledge and render the response map
    pub fn submit(&self, schema: &FormSchema, inputs: &AnswerInputs) -> AppResult<Submission> {
        let (responses, overwritten) = self.collect(schema, inputs)?;
        let warnings = self.view(schema).map(|v| v.warnings).unwrap_or_default();
        let rendered = responses.to_pretty_json()?;

        info!("form submitted with {} answers", responses.len());

        Ok(Submission {
            message: SUCCESS_MESSAGE.to_string(),
            responses,
            rendered,
            warnings,
            overwritten,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormError;

    fn schema_with(kind: FieldKind, name: &str, options: &[&str], multi: bool) -> (FormSchema, FieldId) {
        let mut schema = FormSchema::new();
        let options: Vec<String> = options.iter().map(|s| s.to_string()).collect();
        let id = schema.push_configured(name, kind, &options, multi, 0, 200);
        (schema, id)
    }

    #[test]
    fn test_text_answer_round_trip() {
        let (schema, id) = schema_with(FieldKind::Text, "Nome", &[], false);
        let mut inputs = AnswerInputs::new();
        inputs.insert(id, AnswerValue::Text("hello".into()));

        let submission = FormRenderer::new().submit(&schema, &inputs).unwrap();
        assert_eq!(submission.message, SUCCESS_MESSAGE);
        assert_eq!(
            submission.responses.get("Nome"),
            Some(&AnswerValue::Text("hello".into()))
        );
    }

    #[test]
    fn test_untouched_controls_report_initial_values() {
        let mut schema = FormSchema::new();
        schema.push_configured("t", FieldKind::Text, &[], false, 0, 200);
        schema.push_configured("n", FieldKind::Number, &[], false, 0, 200);
        schema.push_configured("a", FieldKind::TextArea, &[], false, 0, 200);
        schema.push_configured("s", FieldKind::List, &["X".into(), "Y".into()], false, 0, 200);

        let (responses, _) = FormRenderer::new()
            .collect(&schema, &AnswerInputs::new())
            .unwrap();
        assert_eq!(responses.get("t"), Some(&AnswerValue::Text(String::new())));
        assert_eq!(responses.get("n"), Some(&AnswerValue::Integer(0)));
        assert_eq!(responses.get("a"), Some(&AnswerValue::Text(String::new())));
        assert_eq!(responses.get("s"), Some(&AnswerValue::Text("X".into())));
    }

    #[test]
    fn test_single_choice_without_options_is_null_with_warning() {
        let (schema, _) = schema_with(FieldKind::List, "Cor", &[], false);
        let renderer = FormRenderer::new();

        let view = renderer.view(&schema).unwrap();
        assert!(matches!(view.controls[0], InputControl::MissingOptions { .. }));
        assert_eq!(view.warnings, vec![missing_options_warning("Cor")]);

        let submission = renderer.submit(&schema, &AnswerInputs::new()).unwrap();
        assert!(submission.responses.contains_key("Cor"));
        assert_eq!(submission.responses.get("Cor"), Some(&AnswerValue::Null));
        assert_eq!(submission.warnings.len(), 1);
        assert!(submission.rendered.contains("\"Cor\": null"));
    }

    #[test]
    fn test_multi_choice_defaults_to_all_options() {
        let (schema, _) = schema_with(FieldKind::List, "Tags", &["A", "B", "C"], true);
        let submission = FormRenderer::new()
            .submit(&schema, &AnswerInputs::new())
            .unwrap();
        assert_eq!(
            submission.responses.get("Tags"),
            Some(&AnswerValue::Choices(vec!["A".into(), "B".into(), "C".into()]))
        );
    }

    #[test]
    fn test_multi_choice_with_no_options_is_empty_list() {
        let (schema, _) = schema_with(FieldKind::List, "Tags", &[], true);
        let (responses, _) = FormRenderer::new()
            .collect(&schema, &AnswerInputs::new())
            .unwrap();
        assert_eq!(responses.get("Tags"), Some(&AnswerValue::Choices(vec![])));
    }

    #[test]
    fn test_answers_must_fit_their_control() {
        let renderer = FormRenderer::new();

        let (schema, id) = schema_with(FieldKind::Number, "Idade", &[], false);
        let mut inputs = AnswerInputs::new();
        inputs.insert(id, AnswerValue::Text("dez".into()));
        assert!(matches!(
            renderer.collect(&schema, &inputs),
            Err(AppError::Form(FormError::InvalidAnswer { .. }))
        ));

        let (schema, id) = schema_with(FieldKind::List, "UF", &["SP", "RJ"], false);
        let mut inputs = AnswerInputs::new();
        inputs.insert(id, AnswerValue::Text("MG".into()));
        assert!(renderer.collect(&schema, &inputs).is_err());
        inputs.insert(id, AnswerValue::Text("RJ".into()));
        let (responses, _) = renderer.collect(&schema, &inputs).unwrap();
        assert_eq!(responses.get("UF"), Some(&AnswerValue::Text("RJ".into())));
    }

    #[test]
    fn test_duplicate_names_overwrite_and_are_reported() {
        let mut schema = FormSchema::new();
        let first = schema.push_configured("Nome", FieldKind::Text, &[], false, 0, 200);
        let second = schema.push_configured("Nome", FieldKind::Text, &[], false, 0, 200);
        let mut inputs = AnswerInputs::new();
        inputs.insert(first, AnswerValue::Text("primeiro".into()));
        inputs.insert(second, AnswerValue::Text("segundo".into()));

        let submission = FormRenderer::new().submit(&schema, &inputs).unwrap();
        assert_eq!(submission.responses.len(), 1);
        assert_eq!(
            submission.responses.get("Nome"),
            Some(&AnswerValue::Text("segundo".into()))
        );
        assert_eq!(submission.overwritten, vec!["Nome".to_string()]);
    }

    #[test]
    fn test_length_bounds_are_not_enforced() {
        let mut schema = FormSchema::new();
        let id = schema.push_configured("Sigla", FieldKind::Text, &[], false, 5, 2);
        let mut inputs = AnswerInputs::new();
        inputs.insert(id, AnswerValue::Text("abc".into()));
        assert!(FormRenderer::new().collect(&schema, &inputs).is_ok());
    }

    #[test]
    fn test_empty_schema_has_no_view_but_submits() {
        let renderer = FormRenderer::new();
        let schema = FormSchema::new();
        assert!(renderer.view(&schema).is_none());
        let submission = renderer.submit(&schema, &AnswerInputs::new()).unwrap();
        assert!(submission.responses.is_empty());
    }

    #[test]
    fn test_number_control_shape() {
        let (schema, id) = schema_with(FieldKind::Number, "Qtd", &[], false);
        let view = FormRenderer::new().view(&schema).unwrap();
        assert_eq!(
            view.controls[0],
            InputControl::NumberInput {
                field: id,
                key: format!("resposta_{id}"),
                label: "Qtd".into(),
                step: 1,
                value: 0,
            }
        );
    }

    #[test]
    fn test_answers_for_unknown_fields_are_dropped() {
        let (schema, id) = schema_with(FieldKind::Text, "Nome", &[], false);
        let mut inputs = AnswerInputs::new();
        inputs.insert(id, AnswerValue::Text("Ana".into()));
        inputs.insert(FieldId(999), AnswerValue::Text("stray".into()));

        let (responses, overwritten) = FormRenderer::new().collect(&schema, &inputs).unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses.get("Nome"), Some(&AnswerValue::Text("Ana".into())));
        assert!(overwritten.is_empty());
    }
}
