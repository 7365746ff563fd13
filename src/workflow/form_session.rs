//! One user's form-building session
//!
//! Owns the schema snapshot; every action replaces the snapshot with the
//! editor's result, and every page is derived from the current snapshot.

use std::fmt::Display;

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{AnswerInputs, FormSchema, FormState};
use crate::services::{EditorAction, EditorView, FieldEditor, FormRenderer, RendererView, Submission};

/// Everything a client needs to draw the form creation view
#[derive(Debug, Clone, Serialize)]
pub struct FormPage {
    pub session_id: Uuid,
    pub revision: u64,
    pub state: FormState,
    pub schema: FormSchema,
    pub editor: EditorView,
    /// Absent while the schema is empty
    pub form: Option<RendererView>,
}

#[derive(Debug, Clone)]
pub struct FormSession {
    id: Uuid,
    schema: FormSchema,
    revision: u64,
    editor: FieldEditor,
    renderer: FormRenderer,
}

impl FormSession {
    pub fn new(id: Uuid) -> Self {
        Self::with_schema(id, FormSchema::new())
    }

    pub fn with_schema(id: Uuid, schema: FormSchema) -> Self {
        Self {
            id,
            schema,
            revision: 0,
            editor: FieldEditor::new(),
            renderer: FormRenderer::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies one action; the snapshot is unchanged when it fails
    pub fn apply(&mut self, action: EditorAction) -> AppResult<&FormSchema> {
        debug!("{} applying {:?}", self, action);
        let before = self.schema.state();
        let next = self.editor.apply(&self.schema, action)?;
        let after = next.state();

        self.schema = next;
        self.revision += 1;

        if before != after {
            info!("{} state {:?} -> {:?}", self, before, after);
        }
        Ok(&self.schema)
    }

    pub fn page(&self) -> FormPage {
        FormPage {
            session_id: self.id,
            revision: self.revision,
            state: self.schema.state(),
            schema: self.schema.clone(),
            editor: self.editor.view(&self.schema),
            form: self.renderer.view(&self.schema),
        }
    }

    /// Read-only: submitting does not change the session
    pub fn submit(&self, inputs: &AnswerInputs) -> AppResult<Submission> {
        self.renderer.submit(&self.schema, inputs)
    }
}

impl Display for FormSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[session {} rev#{}]", self.id, self.revision)
    }
}
