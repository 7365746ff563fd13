use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::fs;

use crate::models::field::{FieldKind, DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH};
use crate::models::schema::FormSchema;

/// A reusable starting schema, stored as TOML.
///
/// ```toml
/// name = "cadastro"
///
/// [[fields]]
/// name = "Nome"
///
/// [[fields]]
/// name = "Estado"
/// kind = "list"
/// options = ["SP", "RJ"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct FormTemplate {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldTemplate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldTemplate {
    pub name: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub allow_multiple: bool,
    #[serde(default = "default_min")]
    pub min_length: i64,
    #[serde(default = "default_max")]
    pub max_length: i64,
}

fn default_min() -> i64 {
    i64::from(DEFAULT_MIN_LENGTH)
}

fn default_max() -> i64 {
    i64::from(DEFAULT_MAX_LENGTH)
}

impl FormTemplate {
    /// Builds a fresh schema; ids come from the new schema, lengths are clamped
    pub fn to_schema(&self) -> FormSchema {
        let mut schema = FormSchema::new();
        for field in &self.fields {
            schema.push_configured(
                field.name.clone(),
                field.kind,
                &field.options,
                field.allow_multiple,
                field.min_length,
                field.max_length,
            );
        }
        schema
    }
}

/// Loads one TOML template file
pub async fn load_template(path: &Path) -> Result<FormTemplate> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read template: {}", path.display()))?;

    let template: FormTemplate = toml::from_str(&content)
        .with_context(|| format!("failed to parse template: {}", path.display()))?;

    Ok(template)
}

/// Loads every `*.toml` template in a folder; broken files are logged and skipped
pub async fn load_all_templates(folder_path: &str) -> Result<Vec<FormTemplate>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        tracing::debug!("template folder {} does not exist, no templates loaded", folder_path);
        return Ok(Vec::new());
    }

    let mut templates = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("failed to read folder: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            match load_template(&path).await {
                Ok(template) => {
                    tracing::info!(
                        "loaded template '{}' ({} fields)",
                        template.name,
                        template.fields.len()
                    );
                    templates.push(template);
                }
                Err(e) => {
                    tracing::warn!("skipping template {}: {:#}", path.display(), e);
                }
            }
        }
    }

    templates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(templates)
}
