//! HTTP surface
//!
//! - `navigation` - sidebar menu and view resolution
//! - `forms` - form builder sessions (JSON)
//! - `documents` - DOCX upload, edit and export (HTML)

pub mod documents;
pub mod forms;
pub mod navigation;
pub mod pages;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::load_all_templates;
use crate::services::{DocumentConverter, DocxConverter, ExportWriter};
use crate::workflow::SessionStore;

/// Shared state behind every handler
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub converter: Arc<dyn DocumentConverter>,
    pub uploads: ExportWriter,
    pub exports: ExportWriter,
}

impl AppState {
    /// Creates the storage directories and loads form templates
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let uploads = ExportWriter::new(&config.upload_dir);
        let exports = ExportWriter::new(&config.export_dir);
        uploads.ensure_dir().await?;
        exports.ensure_dir().await?;

        let templates = load_all_templates(&config.template_dir)
            .await
            .map_err(|e| crate::error::AppError::Other(format!("{:#}", e)))?;
        info!("{} form template(s) available", templates.len());

        Ok(Self {
            sessions: SessionStore::with_limits(templates, config.session_idle_ttl(), config.max_sessions),
            converter: Arc::new(DocxConverter),
            uploads,
            exports,
            config,
        })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(navigation::router())
        .merge(forms::router());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .nest("/documents", documents::router(state.config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
