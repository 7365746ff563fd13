//! DOCX upload / edit / export endpoints

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::api::{pages, AppState};
use crate::error::{AppError, AppResult, DocumentError};
use crate::services::document_converter::DOCX_MIME;
use crate::utils::filename::{export_file_name, has_extension, secure_filename};
use crate::utils::logging::truncate_text;

pub const ALLOWED_EXTENSIONS: &[&str] = &["docx"];
pub const DEFAULT_ORIGINAL_FILENAME: &str = "documento.docx";

/// One-shot messages carried across the upload redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    MissingFile,
    EmptyFilename,
    InvalidFormat,
}

impl Flash {
    pub fn code(self) -> &'static str {
        match self {
            Flash::MissingFile => "missing_file",
            Flash::EmptyFilename => "empty_filename",
            Flash::InvalidFormat => "invalid_format",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Flash::MissingFile => "Nenhum arquivo enviado.",
            Flash::EmptyFilename => "Selecione um arquivo .docx.",
            Flash::InvalidFormat => "Formato inválido. Envie um arquivo .docx.",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        [Flash::MissingFile, Flash::EmptyFilename, Flash::InvalidFormat]
            .into_iter()
            .find(|f| f.code() == code)
    }

    fn redirect(self) -> Response {
        Redirect::to(&format!("/documents?flash={}", self.code())).into_response()
    }

    /// Upload rejections that go back to the form instead of an error body
    pub fn for_error(err: &DocumentError) -> Option<Self> {
        match err {
            DocumentError::MissingFile => Some(Flash::MissingFile),
            DocumentError::EmptyFilename => Some(Flash::EmptyFilename),
            DocumentError::UnsupportedFormat { .. } => Some(Flash::InvalidFormat),
            DocumentError::ConversionFailed { .. } => None,
        }
    }
}

pub fn router(max_upload_bytes: usize) -> axum::Router<Arc<AppState>> {
    Router::new()
        .route("/", get(upload_form))
        .route("/upload", post(upload))
        .route("/export", post(export))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

#[derive(Debug, Deserialize)]
pub struct FlashQuery {
    pub flash: Option<String>,
}

pub async fn upload_form(Query(query): Query<FlashQuery>) -> Html<String> {
    let message = query
        .flash
        .as_deref()
        .and_then(Flash::from_code)
        .map(Flash::message);
    Html(pages::upload_page(message))
}

/// Accepts one `.docx` in the `file` part and returns the editing page.
///
/// Rejected uploads redirect back to the form and persist nothing.
pub async fn upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    continue;
                }
                let filename = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => upload = Some((filename, bytes.to_vec())),
                    Err(e) => return e.into_response(),
                }
            }
            Ok(None) => break,
            Err(e) => return e.into_response(),
        }
    }

    match accept_upload(&state, upload).await {
        Ok(page) => Html(page).into_response(),
        Err(AppError::Document(err)) => match Flash::for_error(&err) {
            Some(flash) => {
                warn!("upload rejected: {}", err);
                flash.redirect()
            }
            None => AppError::Document(err).into_response(),
        },
        Err(err) => err.into_response(),
    }
}

async fn accept_upload(state: &AppState, upload: Option<(String, Vec<u8>)>) -> AppResult<String> {
    let (filename, bytes) = upload.ok_or(DocumentError::MissingFile)?;
    if filename.is_empty() {
        return Err(DocumentError::EmptyFilename.into());
    }
    if !has_extension(&filename, ALLOWED_EXTENSIONS) {
        return Err(AppError::unsupported_format(filename));
    }

    let conversion = state
        .converter
        .docx_to_html(&bytes)
        .map_err(|e| {
            warn!("conversion of {} failed: {}", filename, e);
            AppError::unsupported_format(filename.clone())
        })?;

    let mut safe_name = secure_filename(&filename);
    if safe_name.is_empty() {
        safe_name = DEFAULT_ORIGINAL_FILENAME.to_string();
    }
    let path = state.uploads.write(&safe_name, &bytes).await?;
    info!(
        "upload {} saved to {} ({} warnings)",
        filename,
        path.display(),
        conversion.warnings.len()
    );
    debug!("converted html: {}", truncate_text(&conversion.html, 120));

    Ok(pages::edit_page(&conversion, &safe_name))
}

#[derive(Debug, Deserialize)]
pub struct ExportForm {
    #[serde(default)]
    pub html_content: String,
    #[serde(default)]
    pub original_filename: Option<String>,
}

/// Converts edited HTML back to DOCX, keeps a copy and sends it as a download
pub async fn export(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ExportForm>,
) -> AppResult<Response> {
    let original = form
        .original_filename
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_ORIGINAL_FILENAME.to_string());

    let bytes = state
        .converter
        .html_to_docx(&form.html_content, &state.config.export_title)
        .map_err(|source| DocumentError::ConversionFailed { source })?;

    let final_name = export_file_name(&original, chrono::Local::now().naive_local());
    let path = state.exports.write(&final_name, &bytes).await?;
    info!("exported {} ({} bytes)", path.display(), bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", final_name),
            ),
        ],
        bytes,
    )
        .into_response())
}
