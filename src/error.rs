use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{FieldId, FieldKind, OptionId};
use crate::services::document_converter::ConvertError;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Form schema structure errors
    Schema(SchemaError),
    /// Answer collection errors
    Form(FormError),
    /// Session lookup errors
    Session(SessionError),
    /// DOCX upload / conversion errors
    Document(DocumentError),
    /// File system errors
    File(FileError),
    /// Configuration errors
    Config(ConfigError),
    /// Anything else (wraps third-party errors)
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Schema(e) => write!(f, "schema error: {}", e),
            AppError::Form(e) => write!(f, "form error: {}", e),
            AppError::Session(e) => write!(f, "session error: {}", e),
            AppError::Document(e) => write!(f, "document error: {}", e),
            AppError::File(e) => write!(f, "file error: {}", e),
            AppError::Config(e) => write!(f, "config error: {}", e),
            AppError::Other(msg) => write!(f, "error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Schema(e) => Some(e),
            AppError::Form(e) => Some(e),
            AppError::Session(e) => Some(e),
            AppError::Document(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// Form schema errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Positional index outside `[0, len)`
    IndexOutOfRange { index: i64, len: usize },
    /// No field carries this id
    FieldNotFound { field: FieldId },
    /// The field has no option with this id
    OptionNotFound { field: FieldId, option: OptionId },
    /// Option operations on a field whose kind is not `List`
    WrongKind {
        field: FieldId,
        expected: FieldKind,
        actual: FieldKind,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range [0, {})", index, len)
            }
            SchemaError::FieldNotFound { field } => write!(f, "field {} not found", field),
            SchemaError::OptionNotFound { field, option } => {
                write!(f, "option {} not found in field {}", option, field)
            }
            SchemaError::WrongKind {
                field,
                expected,
                actual,
            } => write!(
                f,
                "field {} is {:?}, operation requires {:?}",
                field, actual, expected
            ),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Answer collection errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// The submitted value does not fit the field's control
    InvalidAnswer { field: String, expected: String },
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::InvalidAnswer { field, expected } => {
                write!(f, "invalid answer for '{}': expected {}", field, expected)
            }
        }
    }
}

impl std::error::Error for FormError {}

/// Session errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Unknown session id
    NotFound { id: Uuid },
    /// Unknown form template name
    TemplateNotFound { name: String },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotFound { id } => write!(f, "session {} not found", id),
            SessionError::TemplateNotFound { name } => write!(f, "template '{}' not found", name),
        }
    }
}

impl std::error::Error for SessionError {}

/// DOCX upload / conversion errors
#[derive(Debug)]
pub enum DocumentError {
    /// The upload carried no file part
    MissingFile,
    /// The file part had an empty filename
    EmptyFilename,
    /// Not a `.docx` file, or not a valid DOCX package
    UnsupportedFormat { filename: String },
    /// HTML → DOCX failed
    ConversionFailed { source: ConvertError },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::MissingFile => write!(f, "no file uploaded"),
            DocumentError::EmptyFilename => write!(f, "empty filename"),
            DocumentError::UnsupportedFormat { filename } => {
                write!(f, "unsupported format: {}", filename)
            }
            DocumentError::ConversionFailed { source } => {
                write!(f, "conversion failed: {}", source)
            }
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::ConversionFailed { source } => Some(source),
            _ => None,
        }
    }
}

/// File system errors
#[derive(Debug)]
pub enum FileError {
    /// Writing a file failed
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Creating a directory failed
    CreateDirFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path, source)
            }
            FileError::CreateDirFailed { path, source } => {
                write!(f, "failed to create directory {}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::WriteFailed { source, .. } | FileError::CreateDirFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// `BIND_ADDR`/`PORT` do not form a socket address
    InvalidBindAddress { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBindAddress { value } => {
                write!(f, "invalid bind address '{}'", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ========== Conversions from common error types ==========

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        AppError::Schema(err)
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        AppError::Form(err)
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::Session(err)
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        AppError::Document(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(err.to_string())
    }
}

// ========== Convenience constructors ==========

impl AppError {
    /// Index outside `[0, len)`
    pub fn index_out_of_range(index: i64, len: usize) -> Self {
        AppError::Schema(SchemaError::IndexOutOfRange { index, len })
    }

    /// Answer that does not fit its control
    pub fn invalid_answer(field: impl Into<String>, expected: impl Into<String>) -> Self {
        AppError::Form(FormError::InvalidAnswer {
            field: field.into(),
            expected: expected.into(),
        })
    }

    /// Non-DOCX upload
    pub fn unsupported_format(filename: impl Into<String>) -> Self {
        AppError::Document(DocumentError::UnsupportedFormat {
            filename: filename.into(),
        })
    }

    /// File write failure
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }


    /// Stable machine-readable code for API clients
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Schema(SchemaError::IndexOutOfRange { .. }) => "index_out_of_range",
            AppError::Schema(SchemaError::FieldNotFound { .. }) => "field_not_found",
            AppError::Schema(SchemaError::OptionNotFound { .. }) => "option_not_found",
            AppError::Schema(SchemaError::WrongKind { .. }) => "wrong_kind",
            AppError::Form(FormError::InvalidAnswer { .. }) => "invalid_answer",
            AppError::Session(SessionError::NotFound { .. }) => "session_not_found",
            AppError::Session(SessionError::TemplateNotFound { .. }) => "template_not_found",
            AppError::Document(DocumentError::UnsupportedFormat { .. }) => "unsupported_format",
            AppError::Document(_) => "document_error",
            AppError::File(_) => "file_error",
            AppError::Config(_) => "config_error",
            AppError::Other(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Session(_) => StatusCode::NOT_FOUND,
            AppError::Schema(SchemaError::FieldNotFound { .. })
            | AppError::Schema(SchemaError::OptionNotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Schema(_) | AppError::Form(_) => StatusCode::BAD_REQUEST,
            AppError::Document(DocumentError::UnsupportedFormat { .. }) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            AppError::Document(DocumentError::MissingFile)
            | AppError::Document(DocumentError::EmptyFilename) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }
        let body = ErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ========== Result alias ==========

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
