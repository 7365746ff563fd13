//! # Form Dashboard
//!
//! A dynamic form builder and a DOCX ⇄ HTML editing utility behind one
//! navigation menu.
//!
//! ## Layers
//!
//! ### ① Models
//! - `models/` - the form schema, field descriptors, answers and TOML templates
//!
//! ### ② Services
//! - `FieldEditor` - pure reducer over the schema plus the editor view
//! - `FormRenderer` - derives the fill-in form and collects answers
//! - `DocxConverter` - DOCX ⇄ HTML conversion
//! - `ExportWriter` - persists uploads and exports
//!
//! ### ③ Workflow
//! - `FormSession` - one user's private schema and its revision counter
//! - `SessionStore` - session registry and template lookup
//!
//! ### ④ API
//! - `api/` - axum routes for navigation, sessions and documents
//! - `App` - server lifecycle

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

pub use api::{build_router, AppState};
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{FieldDescriptor, FieldKind, FormSchema, FormState, ResponseMap};
pub use services::{DocumentConverter, DocxConverter, FieldEditor, FormRenderer};
pub use workflow::{FormSession, SessionStore};
