pub mod document_converter;
pub mod export_writer;
pub mod field_editor;
pub mod form_renderer;

pub use document_converter::{Conversion, ConvertError, DocumentConverter, DocxConverter};
pub use export_writer::ExportWriter;
pub use field_editor::{EditorAction, EditorView, FieldEditor};
pub use form_renderer::{FormRenderer, InputControl, RendererView, Submission};
