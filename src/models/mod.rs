pub mod field;
pub mod loaders;
pub mod response;
pub mod schema;

pub use field::{FieldDescriptor, FieldId, FieldKind, ListOption, OptionId};
pub use loaders::{load_all_templates, load_template, FieldTemplate, FormTemplate};
pub use response::{AnswerInputs, AnswerValue, ResponseMap};
pub use schema::{FormSchema, FormState};
