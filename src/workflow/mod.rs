pub mod form_session;
pub mod session_store;

pub use form_session::{FormPage, FormSession};
pub use session_store::SessionStore;
