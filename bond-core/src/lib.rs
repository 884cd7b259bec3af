pub mod calculations;
pub mod export;
pub mod form;
pub mod models;
pub mod templates;
pub mod validation;

pub use form::{ApplicationRecord, FormError, FormSession};
pub use models::*;
pub use templates::{TemplateError, TemplateRegistry};
