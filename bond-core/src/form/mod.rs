//! The application form engine: field store, derived values, section
//! completion, navigation and the session that ties them together.

pub mod completion;
pub mod derived;
mod error;
pub mod navigation;
pub mod record;
pub mod session;

pub use completion::{completion_percentage, is_complete, is_form_complete, is_section_complete};
pub use error::FormError;
pub use navigation::{Navigator, Submission};
pub use record::{ApplicationRecord, UpdateOutcome};
pub use session::{ChangeListener, FormSession, ResetMode};
