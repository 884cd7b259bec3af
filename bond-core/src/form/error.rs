use thiserror::Error;

use crate::models::Section;

/// Errors raised by navigation, completion and brand editing.
///
/// Field updates never fail; they have no variant here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown section '{0}'")]
    UnknownSection(String),

    #[error("unknown brand field '{0}'")]
    UnknownBrandField(String),

    /// Not every section passes its completion rule yet.
    #[error("form is {percentage}% complete; every section must be complete before submitting")]
    Incomplete { percentage: u8 },

    /// Completion is offered only on the last tab.
    #[error("the application can only be completed from {expected}, currently on {current}")]
    NotOnFinalSection { current: Section, expected: Section },

    #[error("application has already been submitted")]
    AlreadySubmitted,
}
