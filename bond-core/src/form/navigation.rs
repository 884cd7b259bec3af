//! Tab navigation and the final "complete" action.
//!
//! Tabs can be visited in any order; only completion is gated. The
//! navigator moves over [`Section::ALL`] and never leaves its bounds:
//!
//! ```
//! use bond_core::form::Navigator;
//! use bond_core::models::Section;
//!
//! let mut nav = Navigator::new();
//! assert!(!nav.previous());
//! nav.go_to(Section::Section6);
//! assert!(!nav.next());
//! assert_eq!(nav.current(), Section::Section6);
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::completion::{completion_percentage, is_form_complete};
use super::error::FormError;
use super::record::ApplicationRecord;
use crate::models::Section;

/// The submitted state: the record exactly as it was when completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub record: ApplicationRecord,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    index: usize,
    submitted: bool,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Section {
        Section::from_index(self.index).unwrap_or_else(Section::last)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index == Section::COUNT - 1
    }

    /// Step indicator as `(current step, total steps)`, counting from one.
    pub fn progress(&self) -> (usize, usize) {
        (self.index + 1, Section::COUNT)
    }

    /// Moves to the next tab. Returns `false` on the last tab.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        debug!(section = %self.current(), "moved to next section");
        true
    }

    /// Moves to the previous tab. Returns `false` on the first tab.
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.index -= 1;
        debug!(section = %self.current(), "moved to previous section");
        true
    }

    /// Jumps straight to `section`, whatever its completion state.
    pub fn go_to(
        &mut self,
        section: Section,
    ) {
        self.index = section.index();
        debug!(section = %section, "jumped to section");
    }

    /// Jumps to a section by name.
    ///
    /// # Errors
    ///
    /// [`FormError::UnknownSection`] for a name that is not a section; the
    /// current tab does not change.
    pub fn go_to_named(
        &mut self,
        name: &str,
    ) -> Result<Section, FormError> {
        let section =
            Section::parse(name).ok_or_else(|| FormError::UnknownSection(name.to_string()))?;
        self.go_to(section);
        Ok(section)
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// `true` when [`Navigator::complete`] would succeed.
    pub fn can_complete(
        &self,
        record: &ApplicationRecord,
    ) -> bool {
        !self.submitted && self.is_last() && is_form_complete(record)
    }

    /// Submits the application.
    ///
    /// The record is copied unchanged into the [`Submission`]; nothing is
    /// sent anywhere.
    ///
    /// # Errors
    ///
    /// - [`FormError::AlreadySubmitted`] after a successful completion,
    ///   until [`Navigator::reset`]
    /// - [`FormError::NotOnFinalSection`] away from the last tab
    /// - [`FormError::Incomplete`] while any section is incomplete
    pub fn complete(
        &mut self,
        record: &ApplicationRecord,
    ) -> Result<Submission, FormError> {
        if self.submitted {
            return Err(FormError::AlreadySubmitted);
        }
        if !self.is_last() {
            return Err(FormError::NotOnFinalSection {
                current: self.current(),
                expected: Section::last(),
            });
        }
        let percentage = completion_percentage(record);
        if percentage != 100 {
            return Err(FormError::Incomplete { percentage });
        }

        self.submitted = true;
        info!("application submitted");
        Ok(Submission {
            record: record.clone(),
            submitted_at: Utc::now(),
        })
    }

    /// Back to the first tab with the submitted state cleared.
    pub fn reset(&mut self) {
        self.index = 0;
        self.submitted = false;
    }
}
