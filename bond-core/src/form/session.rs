//! One application session: the record, the tab navigator and the host's
//! change listeners.

use std::fmt;

use tracing::info;

use super::completion;
use super::error::FormError;
use super::navigation::{Navigator, Submission};
use super::record::{ApplicationRecord, UpdateOutcome};
use crate::models::{Field, FieldValue, Section};

/// Called with the full record after every mutation.
pub type ChangeListener = Box<dyn FnMut(&ApplicationRecord)>;

/// How "start new training" treats the data already entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    /// Empty every field.
    ClearFields,
    /// Keep the fields; only the tab and submitted state reset.
    KeepFields,
}

/// A single in-memory application session.
///
/// Each update is applied in full (store, recompute derived values,
/// notify listeners) before the call returns, so completion read
/// afterwards always reflects it.
#[derive(Default)]
pub struct FormSession {
    record: ApplicationRecord,
    navigator: Navigator,
    submission: Option<Submission>,
    listeners: Vec<ChangeListener>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session from previously entered data.
    pub fn with_record(record: ApplicationRecord) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    /// Registers a callback run after every change to the record.
    pub fn on_change(
        &mut self,
        listener: impl FnMut(&ApplicationRecord) + 'static,
    ) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.record);
        }
    }

    pub fn record(&self) -> &ApplicationRecord {
        &self.record
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn current_section(&self) -> Section {
        self.navigator.current()
    }

    /// Sets a field by wire name. See [`ApplicationRecord::update`].
    pub fn update(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> UpdateOutcome {
        let outcome = self.record.update(name, value);
        if outcome.changed() {
            self.notify();
        }
        outcome
    }

    pub fn set(
        &mut self,
        field: Field,
        value: impl Into<FieldValue>,
    ) -> UpdateOutcome {
        self.update(field.as_str(), value)
    }

    /// Adds or removes a checkbox member. Returns `true` when it changed.
    pub fn toggle_member(
        &mut self,
        name: &str,
        member: &str,
        included: bool,
    ) -> bool {
        let changed = self.record.toggle_member(name, member, included);
        if changed {
            self.notify();
        }
        changed
    }

    pub fn next(&mut self) -> bool {
        self.navigator.next()
    }

    pub fn previous(&mut self) -> bool {
        self.navigator.previous()
    }

    pub fn go_to(
        &mut self,
        section: Section,
    ) {
        self.navigator.go_to(section);
    }

    pub fn go_to_named(
        &mut self,
        name: &str,
    ) -> Result<Section, FormError> {
        self.navigator.go_to_named(name)
    }

    pub fn is_section_complete(
        &self,
        section: Section,
    ) -> bool {
        completion::is_complete(section, &self.record)
    }

    pub fn completion_percentage(&self) -> u8 {
        completion::completion_percentage(&self.record)
    }

    pub fn is_form_complete(&self) -> bool {
        completion::is_form_complete(&self.record)
    }

    /// Submits the application. See [`Navigator::complete`].
    pub fn complete(&mut self) -> Result<&Submission, FormError> {
        let submission = self.navigator.complete(&self.record)?;
        Ok(&*self.submission.insert(submission))
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    /// Starts a new training run from the first tab.
    pub fn restart(
        &mut self,
        mode: ResetMode,
    ) {
        self.navigator.reset();
        self.submission = None;
        if mode == ResetMode::ClearFields {
            self.record.clear();
            self.notify();
        }
        info!(?mode, "session restarted");
    }
}

impl fmt::Debug for FormSession {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("FormSession")
            .field("record", &self.record)
            .field("navigator", &self.navigator)
            .field("submission", &self.submission)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
