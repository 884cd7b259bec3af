//! The field store: every value entered in one application session.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::derived;
use crate::models::{Field, FieldValue, Section};

/// What an update did to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The value was stored; nothing else changed.
    Stored,
    /// The value was stored and `netInvestment` was recomputed from it.
    Recomputed,
    /// The name did not match a known field; the value went into the
    /// extra map.
    StoredExtra,
    /// The field is derived and cannot be edited; nothing changed.
    Ignored,
}

impl UpdateOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// All field values of one in-progress application.
///
/// A known field that was never set reads as its empty value. Values stored
/// under names that are not known fields are kept in a separate map so the
/// host can round-trip them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, FieldValue>",
    into = "BTreeMap<String, FieldValue>"
)]
pub struct ApplicationRecord {
    values: BTreeMap<Field, FieldValue>,
    extra: BTreeMap<String, FieldValue>,
}

impl ApplicationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `field`, or its empty value when unset.
    pub fn get(
        &self,
        field: Field,
    ) -> FieldValue {
        self.values
            .get(&field)
            .cloned()
            .unwrap_or_else(|| FieldValue::empty(field.kind()))
    }

    /// Text of `field`; empty when unset or when the field holds a set.
    pub fn text(
        &self,
        field: Field,
    ) -> &str {
        self.values
            .get(&field)
            .and_then(FieldValue::as_text)
            .unwrap_or("")
    }

    /// Members of a checkbox group; empty when unset or holding text.
    pub fn members(
        &self,
        field: Field,
    ) -> impl Iterator<Item = &str> {
        self.values
            .get(&field)
            .and_then(FieldValue::as_set)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn contains_member(
        &self,
        field: Field,
        member: &str,
    ) -> bool {
        self.values
            .get(&field)
            .and_then(FieldValue::as_set)
            .is_some_and(|set| set.contains(member))
    }

    /// `true` when the field holds non-empty text or a non-empty set.
    pub fn is_filled(
        &self,
        field: Field,
    ) -> bool {
        self.values.get(&field).is_some_and(FieldValue::is_filled)
    }

    /// Values stored under names that are not known fields.
    pub fn extra(&self) -> &BTreeMap<String, FieldValue> {
        &self.extra
    }

    /// Sets a field by wire name.
    ///
    /// Unknown names are stored in the extra map. `netInvestment` is derived
    /// and is left alone. A change to either of its inputs recomputes it
    /// before this returns.
    pub fn update(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> UpdateOutcome {
        match Field::parse(name) {
            Some(field) => self.set(field, value),
            None => {
                warn!(field = name, "storing value for unknown field");
                self.extra.insert(name.to_string(), value.into());
                UpdateOutcome::StoredExtra
            }
        }
    }

    /// Typed form of [`ApplicationRecord::update`].
    pub fn set(
        &mut self,
        field: Field,
        value: impl Into<FieldValue>,
    ) -> UpdateOutcome {
        if field.is_derived() {
            warn!(field = %field, "ignoring edit of derived field");
            return UpdateOutcome::Ignored;
        }

        let value = value.into();
        debug!(field = %field, value = %value, "field updated");
        self.values.insert(field, value);

        if derived::is_dependency(field) {
            derived::recompute(self);
            UpdateOutcome::Recomputed
        } else {
            UpdateOutcome::Stored
        }
    }

    /// Adds or removes one member of a checkbox group.
    ///
    /// Returns `true` when the set changed. Asking for the presence the
    /// member already has is a no-op. A field holding text is replaced by a
    /// set.
    pub fn toggle_member(
        &mut self,
        name: &str,
        member: &str,
        included: bool,
    ) -> bool {
        let known = Field::parse(name);
        let slot = match known {
            Some(field) if field.is_derived() => {
                warn!(field = %field, "ignoring edit of derived field");
                return false;
            }
            Some(field) => self
                .values
                .entry(field)
                .or_insert_with(|| FieldValue::Set(BTreeSet::new())),
            None => self
                .extra
                .entry(name.to_string())
                .or_insert_with(|| FieldValue::Set(BTreeSet::new())),
        };

        let (mut members, replaced_text) =
            match std::mem::replace(slot, FieldValue::Set(BTreeSet::new())) {
                FieldValue::Set(members) => (members, false),
                FieldValue::Text(_) => (BTreeSet::new(), true),
            };
        let toggled = if included {
            members.insert(member.to_string())
        } else {
            members.remove(member)
        };
        let changed = toggled || replaced_text;
        *slot = FieldValue::Set(members);
        if changed {
            debug!(field = name, member, included, "set member toggled");
            if known.is_some_and(derived::is_dependency) {
                derived::recompute(self);
            }
        }
        changed
    }

    /// Typed form of [`ApplicationRecord::toggle_member`].
    pub fn toggle(
        &mut self,
        field: Field,
        member: &str,
        included: bool,
    ) -> bool {
        self.toggle_member(field.as_str(), member, included)
    }

    /// Empties every field.
    pub fn clear(&mut self) {
        self.values.clear();
        self.extra.clear();
    }

    /// Writes a value without the derived-field guard.
    pub(crate) fn put(
        &mut self,
        field: Field,
        value: FieldValue,
    ) {
        self.values.insert(field, value);
    }

    /// Every known field with its current value, in form order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, FieldValue)> + '_ {
        Field::ALL.into_iter().map(|field| (field, self.get(field)))
    }
}

impl From<BTreeMap<String, FieldValue>> for ApplicationRecord {
    fn from(map: BTreeMap<String, FieldValue>) -> Self {
        let mut record = Self::new();
        for (name, value) in map {
            match Field::parse(&name) {
                Some(field) => record.put(field, value),
                None => {
                    record.extra.insert(name, value);
                }
            }
        }
        // A stored net with no operands is stale too.
        if derived::DEPENDENCIES.iter().any(|f| record.is_filled(*f))
            || record.is_filled(Field::NetInvestment)
        {
            derived::recompute(&mut record);
        }
        record
    }
}

impl From<ApplicationRecord> for BTreeMap<String, FieldValue> {
    fn from(record: ApplicationRecord) -> Self {
        let mut map: BTreeMap<String, FieldValue> = record
            .fields()
            .map(|(field, value)| (field.as_str().to_string(), value))
            .collect();
        map.extend(record.extra);
        map
    }
}

impl fmt::Display for ApplicationRecord {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for section in Section::ALL {
            writeln!(f, "== {} ==", section.title())?;
            for field in section.fields() {
                let value = self.get(field);
                let shown = if value.is_filled() {
                    value.to_string()
                } else {
                    "-".to_string()
                };
                writeln!(f, "  {:<26}{}", format!("{}:", field.label()), shown)?;
            }
        }
        for (name, value) in &self.extra {
            writeln!(f, "  {:<26}{}", format!("{name}:"), value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // update tests
    // =========================================================================

    #[test]
    fn update_stores_known_field() {
        let mut record = ApplicationRecord::new();

        let outcome = record.update("firstName", "Jane");

        assert_eq!(outcome, UpdateOutcome::Stored);
        assert_eq!(record.text(Field::FirstName), "Jane");
    }

    #[test]
    fn update_keeps_unknown_field_in_extra_map() {
        let mut record = ApplicationRecord::new();

        let outcome = record.update("favouriteColour", "green");

        assert_eq!(outcome, UpdateOutcome::StoredExtra);
        assert_eq!(
            record.extra().get("favouriteColour"),
            Some(&FieldValue::from("green"))
        );
    }

    #[test]
    fn update_refuses_to_edit_net_investment() {
        let mut record = ApplicationRecord::new();
        record.update("totalAmount", "20000");

        let outcome = record.update("netInvestment", "999999");

        assert_eq!(outcome, UpdateOutcome::Ignored);
        assert_eq!(record.text(Field::NetInvestment), "20000");
    }

    #[test]
    fn update_of_operand_recomputes_net_investment() {
        let mut record = ApplicationRecord::new();

        assert_eq!(record.update("totalAmount", "5000"), UpdateOutcome::Recomputed);
        assert_eq!(record.update("adviserCharge", "8000"), UpdateOutcome::Recomputed);

        assert_eq!(record.text(Field::NetInvestment), "-3000");
    }

    #[test]
    fn unset_fields_read_as_empty() {
        let record = ApplicationRecord::new();

        assert_eq!(record.text(Field::LastName), "");
        assert_eq!(record.get(Field::RiskTolerance), FieldValue::set(Vec::<String>::new()));
        assert!(!record.is_filled(Field::LastName));
    }

    // =========================================================================
    // toggle_member tests
    // =========================================================================

    #[test]
    fn toggle_member_adds_once() {
        let mut record = ApplicationRecord::new();

        assert!(record.toggle_member("riskTolerance", "medium", true));
        assert!(!record.toggle_member("riskTolerance", "medium", true));

        let members: Vec<&str> = record.members(Field::RiskTolerance).collect();
        assert_eq!(members, vec!["medium"]);
    }

    #[test]
    fn toggle_member_removes_and_ignores_absent() {
        let mut record = ApplicationRecord::new();
        record.toggle(Field::PrimaryWealth, "salary", true);

        assert!(record.toggle(Field::PrimaryWealth, "salary", false));
        assert!(!record.toggle(Field::PrimaryWealth, "salary", false));
        assert!(!record.is_filled(Field::PrimaryWealth));
    }

    #[test]
    fn toggle_sequences_never_duplicate_members() {
        let mut record = ApplicationRecord::new();
        let steps = [
            ("a", true),
            ("b", true),
            ("a", true),
            ("a", false),
            ("a", true),
            ("b", true),
            ("c", false),
        ];

        for (member, included) in steps {
            record.toggle(Field::InvestorExperience, member, included);
        }

        let members: Vec<&str> = record.members(Field::InvestorExperience).collect();
        assert_eq!(members, vec!["a", "b"]);
    }

    #[test]
    fn toggle_replaces_text_with_set() {
        let mut record = ApplicationRecord::new();
        record.update("employmentStatus", "employed");

        record.toggle(Field::EmploymentStatus, "retired", true);

        assert!(record.contains_member(Field::EmploymentStatus, "retired"));
        assert_eq!(record.members(Field::EmploymentStatus).count(), 1);
    }

    #[test]
    fn toggle_on_net_investment_is_ignored() {
        let mut record = ApplicationRecord::new();

        assert!(!record.toggle_member("netInvestment", "1", true));
        assert!(!record.is_filled(Field::NetInvestment));
    }

    #[test]
    fn toggle_on_operand_recomputes_net_investment() {
        let mut record = ApplicationRecord::new();
        record.update("totalAmount", "20000");

        let changed = record.toggle_member("totalAmount", "5", true);

        assert!(changed);
        assert_eq!(record.text(Field::TotalAmount), "");
        assert_eq!(record.text(Field::NetInvestment), "0");
    }

    #[test]
    fn toggle_on_unrelated_field_leaves_net_investment_alone() {
        let mut record = ApplicationRecord::new();
        record.update("totalAmount", "20000");

        record.toggle(Field::RiskTolerance, "low", true);

        assert_eq!(record.text(Field::NetInvestment), "20000");
    }

    // =========================================================================
    // serde tests
    // =========================================================================

    #[test]
    fn serializes_every_known_field_flat() {
        let mut record = ApplicationRecord::new();
        record.update("firstName", "Jane");
        record.toggle(Field::RiskTolerance, "low", true);

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["firstName"], "Jane");
        assert_eq!(json["riskTolerance"], serde_json::json!(["low"]));
        assert_eq!(json["lastName"], "");
        assert_eq!(json.as_object().map(|o| o.len()), Some(Field::ALL.len()));
    }

    #[test]
    fn deserialize_recomputes_stale_net_investment() {
        let json = r#"{"totalAmount":"15000","adviserCharge":"500","netInvestment":"1"}"#;

        let record: ApplicationRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.text(Field::NetInvestment), "14500");
    }

    #[test]
    fn deserialize_drops_net_investment_without_operands() {
        let json = r#"{"netInvestment":"999999"}"#;

        let record: ApplicationRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.text(Field::NetInvestment), "0");
    }

    #[test]
    fn deserialize_empty_record_keeps_net_investment_empty() {
        let record: ApplicationRecord = serde_json::from_str("{}").unwrap();

        assert_eq!(record, ApplicationRecord::new());
    }

    #[test]
    fn clear_empties_everything() {
        let mut record = ApplicationRecord::new();
        record.update("bankName", "Lloyds");
        record.update("nickname", "JJ");

        record.clear();

        assert_eq!(record, ApplicationRecord::new());
    }

    // =========================================================================
    // logging
    // =========================================================================

    // ── capture ──

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn warnings_from(run: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, run);

        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn ignored_edits_are_logged_as_warnings() {
        let mut record = ApplicationRecord::new();

        let log = warnings_from(|| {
            record.update("netInvestment", "5");
            record.update("favouriteColour", "teal");
        });

        assert!(log.contains("ignoring edit of derived field"));
        assert!(log.contains("storing value for unknown field"));
        assert!(log.contains("favouriteColour"));
    }

    #[test]
    fn ordinary_updates_do_not_warn() {
        let mut record = ApplicationRecord::new();

        let log = warnings_from(|| {
            record.update("firstName", "Jane");
        });

        assert_eq!(log, "");
    }
}
