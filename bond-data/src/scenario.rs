use std::io::Read;

use bond_core::form::{ApplicationRecord, FormSession};
use bond_core::models::{Field, FieldKind};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a training scenario.
#[derive(Debug, Error)]
pub enum ScenarioLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Row {0} has an empty field name")]
    EmptyField(usize),
}

impl From<csv::Error> for ScenarioLoaderError {
    fn from(err: csv::Error) -> Self {
        ScenarioLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a scenario CSV file.
///
/// - `field`: wire name of the field (e.g. `firstName`, `riskTolerance`)
/// - `value`: text to store, or the member to toggle for checkbox groups
/// - `included`: for checkbox groups, `true` to tick and `false` to untick;
///   leave empty for text fields (defaults to `true`)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScenarioRow {
    pub field: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub included: Option<bool>,
}

fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some("true" | "yes" | "on" | "1") => Ok(Some(true)),
        Some("false" | "no" | "off" | "0") => Ok(Some(false)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected true/false, got '{other}'"
        ))),
    }
}

impl ScenarioRow {
    /// Rows naming a checkbox group, or carrying an explicit `included`
    /// flag, toggle a member instead of setting text.
    fn is_toggle(&self) -> bool {
        match Field::parse(&self.field) {
            Some(field) => field.kind() == FieldKind::Set,
            None => self.included.is_some(),
        }
    }
}

/// Loader for training scenarios: CSV files that pre-fill part of an
/// application so a trainer can start a class mid-form.
///
/// ```csv
/// field,value,included
/// firstName,Jane,
/// riskTolerance,medium,true
/// totalAmount,25000,
/// ```
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Parse scenario rows from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ScenarioRow>, ScenarioLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(reader);
        let mut rows = Vec::new();

        for (index, result) in csv_reader.deserialize().enumerate() {
            let row: ScenarioRow = result?;
            if row.field.trim().is_empty() {
                // +2: one for the header, one for 1-based numbering
                return Err(ScenarioLoaderError::EmptyField(index + 2));
            }
            rows.push(row);
        }

        Ok(rows)
    }

    /// Applies `rows` to a session, in order, so listeners see each change.
    ///
    /// Returns how many rows changed the record.
    pub fn apply(
        session: &mut FormSession,
        rows: &[ScenarioRow],
    ) -> usize {
        let mut changed = 0;
        for row in rows {
            let did_change = if row.is_toggle() {
                session.toggle_member(&row.field, &row.value, row.included.unwrap_or(true))
            } else {
                session.update(&row.field, row.value.as_str()).changed()
            };
            if did_change {
                changed += 1;
            }
        }
        tracing::info!(rows = rows.len(), changed, "scenario applied");
        changed
    }

    /// Builds a fresh record from `rows`.
    pub fn to_record(rows: &[ScenarioRow]) -> ApplicationRecord {
        let mut session = FormSession::new();
        Self::apply(&mut session, rows);
        session.record().clone()
    }
}

#[cfg(test)]
mod tests {
    use bond_core::form::completion::is_complete;
    use bond_core::models::Section;
    use pretty_assertions::assert_eq;

    use super::*;

    const PURCHASER_CSV: &str = r#"field,value,included
firstName,Jane,
lastName,Doe,
dateOfBirth,1980-04-12,
emailAddress,jane@example.com,
residentialAddress,1 High Street,
initialDepositAmount,25000,
investorExperience,bonds,true
riskTolerance,medium,
"#;

    #[test]
    fn test_parse_rows_with_and_without_flag() {
        let csv = "field,value,included\nfirstName,Jane,\nriskTolerance,low,false";

        let rows = ScenarioLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            rows,
            vec![
                ScenarioRow {
                    field: "firstName".to_string(),
                    value: "Jane".to_string(),
                    included: None,
                },
                ScenarioRow {
                    field: "riskTolerance".to_string(),
                    value: "low".to_string(),
                    included: Some(false),
                },
            ]
        );
    }

    #[test]
    fn test_parse_accepts_missing_included_column() {
        let csv = "field,value\nbankName,Lloyds";

        let rows = ScenarioLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(rows[0].included, None);
    }

    #[test]
    fn test_parse_rejects_bad_flag() {
        let csv = "field,value,included\nriskTolerance,low,maybe";

        let result = ScenarioLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(ScenarioLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_parse_rejects_empty_field_name() {
        let csv = "field,value,included\nfirstName,Jane,\n,orphan,";

        let result = ScenarioLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(ScenarioLoaderError::EmptyField(3))));
    }

    #[test]
    fn test_purchaser_scenario_completes_section() {
        let rows = ScenarioLoader::parse(PURCHASER_CSV.as_bytes()).expect("Failed to parse CSV");

        let record = ScenarioLoader::to_record(&rows);

        assert!(is_complete(Section::Purchaser, &record));
        assert!(record.contains_member(Field::InitialDepositAmount, "25000"));
    }

    #[test]
    fn test_apply_counts_only_changes() {
        let csv = "field,value,included\nriskTolerance,low,\nriskTolerance,low,\nnetInvestment,5,";
        let rows = ScenarioLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");
        let mut session = FormSession::new();

        let changed = ScenarioLoader::apply(&mut session, &rows);

        assert_eq!(changed, 1);
    }

    #[test]
    fn test_unknown_field_with_flag_is_toggled() {
        let csv = "field,value,included\nhobbies,sailing,true";
        let rows = ScenarioLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        let record = ScenarioLoader::to_record(&rows);

        assert_eq!(
            record.extra().get("hobbies"),
            Some(&bond_core::models::FieldValue::set(["sailing"]))
        );
    }
}
