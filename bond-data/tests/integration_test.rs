use std::fs::File;
use std::path::PathBuf;

use bond_core::export::SessionExport;
use bond_core::form::{FormSession, completion_percentage};
use bond_core::models::{Field, Section};
use bond_core::validation::{ValidationStatus, run_validations};
use bond_core::{BrandConfig, TemplateRegistry};
use bond_data::{LocalDirectory, ScenarioLoader};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn full_session() -> FormSession {
    let file = File::open(fixture("full_application.csv")).expect("Failed to open fixture");
    let rows = ScenarioLoader::parse(file).expect("Failed to parse fixture");
    let mut session = FormSession::new();
    ScenarioLoader::apply(&mut session, &rows);
    session
}

#[test]
fn test_full_scenario_fills_every_section() {
    let session = full_session();

    assert_eq!(completion_percentage(session.record()), 100);
    assert_eq!(session.record().text(Field::NetInvestment), "48500");
    assert_eq!(session.record().members(Field::InvestorExperience).count(), 2);
}

#[test]
fn test_full_scenario_submits_from_last_section() {
    let mut session = full_session();
    session.go_to(Section::Section6);

    let submission = session.complete().expect("complete form should submit");

    assert_eq!(submission.record.text(Field::FirstName), "Jane");
}

#[tokio::test]
async fn test_template_file_import_then_export() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = LocalDirectory::new(tmp.path());
    let mut registry = TemplateRegistry::with_builtins();

    let imported = registry
        .import_from(&dir, &fixture("coastal_template.json"))
        .await
        .expect("fixture should import");
    let id = imported.id.clone();
    assert_ne!(id, "ignored");
    assert_eq!(imported.data.company_name, "Coastal Wealth Ltd");

    let path = registry.export_to(&id, &dir).await.unwrap();

    assert_eq!(path, tmp.path().join("Coastal_Wealth_template.json"));
    assert_eq!(registry.len(), 4);
}

#[tokio::test]
async fn test_imported_template_passes_branding_checks() {
    let dir = LocalDirectory::new(".");
    let mut registry = TemplateRegistry::new();
    let template = registry
        .import_from(&dir, &fixture("coastal_template.json"))
        .await
        .unwrap();

    let report = run_validations(&template.data, None);

    assert_eq!(report.fail_count(), 0);
    assert_eq!(
        report.get("closing-date").map(|r| r.status),
        Some(ValidationStatus::Info)
    );
}

#[tokio::test]
async fn test_session_export_lands_in_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = LocalDirectory::new(tmp.path().join("exports"));
    let session = full_session();
    let when = Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap();
    let export = SessionExport::new(&BrandConfig::starter(), Some(session.record()), when);

    let path = export.write_to(&dir).await.unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    let back: SessionExport = serde_json::from_str(&written).unwrap();
    assert_eq!(path.file_name().unwrap(), "training-form-2024-07-01.json");
    assert_eq!(back.form_data.as_ref(), Some(session.record()));
}
