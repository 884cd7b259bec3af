use std::path::{Path, PathBuf};

use bond_core::form::completion_percentage;
use bond_core::models::{Field, Section};
use bond_ui::commands::{self, Command};
use bond_ui::{Step, TrainerApp, TrainerConfig};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn app_in(dir: &Path) -> TrainerApp {
    TrainerApp::new(TrainerConfig {
        output_dir: dir.to_path_buf(),
        ..Default::default()
    })
}

/// Runs every line, collecting output. Stops at the first failure.
async fn run_script(
    app: &mut TrainerApp,
    script: &str,
) -> anyhow::Result<Vec<String>> {
    let mut out = Vec::new();
    for line in script.lines() {
        let Some(command) = commands::parse(line)? else {
            continue;
        };
        match app.execute(command).await? {
            Step::Output(text) => out.push(text),
            Step::Quit => break,
        }
    }
    Ok(out)
}

#[tokio::test]
async fn full_script_submits_application() {
    let tmp = tempfile::tempdir().unwrap();
    let mut app = app_in(tmp.path());
    let script = std::fs::read_to_string(fixture("full_run.txt")).unwrap();

    let out = run_script(&mut app, &script).await.unwrap();

    let record = app.session().record();
    assert_eq!(completion_percentage(record), 100);
    assert_eq!(record.text(Field::NetInvestment), "48500");
    assert_eq!(app.session().current_section(), Section::Section6);
    assert!(app.session().submission().is_some());
    assert!(out.last().unwrap().starts_with("Application submitted at"));
}

#[tokio::test]
async fn second_complete_is_refused_until_restart() {
    let tmp = tempfile::tempdir().unwrap();
    let mut app = app_in(tmp.path());
    let script = std::fs::read_to_string(fixture("full_run.txt")).unwrap();
    run_script(&mut app, &script).await.unwrap();

    let again = app.execute(Command::Complete).await;
    run_script(&mut app, "restart --keep\ngoto section6").await.unwrap();
    let after_restart = app.execute(Command::Complete).await;

    assert!(again.unwrap_err().to_string().contains("already been submitted"));
    assert!(after_restart.is_ok());
}

#[tokio::test]
async fn restart_clears_the_form() {
    let tmp = tempfile::tempdir().unwrap();
    let mut app = app_in(tmp.path());
    run_script(&mut app, "set firstName Jane\nnext\nrestart").await.unwrap();

    assert_eq!(app.session().record().text(Field::FirstName), "");
    assert_eq!(app.session().current_section(), Section::Purchaser);
    assert_eq!(app.progress(), 0);
}

#[tokio::test]
async fn exports_land_in_output_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let mut app = app_in(tmp.path());

    let out = run_script(&mut app, "export-template 1\nexport-session")
        .await
        .unwrap();

    assert!(out[0].ends_with("Offshore_Bond_Training_template.json"));
    assert!(tmp.path().join("Offshore_Bond_Training_template.json").exists());
    let sessions: Vec<_> = std::fs::read_dir(tmp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("training-form-"))
        .collect();
    assert_eq!(sessions.len(), 1);
}

#[tokio::test]
async fn exported_template_imports_as_new_entry() {
    let tmp = tempfile::tempdir().unwrap();
    let mut app = app_in(tmp.path());
    run_script(&mut app, "brand companyName Harbour Wealth\nsave-template Harbour House")
        .await
        .unwrap();
    let id = app
        .templates()
        .list()
        .iter()
        .find(|t| t.name == "Harbour House")
        .map(|t| t.id.clone())
        .unwrap();
    run_script(&mut app, &format!("export-template {id}")).await.unwrap();
    let path = tmp.path().join("Harbour_House_template.json");

    run_script(&mut app, &format!("import-template {}", path.display()))
        .await
        .unwrap();

    let copies: Vec<_> = app
        .templates()
        .list()
        .iter()
        .filter(|t| t.name == "Harbour House")
        .collect();
    assert_eq!(copies.len(), 2);
    assert_ne!(copies[0].id, copies[1].id);
    assert_eq!(copies[0].data, copies[1].data);
}

#[tokio::test]
async fn bad_import_leaves_library_unchanged() {
    let tmp = tempfile::tempdir().unwrap();
    let bad = tmp.path().join("bad.json");
    std::fs::write(&bad, r#"{"description": "no name or data"}"#).unwrap();
    let mut app = app_in(tmp.path());
    let before: Vec<String> = app.templates().ids().into_iter().map(String::from).collect();

    let result = run_script(&mut app, &format!("import-template {}", bad.display())).await;

    let after: Vec<String> = app.templates().ids().into_iter().map(String::from).collect();
    assert!(result.is_err());
    assert_eq!(before, after);
}

#[tokio::test]
async fn validate_reports_form_rules() {
    let tmp = tempfile::tempdir().unwrap();
    let mut app = app_in(tmp.path());

    let out = run_script(&mut app, "set totalAmount 9000\nvalidate").await.unwrap();

    let report = out.last().unwrap();
    assert!(report.contains("Net investment must be at least £10,000"));
    assert!(report.contains("Bank details required for payments"));
}
