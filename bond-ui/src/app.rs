//! The trainer application: one form session, the branding it is shown
//! under, and the template library, driven one [`Command`] at a time.
//!
//! Typical lifetime:
//!
//! 1. Build from a [`TrainerConfig`] with [`TrainerApp::new`].
//! 2. Feed parsed commands to [`TrainerApp::execute`] and print each
//!    [`Step::Output`].
//! 3. Stop on [`Step::Quit`] or end of input.

use std::cell::Cell;
use std::fmt::Write as _;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result, anyhow, bail};
use bond_core::export::{SessionExport, share_link};
use bond_core::form::completion::{is_complete, missing_fields};
use bond_core::form::{FormSession, ResetMode, UpdateOutcome, completion_percentage};
use bond_core::models::{Field, FieldKind, FieldValue, Section, TEMPLATE_CATEGORIES};
use bond_core::templates::FileSource;
use bond_core::validation::run_validations;
use bond_core::{BrandConfig, TemplateRegistry};
use bond_data::LocalDirectory;
use chrono::Utc;
use tracing::{debug, info};

use crate::commands::{Command, HELP};
use crate::config::TrainerConfig;
use crate::logging;

/// What the host should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Output(String),
    Quit,
}

pub struct TrainerApp {
    config: TrainerConfig,
    brand: BrandConfig,
    session: FormSession,
    templates: TemplateRegistry,
    downloads: LocalDirectory,
    progress: Rc<Cell<u8>>,
}

impl TrainerApp {
    pub fn new(config: TrainerConfig) -> Self {
        let templates = if config.builtin_templates {
            TemplateRegistry::with_builtins()
        } else {
            TemplateRegistry::new()
        };

        let progress = Rc::new(Cell::new(0));
        let mut session = FormSession::new();
        let seen = Rc::clone(&progress);
        session.on_change(move |record| {
            let percentage = completion_percentage(record);
            if percentage != seen.get() {
                debug!(percentage, "completion changed");
                seen.set(percentage);
            }
        });

        Self {
            brand: config.initial_brand(),
            downloads: LocalDirectory::new(&config.output_dir),
            config,
            session,
            templates,
            progress,
        }
    }

    pub fn session(&self) -> &FormSession {
        &self.session
    }

    pub fn brand(&self) -> &BrandConfig {
        &self.brand
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Completion as last reported by the session's change listener.
    pub fn progress(&self) -> u8 {
        self.progress.get()
    }

    /// `[2/7 section1 43%] > `
    pub fn prompt(&self) -> String {
        let (step, total) = self.session.navigator().progress();
        format!(
            "[{step}/{total} {} {}%] > ",
            self.session.current_section(),
            self.progress()
        )
    }

    /// Runs one command.
    ///
    /// # Errors
    ///
    /// Anything the trainer should be told about: unknown brand fields,
    /// blocked submission, missing templates, unreadable files. The
    /// session is unchanged by a failed command.
    pub async fn execute(
        &mut self,
        command: Command,
    ) -> Result<Step> {
        debug!(?command, "executing");
        let output = match command {
            Command::Set { field, value } => self.set_field(&field, &value),
            Command::Toggle {
                field,
                member,
                included,
            } => {
                if self.session.toggle_member(&field, &member, included) {
                    let verb = if included { "ticked" } else { "unticked" };
                    format!("{field}: {verb} '{member}'")
                } else {
                    format!("{field}: no change")
                }
            }
            Command::Next => {
                self.session.next();
                self.section_banner()
            }
            Command::Prev => {
                self.session.previous();
                self.section_banner()
            }
            Command::Goto(name) => {
                self.session.go_to_named(&name)?;
                self.section_banner()
            }
            Command::Status => self.status(),
            Command::Complete => {
                let submission = self.session.complete()?;
                format!(
                    "Application submitted at {}. Thank you for completing the training form.",
                    submission.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
                )
            }
            Command::Restart { keep } => {
                let mode = if keep {
                    ResetMode::KeepFields
                } else {
                    ResetMode::ClearFields
                };
                self.session.restart(mode);
                format!("New training started.\n{}", self.section_banner())
            }
            Command::Brand { field, value } => {
                self.brand.update(&field, value)?;
                format!("Branding updated: {field}")
            }
            Command::Logo(path) => self.load_logo(&path).await?,
            Command::Templates { category } => self.list_templates(category.as_deref()),
            Command::SaveTemplate {
                name,
                description,
                category,
            } => {
                let category = if category.is_empty() {
                    TEMPLATE_CATEGORIES[0].to_string()
                } else {
                    category
                };
                let saved = self
                    .templates
                    .save(&name, &description, &category, self.brand.clone())
                    .ok_or_else(|| anyhow!("a template needs a name"))?;
                format!("Template '{}' saved with id {}", saved.name, saved.id)
            }
            Command::LoadTemplate(id) => {
                self.brand = self
                    .templates
                    .load(&id)
                    .ok_or_else(|| anyhow!("template '{id}' not found"))?;
                info!(id = %id, "template applied");
                format!("Branding loaded: {}", self.brand.display_name())
            }
            Command::DeleteTemplate(id) => {
                let removed = self
                    .templates
                    .remove(&id)
                    .ok_or_else(|| anyhow!("template '{id}' not found"))?;
                format!("Template '{}' deleted", removed.name)
            }
            Command::ExportTemplate(id) => {
                let path = self.templates.export_to(&id, &self.downloads).await?;
                format!("Template exported to {}", path.display())
            }
            Command::ImportTemplate(path) => {
                let imported = self
                    .templates
                    .import_from(&self.downloads, &path)
                    .await
                    .with_context(|| format!("Failed to import {}", path.display()))?;
                format!("Template '{}' imported with id {}", imported.name, imported.id)
            }
            Command::Validate => {
                run_validations(&self.brand, Some(self.session.record())).to_string()
            }
            Command::ExportSession => {
                let export =
                    SessionExport::new(&self.brand, Some(self.session.record()), Utc::now());
                let path = export.write_to(&self.downloads).await?;
                format!("Session exported to {}", path.display())
            }
            Command::Share => {
                let link = share_link(&self.config.share_base_url, &self.brand, Utc::now())?;
                format!("Client link (branding only, opens in client mode):\n{link}")
            }
            Command::Print => format!("{}\n\n{}", self.brand, self.session.record()),
            Command::LogLevel(level) => {
                logging::set_log_level(&level)?;
                format!("Log level set to {level}")
            }
            Command::LogStdout(enabled) => {
                logging::set_stdout_enabled(enabled)?;
                format!("Log output on stdout {}", if enabled { "on" } else { "off" })
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Step::Quit),
        };
        Ok(Step::Output(output))
    }

    /// Stores text, or for checkbox groups a comma-separated member list.
    fn set_field(
        &mut self,
        name: &str,
        value: &str,
    ) -> String {
        let value = match Field::parse(name).map(|f| f.kind()) {
            Some(FieldKind::Set) => FieldValue::set(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|member| !member.is_empty()),
            ),
            _ => FieldValue::from(value),
        };

        match self.session.update(name, value) {
            UpdateOutcome::Stored => format!("{name} updated"),
            UpdateOutcome::Recomputed => format!(
                "{name} updated; net investment is now {}",
                self.session.record().text(Field::NetInvestment)
            ),
            UpdateOutcome::StoredExtra => format!("{name} is not a form field; stored anyway"),
            UpdateOutcome::Ignored => {
                format!("{name} is calculated from the total amount and adviser charge")
            }
        }
    }

    fn section_banner(&self) -> String {
        let section = self.session.current_section();
        let (step, total) = self.session.navigator().progress();
        format!("Step {step} of {total}: {}", section.title())
    }

    fn status(&self) -> String {
        let record = self.session.record();
        let mut out = self.section_banner();
        let _ = writeln!(out);
        let _ = writeln!(out, "Completion: {}%", completion_percentage(record));
        for section in Section::ALL {
            if is_complete(section, record) {
                let _ = writeln!(out, "  ✓ {}", section.title());
            } else {
                let missing: Vec<_> = missing_fields(section, record)
                    .into_iter()
                    .map(|f| f.as_str())
                    .collect();
                let _ = writeln!(out, "  ✗ {} (missing: {})", section.title(), missing.join(", "));
            }
        }
        if self.session.submission().is_some() {
            let _ = writeln!(out, "Submitted.");
        }
        out.trim_end().to_string()
    }

    fn list_templates(
        &self,
        category: Option<&str>,
    ) -> String {
        let category = category.unwrap_or("all");
        let lines: Vec<String> = self
            .templates
            .by_category(category)
            .map(|t| format!("{:>14}  {} [{}] {}", t.id, t.name, t.category, t.created_at))
            .collect();
        if lines.is_empty() {
            format!("No templates in '{category}'")
        } else {
            lines.join("\n")
        }
    }

    async fn load_logo(
        &mut self,
        path: &Path,
    ) -> Result<String> {
        let bytes = self.downloads.read_bytes(path).await?;
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            bail!("'{}' has no file name", path.display());
        };
        self.brand.set_logo(&bytes, filename);
        Ok(format!("Logo set from {filename} ({} bytes)", bytes.len()))
    }
}
