use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use super::io::{FileError, FileSink, FileSource};
use crate::models::{BrandConfig, Template, builtin_templates};

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// The document is not valid JSON or does not have the template shape.
    #[error("invalid template file: {0}")]
    Parse(String),

    #[error("template '{0}' not found")]
    NotFound(String),

    #[error("could not serialise template: {0}")]
    Serialize(String),

    #[error("file error: {0}")]
    Io(#[from] FileError),
}

/// A template rendered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateExport {
    pub filename: String,
    pub contents: String,
}

/// The shape accepted on import. The file's own `id` is ignored; a fresh
/// one is always assigned.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateDocument {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    data: BrandConfig,
    #[serde(default)]
    created_at: Option<NaiveDate>,
}

/// Download filename for a template: whitespace runs become `_`.
pub fn export_filename(name: &str) -> String {
    format!("{}_template.json", WHITESPACE.replace_all(name, "_"))
}

/// Serialises a template as pretty-printed JSON.
///
/// # Errors
///
/// [`TemplateError::Serialize`] if the template cannot be encoded.
pub fn export_template(template: &Template) -> Result<TemplateExport, TemplateError> {
    let contents = serde_json::to_string_pretty(template)
        .map_err(|e| TemplateError::Serialize(e.to_string()))?;
    Ok(TemplateExport {
        filename: export_filename(&template.name),
        contents,
    })
}

/// Named branding snapshots for the current session.
///
/// Explicitly created and handed to whoever needs it; there is no global
/// instance.
///
/// Typical lifetime:
/// 1. Create with [`TemplateRegistry::with_builtins`] (or `new` for an
///    empty library).
/// 2. `save` / `import_str` to add, `remove` to delete.
/// 3. `load` to fetch a branding snapshot for the host.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: Vec<Template>,
    last_issued_id: i64,
}

impl TemplateRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with the built-in training templates.
    pub fn with_builtins() -> Self {
        Self {
            templates: builtin_templates(),
            last_issued_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn list(&self) -> &[Template] {
        &self.templates
    }

    pub fn ids(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.id.as_str()).collect()
    }

    pub fn get(
        &self,
        id: &str,
    ) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Templates in `category`, or all of them for `"all"`.
    pub fn by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Template> {
        self.templates
            .iter()
            .filter(move |t| category == "all" || t.category == category)
    }

    /// A time-based id not used by any template in the registry.
    fn next_id(&mut self) -> String {
        let mut candidate = Utc::now()
            .timestamp_millis()
            .max(self.last_issued_id + 1);
        while self.get(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        self.last_issued_id = candidate;
        candidate.to_string()
    }

    fn push(
        &mut self,
        template: Template,
    ) -> &Template {
        self.templates.push(template);
        &self.templates[self.templates.len() - 1]
    }

    /// Saves `brand` as a new template.
    ///
    /// Returns `None` without touching the registry when `name` is blank.
    pub fn save(
        &mut self,
        name: &str,
        description: &str,
        category: &str,
        brand: BrandConfig,
    ) -> Option<&Template> {
        if name.trim().is_empty() {
            warn!("template name is blank; nothing saved");
            return None;
        }

        let template = Template {
            id: self.next_id(),
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            data: brand,
            created_at: Utc::now().date_naive(),
        };
        info!(id = %template.id, name = %template.name, "template saved");
        Some(self.push(template))
    }

    /// The branding snapshot stored under `id`.
    pub fn load(
        &self,
        id: &str,
    ) -> Option<BrandConfig> {
        self.get(id).map(|t| t.data.clone())
    }

    /// Deletes the template with `id`, returning it if it existed.
    pub fn remove(
        &mut self,
        id: &str,
    ) -> Option<Template> {
        let position = self.templates.iter().position(|t| t.id == id)?;
        let removed = self.templates.remove(position);
        info!(id, name = %removed.name, "template deleted");
        Some(removed)
    }

    /// Renders the template with `id` for download.
    ///
    /// # Errors
    ///
    /// [`TemplateError::NotFound`] for an unknown id.
    pub fn export(
        &self,
        id: &str,
    ) -> Result<TemplateExport, TemplateError> {
        let template = self
            .get(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;
        export_template(template)
    }

    /// Parses an exported template and appends it under a fresh id.
    ///
    /// # Errors
    ///
    /// [`TemplateError::Parse`] when `contents` is not JSON, lacks `name` or
    /// `data`, has fields of the wrong type, or has a blank name. The
    /// registry is unchanged on error.
    pub fn import_str(
        &mut self,
        contents: &str,
    ) -> Result<&Template, TemplateError> {
        let document: TemplateDocument = serde_json::from_str(contents).map_err(|e| {
            warn!("rejected template import: {}", e);
            TemplateError::Parse(e.to_string())
        })?;
        if document.name.trim().is_empty() {
            warn!("rejected template import: blank name");
            return Err(TemplateError::Parse("template name is empty".to_string()));
        }

        let template = Template {
            id: self.next_id(),
            name: document.name,
            description: document.description,
            category: document.category,
            data: document.data,
            created_at: document
                .created_at
                .unwrap_or_else(|| Utc::now().date_naive()),
        };
        info!(id = %template.id, name = %template.name, "template imported");
        Ok(self.push(template))
    }

    /// Exports the template with `id` through `sink`.
    pub async fn export_to(
        &self,
        id: &str,
        sink: &dyn FileSink,
    ) -> Result<PathBuf, TemplateError> {
        let export = self.export(id)?;
        let path = sink
            .write_file(&export.filename, export.contents.as_bytes())
            .await?;
        info!(id, path = %path.display(), "template exported");
        Ok(path)
    }

    /// Reads `path` from `source` and imports it.
    pub async fn import_from(
        &mut self,
        source: &dyn FileSource,
        path: &Path,
    ) -> Result<&Template, TemplateError> {
        let contents = source.read_to_string(path).await?;
        self.import_str(&contents)
    }
}
