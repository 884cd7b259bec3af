//! Whole-session export and the client share link.

use std::path::PathBuf;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::form::ApplicationRecord;
use crate::models::BrandConfig;
use crate::templates::{FileError, FileSink};

/// `exportType` tag written into every session export.
pub const SESSION_EXPORT_TYPE: &str = "training-form-data";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not serialise export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("file error: {0}")]
    Io(#[from] FileError),
}

/// Everything on screen at export time: branding plus the form, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExport {
    pub brand_data: BrandConfig,
    pub form_data: Option<ApplicationRecord>,
    pub export_date: DateTime<Utc>,
    pub export_type: String,
}

impl SessionExport {
    pub fn new(
        brand: &BrandConfig,
        record: Option<&ApplicationRecord>,
        export_date: DateTime<Utc>,
    ) -> Self {
        Self {
            brand_data: brand.clone(),
            form_data: record.cloned(),
            export_date,
            export_type: SESSION_EXPORT_TYPE.to_string(),
        }
    }

    /// `training-form-<date>.json`.
    pub fn filename(&self) -> String {
        format!("training-form-{}.json", self.export_date.format("%Y-%m-%d"))
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the export through `sink` and returns where it landed.
    pub async fn write_to(
        &self,
        sink: &dyn FileSink,
    ) -> Result<PathBuf, ExportError> {
        let contents = self.to_json()?;
        let path = sink.write_file(&self.filename(), contents.as_bytes()).await?;
        info!(path = %path.display(), "session exported");
        Ok(path)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SharePayload<'a> {
    brand_config: &'a BrandConfig,
    client_mode: bool,
    timestamp: i64,
}

/// Encodes `brand` into a link that opens the form in client mode.
///
/// The payload `{brandConfig, clientMode: true, timestamp}` is JSON,
/// base64-encoded, and carried in the URL fragment so it never reaches a
/// server.
pub fn share_link(
    base_url: &str,
    brand: &BrandConfig,
    timestamp: DateTime<Utc>,
) -> Result<String, ExportError> {
    let payload = SharePayload {
        brand_config: brand,
        client_mode: true,
        timestamp: timestamp.timestamp_millis(),
    };
    let encoded = STANDARD.encode(serde_json::to_vec(&payload)?);
    Ok(format!("{}#client={encoded}", base_url.trim_end_matches('#')))
}
