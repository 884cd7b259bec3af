//! Trainer settings, read from an optional TOML file.
//!
//! ```toml
//! log_level = "debug"
//! log_file = "trainer.log"
//! output_dir = "downloads"
//! share_base_url = "https://forms.example.com/bond"
//!
//! [brand]
//! companyName = "Acme Wealth"
//! plan1Name = "Growth Plan"
//! plan1Code = "AG1"
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use std::fmt;
use std::path::{Path, PathBuf};

use bond_core::BrandConfig;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_SHARE_BASE_URL: &str = "https://example.com/offshore-bond";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Any `EnvFilter` directive; `RUST_LOG` wins when set.
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub log_stdout: bool,
    /// Where exported templates and sessions are written.
    pub output_dir: PathBuf,
    pub share_base_url: String,
    /// Seed the template library with the three training templates.
    pub builtin_templates: bool,
    /// Initial branding. Falls back to [`BrandConfig::starter`].
    pub brand: Option<BrandConfig>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
            log_stdout: true,
            output_dir: PathBuf::from("."),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            builtin_templates: true,
            brand: None,
        }
    }
}

impl TrainerConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn initial_brand(&self) -> BrandConfig {
        self.brand.clone().unwrap_or_else(BrandConfig::starter)
    }
}

impl fmt::Display for TrainerConfig {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Log level:     {}", self.log_level)?;
        match &self.log_file {
            Some(path) => writeln!(f, "Log file:      {}", path.display())?,
            None => writeln!(f, "Log file:      -")?,
        }
        writeln!(f, "Log to stdout: {}", self.log_stdout)?;
        writeln!(f, "Output folder: {}", self.output_dir.display())?;
        writeln!(f, "Share URL:     {}", self.share_base_url)?;
        writeln!(f, "Built-ins:     {}", self.builtin_templates)
    }
}
