use std::fmt;
use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::form::FormError;

/// Company branding and plan metadata shown on the form.
///
/// Owned by the host; the form only reads it. Every field is optional on
/// the wire and defaults to an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandConfig {
    pub company_name: String,
    pub company_address: String,
    pub company_phone: String,
    pub company_email: String,
    pub company_website: String,
    /// Embeddable logo, usually a `data:` URL produced by [`logo_data_url`].
    pub logo_url: String,
    pub form_title: String,
    pub closing_date: String,
    pub plan1_name: String,
    pub plan1_code: String,
    pub plan2_name: String,
    pub plan2_code: String,
    pub plan3_name: String,
    pub plan3_code: String,
}

/// A selectable investment plan on the investment-selection tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOption {
    pub name: String,
    pub code: String,
}

impl fmt::Display for PlanOption {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.code.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} ({})", self.name, self.code)
        }
    }
}

impl BrandConfig {
    /// Wire names accepted by [`BrandConfig::update`].
    pub const FIELD_NAMES: [&'static str; 14] = [
        "companyName",
        "companyAddress",
        "companyPhone",
        "companyEmail",
        "companyWebsite",
        "logoUrl",
        "formTitle",
        "closingDate",
        "plan1Name",
        "plan1Code",
        "plan2Name",
        "plan2Code",
        "plan3Name",
        "plan3Code",
    ];

    /// Branding used when a session starts without a template.
    pub fn starter() -> Self {
        Self {
            form_title: "Application form for Offshore Bond investment".to_string(),
            ..Default::default()
        }
    }

    fn slot_mut(
        &mut self,
        field: &str,
    ) -> Option<&mut String> {
        let slot = match field {
            "companyName" => &mut self.company_name,
            "companyAddress" => &mut self.company_address,
            "companyPhone" => &mut self.company_phone,
            "companyEmail" => &mut self.company_email,
            "companyWebsite" => &mut self.company_website,
            "logoUrl" => &mut self.logo_url,
            "formTitle" => &mut self.form_title,
            "closingDate" => &mut self.closing_date,
            "plan1Name" => &mut self.plan1_name,
            "plan1Code" => &mut self.plan1_code,
            "plan2Name" => &mut self.plan2_name,
            "plan2Code" => &mut self.plan2_code,
            "plan3Name" => &mut self.plan3_name,
            "plan3Code" => &mut self.plan3_code,
            _ => return None,
        };
        Some(slot)
    }

    /// Reads a field by wire name.
    pub fn get(
        &self,
        field: &str,
    ) -> Option<&str> {
        let value = match field {
            "companyName" => &self.company_name,
            "companyAddress" => &self.company_address,
            "companyPhone" => &self.company_phone,
            "companyEmail" => &self.company_email,
            "companyWebsite" => &self.company_website,
            "logoUrl" => &self.logo_url,
            "formTitle" => &self.form_title,
            "closingDate" => &self.closing_date,
            "plan1Name" => &self.plan1_name,
            "plan1Code" => &self.plan1_code,
            "plan2Name" => &self.plan2_name,
            "plan2Code" => &self.plan2_code,
            "plan3Name" => &self.plan3_name,
            "plan3Code" => &self.plan3_code,
            _ => return None,
        };
        Some(value)
    }

    /// Sets a field by wire name.
    ///
    /// # Errors
    ///
    /// [`FormError::UnknownBrandField`] when `field` is not one of
    /// [`BrandConfig::FIELD_NAMES`]; the config is left untouched.
    pub fn update(
        &mut self,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        let slot = self
            .slot_mut(field)
            .ok_or_else(|| FormError::UnknownBrandField(field.to_string()))?;
        *slot = value.into();
        Ok(())
    }

    /// The three (name, code) plan pairs, including blank ones.
    pub fn plans(&self) -> [PlanOption; 3] {
        [
            (&self.plan1_name, &self.plan1_code),
            (&self.plan2_name, &self.plan2_code),
            (&self.plan3_name, &self.plan3_code),
        ]
        .map(|(name, code)| PlanOption {
            name: name.clone(),
            code: code.clone(),
        })
    }

    /// Plans with a name, offered as choices for `selectedPlan`.
    pub fn plan_options(&self) -> Vec<PlanOption> {
        self.plans()
            .into_iter()
            .filter(|plan| !plan.name.is_empty())
            .collect()
    }

    /// Stores an uploaded logo as a data URL.
    pub fn set_logo(
        &mut self,
        bytes: &[u8],
        filename: &str,
    ) {
        self.logo_url = logo_data_url(bytes, filename);
    }

    pub fn clear_logo(&mut self) {
        self.logo_url.clear();
    }

    /// Name shown in headers, with a placeholder while none is set.
    pub fn display_name(&self) -> &str {
        if self.company_name.is_empty() {
            "Your Company Name"
        } else {
            &self.company_name
        }
    }
}

/// Encodes an image file as a `data:` URL.
///
/// The MIME type is guessed from the file extension. No size or type checks
/// are made; anything the caller hands over is embedded.
pub fn logo_data_url(
    bytes: &[u8],
    filename: &str,
) -> String {
    let mime = match Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

impl fmt::Display for BrandConfig {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "{}", self.display_name())?;
        for line in [
            &self.company_address,
            &self.company_phone,
            &self.company_email,
            &self.company_website,
        ] {
            if !line.is_empty() {
                writeln!(f, "  {line}")?;
            }
        }
        if !self.logo_url.is_empty() {
            writeln!(f, "  [logo attached]")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.form_title)?;
        for plan in self.plan_options() {
            writeln!(f, "  - {plan}")?;
        }
        if !self.closing_date.is_empty() {
            write!(f, "Closing date: {}", self.closing_date)?;
        }
        Ok(())
    }
}
