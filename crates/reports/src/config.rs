use std::collections::BTreeMap;

use serde::Deserialize;

use freightbook_core::SalesType;

use crate::error::ReportError;

// ---------------------------------------------------------------------------
// Report config
// ---------------------------------------------------------------------------

/// Branch-name canonicalization and receipt-routing rules.
///
/// The alias table merges the spellings that appear in manifest uploads
/// into one canonical branch name; the head office's own aliases map to
/// `ho_name`. `ho_receipt_sales_types` lists the sales types whose
/// receipts are booked at HO rather than at the destination branch.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_ho_name")]
    pub ho_name: String,
    /// Raw destination spelling -> canonical branch name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    #[serde(default = "default_ho_receipt_types")]
    pub ho_receipt_sales_types: Vec<SalesType>,
}

fn default_name() -> String {
    "Executive Report".into()
}

fn default_ho_name() -> String {
    "Patna Jamal Road (HO)".into()
}

fn default_ho_receipt_types() -> Vec<SalesType> {
    vec![SalesType::Paid, SalesType::ToBeBilled]
}

impl Default for ReportConfig {
    fn default() -> Self {
        let ho_name = default_ho_name();
        let mut aliases = BTreeMap::new();
        aliases.insert("PATNA (JAMAL ROAD)".to_string(), ho_name.clone());
        aliases.insert("PATNA JAMAL ROAD".to_string(), ho_name.clone());
        Self {
            name: default_name(),
            ho_name,
            aliases,
            ho_receipt_sales_types: default_ho_receipt_types(),
        }
    }
}

impl ReportConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReportError> {
        let config: ReportConfig =
            toml::from_str(input).map_err(|e| ReportError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReportError> {
        if self.ho_name.trim().is_empty() {
            return Err(ReportError::ConfigValidation("ho_name must not be empty".into()));
        }
        for (raw, canonical) in &self.aliases {
            if raw.trim().is_empty() || canonical.trim().is_empty() {
                return Err(ReportError::ConfigValidation(format!(
                    "alias '{raw}' -> '{canonical}' has a blank side"
                )));
            }
        }
        Ok(())
    }

    /// Canonical branch name for a raw destination string.
    ///
    /// Trims, then looks the alias table up exactly and case-insensitively;
    /// unmapped names are upper-cased so case variants collapse into one
    /// branch. Blank destinations become `"Unknown"`.
    pub fn canonical(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return "Unknown".into();
        }
        if let Some(canonical) = self.aliases.get(trimmed) {
            return canonical.clone();
        }
        if let Some((_, canonical)) = self
            .aliases
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(trimmed))
        {
            return canonical.clone();
        }
        trimmed.to_uppercase()
    }

    /// Whether receipts for this sales type land at head office.
    pub fn receipts_at_ho(&self, sales_type: SalesType) -> bool {
        self.ho_receipt_sales_types.contains(&sales_type)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
