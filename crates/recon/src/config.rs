use serde::Deserialize;

use crate::error::ReconError;
use crate::matcher::{KeyPattern, MatchMode};
use crate::parse::HeaderPadding;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Matching configuration, normally read from `config.toml`.
///
/// Every field has a default, so an empty file is a valid config that
/// reproduces the courier-order workflow (province / city / district keys,
/// order-number merge key, courier-name category).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Master dataset location, relative to the config file's directory.
    #[serde(default = "default_data_file")]
    pub data_file: String,
    /// Ordered key patterns for matching a new sheet against the master. The last
    /// one is dropped in the relaxed pass.
    #[serde(default = "default_key_fields")]
    pub key_fields: Vec<String>,
    /// Key pattern used to pair two uploads into one table on import.
    #[serde(default = "default_merge_field")]
    pub merge_field: String,
    #[serde(default = "default_category_column")]
    pub category_column: String,
    #[serde(default)]
    pub match_mode: MatchMode,
    #[serde(default = "default_true")]
    pub pad_headers: bool,
    #[serde(default = "default_true")]
    pub drop_incomplete_rows: bool,
}

fn default_name() -> String {
    "sheetmatch".into()
}

fn default_data_file() -> String {
    "data.xlsx".into()
}

fn default_key_fields() -> Vec<String> {
    vec!["省".into(), "市".into(), "区".into()]
}

fn default_merge_field() -> String {
    "订单.*号".into()
}

fn default_category_column() -> String {
    "快递名称".into()
}

fn default_true() -> bool {
    true
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_file: default_data_file(),
            key_fields: default_key_fields(),
            merge_field: default_merge_field(),
            category_column: default_category_column(),
            match_mode: MatchMode::default(),
            pad_headers: true,
            drop_incomplete_rows: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.key_fields.is_empty() {
            return Err(ReconError::ConfigValidation(
                "key_fields must name at least one pattern".into(),
            ));
        }
        if let Some(i) = self.key_fields.iter().position(|k| k.is_empty()) {
            return Err(ReconError::ConfigValidation(format!(
                "key_fields[{i}] is empty"
            )));
        }
        if self.merge_field.is_empty() {
            return Err(ReconError::ConfigValidation("merge_field is empty".into()));
        }
        if self.data_file.is_empty() {
            return Err(ReconError::ConfigValidation("data_file is empty".into()));
        }

        // Surface bad regexes now rather than on the first match request.
        self.key_patterns()
            .and_then(|_| self.merge_pattern())
            .map_err(|e| ReconError::ConfigValidation(e.to_string()))?;

        Ok(())
    }

    pub fn key_patterns(&self) -> Result<Vec<KeyPattern>, ReconError> {
        KeyPattern::compile_all(&self.key_fields, self.match_mode)
    }

    pub fn merge_pattern(&self) -> Result<KeyPattern, ReconError> {
        KeyPattern::compile(&self.merge_field, self.match_mode)
    }

    pub fn header_padding(&self) -> HeaderPadding {
        if self.pad_headers {
            HeaderPadding::Pad
        } else {
            HeaderPadding::Preserve
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
