//! Pipeline configuration.
//!
//! Every field has a default matching the binding-line contract, so an empty
//! configuration file (or none at all) gives the standard behaviour.
//!
//! ```rust
//! use bindline::PipelineConfig;
//!
//! let config = PipelineConfig::from_yaml_str(
//!     "root_tag: workInstruction\nrule:\n  width_increment: 12\n",
//! )?;
//! assert_eq!(config.root_tag, "workInstruction");
//! assert_eq!(config.rule.width_increment, 12.0);
//! assert_eq!(config.rule.trigger_route, "Limp P/Bound 8pp Cover");
//! # Ok::<(), bindline::Error>(())
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::common::{Error, Result};
use crate::pipeline::rules::ProductionRule;
use crate::pipeline::xml::DEFAULT_ROOT_TAG;

/// Name of the bulk export archive.
pub const DEFAULT_ARCHIVE_NAME: &str = "xml_and_datamatrix_files.zip";

/// Configuration for loading, transforming, and exporting a sheet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root element of every XML record
    pub root_tag: String,
    /// Whether the production-route width rule runs on load
    pub apply_production_rule: bool,
    /// The production-route width rule
    pub rule: ProductionRule,
    /// File name of the bulk export archive
    pub archive_name: String,
    /// Delimiter for comma-separated text input
    pub delimiter: char,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root_tag: DEFAULT_ROOT_TAG.to_string(),
            apply_production_rule: true,
            rule: ProductionRule::default(),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            delimiter: ',',
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: PipelineConfig =
            serde_saphyr::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML configuration file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if !crate::common::xml::is_valid_element_name(&self.root_tag) {
            return Err(Error::Config(format!(
                "root_tag '{}' is not a valid XML element name",
                self.root_tag
            )));
        }
        if !self.delimiter.is_ascii() {
            return Err(Error::Config(format!(
                "delimiter '{}' must be a single ASCII character",
                self.delimiter
            )));
        }
        if !self.rule.width_increment.is_finite() {
            return Err(Error::Config("rule.width_increment must be finite".to_string()));
        }
        if self.archive_name.is_empty() || self.archive_name.contains(['/', '\\']) {
            return Err(Error::Config(format!(
                "archive_name '{}' must be a plain file name",
                self.archive_name
            )));
        }
        Ok(())
    }

    /// Set the XML root element.
    #[inline]
    pub fn with_root_tag(mut self, root_tag: impl Into<String>) -> Self {
        self.root_tag = root_tag.into();
        self
    }

    /// Enable or disable the production-route width rule.
    #[inline]
    pub fn with_production_rule(mut self, apply: bool) -> Self {
        self.apply_production_rule = apply;
        self
    }

    /// Replace the production-route width rule.
    #[inline]
    pub fn with_rule(mut self, rule: ProductionRule) -> Self {
        self.rule = rule;
        self
    }

    /// Set the export archive name.
    #[inline]
    pub fn with_archive_name(mut self, name: impl Into<String>) -> Self {
        self.archive_name = name.into();
        self
    }

    /// Set the delimiter for comma-separated text input.
    #[inline]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Text parser settings derived from this configuration.
    ///
    /// Fails with [`Error::Config`] when the delimiter is not a single ASCII
    /// byte, which a builder-made configuration can carry.
    pub fn text_config(&self) -> Result<crate::sheet::text::TextConfig> {
        if !self.delimiter.is_ascii() {
            return Err(Error::Config(format!(
                "delimiter '{}' must be a single ASCII character",
                self.delimiter
            )));
        }
        Ok(crate::sheet::text::TextConfig::default().with_delimiter(self.delimiter as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.root_tag, "csv");
        assert!(config.apply_production_rule);
        assert_eq!(config.archive_name, "xml_and_datamatrix_files.zip");
        assert_eq!(config.rule, ProductionRule::default());
    }

    #[test]
    fn test_partial_yaml() {
        let config = PipelineConfig::from_yaml_str("apply_production_rule: false\ndelimiter: ';'\n").unwrap();
        assert!(!config.apply_production_rule);
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.root_tag, "csv");
        assert_eq!(config.text_config().unwrap().delimiter, b';');
    }

    #[test]
    fn test_invalid_root_tag_rejected() {
        let result = PipelineConfig::from_yaml_str("root_tag: \"1bad\"\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_archive_name_must_be_flat() {
        let result = PipelineConfig::from_yaml_str("archive_name: out/all.zip\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let config = PipelineConfig::new().with_delimiter('é');
        assert!(matches!(config.text_config(), Err(Error::Config(_))));
        assert!(matches!(
            PipelineConfig::from_yaml_str("delimiter: 'é'\n"),
            Err(Error::Config(_))
        ));
        let tab = PipelineConfig::new().with_delimiter('\t');
        assert_eq!(tab.text_config().unwrap().delimiter, b'\t');
    }

    #[test]
    fn test_builder() {
        let config = PipelineConfig::new()
            .with_root_tag("job")
            .with_production_rule(false)
            .with_archive_name("batch.zip");
        assert_eq!(config.root_tag, "job");
        assert!(!config.apply_production_rule);
        assert_eq!(config.archive_name, "batch.zip");
    }
}
