//! Normalizer rule set configuration

use serde::{Deserialize, Serialize};

/// Which repair rules run, and with what parameters.
///
/// Every rule is enabled by default. Configs deserialize from partial
/// documents, so a YAML file only needs to name the settings it changes:
///
/// ```rust
/// use pitwall_ibt::NormalizerConfig;
///
/// let config: NormalizerConfig =
///     serde_yaml_ng::from_str("placeholder: n/a\nquote_at_values: false").unwrap();
/// assert_eq!(config.placeholder, "n/a");
/// assert!(!config.quote_at_values);
/// assert_eq!(config.max_repair_attempts, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct NormalizerConfig {
    /// Value written in place of a missing one
    pub placeholder: String,
    /// Parser-driven patches before giving up
    pub max_repair_attempts: usize,
    /// Subsection headers dropped when they occur more than once
    pub dropped_subsections: Vec<String>,
    /// `Key: ,` becomes `Key: <placeholder>`
    pub fix_trailing_comma: bool,
    /// Lines starting with a comma are removed
    pub drop_comma_lines: bool,
    /// `Key token` followed by a key line becomes `Key: <placeholder>`
    pub fix_missing_colon: bool,
    /// Recurring `dropped_subsections` blocks are removed
    pub drop_recurring_subsections: bool,
    /// Values containing `@` are single-quoted
    pub quote_at_values: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            placeholder: "unknown".to_string(),
            max_repair_attempts: 5,
            dropped_subsections: vec!["CarSetup".to_string()],
            fix_trailing_comma: true,
            drop_comma_lines: true,
            fix_missing_colon: true,
            drop_recurring_subsections: true,
            quote_at_values: true,
        }
    }
}

impl NormalizerConfig {
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_max_repair_attempts(mut self, attempts: usize) -> Self {
        self.max_repair_attempts = attempts;
        self
    }

    pub fn with_dropped_subsections<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dropped_subsections = headers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_trailing_comma_fix(mut self, enabled: bool) -> Self {
        self.fix_trailing_comma = enabled;
        self
    }

    pub fn with_comma_line_drop(mut self, enabled: bool) -> Self {
        self.drop_comma_lines = enabled;
        self
    }

    pub fn with_missing_colon_fix(mut self, enabled: bool) -> Self {
        self.fix_missing_colon = enabled;
        self
    }

    pub fn with_subsection_drop(mut self, enabled: bool) -> Self {
        self.drop_recurring_subsections = enabled;
        self
    }

    pub fn with_at_quoting(mut self, enabled: bool) -> Self {
        self.quote_at_values = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_every_rule() {
        let config = NormalizerConfig::default();
        assert_eq!(config.placeholder, "unknown");
        assert_eq!(config.max_repair_attempts, 5);
        assert_eq!(config.dropped_subsections, ["CarSetup"]);
        assert!(config.fix_trailing_comma && config.drop_comma_lines && config.fix_missing_colon);
        assert!(config.drop_recurring_subsections && config.quote_at_values);
    }

    #[test]
    fn setters_chain() {
        let config = NormalizerConfig::default()
            .with_placeholder("n/a")
            .with_max_repair_attempts(2)
            .with_dropped_subsections(["CarSetup", "SplitTimeInfo"])
            .with_at_quoting(false);

        assert_eq!(config.placeholder, "n/a");
        assert_eq!(config.max_repair_attempts, 2);
        assert_eq!(config.dropped_subsections.len(), 2);
        assert!(!config.quote_at_values);
        assert!(config.fix_missing_colon);
    }

    #[test]
    fn empty_document_gives_defaults() {
        let config: NormalizerConfig = serde_yaml_ng::from_str("{}").unwrap();
        assert_eq!(config, NormalizerConfig::default());
    }
}
