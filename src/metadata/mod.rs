//! Session metadata normalization
//!
//! iRacing's session YAML is close to YAML but not quite: control characters,
//! keys missing their colon, stray commas and unquoted `@` values all occur in
//! real recordings. [`MetadataNormalizer`] repairs the text line by line, then
//! alternates parsing and patching the line the parser rejected until the
//! document parses or the attempt budget runs out.
//!
//! Repairs are structural only. A repaired value is valid YAML, not
//! necessarily what the author meant.
//!
//! ```rust
//! use pitwall_ibt::MetadataNormalizer;
//!
//! let raw = "UserName:\nAbbrevName: ,\nInitials:\nUserID: 991832";
//! let normalized = MetadataNormalizer::default().normalize(raw).unwrap();
//!
//! assert_eq!(normalized.tree["AbbrevName"].as_str(), Some("unknown"));
//! assert_eq!(normalized.tree["UserID"].as_u64(), Some(991832));
//! assert!(normalized.tree["Initials"].is_null());
//! ```

mod config;
mod passes;

pub use config::NormalizerConfig;
pub use crate::yaml_utils::{extract_metadata_region, extract_metadata_text, strip_control_characters};

use std::borrow::Cow;

use serde::Serialize;
use serde_yaml_ng::{Mapping, Value};
use tracing::{debug, warn};

use crate::{Result, TelemetryError};

/// What a single repair did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum RepairKind {
    /// Control characters removed
    ControlCharacters,
    /// `Key: ,` rewritten to the placeholder
    TrailingComma,
    /// Line starting with a comma removed
    DroppedCommaLine,
    /// Colon added to a bare key
    MissingColon,
    /// Line of a recurring subsection removed
    DroppedSubsection { header: String },
    /// Value containing `@` single-quoted
    QuotedValue,
    /// Parser rejection fixed by inserting a colon after the first token
    ColonInserted,
    /// Parser rejection fixed by replacing a sequence entry with `- null`
    NullListItem,
    /// Parser rejection fixed by removing commas
    CommaStripped,
    /// Parser rejection fixed by replacing the line with a placeholder key
    PlaceholderKey,
}

/// One applied repair.
///
/// `line` is 0-based and refers to the text as it was when the repair ran:
/// the raw input for line rules, the current candidate for parser-driven patches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Repair {
    pub line: usize,
    pub kind: RepairKind,
}

/// Result of a successful normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMetadata {
    /// Repaired text; parses to `tree`
    pub text: String,
    /// Parsed document. Empty input gives an empty mapping.
    pub tree: Value,
    /// Every repair applied, in order
    pub repairs: Vec<Repair>,
}

/// Repairs and parses session metadata text.
#[derive(Debug, Clone, Default)]
pub struct MetadataNormalizer {
    config: NormalizerConfig,
}

impl MetadataNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Apply the text repairs without parsing.
    ///
    /// Control characters are stripped first, then the line rules run until
    /// the text stops changing.
    pub fn repair_text(&self, raw: &str) -> (String, Vec<Repair>) {
        let mut repairs = Vec::new();
        let text = self.repair_into(raw, &mut repairs);
        (text, repairs)
    }

    /// Repair `raw` and parse it.
    ///
    /// Fails with [`TelemetryError::UnrecoverableMetadata`] when the parser
    /// still rejects the text after `max_repair_attempts` patches. It can also
    /// fail before the budget is spent: when the parser reports no line, or
    /// rejects a line that is already a placeholder key, no further patch
    /// would change the text.
    pub fn normalize(&self, raw: &str) -> Result<NormalizedMetadata> {
        let mut repairs = Vec::new();
        let mut text = self.repair_into(raw, &mut repairs);

        if text.trim().is_empty() {
            debug!("Session metadata is empty");
            return Ok(NormalizedMetadata { text, tree: Value::Mapping(Mapping::new()), repairs });
        }

        let mut patches = 0;
        loop {
            let error = match serde_yaml_ng::from_str::<Value>(&text) {
                Ok(tree) => {
                    debug!(repairs = repairs.len(), patches, "Session metadata normalized");
                    let tree = if tree.is_null() { Value::Mapping(Mapping::new()) } else { tree };
                    return Ok(NormalizedMetadata { text, tree, repairs });
                }
                Err(error) => error,
            };

            // The parser counts lines from 1.
            let line = error.location().map(|location| location.line().saturating_sub(1));
            let message = error.to_string();
            let attempts = patches + 1;

            if patches >= self.config.max_repair_attempts {
                warn!(?line, attempts, "Giving up on session metadata: {}", message);
                return Err(TelemetryError::unrecoverable_metadata(line, message, attempts));
            }

            let patched = line.and_then(|line| {
                let current = text.lines().nth(line)?;
                let (replacement, kind) = passes::patch_line(current, line)?;
                Some((line, replacement, kind))
            });
            let Some((line, replacement, kind)) = patched else {
                warn!(?line, attempts, "No patch for rejected session metadata: {}", message);
                return Err(TelemetryError::unrecoverable_metadata(line, message, attempts));
            };

            debug!(line, ?kind, "Patched session metadata line: {}", message);
            repairs.push(Repair { line, kind });
            patches += 1;

            let candidate = text
                .lines()
                .enumerate()
                .map(|(index, current)| if index == line { replacement.as_str() } else { current })
                .collect::<Vec<_>>()
                .join("\n");
            text = passes::repair_lines(&candidate, &self.config, &mut repairs);
        }
    }

    fn repair_into(&self, raw: &str, repairs: &mut Vec<Repair>) -> String {
        let stripped = strip_control_characters(raw);
        if let Cow::Owned(_) = stripped {
            for (line, content) in raw.lines().enumerate() {
                if let Cow::Owned(_) = strip_control_characters(content) {
                    debug!(line, "Stripped control characters from session metadata");
                    repairs.push(Repair { line, kind: RepairKind::ControlCharacters });
                }
            }
        }
        passes::repair_lines(&stripped, &self.config, repairs)
    }
}
