//! Error types for recording decoding.
//!
//! All errors implement the `std::error::Error` trait and carry enough
//! structured context to diagnose the recording that produced them.
//!
//! ## Error Categories
//!
//! - **Metadata Errors**: the session YAML could not be repaired into a parseable document
//! - **Layout Errors**: a descriptor does not fit the record it is decoded from
//! - **Storage Errors**: short reads, out-of-range sample indices, released sources
//! - **Type Conversion Errors**: typed access to a field of another primitive type
//!
//! Duplicate descriptor names are not errors: they are reported as
//! [`CatalogWarning`](crate::CatalogWarning)s and resolved last-wins.
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use pitwall_ibt::TelemetryError;
//!
//! let error = TelemetryError::IndexOutOfRange { index: 3, count: 3 };
//! assert!(!error.is_retryable());
//! assert!(error.to_string().contains("0..2"));
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use thiserror::Error;

/// Result type alias for recording operations.
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Main error type for recording operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TelemetryError {
    /// `line` is the 0-based line of the normalized text the parser rejected last.
    #[error("Session metadata could not be repaired after {attempts} attempt(s){}: {message}", describe_line(.line))]
    UnrecoverableMetadata { line: Option<usize>, message: String, attempts: usize },

    #[error(
        "Field '{field}' at offset {offset} with size {size} exceeds record length {record_len}"
    )]
    OffsetOutOfRange { field: String, offset: usize, size: usize, record_len: usize },

    #[error("Short read at byte {offset}: expected {expected} bytes, got {actual}")]
    ShortRead { offset: u64, expected: usize, actual: usize },

    #[error("Sample index {index} out of range ({})", describe_range(.count))]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Sample source has been closed")]
    ClosedSource,

    #[error("I/O error during {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid descriptor '{name}': {details}")]
    InvalidDescriptor { name: String, details: String },

    #[error("Invalid record header: {details}")]
    InvalidHeader { details: String },

    #[error("Type conversion error: {details}")]
    TypeConversion { details: String },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },
}

fn describe_line(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {} (0-based)", line),
        None => String::new(),
    }
}

fn describe_range(count: &usize) -> String {
    match *count {
        0 => "recording has no samples".to_string(),
        n => format!("valid range 0..{}", n - 1),
    }
}

impl TelemetryError {
    /// Returns whether this error is potentially recoverable through retry.
    ///
    /// The decoder never retries internally; this only informs caller policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            TelemetryError::Io { .. } => true,
            TelemetryError::UnrecoverableMetadata { .. } => false,
            TelemetryError::OffsetOutOfRange { .. } => false,
            TelemetryError::ShortRead { .. } => false,
            TelemetryError::IndexOutOfRange { .. } => false,
            TelemetryError::ClosedSource => false,
            TelemetryError::InvalidDescriptor { .. } => false,
            TelemetryError::InvalidHeader { .. } => false,
            TelemetryError::TypeConversion { .. } => false,
            TelemetryError::Parse { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TelemetryError::UnrecoverableMetadata { .. } => vec![
                "Inspect the reported line of the session YAML",
                "Raise max_repair_attempts in NormalizerConfig",
                "Add the offending subsection to dropped_subsections",
            ],
            TelemetryError::OffsetOutOfRange { .. } => vec![
                "Check the descriptor table against the record length",
                "Verify the recording is not truncated or corrupted",
            ],
            TelemetryError::ShortRead { .. } => vec![
                "Check the file was completely written",
                "Use sequential access to read up to the truncation point",
            ],
            TelemetryError::IndexOutOfRange { .. } => vec![
                "Query sample_count() before random access",
                "Use an index inside the reported range",
            ],
            TelemetryError::ClosedSource => vec![
                "Keep the sample source open while reading samples",
                "Reopen the recording file",
            ],
            TelemetryError::Io { .. } => vec![
                "Check file exists and is readable",
                "Check file permissions",
                "Retry the read",
            ],
            TelemetryError::InvalidDescriptor { .. } => vec![
                "Check the descriptor count and size fields",
                "Verify the variable type code is supported",
            ],
            TelemetryError::InvalidHeader { .. } => vec![
                "Verify the record length read from the file header",
                "Check the file is an IBT recording",
            ],
            TelemetryError::TypeConversion { .. } => vec![
                "Check data type compatibility",
                "Use Sample::field for untyped access",
            ],
            TelemetryError::Parse { .. } => vec![
                "Check data format compatibility",
                "Verify source data integrity",
            ],
        }
    }

    /// Helper constructor for I/O errors with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        TelemetryError::Io { context: context.into(), source }
    }

    /// Helper constructor for invalid descriptor errors.
    pub fn invalid_descriptor(name: impl Into<String>, details: impl Into<String>) -> Self {
        TelemetryError::InvalidDescriptor { name: name.into(), details: details.into() }
    }

    /// Helper constructor for unrecoverable metadata errors.
    pub fn unrecoverable_metadata(
        line: Option<usize>,
        message: impl Into<String>,
        attempts: usize,
    ) -> Self {
        TelemetryError::UnrecoverableMetadata { line, message: message.into(), attempts }
    }
}

impl From<std::io::Error> for TelemetryError {
    fn from(err: std::io::Error) -> Self {
        TelemetryError::Io { context: "sample source access".to_string(), source: err }
    }
}
