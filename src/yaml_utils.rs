//! YAML utilities for iRacing session metadata
//!
//! iRacing writes the session metadata as a NUL-terminated text block that
//! frequently carries control characters and non-UTF-8 bytes. This module
//! cleans the text at the character level without parsing it; structural
//! repairs live in [`crate::metadata`].

use std::borrow::Cow;

use crate::{Result, TelemetryError};

/// Whether `ch` is removed before parsing.
///
/// C0 controls other than tab, newline and carriage return, DEL, and the C1 block.
fn is_stripped_control(ch: char) -> bool {
    matches!(ch, '\x00'..='\x08' | '\x0B'..='\x0C' | '\x0E'..='\x1F' | '\x7F' | '\u{80}'..='\u{9F}')
}

/// Remove control characters that break YAML parsers, keeping `\t`, `\n` and `\r`.
pub fn strip_control_characters(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_stripped_control) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.chars().filter(|&ch| !is_stripped_control(ch)).collect())
}

/// Decode a raw metadata section.
///
/// Stops at the first NUL byte. Invalid UTF-8 (iRacing writes some names in
/// Latin-1) is replaced rather than rejected.
pub fn extract_metadata_text(section: &[u8]) -> String {
    let end = section.iter().position(|&b| b == 0).unwrap_or(section.len());
    String::from_utf8_lossy(&section[..end]).into_owned()
}

/// Decode the metadata section at `offset..offset + length` of `data`.
pub fn extract_metadata_region(data: &[u8], offset: usize, length: usize) -> Result<String> {
    let end = offset.checked_add(length).filter(|&end| end <= data.len()).ok_or_else(|| {
        TelemetryError::Parse {
            context: "Metadata extraction".to_string(),
            details: format!(
                "Metadata extends beyond buffer bounds: offset={}, len={}, buffer_size={}",
                offset,
                length,
                data.len()
            ),
        }
    })?;

    Ok(extract_metadata_text(&data[offset..end]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_removes_control_characters() {
        let input = "WeekendInfo:\n\x00\x01\x02  TrackName: test\x03\x7F\u{85}";
        let result = strip_control_characters(input);
        assert_eq!(result, "WeekendInfo:\n  TrackName: test");
    }

    #[test]
    fn test_strip_keeps_valid_whitespace() {
        let input = "Key:\n\r\t  Value";
        assert!(matches!(strip_control_characters(input), Cow::Borrowed(text) if text == input));
    }

    #[test]
    fn test_strip_keeps_printable_unicode() {
        assert_eq!(strip_control_characters("UserName: Jürgen Ström\x1B"), "UserName: Jürgen Ström");
    }

    #[test]
    fn test_extract_with_null_terminator() {
        let data = b"SessionInfo:\n  TrackName: test\0padding";
        assert_eq!(extract_metadata_text(data), "SessionInfo:\n  TrackName: test");
    }

    #[test]
    fn test_extract_without_null() {
        let data = b"SessionInfo:\n  TrackName: test";
        assert_eq!(extract_metadata_text(data), "SessionInfo:\n  TrackName: test");
    }

    #[test]
    fn test_extract_latin1_is_lossy() {
        let data = b"UserName: J\xFCrgen\0";
        assert_eq!(extract_metadata_text(data), "UserName: J\u{FFFD}rgen");
    }

    #[test]
    fn test_extract_region_bounds_check() {
        let data = b"headerDriverInfo:\0";
        assert_eq!(extract_metadata_region(data, 6, 12).unwrap(), "DriverInfo:");
        assert!(extract_metadata_region(data, 0, 100).is_err());
        assert!(extract_metadata_region(data, usize::MAX, 2).is_err());
    }
}
