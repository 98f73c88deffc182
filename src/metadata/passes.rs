//! Line-level repair passes
//!
//! Each pass classifies trimmed lines but writes back with the original
//! indentation. Drops are decided first (comma lines, then recurring
//! subsections); the rewrite rules then run on the surviving lines, first
//! match wins per line.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{NormalizerConfig, Repair, RepairKind};

/// `Key: ,` with nothing else on the line.
static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*(?:-\s+)?)([A-Za-z_][A-Za-z0-9_]*):\s*,\s*$").expect("valid regex")
});

/// `Key` or `Key token...` without any colon.
static MISSING_COLON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)([A-Za-z_][A-Za-z0-9_]*)(?:\s+[^:]*)?$").expect("valid regex")
});

/// Any line opening with `Key:`.
static KEY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:-\s+)?[A-Za-z_][A-Za-z0-9_]*:(?:\s|$)").expect("valid regex")
});

/// `Key: value`, capturing everything up to the value and the value itself.
static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*(?:-\s+)?[A-Za-z_][A-Za-z0-9_]*:\s+)(\S.*?)\s*$").expect("valid regex")
});

pub(super) fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Run the line rules until the text stops changing.
pub(super) fn repair_lines(text: &str, config: &NormalizerConfig, repairs: &mut Vec<Repair>) -> String {
    let mut current = text.to_string();
    // Each productive pass removes a line or fixes one, and a line carries at most one defect.
    for _ in 0..=2 * current.lines().count() {
        let mut found = Vec::new();
        let next = repair_pass(&current, config, &mut found);
        if found.is_empty() {
            break;
        }
        repairs.extend(found);
        current = next;
    }
    current
}

fn repair_pass(text: &str, config: &NormalizerConfig, repairs: &mut Vec<Repair>) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut keep = vec![true; lines.len()];
    let mut found = Vec::new();

    if config.drop_comma_lines {
        drop_comma_lines(&lines, &mut keep, &mut found);
    }
    if config.drop_recurring_subsections {
        for header in &config.dropped_subsections {
            drop_recurring_subsection(&lines, header, &mut keep, &mut found);
        }
    }

    // Bottom-up, so a missing colon is judged against the already repaired next line.
    let mut output: Vec<Cow<'_, str>> = Vec::with_capacity(lines.len());
    for index in (0..lines.len()).rev().filter(|&index| keep[index]) {
        let next = output.last().map(|line| line.as_ref());
        let (line, kind) = rewrite_line(lines[index], next, config);
        if let Some(kind) = kind {
            debug!(line = index, ?kind, "Rewrote metadata line");
            found.push(Repair { line: index, kind });
        }
        output.push(line);
    }
    output.reverse();

    found.sort_by_key(|repair| repair.line);
    repairs.extend(found);
    output.join("\n")
}

fn drop_comma_lines(lines: &[&str], keep: &mut [bool], found: &mut Vec<Repair>) {
    for (index, line) in lines.iter().enumerate() {
        if line.trim_start().starts_with(',') {
            debug!(line = index, "Dropped metadata line starting with a comma");
            keep[index] = false;
            found.push(Repair { line: index, kind: RepairKind::DroppedCommaLine });
        }
    }
}

/// Drop every `header:` block once the header occurs more than once.
///
/// A block is the header line plus the following lines that are blank, more
/// deeply indented, or sequence entries at the header's own indentation.
fn drop_recurring_subsection(lines: &[&str], header: &str, keep: &mut [bool], found: &mut Vec<Repair>) {
    let target = format!("{}:", header);
    let starts: Vec<usize> = (0..lines.len())
        .filter(|&index| keep[index] && lines[index].trim() == target)
        .collect();
    if starts.len() < 2 {
        return;
    }

    debug!(header, occurrences = starts.len(), "Dropping recurring metadata subsection");
    for start in starts {
        let depth = indentation(lines[start]);
        let mut end = start + 1;
        while end < lines.len() {
            let line = lines[end];
            let trimmed = line.trim_start();
            let inside = !keep[end]
                || trimmed.is_empty()
                || indentation(line) > depth
                || (indentation(line) == depth && (trimmed == "-" || trimmed.starts_with("- ")));
            if !inside {
                break;
            }
            end += 1;
        }

        for index in start..end {
            if keep[index] {
                keep[index] = false;
                found.push(Repair {
                    line: index,
                    kind: RepairKind::DroppedSubsection { header: header.to_string() },
                });
            }
        }
    }
}

fn rewrite_line<'a>(
    line: &'a str,
    next: Option<&str>,
    config: &NormalizerConfig,
) -> (Cow<'a, str>, Option<RepairKind>) {
    if config.fix_trailing_comma {
        if let Some(caps) = TRAILING_COMMA.captures(line) {
            let fixed = format!("{}{}: {}", &caps[1], &caps[2], config.placeholder);
            return (Cow::Owned(fixed), Some(RepairKind::TrailingComma));
        }
    }

    if config.fix_missing_colon {
        if let (Some(caps), Some(next)) = (MISSING_COLON.captures(line), next) {
            if KEY_LINE.is_match(next) && indentation(line) <= indentation(next) {
                let fixed = if indentation(next) > indentation(line) {
                    // The next line is nested under this one, so it is a parent key.
                    format!("{}{}:", &caps[1], &caps[2])
                } else {
                    format!("{}{}: {}", &caps[1], &caps[2], config.placeholder)
                };
                return (Cow::Owned(fixed), Some(RepairKind::MissingColon));
            }
        }
    }

    if config.quote_at_values {
        if let Some(caps) = KEY_VALUE.captures(line) {
            let value = &caps[2];
            if value.contains('@') && !value.starts_with(['\'', '"']) {
                let fixed = format!("{}'{}'", &caps[1], value.replace('\'', "''"));
                return (Cow::Owned(fixed), Some(RepairKind::QuotedValue));
            }
        }
    }

    (Cow::Borrowed(line), None)
}

/// Local fix for a line the parser rejected, or `None` if no rule changes it.
///
/// Tried in order: insert a colon after the first token, replace a sequence
/// entry with `- null`, strip commas, and finally replace the line with a
/// placeholder key named after its 1-based line number.
pub(super) fn patch_line(line: &str, index: usize) -> Option<(String, RepairKind)> {
    let trimmed = line.trim_start();
    let indent = &line[..line.len() - trimmed.len()];

    if trimmed.contains(':') && !trimmed.contains(',') {
        let (marker, body) = match trimmed.strip_prefix('-') {
            Some(rest) if rest.starts_with(char::is_whitespace) => ("- ", rest.trim_start()),
            _ => ("", trimmed),
        };
        if let Some((first, rest)) = body.split_once(char::is_whitespace) {
            if !first.ends_with(':') {
                let patched = format!("{}{}{}: {}", indent, marker, first, rest.trim_start());
                if patched != line {
                    return Some((patched, RepairKind::ColonInserted));
                }
            }
        }
    }

    if trimmed.starts_with('-') {
        let patched = format!("{}- null", indent);
        if patched != line {
            return Some((patched, RepairKind::NullListItem));
        }
    }

    if trimmed.contains(',') {
        let patched = line.replace(',', "");
        if patched != line {
            return Some((patched, RepairKind::CommaStripped));
        }
    }

    let patched = format!("{}__unparsed_line_{}: null", indent, index + 1);
    (patched != line).then_some((patched, RepairKind::PlaceholderKey))
}
