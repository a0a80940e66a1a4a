//! Line parser for the `controller:row:info:kind:count` report format.

use std::fmt;

/// Number of colon-separated fields in a report line.
pub const FIELD_COUNT: usize = 5;

/// Classification of an error counter, taken from the fourth field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// `UE`: the hardware could not correct the error.
    Uncorrected,
    /// `CE`: the error was corrected.
    Corrected,
    /// Anything else the tool prints in the kind column.
    Unknown,
}

impl ErrorKind {
    /// Classify the raw kind field. Never fails.
    #[must_use]
    pub fn classify(field: &str) -> Self {
        match field {
            "UE" => Self::Uncorrected,
            "CE" => Self::Corrected,
            _ => Self::Unknown,
        }
    }

    /// Label used in alert messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Uncorrected => "uncorrected",
            Self::Corrected => "corrected",
            Self::Unknown => "unknown state",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One successfully parsed report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub controller: String,
    pub row: String,
    pub info: String,
    pub kind: ErrorKind,
    pub count: i64,
}

impl ParsedRecord {
    /// Human readable alert line for this record.
    #[must_use]
    pub fn alert_message(&self) -> String {
        format!(
            "EDAC reports {} {} errors on {} ({}/{})",
            self.count, self.kind, self.info, self.controller, self.row
        )
    }
}

/// Reasons a single line could not be turned into a [`ParsedRecord`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// The line did not have exactly five fields.
    #[error("Unparsed line in edac-util output: {line}")]
    MalformedLine { line: String, fields: usize },

    /// The count field is not an integer literal.
    #[error("Garbled line in edac-util output: {line}")]
    GarbledCount { line: String },
}

impl LineError {
    /// The offending line, verbatim.
    #[must_use]
    pub fn line(&self) -> &str {
        match self {
            Self::MalformedLine { line, .. } | Self::GarbledCount { line } => line,
        }
    }
}

/// Parse a single report line.
///
/// Returns `Ok(None)` for an empty line.
///
/// # Errors
///
/// Returns [`LineError::MalformedLine`] when the line does not split into
/// exactly five `:`-separated fields, and [`LineError::GarbledCount`] when
/// the fifth field is not an integer.
pub fn parse_line(line: &str) -> Result<Option<ParsedRecord>, LineError> {
    if line.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split(':').collect();
    let &[controller, row, info, kind, count] = fields.as_slice() else {
        return Err(LineError::MalformedLine {
            line: line.to_string(),
            fields: fields.len(),
        });
    };

    let count = parse_count(count).ok_or_else(|| LineError::GarbledCount {
        line: line.to_string(),
    })?;

    Ok(Some(ParsedRecord {
        controller: controller.to_string(),
        row: row.to_string(),
        info: info.to_string(),
        kind: ErrorKind::classify(kind),
        count,
    }))
}

/// Parse a signed integer literal, inferring the base from its prefix.
///
/// Accepts an optional sign followed by `0x`/`0X` (hex), `0o`/`0O` or a bare
/// leading `0` (octal), `0b`/`0B` (binary), or plain decimal digits.
/// Underscores may separate digits (`1_000`, `0x_ff`).
#[must_use]
pub fn parse_count(field: &str) -> Option<i64> {
    let (negative, unsigned) = match field.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, field.strip_prefix('+').unwrap_or(field)),
    };

    let stripped;
    let unsigned = if unsigned.contains('_') {
        if !underscores_ok(unsigned) {
            return None;
        }
        stripped = unsigned.replace('_', "");
        stripped.as_str()
    } else {
        unsigned
    };

    let (radix, digits) = split_radix(unsigned);
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let magnitude = i128::from(u64::from_str_radix(digits, radix).ok()?);
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).ok()
}

/// Underscores are only allowed between digits, or between a base prefix
/// and a digit.
fn underscores_ok(literal: &str) -> bool {
    let prefixed = literal.len() >= 2
        && literal.starts_with('0')
        && matches!(literal.as_bytes()[1], b'x' | b'X' | b'o' | b'O' | b'b' | b'B');
    let (mut after_digit, rest) = if prefixed {
        (true, &literal[2..])
    } else {
        (false, literal)
    };

    let mut after_underscore = false;
    for c in rest.chars() {
        if c == '_' {
            if !after_digit {
                return false;
            }
            after_digit = false;
            after_underscore = true;
        } else {
            after_digit = c.is_ascii_alphanumeric();
            after_underscore = false;
        }
    }
    !after_underscore
}

fn split_radix(literal: &str) -> (u32, &str) {
    let prefixed = [
        ("0x", 16),
        ("0X", 16),
        ("0o", 8),
        ("0O", 8),
        ("0b", 2),
        ("0B", 2),
    ];
    for (prefix, radix) in prefixed {
        if let Some(digits) = literal.strip_prefix(prefix) {
            return (radix, digits);
        }
    }

    match literal.strip_prefix('0') {
        Some(digits) if !digits.is_empty() => (8, digits),
        _ => (10, literal),
    }
}
