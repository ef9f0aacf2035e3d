//! Error types for the transformation engine.

use thiserror::Error;

/// Errors that abort a transformation pass.
///
/// Either error means no output text is produced for the pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A value positively identified as a HEX color does not parse.
    ///
    /// `line` is 1-based; `0` means the error came from a bare
    /// [`ColorValue::parse_hex`](crate::ColorValue::parse_hex) call with no
    /// stylesheet position.
    #[error("invalid color '{value}'{}: {reason}", line_suffix(.line))]
    InvalidColorFormat {
        value: String,
        line: usize,
        reason: String,
    },

    /// The text cannot be scanned as CSS (unbalanced blocks, unterminated
    /// comments or strings, broken generated blocks).
    #[error("malformed stylesheet at line {line}, column {column}: {message}")]
    MalformedStylesheet {
        line: usize,
        column: usize,
        message: String,
    },
}

impl TransformError {
    pub(crate) fn invalid_color(value: &str, reason: impl Into<String>) -> Self {
        TransformError::InvalidColorFormat {
            value: value.to_string(),
            line: 0,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = line_col(source, offset);
        TransformError::MalformedStylesheet {
            line,
            column,
            message: message.into(),
        }
    }

    /// Attaches a stylesheet line to a color error.
    pub(crate) fn at_line(self, at: usize) -> Self {
        match self {
            TransformError::InvalidColorFormat { value, reason, .. } => {
                TransformError::InvalidColorFormat {
                    value,
                    line: at,
                    reason,
                }
            }
            other => other,
        }
    }
}

fn line_suffix(line: &usize) -> String {
    if *line == 0 {
        String::new()
    } else {
        format!(" at line {}", line)
    }
}

/// 1-based line and column (in characters) of a byte offset.
pub(crate) fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, TransformError>;
