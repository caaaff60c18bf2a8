//! vCard parse error types.

use std::fmt;

/// Result type for vCard parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// An error that occurred while tokenizing a record.
///
/// The reader never surfaces these during iteration: a record that fails
/// to tokenize is logged and skipped.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Line number where the record started (1-based).
    pub line: usize,
    /// Additional context or message.
    pub message: String,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }

    /// Creates a missing separator error.
    #[must_use]
    pub fn missing_separator(line: usize) -> Self {
        Self::new(
            ParseErrorKind::MissingSeparator,
            line,
            "missing colon separator",
        )
    }

    /// Creates an invalid property name error.
    #[must_use]
    pub fn invalid_name(line: usize, name: &str) -> Self {
        Self::new(
            ParseErrorKind::InvalidPropertyName,
            line,
            format!("invalid property name: {name:?}"),
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.kind, self.message)
    }
}

impl std::error::Error for ParseError {}

/// The kind of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No unquoted `:` between the name and the value.
    MissingSeparator,
    /// Empty or malformed property name.
    InvalidPropertyName,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => write!(f, "missing value separator"),
            Self::InvalidPropertyName => write!(f, "invalid property name"),
        }
    }
}
