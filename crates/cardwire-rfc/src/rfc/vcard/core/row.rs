//! Records and parsed rows.

use serde::Serialize;

use super::parameter::{Parameters, VCardParameter};
use super::version::VCardVersion;

/// One unfolded content line, borrowed from the reader's buffer.
///
/// Only valid until the reader is asked for the next record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// Reassembled `group.KEY;params:value` text.
    pub text: &'a str,
    /// Version in force for the card this record belongs to.
    pub version: VCardVersion,
    /// 1-based physical line where the record started.
    pub line: usize,
}

/// A tokenized content line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRow {
    /// Property group (e.g., "item1" in "item1.TEL"), original case.
    pub group: Option<String>,
    /// Property name (uppercase).
    pub name: String,
    /// Parameters as written, in order of appearance.
    pub params: Vec<VCardParameter>,
    /// Typed view of `params`.
    pub parameters: Parameters,
    /// Raw value, still escaped and encoded.
    pub value: String,
    /// Version the row was read under.
    pub version: VCardVersion,
    /// 1-based physical line where the row started.
    pub line: usize,
}

impl ParsedRow {
    /// Flattens the parameters into ordered `(key, value)` pairs, one per value.
    ///
    /// Bare tokens yield their token as the value and an empty key.
    pub fn param_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().flat_map(|p| {
            let pairs: Vec<(&str, &str)> = if p.is_bare() {
                vec![("", p.name.as_str())]
            } else {
                p.values.iter().map(|v| (p.name.as_str(), v.as_str())).collect()
            };
            pairs
        })
    }

    /// Returns the raw parameter with the given name (case-insensitive).
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&VCardParameter> {
        self.params.iter().find(|p| p.is_named(name))
    }

    /// Whether this row is the given property (case-insensitive).
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}
