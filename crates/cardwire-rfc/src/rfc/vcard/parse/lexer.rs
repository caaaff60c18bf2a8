//! Content line tokenizer.
//!
//! Splits one unfolded record into group, name, parameters and raw value.
//! The value is left escaped and encoded; see [`super::values`] for the
//! decoding helpers.

use cardwire_core::config::{BareParamPolicy, CodecConfig};

use super::error::{ParseError, ParseResult};
use super::params::typed_parameters;
use crate::rfc::vcard::codec::escape::decode_caret;
use crate::rfc::vcard::codec::split::{split_param_values, split_quoted};
use crate::rfc::vcard::core::{ParsedRow, Record, VCardParameter, VCardVersion};

/// Tokenizer settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Where unrecognised bare 2.1 tokens end up.
    pub bare_params: BareParamPolicy,
}

impl From<&CodecConfig> for ParseOptions {
    fn from(config: &CodecConfig) -> Self {
        Self {
            bare_params: config.bare_params,
        }
    }
}

/// Parses a single record into a row.
///
/// Format: `[group.]name[;param[=value]]*:value`
///
/// ## Errors
/// Returns an error if the record has no unquoted `:` or the name is empty
/// or malformed.
pub fn parse_content_line(record: &Record<'_>, options: &ParseOptions) -> ParseResult<ParsedRow> {
    let line = record.text;
    let colon_pos =
        find_value_separator(line).ok_or_else(|| ParseError::missing_separator(record.line))?;

    let (key_section, value) = line.split_at(colon_pos);
    let value = &value[1..];

    // Split name from parameters
    let (name_part, params_str) = match key_section.split_once(';') {
        Some((name, params)) => (name, Some(params)),
        None => (key_section, None),
    };

    let (group, name) = parse_group(name_part.trim());

    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ParseError::invalid_name(record.line, name));
    }

    let params = params_str
        .map(|s| parse_parameters(s, record.version))
        .unwrap_or_default();
    let parameters = typed_parameters(&params, options.bare_params);

    Ok(ParsedRow {
        group: group.map(String::from),
        name: name.to_ascii_uppercase(),
        params,
        parameters,
        value: value.to_string(),
        version: record.version,
        line: record.line,
    })
}

/// Finds the colon that separates name/params from value.
///
/// Colons inside quoted parameter values are skipped.
pub(crate) fn find_value_separator(line: &str) -> Option<usize> {
    let mut in_quotes = false;

    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => return Some(i),
            _ => {}
        }
    }

    None
}

/// Parses the optional group prefix. The last `.` wins.
///
/// Group characters match what the writer accepts for group names.
fn parse_group(s: &str) -> (Option<&str>, &str) {
    if let Some(dot_pos) = s.rfind('.') {
        let potential_group = &s[..dot_pos];
        if !potential_group.is_empty()
            && potential_group
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return (Some(potential_group), &s[dot_pos + 1..]);
        }
    }
    (None, s)
}

/// Parses the parameter section (everything after the first `;`).
///
/// Empty segments are skipped. A segment without `=` becomes a bare
/// parameter; its key is inferred later from the token itself.
///
/// Bare parameters are only defined for 2.1, but 3.0 and 4.0 files written
/// by 2.1-era exporters carry them too (`TEL;WORK:...`). They are accepted
/// in every version so those rows are not lost, and round-trip as written.
pub(crate) fn parse_parameters(s: &str, version: VCardVersion) -> Vec<VCardParameter> {
    split_quoted(s, ';')
        .into_iter()
        .filter(|segment| !segment.trim().is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((name, raw)) => {
                let mut values = split_param_values(raw);
                if version == VCardVersion::V4 {
                    values = values.iter().map(|v| decode_caret(v)).collect();
                }
                VCardParameter::multi(name.trim(), values)
            }
            None => VCardParameter::bare(segment.trim()),
        })
        .collect()
}
