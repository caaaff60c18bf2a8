//! Property serialization.

use cardwire_core::config::CodecConfig;
use cardwire_core::constants::{
    BEGIN_VCARD, CRLF, DEFAULT_CHARSET, END_VCARD, FOLD_LINE_OCTETS, QP_LINE_LENGTH,
};
use cardwire_core::error::CoreError;

use super::fold::{fold_for, fold_line};
use crate::error::RfcResult;
use crate::rfc::vcard::codec::{base64, escape, escape_param_value, quoted_printable};
use crate::rfc::vcard::core::{Encoding, Parameters, VCardParameter, VCardVersion};

/// Serializer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Write properties whose value is empty.
    pub include_empty: bool,
    /// Prefix properties with their group.
    pub write_groups: bool,
    /// Fold lines longer than `fold_length`. Quoted-Printable text wraps at
    /// `qp_line_length` regardless.
    pub fold_lines: bool,
    pub fold_length: usize,
    pub qp_line_length: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            include_empty: false,
            write_groups: true,
            fold_lines: false,
            fold_length: FOLD_LINE_OCTETS,
            qp_line_length: QP_LINE_LENGTH,
        }
    }
}

impl From<&CodecConfig> for WriteOptions {
    fn from(config: &CodecConfig) -> Self {
        Self {
            include_empty: config.include_empty,
            write_groups: config.write_groups,
            fold_lines: config.fold_lines,
            fold_length: config.fold_length,
            qp_line_length: config.qp_line_length,
        }
    }
}

/// A property value ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Single text value; escaped on write.
    Text(String),
    /// Comma-separated list; each item escaped.
    List(Vec<String>),
    /// Structured value: `;`-separated components of `,`-separated items.
    Components(Vec<Vec<String>>),
    /// Written verbatim (URIs, dates, already-escaped text). Must not
    /// contain line breaks.
    Raw(String),
    /// Inline binary.
    Binary {
        data: Vec<u8>,
        media_type: Option<String>,
    },
    /// Embedded card (2.1 `AGENT`), as complete vCard text.
    Embedded(String),
}

impl PropertyValue {
    /// Whether there is nothing to write.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) | Self::Raw(s) | Self::Embedded(s) => s.is_empty(),
            Self::List(items) => items.iter().all(String::is_empty),
            Self::Components(components) => components.iter().flatten().all(String::is_empty),
            Self::Binary { data, .. } => data.is_empty(),
        }
    }
}

/// Writes content lines for one vCard version.
#[derive(Debug, Clone, Copy)]
pub struct PropertyWriter {
    version: VCardVersion,
    options: WriteOptions,
}

impl PropertyWriter {
    #[must_use]
    pub const fn new(version: VCardVersion, options: WriteOptions) -> Self {
        Self { version, options }
    }

    #[must_use]
    pub const fn version(&self) -> VCardVersion {
        self.version
    }

    /// Appends one property to `output`, CRLF-terminated.
    ///
    /// `ENCODING` and `CHARSET` in `params` are ignored: the writer picks
    /// them from the value and the version. Returns `false` when an empty
    /// value was skipped.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` if the name or group contains
    /// characters other than letters, digits, `-` and `_`.
    pub fn write(
        &self,
        output: &mut String,
        group: Option<&str>,
        name: &str,
        params: &Parameters,
        value: &PropertyValue,
    ) -> RfcResult<bool> {
        validate_name(name)?;

        if value.is_empty() && !self.options.include_empty {
            tracing::trace!(name, "Skipping empty property");
            return Ok(false);
        }

        let mut params = params.clone();
        params.encoding = None;
        params.charset = None;

        let mut line = String::new();
        if self.options.write_groups
            && let Some(group) = group.filter(|g| !g.is_empty())
        {
            validate_name(group)?;
            line.push_str(group);
            line.push('.');
        }
        line.push_str(&name.to_ascii_uppercase());

        match value {
            PropertyValue::Binary { data, media_type } => {
                self.write_binary(output, line, &mut params, data, media_type.as_deref());
            }
            PropertyValue::Embedded(card) if self.version == VCardVersion::V2_1 => {
                write_params(&mut line, &params, self.version);
                line.push(':');
                output.push_str(&line);
                output.push_str(CRLF);
                // Blank lines inside the nested card close its Base64 blocks.
                for nested in card.trim_matches(['\r', '\n']).lines() {
                    output.push_str(nested);
                    output.push_str(CRLF);
                }
            }
            _ => self.write_text(output, line, &mut params, &self.text_body(value)),
        }

        Ok(true)
    }

    /// Escapes and joins a non-binary value.
    fn text_body(&self, value: &PropertyValue) -> String {
        let version = self.version;
        match value {
            PropertyValue::Text(s) | PropertyValue::Embedded(s) => escape(s, version),
            PropertyValue::Raw(s) => s.clone(),
            PropertyValue::List(items) => join_escaped(items, version),
            PropertyValue::Components(components) => components
                .iter()
                .map(|items| join_escaped(items, version))
                .collect::<Vec<_>>()
                .join(";"),
            PropertyValue::Binary { .. } => String::new(),
        }
    }

    fn write_text(&self, output: &mut String, mut line: String, params: &mut Parameters, body: &str) {
        if self.version == VCardVersion::V2_1 && needs_quoted_printable(body) {
            params.encoding = Some(Encoding::QuotedPrintable);
            params.charset = Some(DEFAULT_CHARSET.to_string());
            write_params(&mut line, params, self.version);
            line.push(':');

            let encoded = quoted_printable::encode(body, line.len(), self.options.qp_line_length);
            output.push_str(&line);
            output.push_str(&encoded);
            output.push_str(CRLF);
            return;
        }

        write_params(&mut line, params, self.version);
        line.push(':');
        line.push_str(body);

        if self.options.fold_lines {
            output.push_str(&fold_for(&line, self.options.fold_length, self.version));
        } else {
            output.push_str(&line);
        }
        output.push_str(CRLF);
    }

    fn write_binary(
        &self,
        output: &mut String,
        mut line: String,
        params: &mut Parameters,
        data: &[u8],
        media_type: Option<&str>,
    ) {
        if self.version != VCardVersion::V4
            && params.types.is_empty()
            && let Some(subtype) = media_type.and_then(|m| m.rsplit('/').next())
        {
            params.add_type(subtype.to_ascii_uppercase());
        }

        let payload = match self.version {
            VCardVersion::V2_1 => {
                params.encoding = Some(Encoding::Base64);
                base64::encode(data)
            }
            VCardVersion::V3 => {
                params.encoding = Some(Encoding::B);
                base64::encode(data)
            }
            VCardVersion::V4 => {
                base64::encode_data_uri(media_type.or(params.media_type.as_deref()), data)
            }
        };

        write_params(&mut line, params, self.version);
        line.push(':');
        line.push_str(&payload);

        // Base64 has no whitespace to fold before, so 2.1 folds it like 3.0.
        if self.options.fold_lines {
            output.push_str(&fold_line(&line, self.options.fold_length));
        } else {
            output.push_str(&line);
        }
        output.push_str(CRLF);
        if self.version == VCardVersion::V2_1 {
            // A blank line closes a 2.1 Base64 block.
            output.push_str(CRLF);
        }
    }
}

fn join_escaped(items: &[String], version: VCardVersion) -> String {
    items
        .iter()
        .map(|item| escape(item, version))
        .collect::<Vec<_>>()
        .join(",")
}

/// 2.1 text that cannot be written as a plain line.
fn needs_quoted_printable(body: &str) -> bool {
    body.bytes()
        .any(|b| !b.is_ascii() || (b.is_ascii_control() && b != b'\t'))
        || body.ends_with([' ', '\t'])
}

fn validate_name(name: &str) -> RfcResult<()> {
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CoreError::InvalidInput(format!("invalid property name: {name:?}")).into());
    }
    Ok(())
}

/// Appends the parameter section in a fixed order, residual parameters last.
fn write_params(line: &mut String, params: &Parameters, version: VCardVersion) {
    let mut push = |name: &str, values: &[&str]| push_param(line, name, values, version);

    if let Some(value_type) = params.value {
        push("VALUE", &[value_type.as_str()]);
    }
    if let Some(location) = params.content_location {
        push("VALUE", &[location.as_str()]);
    }
    if let Some(encoding) = params.encoding {
        push("ENCODING", &[encoding.as_str()]);
    }
    if let Some(charset) = &params.charset {
        push("CHARSET", &[charset]);
    }
    if let Some(language) = &params.language {
        push("LANGUAGE", &[language]);
    }
    if !params.types.is_empty() {
        let types: Vec<&str> = params.types.iter().map(String::as_str).collect();
        if version == VCardVersion::V2_1 {
            for t in types {
                push("TYPE", &[t]);
            }
        } else {
            push("TYPE", &types);
        }
    }
    if let Some(pref) = params.pref {
        push("PREF", &[&pref.to_string()]);
    }
    if !params.pids.is_empty() {
        let pids: Vec<String> = params.pids.iter().map(ToString::to_string).collect();
        let pids: Vec<&str> = pids.iter().map(String::as_str).collect();
        push("PID", &pids);
    }
    if let Some(alt_id) = &params.alt_id {
        push("ALTID", &[alt_id]);
    }
    if version == VCardVersion::V4
        && let Some(media_type) = &params.media_type
    {
        push("MEDIATYPE", &[media_type]);
    }
    if !params.sort_as.is_empty() {
        let sort_as: Vec<&str> = params.sort_as.iter().map(String::as_str).collect();
        push("SORT-AS", &sort_as);
    }
    if let Some(calscale) = &params.calscale {
        push("CALSCALE", &[calscale]);
    }
    if let Some(geo) = &params.geo {
        push("GEO", &[geo]);
    }
    if let Some(tz) = &params.tz {
        push("TZ", &[tz]);
    }
    if let Some(label) = &params.label {
        push("LABEL", &[label]);
    }
    if let Some(context) = &params.context {
        push("CONTEXT", &[context]);
    }
    if let Some(cc) = &params.cc {
        push("CC", &[cc]);
    }
    if let Some(index) = params.index {
        push("INDEX", &[&index.to_string()]);
    }
    if let Some(level) = params.level {
        push("LEVEL", &[level.as_str()]);
    }

    for VCardParameter { name, values } in &params.extra {
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        push(name, &values);
    }
}

/// Appends `;NAME=v1,v2`, or `;NAME` for a bare parameter.
fn push_param(line: &mut String, name: &str, values: &[&str], version: VCardVersion) {
    line.push(';');
    line.push_str(name);
    if values.is_empty() {
        return;
    }

    line.push('=');
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        let (escaped, needs_quotes) = escape_param_value(value, version);
        if needs_quotes {
            line.push('"');
            line.push_str(&escaped);
            line.push('"');
        } else {
            line.push_str(&escaped);
        }
    }
}

/// Frames properties into whole cards.
#[derive(Debug, Clone)]
pub struct VCardWriter {
    properties: PropertyWriter,
    output: String,
}

impl VCardWriter {
    #[must_use]
    pub fn new(version: VCardVersion, options: WriteOptions) -> Self {
        Self {
            properties: PropertyWriter::new(version, options),
            output: String::new(),
        }
    }

    /// Writes `BEGIN:VCARD` and the `VERSION` line.
    #[tracing::instrument(level = "trace", skip(self), fields(version = %self.version()))]
    pub fn begin_card(&mut self) {
        self.output.push_str(BEGIN_VCARD);
        self.output.push_str(CRLF);
        self.output.push_str("VERSION:");
        self.output.push_str(self.properties.version().as_str());
        self.output.push_str(CRLF);
    }

    /// Writes one property of the current card.
    ///
    /// ## Errors
    /// See [`PropertyWriter::write`].
    pub fn property(
        &mut self,
        group: Option<&str>,
        name: &str,
        params: &Parameters,
        value: &PropertyValue,
    ) -> RfcResult<bool> {
        self.properties
            .write(&mut self.output, group, name, params, value)
    }

    pub fn end_card(&mut self) {
        self.output.push_str(END_VCARD);
        self.output.push_str(CRLF);
    }

    #[must_use]
    pub const fn version(&self) -> VCardVersion {
        self.properties.version()
    }

    /// Returns everything written so far.
    #[must_use]
    pub fn finish(self) -> String {
        tracing::debug!(octets = self.output.len(), "Document written");
        self.output
    }
}
