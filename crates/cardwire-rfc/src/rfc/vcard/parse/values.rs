//! Decoding row values.
//!
//! Rows carry their value exactly as read. These helpers peel off the
//! transfer encoding declared in the row's parameters and then the
//! version's escaping, in that order.

use cardwire_core::constants::BEGIN_VCARD;

use crate::error::RfcResult;
use crate::rfc::vcard::build::PropertyValue;
use crate::rfc::vcard::codec::{base64, quoted_printable};
use crate::rfc::vcard::codec::{split_components, split_list, unescape};
use crate::rfc::vcard::core::{ParsedRow, VCardVersion, ValueShape, ValueType};

/// Decoded inline binary payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryValue {
    pub media_type: Option<String>,
    pub data: Vec<u8>,
}

/// Removes the Quoted-Printable layer, if declared, honouring `CHARSET`.
///
/// The result is still escaped.
#[must_use]
pub fn decode_raw(row: &ParsedRow) -> String {
    if row.parameters.is_quoted_printable() {
        quoted_printable::decode(&row.value, row.parameters.charset.as_deref())
    } else {
        row.value.clone()
    }
}

/// Decodes a single text value.
#[must_use]
pub fn decode_text(row: &ParsedRow) -> String {
    unescape(&decode_raw(row), row.version)
}

/// Decodes a comma-separated list (CATEGORIES, NICKNAME).
#[must_use]
pub fn decode_list(row: &ParsedRow) -> Vec<String> {
    split_list(&decode_raw(row), row.version)
}

/// Decodes a structured value (N, ADR, ORG) into components.
#[must_use]
pub fn decode_components(row: &ParsedRow) -> Vec<Vec<String>> {
    split_components(&decode_raw(row), row.version)
}

/// Decodes an inline binary value.
///
/// Handles `ENCODING=BASE64`/`ENCODING=b` and `data:` URIs. Returns `None`
/// for anything else, typically a reference to an external resource.
///
/// ## Errors
/// Returns `RfcError::Base64Error` if the payload is not valid Base64.
pub fn decode_binary(row: &ParsedRow) -> RfcResult<Option<BinaryValue>> {
    if row.parameters.is_base64() {
        let media_type = row
            .parameters
            .media_type
            .clone()
            .or_else(|| row.parameters.types.first().cloned());
        return Ok(Some(BinaryValue {
            media_type,
            data: base64::decode(&row.value)?,
        }));
    }

    match base64::decode_data_uri(&row.value) {
        Some(decoded) => {
            let (media_type, data) = decoded?;
            Ok(Some(BinaryValue { media_type, data }))
        }
        None => Ok(None),
    }
}

/// Decodes a row into the value its property name implies (see
/// [`ValueShape::of`]), ready to be written again.
///
/// `VALUE=uri` turns binary and embedded properties into raw references.
///
/// ## Errors
/// Returns `RfcError::Base64Error` if an inline binary payload is not valid
/// Base64.
pub fn decode_value(row: &ParsedRow) -> RfcResult<PropertyValue> {
    let is_reference = row.parameters.value == Some(ValueType::Uri);

    let value = match ValueShape::of(&row.name) {
        ValueShape::Text => PropertyValue::Text(decode_text(row)),
        ValueShape::List => PropertyValue::List(decode_list(row)),
        ValueShape::Structured => PropertyValue::Components(decode_components(row)),
        ValueShape::Raw => PropertyValue::Raw(decode_raw(row)),
        ValueShape::Binary if is_reference => PropertyValue::Raw(decode_raw(row)),
        ValueShape::Binary => match decode_binary(row)? {
            Some(BinaryValue { media_type, data }) => PropertyValue::Binary { data, media_type },
            None => PropertyValue::Raw(decode_raw(row)),
        },
        ValueShape::Embedded if is_reference => PropertyValue::Raw(decode_raw(row)),
        ValueShape::Embedded => match row.version {
            VCardVersion::V2_1 => {
                let raw = decode_raw(row);
                if raw.trim_start().to_ascii_uppercase().starts_with(BEGIN_VCARD) {
                    PropertyValue::Embedded(raw)
                } else {
                    PropertyValue::Text(unescape(&raw, row.version))
                }
            }
            VCardVersion::V3 | VCardVersion::V4 => PropertyValue::Embedded(decode_text(row)),
        },
    };

    Ok(value)
}
