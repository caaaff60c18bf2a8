//! Base64 for inline binary values (`ENCODING=BASE64`, `ENCODING=b`,
//! `data:` URIs).

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};

use crate::error::RfcResult;

/// Decodes Base64 in either the standard or URL-safe alphabet.
///
/// Embedded whitespace (left over from folded lines) is ignored and missing
/// `=` padding is restored before decoding.
///
/// ## Errors
/// Returns `RfcError::Base64Error` if the input is not valid Base64.
pub fn decode(s: &str) -> RfcResult<Vec<u8>> {
    let mut cleaned: String = s.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    while cleaned.len() % 4 != 0 {
        cleaned.push('=');
    }

    let decoded = if cleaned.contains(['-', '_']) {
        URL_SAFE.decode(cleaned.as_bytes())
    } else {
        STANDARD.decode(cleaned.as_bytes())
    };

    Ok(decoded?)
}

/// Encodes bytes with the standard alphabet and padding.
#[must_use]
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Builds a `data:` URI (RFC 2397) as used for inline binary in vCard 4.0.
#[must_use]
pub fn encode_data_uri(media_type: Option<&str>, data: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        media_type.unwrap_or("application/octet-stream"),
        encode(data)
    )
}

/// Decodes a Base64 `data:` URI into its media type and payload.
///
/// Returns `None` when `s` is not a Base64 data URI.
///
/// ## Errors
/// The inner result fails if the payload is not valid Base64.
pub fn decode_data_uri(s: &str) -> Option<RfcResult<(Option<String>, Vec<u8>)>> {
    let rest = s.trim().strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let media_type = header.strip_suffix(";base64")?;
    let media_type = (!media_type.is_empty()).then(|| media_type.to_string());

    Some(decode(payload).map(|data| (media_type, data)))
}
