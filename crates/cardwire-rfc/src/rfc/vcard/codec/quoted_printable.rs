//! Quoted-Printable codec (RFC 2045 §6.7) as used by vCard 2.1.
//!
//! Encoding works on the UTF-8 octets of the text and wraps with soft line
//! breaks (`=` CRLF) so that no physical line exceeds the limit. The first
//! line starts at a caller-supplied column, since the property name and
//! parameters already occupy part of it.

use cardwire_core::constants::CRLF;

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Smallest usable line length: one `=XX` triplet plus the soft break.
const MIN_LINE_LENGTH: usize = 4;

/// Encodes text as Quoted-Printable.
///
/// `start_column` is the number of octets already written on the first
/// line. Printable ASCII other than `=` is written literally, as are space
/// and tab unless they end the value; everything else becomes `=XX`. An
/// escape triplet is never split, and whitespace never ends a physical line.
#[must_use]
pub fn encode(text: &str, start_column: usize, line_length: usize) -> String {
    let bytes = text.as_bytes();
    let limit = line_length.max(MIN_LINE_LENGTH);
    let mut out = String::with_capacity(bytes.len() * 3);
    let mut column = start_column;

    for (i, &b) in bytes.iter().enumerate() {
        let is_last = i + 1 == bytes.len();
        let literal = match b {
            b' ' | b'\t' => !is_last,
            b'=' => false,
            _ => (33..=126).contains(&b),
        };
        let width = if literal { 1 } else { 3 };

        // Leave room for the soft break marker unless nothing follows.
        let budget = if is_last { limit } else { limit - 1 };
        if column + width > budget && column > 0 {
            let carried = if matches!(out.as_bytes().last(), Some(b' ' | b'\t')) {
                out.pop()
            } else {
                None
            };
            out.push('=');
            out.push_str(CRLF);
            column = 0;
            if let Some(ws) = carried {
                out.push(ws);
                column = 1;
            }
        }

        if literal {
            out.push(char::from(b));
        } else {
            out.push('=');
            out.push(char::from(HEX_UPPER[usize::from(b >> 4)]));
            out.push(char::from(HEX_UPPER[usize::from(b & 0x0F)]));
        }
        column += width;
    }

    out
}

/// Decodes Quoted-Printable text to octets.
///
/// Soft line breaks (`=` CRLF or `=` LF) are removed. An `=` not followed by
/// two hex digits is kept literally; a truncated escape at the very end of
/// the input is dropped.
#[must_use]
pub fn decode_bytes(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b != b'=' {
            out.push(b);
            i += 1;
            continue;
        }

        match &bytes[i + 1..] {
            [b'\r', b'\n', ..] => i += 3,
            [b'\n', ..] => i += 2,
            [b'\r'] => i += 2,
            [h1, h2, ..] => {
                let mut octet = [0u8; 1];
                if hex::decode_to_slice([*h1, *h2], &mut octet).is_ok() {
                    out.push(octet[0]);
                    i += 3;
                } else {
                    out.push(b'=');
                    i += 1;
                }
            }
            _ => {
                tracing::trace!(offset = i, "Dropping truncated quoted-printable escape");
                break;
            }
        }
    }

    out
}

/// Decodes Quoted-Printable text and converts the octets from `charset`
/// (UTF-8 when absent).
#[must_use]
pub fn decode(s: &str, charset: Option<&str>) -> String {
    decode_charset(&decode_bytes(s), charset)
}

/// Windows-1252 code points for octets 0x80-0x9F. The five unassigned
/// octets keep their C1 value.
const WINDOWS_1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

fn windows_1252(byte: u8) -> char {
    match byte {
        0x80..=0x9F => WINDOWS_1252_HIGH[usize::from(byte - 0x80)],
        _ => char::from(byte),
    }
}

/// Converts octets in the named charset to text.
///
/// UTF-8 is decoded lossily. ISO-8859-1 maps each octet to the code point
/// of the same value; Windows-1252 differs from it only in 0x80-0x9F.
/// Anything else falls back to lossy UTF-8.
#[must_use]
pub fn decode_charset(bytes: &[u8], charset: Option<&str>) -> String {
    let charset = charset.map(|c| c.trim().to_ascii_uppercase());
    match charset.as_deref() {
        None | Some("" | "UTF-8" | "UTF8") => String::from_utf8_lossy(bytes).into_owned(),
        Some("ISO-8859-1" | "ISO_8859-1" | "LATIN1" | "US-ASCII" | "ASCII") => {
            bytes.iter().map(|&b| char::from(b)).collect()
        }
        Some("WINDOWS-1252" | "CP1252") => bytes.iter().map(|&b| windows_1252(b)).collect(),
        Some(other) => {
            tracing::warn!(charset = other, "Unsupported charset, decoding as UTF-8");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physical_lines(encoded: &str) -> Vec<&str> {
        encoded.split(CRLF).collect()
    }

    #[test]
    fn ascii_passes_through() {
        assert_eq!(encode("Hello World", 0, 76), "Hello World");
    }

    #[test]
    fn escapes_equals_and_non_ascii() {
        assert_eq!(encode("a=b", 0, 76), "a=3Db");
        assert_eq!(encode("Müller", 0, 76), "M=C3=BCller");
    }

    #[test]
    fn escapes_line_breaks() {
        assert_eq!(encode("one\r\ntwo", 0, 76), "one=0D=0Atwo");
    }

    #[test]
    fn trailing_whitespace_is_escaped() {
        assert_eq!(encode("end ", 0, 76), "end=20");
        assert_eq!(encode("tab\t", 0, 76), "tab=09");
    }

    #[test]
    fn wraps_within_limit() {
        let text = "x".repeat(200);
        let encoded = encode(&text, 10, 76);
        let lines = physical_lines(&encoded);
        assert!(lines.len() > 2);
        assert_eq!(lines[0].len() + 10, 76);
        for line in &lines {
            assert!(line.len() <= 76);
        }
        assert_eq!(decode_bytes(&encoded), text.as_bytes());
    }

    #[test]
    fn never_splits_an_escape() {
        let text = "ü".repeat(60);
        let encoded = encode(&text, 0, 76);
        for line in physical_lines(&encoded) {
            let body = line.strip_suffix('=').unwrap_or(line);
            assert_eq!(body.len() % 3, 0, "split escape in {line:?}");
            assert!(line.len() <= 76);
        }
        assert_eq!(decode(&encoded, None), text);
    }

    #[test]
    fn whitespace_never_ends_a_line() {
        let text = "word ".repeat(40);
        let encoded = encode(&text, 0, 20);
        for line in physical_lines(&encoded) {
            let body = line.strip_suffix('=').unwrap_or(line);
            assert!(!body.ends_with(' '), "raw trailing space in {line:?}");
            assert!(line.len() <= 20);
        }
        assert_eq!(decode(&encoded, None), text);
    }

    #[test]
    fn arbitrary_octets_round_trip() {
        let octets: Vec<u8> = (0u8..=255).collect();
        let text = String::from_utf8_lossy(&octets).into_owned();
        let encoded = encode(&text, 5, 76);
        assert_eq!(decode_bytes(&encoded), text.as_bytes());
    }

    #[test]
    fn long_prefix_breaks_immediately() {
        let encoded = encode("abc", 80, 76);
        assert_eq!(encoded, "=\r\nabc");
    }

    #[test]
    fn decode_soft_breaks() {
        assert_eq!(decode("abc=\r\ndef=\nghi", None), "abcdefghi");
    }

    #[test]
    fn decode_lowercase_hex() {
        assert_eq!(decode("=c3=bc", None), "ü");
    }

    #[test]
    fn decode_truncated_escape_is_dropped() {
        assert_eq!(decode_bytes("abc=4"), b"abc");
        assert_eq!(decode_bytes("abc="), b"abc");
    }

    #[test]
    fn decode_invalid_escape_is_literal() {
        assert_eq!(decode_bytes("a=ZZb"), b"a=ZZb");
    }

    #[test_log::test]
    fn decode_latin1_charset() {
        assert_eq!(decode("M=FCller", Some("ISO-8859-1")), "Müller");
        assert_eq!(decode("M=C3=BCller", Some("x-unknown")), "Müller");
    }

    #[test]
    fn decode_windows_1252_charset() {
        assert_eq!(decode("=80=93=94", Some("WINDOWS-1252")), "\u{20AC}\u{201C}\u{201D}");
        assert_eq!(decode("M=FCller =85", Some("cp1252")), "Müller \u{2026}");
        assert_eq!(decode("=81", Some("windows-1252")), "\u{0081}");
        assert_eq!(decode("=80", Some("ISO-8859-1")), "\u{0080}");
    }
}
