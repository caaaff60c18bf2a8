//! Version-aware text escaping.
//!
//! | version | escaped on write | unescaped on read |
//! |---------|------------------|-------------------|
//! | 2.1 | `;` | `\;` |
//! | 3.0, 4.0 | `\` newline `,` `;` | `\\` `\n` `\N` `\,` `\;` |

use crate::rfc::vcard::core::VCardVersion;

/// Unescapes a text value.
///
/// Single left-to-right pass: a recognised escape consumes both characters,
/// so `\\n` yields a backslash followed by `n` while `\n` yields a newline.
/// Unrecognised escapes keep their backslash.
#[must_use]
pub fn unescape(s: &str, version: VCardVersion) -> String {
    if !s.contains('\\') {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        let replacement = match (version, chars.peek()) {
            (_, Some(';')) => Some(';'),
            (VCardVersion::V2_1, _) | (_, None) => None,
            (VCardVersion::V3 | VCardVersion::V4, Some(&next)) => match next {
                'n' | 'N' => Some('\n'),
                ',' => Some(','),
                '\\' => Some('\\'),
                _ => None,
            },
        };

        if let Some(r) = replacement {
            chars.next();
            result.push(r);
        } else {
            result.push(c);
        }
    }

    result
}

/// Escapes a text value for serialization.
///
/// 3.0/4.0 turn CRLF and LF into `\n` and drop any other CR. 2.1 has no
/// newline escape; callers encode multi-line 2.1 text as Quoted-Printable.
#[must_use]
pub fn escape(s: &str, version: VCardVersion) -> String {
    match version {
        VCardVersion::V2_1 => s.replace(';', "\\;"),
        VCardVersion::V3 | VCardVersion::V4 => {
            let mut result = String::with_capacity(s.len());

            for c in s.chars() {
                match c {
                    '\\' => result.push_str("\\\\"),
                    '\n' => result.push_str("\\n"),
                    ',' => result.push_str("\\,"),
                    ';' => result.push_str("\\;"),
                    '\r' => {} // CRLF collapses to \n
                    _ => result.push(c),
                }
            }

            result
        }
    }
}

/// Escapes a parameter value for serialization.
///
/// 4.0 uses RFC 6868 caret encoding; older versions cannot represent `"`
/// and newlines, so those are dropped or flattened.
/// Returns `(value, needs_quotes)`.
#[must_use]
pub fn escape_param_value(s: &str, version: VCardVersion) -> (String, bool) {
    let mut result = String::with_capacity(s.len());
    let mut needs_quotes = false;

    for c in s.chars() {
        match (c, version) {
            ('^', VCardVersion::V4) => result.push_str("^^"),
            ('\n', VCardVersion::V4) => result.push_str("^n"),
            ('"', VCardVersion::V4) => result.push_str("^'"),
            ('\n', _) => result.push(' '),
            ('"', _) => {}
            (':' | ';' | ',', _) => {
                result.push(c);
                needs_quotes = true;
            }
            _ if c.is_control() && c != '\t' => {
                // Skip other control characters
            }
            _ => result.push(c),
        }
    }

    (result, needs_quotes)
}

/// Reverses RFC 6868 caret encoding (`^^`, `^n`, `^'`).
///
/// Unknown sequences are left untouched.
#[must_use]
pub fn decode_caret(s: &str) -> String {
    if !s.contains('^') {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '^' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('n' | 'N') => {
                chars.next();
                result.push('\n');
            }
            Some('\'') => {
                chars.next();
                result.push('"');
            }
            Some('^') => {
                chars.next();
                result.push('^');
            }
            _ => result.push('^'),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [VCardVersion; 3] = [VCardVersion::V2_1, VCardVersion::V3, VCardVersion::V4];

    #[test]
    fn escape_text_basic() {
        assert_eq!(escape("hello", VCardVersion::V4), "hello");
    }

    #[test]
    fn escape_text_special() {
        assert_eq!(escape("a,b;c\\d", VCardVersion::V4), "a\\,b\\;c\\\\d");
        assert_eq!(escape("line1\r\nline2", VCardVersion::V3), "line1\\nline2");
    }

    #[test]
    fn escape_2_1_only_touches_semicolons() {
        assert_eq!(escape("a,b;c\\d", VCardVersion::V2_1), "a,b\\;c\\d");
    }

    #[test]
    fn unescape_2_1_only_semicolons() {
        assert_eq!(unescape("a\\,b\\;c\\n", VCardVersion::V2_1), "a\\,b;c\\n");
    }

    #[test]
    fn unescape_newline_variants() {
        assert_eq!(unescape("a\\nb\\Nc", VCardVersion::V3), "a\nb\nc");
        assert_eq!(unescape("a\\,b\\;c", VCardVersion::V4), "a,b;c");
    }

    #[test]
    fn doubled_backslash_before_n_is_not_a_newline() {
        assert_eq!(unescape("C:\\\\new", VCardVersion::V4), "C:\\new");
        assert_eq!(unescape("\\\\\\n", VCardVersion::V4), "\\\n");
    }

    #[test]
    fn unknown_escape_keeps_backslash() {
        assert_eq!(unescape("a\\tb", VCardVersion::V4), "a\\tb");
        assert_eq!(unescape("trailing\\", VCardVersion::V4), "trailing\\");
    }

    #[test]
    fn escape_symmetry() {
        let samples = [
            "plain",
            "a,b;c",
            "back\\slash",
            "\\n literal",
            "multi\nline\ntext",
            "ends with \\",
            "\\;",
            ";;;",
        ];
        for version in ALL {
            for s in samples {
                if version == VCardVersion::V2_1 && s.contains('\n') {
                    continue;
                }
                assert_eq!(unescape(&escape(s, version), version), s, "{version}: {s:?}");
            }
        }
    }

    #[test]
    fn escape_param_no_quotes() {
        let (val, needs_quotes) = escape_param_value("simple", VCardVersion::V4);
        assert_eq!(val, "simple");
        assert!(!needs_quotes);
    }

    #[test]
    fn escape_param_with_colon() {
        let (val, needs_quotes) = escape_param_value("value:with:colons", VCardVersion::V3);
        assert_eq!(val, "value:with:colons");
        assert!(needs_quotes);
    }

    #[test]
    fn escape_param_with_quote() {
        let (val, needs_quotes) = escape_param_value("say \"hello\"", VCardVersion::V4);
        assert_eq!(val, "say ^'hello^'");
        assert!(!needs_quotes);

        let (val, _) = escape_param_value("say \"hello\"", VCardVersion::V3);
        assert_eq!(val, "say hello");
    }

    #[test]
    fn caret_round_trip() {
        let original = "line1\nline2 ^ \"quoted\"";
        let (escaped, _) = escape_param_value(original, VCardVersion::V4);
        assert_eq!(escaped, "line1^nline2 ^^ ^'quoted^'");
        assert_eq!(decode_caret(&escaped), original);
    }

    #[test]
    fn caret_unknown_sequence_untouched() {
        assert_eq!(decode_caret("a^b"), "a^b");
    }
}
