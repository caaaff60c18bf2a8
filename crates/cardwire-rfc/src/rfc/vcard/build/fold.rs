//! vCard line folding.

use cardwire_core::constants::CRLF;

use crate::rfc::vcard::core::VCardVersion;

/// Folds a line to at most `max` octets per physical line.
///
/// Inserts CRLF + space; the space counts towards the next line's length.
/// Folds at UTF-8 character boundaries.
#[must_use]
pub fn fold_line(line: &str, max: usize) -> String {
    let max = max.max(2);
    if line.len() <= max {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + line.len() / max * 3);
    let mut current_len = 0;

    for c in line.chars() {
        let char_len = c.len_utf8();

        if current_len + char_len > max && current_len > 0 {
            result.push_str(CRLF);
            result.push(' ');
            current_len = 1; // The space
        }

        result.push(c);
        current_len += char_len;
    }

    result
}

/// Folds a 2.1 line by breaking before existing whitespace.
///
/// 2.1 unfolding keeps the whitespace, so nothing may be inserted. A line
/// without whitespace past the limit is left long.
#[must_use]
pub fn fold_at_whitespace(line: &str, max: usize) -> String {
    if line.len() <= max {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + 16);
    let mut rest = line;

    while rest.len() > max {
        let bytes = rest.as_bytes();
        let limit = max.min(bytes.len() - 1);
        let is_space = |b: &u8| matches!(b, b' ' | b'\t');

        let split = bytes[1..=limit]
            .iter()
            .rposition(is_space)
            .or_else(|| bytes[1..].iter().position(is_space))
            .map(|pos| pos + 1);

        let Some(split) = split else {
            break;
        };

        result.push_str(&rest[..split]);
        result.push_str(CRLF);
        rest = &rest[split..];
    }

    result.push_str(rest);
    result
}

/// Folds a line the way `version` can unfold it.
#[must_use]
pub fn fold_for(line: &str, max: usize, version: VCardVersion) -> String {
    match version {
        VCardVersion::V2_1 => fold_at_whitespace(line, max),
        VCardVersion::V3 | VCardVersion::V4 => fold_line(line, max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_line_unchanged() {
        let line = "FN:John Doe";
        assert_eq!(fold_line(line, 75), line);
        assert_eq!(fold_at_whitespace(line, 75), line);
    }

    #[test]
    fn fold_at_75_octets() {
        let line = "X".repeat(80);
        let folded = fold_line(&line, 75);
        assert!(folded.contains("\r\n "));

        let first_line: String = folded.chars().take_while(|&c| c != '\r').collect();
        assert_eq!(first_line.len(), 75);
    }

    #[test]
    fn fold_respects_utf8() {
        // 日 is 3 bytes in UTF-8
        let line = format!("NOTE:{}", "日".repeat(30));
        let folded = fold_line(&line, 75);

        for part in folded.split("\r\n") {
            assert!(part.len() <= 75);
        }
        assert_eq!(folded.replace("\r\n ", ""), line);
    }

    #[test]
    fn fold_multiple_times() {
        let line = "X".repeat(200);
        let folded = fold_line(&line, 75);
        assert!(folded.matches("\r\n ").count() >= 2);
        for part in folded.split("\r\n") {
            assert!(part.len() <= 75);
        }
    }

    #[test]
    fn whitespace_fold_breaks_before_space() {
        let line = "NOTE:the quick brown fox jumps over the lazy dog";
        let folded = fold_at_whitespace(line, 20);
        for part in folded.split("\r\n").skip(1) {
            assert!(part.starts_with(' '));
        }
        assert_eq!(folded.replace("\r\n", ""), line);
    }

    #[test]
    fn whitespace_fold_leaves_unbreakable_runs() {
        let line = format!("NOTE:{}", "x".repeat(100));
        assert_eq!(fold_at_whitespace(&line, 75), line);
    }

    #[test]
    fn dispatch_by_version() {
        let line = format!("NOTE:{}", "ab ".repeat(40));
        assert!(fold_for(&line, 75, VCardVersion::V4).contains("\r\n "));
        assert_eq!(
            fold_for(&line, 75, VCardVersion::V2_1).replace("\r\n", ""),
            line
        );
    }
}
