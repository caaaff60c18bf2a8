//! Splitting composite values on unescaped separators.

use super::escape::unescape;
use crate::rfc::vcard::core::VCardVersion;

/// Splits on `sep` unless it is preceded by an odd number of backslashes.
///
/// The returned slices are still escaped.
#[must_use]
pub fn split_escaped(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut backslashes = 0usize;

    for (i, c) in s.char_indices() {
        if c == '\\' {
            backslashes += 1;
            continue;
        }

        if c == sep && backslashes % 2 == 0 {
            parts.push(&s[start..i]);
            start = i + c.len_utf8();
        }

        backslashes = 0;
    }

    parts.push(&s[start..]);
    parts
}

/// Splits on `sep` outside double-quoted spans. Quotes are kept.
#[must_use]
pub fn split_quoted(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (i, c) in s.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == sep && !in_quotes {
            parts.push(&s[start..i]);
            start = i + c.len_utf8();
        }
    }

    parts.push(&s[start..]);
    parts
}

/// Splits a parameter value list (`a,"b,c",d`) on commas that are neither
/// quoted nor backslash-escaped, removing the quotes.
#[must_use]
pub fn split_param_values(s: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\\' if !in_quotes => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ',' if !in_quotes => values.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    values.push(current);
    values
}

/// Splits a structured value (N, ADR, ORG) into unescaped components.
///
/// Components are separated by `;`; from 3.0 on each component is itself a
/// `,`-separated list. An empty component yields an empty list.
#[must_use]
pub fn split_components(s: &str, version: VCardVersion) -> Vec<Vec<String>> {
    split_escaped(s, ';')
        .into_iter()
        .map(|component| match version {
            VCardVersion::V2_1 if component.is_empty() => Vec::new(),
            VCardVersion::V2_1 => vec![unescape(component, version)],
            VCardVersion::V3 | VCardVersion::V4 => split_list(component, version),
        })
        .collect()
}

/// Splits a multi-valued text value (CATEGORIES, NICKNAME) into unescaped items.
#[must_use]
pub fn split_list(s: &str, version: VCardVersion) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }

    split_escaped(s, ',')
        .into_iter()
        .map(|item| unescape(item, version))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_skips_escaped_separator() {
        assert_eq!(split_escaped("a\\;b;c", ';'), vec!["a\\;b", "c"]);
    }

    #[test]
    fn split_doubled_backslash_does_not_escape() {
        assert_eq!(split_escaped("a\\\\;b", ';'), vec!["a\\\\", "b"]);
        assert_eq!(split_escaped("a\\\\\\;b", ';'), vec!["a\\\\\\;b"]);
    }

    #[test]
    fn split_keeps_empty_parts() {
        assert_eq!(split_escaped(";;", ';'), vec!["", "", ""]);
        assert_eq!(split_escaped("", ';'), vec![""]);
    }

    #[test]
    fn split_quoted_ignores_quoted_separators() {
        assert_eq!(
            split_quoted("TYPE=home;LABEL=\"a;b\";PREF=1", ';'),
            vec!["TYPE=home", "LABEL=\"a;b\"", "PREF=1"]
        );
    }

    #[test]
    fn param_values_quote_aware() {
        assert_eq!(split_param_values("\"a,b;c\""), vec!["a,b;c"]);
        assert_eq!(split_param_values("work,voice"), vec!["work", "voice"]);
        assert_eq!(split_param_values("a\\,b,c"), vec!["a\\,b", "c"]);
    }

    #[test]
    fn structured_name_components() {
        let parts = split_components("Public;John;Quinlan;Mr.;Esq.,Jr.", VCardVersion::V4);
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], vec!["Public"]);
        assert_eq!(parts[4], vec!["Esq.", "Jr."]);
    }

    #[test]
    fn components_unescape_inner_separators() {
        let parts = split_components("Acme\\, Inc.;R\\;D", VCardVersion::V3);
        assert_eq!(parts, vec![vec!["Acme, Inc.".to_string()], vec!["R;D".to_string()]]);
    }

    #[test]
    fn components_2_1_do_not_split_commas() {
        let parts = split_components("Doe;John,Paul;;;", VCardVersion::V2_1);
        assert_eq!(parts[1], vec!["John,Paul"]);
        assert!(parts[2].is_empty());
    }

    #[test]
    fn list_items() {
        assert_eq!(
            split_list("friends,work\\,stuff", VCardVersion::V4),
            vec!["friends", "work,stuff"]
        );
        assert!(split_list("", VCardVersion::V4).is_empty());
    }
}
