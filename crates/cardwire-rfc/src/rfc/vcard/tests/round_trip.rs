//! Round-trip tests: write values, read them back, compare.

use super::fixtures::*;
use crate::rfc::vcard::build::{PropertyValue, VCardWriter, WriteOptions};
use crate::rfc::vcard::core::{Parameters, ParsedRow, VCardParameter, VCardVersion, names};
use crate::rfc::vcard::parse::{RowSource, decode_value};

const ALL: [VCardVersion; 3] = [VCardVersion::V2_1, VCardVersion::V3, VCardVersion::V4];

/// Writes one property in its own card and reads the card back.
fn write_and_read(
    version: VCardVersion,
    options: WriteOptions,
    name: &str,
    params: &Parameters,
    value: &PropertyValue,
) -> Result<ParsedRow, String> {
    let mut writer = VCardWriter::new(version, options);
    writer.begin_card();
    writer
        .property(Some("g1"), name, params, value)
        .map_err(|e| format!("Write failed: {e}"))?;
    writer
        .property(None, "FN", &Parameters::new(), &PropertyValue::Text("after".into()))
        .map_err(|e| format!("Write failed: {e}"))?;
    writer.end_card();
    let text = writer.finish();

    let rows = RowSource::open_str(&text)
        .next_card()
        .map_err(|e| format!("Read failed: {e}\n{text}"))?
        .ok_or_else(|| format!("No card read back\n{text}"))?;

    let upper = name.to_ascii_uppercase();
    let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
    if names != ["VERSION", upper.as_str(), "FN"] {
        return Err(format!("Unexpected rows {names:?}\n{text}"));
    }
    if rows[2].value != "after" {
        return Err(format!("Following property damaged\n{text}"));
    }
    if rows[1].version != version {
        return Err(format!("Version mismatch: {:?} vs {version:?}", rows[1].version));
    }

    Ok(rows[1].clone())
}

fn round_trip(version: VCardVersion, options: WriteOptions, name: &str, value: &PropertyValue) {
    let row = write_and_read(version, options, name, &Parameters::new(), value)
        .unwrap_or_else(|e| panic!("{version}: {e}"));
    assert_eq!(row.group.as_deref(), Some("g1"));

    let decoded = decode_value(&row).expect("decode should succeed");
    assert_eq!(&decoded, value, "{version}: {name}");
}

fn text(s: &str) -> PropertyValue {
    PropertyValue::Text(s.to_string())
}

#[test]
fn round_trip_plain_text() {
    for version in ALL {
        round_trip(version, WriteOptions::default(), "NOTE", &text("Hello World"));
        round_trip(version, WriteOptions::default(), "X-CUSTOM", &text("vendor value"));
    }
}

#[test]
fn round_trip_special_characters() {
    for version in ALL {
        for s in ["a,b;c", "back\\slash", "\\n literal", "ends with \\", "x=y: z"] {
            round_trip(version, WriteOptions::default(), "NOTE", &text(s));
        }
    }
}

#[test]
fn round_trip_multiline_text() {
    for version in ALL {
        round_trip(version, WriteOptions::default(), "NOTE", &text("line one\nline two\n"));
    }
}

#[test]
fn round_trip_non_ascii() {
    for version in ALL {
        round_trip(version, WriteOptions::default(), "FN", &text("Jörg Müller 日本"));
    }
}

#[test]
fn round_trip_long_values_with_folding() {
    let options = WriteOptions {
        fold_lines: true,
        ..WriteOptions::default()
    };
    let long = "The quick brown fox jumps over the lazy dog. ".repeat(8);
    let unicode = "Grüße aus Köln, ".repeat(12);

    for version in ALL {
        round_trip(version, options, "NOTE", &text(long.trim_end()));
        round_trip(version, options, "NOTE", &text(unicode.trim_end()));
        round_trip(version, WriteOptions::default(), "NOTE", &text(long.trim_end()));
    }
}

#[test]
fn folded_lines_respect_the_limit() {
    let options = WriteOptions {
        fold_lines: true,
        ..WriteOptions::default()
    };
    let long = "x".repeat(300);

    for version in [VCardVersion::V3, VCardVersion::V4] {
        let mut writer = VCardWriter::new(version, options);
        writer.begin_card();
        writer
            .property(None, "NOTE", &Parameters::new(), &text(&long))
            .unwrap();
        writer.end_card();
        for line in writer.finish().split("\r\n") {
            assert!(line.len() <= options.fold_length, "{version}: {line}");
        }
    }
}

#[test]
fn round_trip_structured() {
    for version in ALL {
        let name = PropertyValue::Components(vec![
            vec!["Public".into()],
            vec!["John".into()],
            vec!["Quinlan".into()],
            vec!["Mr.".into()],
            vec!["Esq.".into()],
        ]);
        round_trip(version, WriteOptions::default(), names::N, &name);

        let adr = PropertyValue::Components(vec![
            vec![],
            vec![],
            vec!["Hauptstraße 1; Hinterhaus".into()],
            vec!["Köln".into()],
            vec![],
            vec!["50667".into()],
            vec!["Deutschland".into()],
        ]);
        round_trip(version, WriteOptions::default(), names::ADR, &adr);
    }

    let multi = PropertyValue::Components(vec![
        vec!["Doe".into()],
        vec!["John".into()],
        vec!["Paul".into(), "Peter".into()],
        vec![],
        vec!["Jr.".into(), "M.D.".into()],
    ]);
    round_trip(VCardVersion::V3, WriteOptions::default(), names::N, &multi);
    round_trip(VCardVersion::V4, WriteOptions::default(), names::N, &multi);
}

#[test]
fn round_trip_lists() {
    for version in ALL {
        let list = PropertyValue::List(vec!["friends".into(), "work".into(), "Grüne".into()]);
        round_trip(version, WriteOptions::default(), names::CATEGORIES, &list);
    }
    let with_comma = PropertyValue::List(vec!["a,b".into(), "c".into()]);
    round_trip(VCardVersion::V3, WriteOptions::default(), names::CATEGORIES, &with_comma);
    round_trip(VCardVersion::V4, WriteOptions::default(), names::CATEGORIES, &with_comma);
}

#[test]
fn round_trip_binary() {
    let data: Vec<u8> = (0u8..=255).cycle().take(700).collect();

    for version in ALL {
        let value = PropertyValue::Binary {
            data: data.clone(),
            media_type: Some("image/jpeg".into()),
        };
        let row = write_and_read(version, WriteOptions::default(), "PHOTO", &Parameters::new(), &value)
            .unwrap_or_else(|e| panic!("{version}: {e}"));

        let PropertyValue::Binary {
            data: decoded,
            media_type,
        } = decode_value(&row).unwrap()
        else {
            panic!("{version}: not decoded as binary");
        };
        assert_eq!(decoded, data, "{version}");
        let expected = match version {
            VCardVersion::V4 => "image/jpeg",
            VCardVersion::V2_1 | VCardVersion::V3 => "JPEG",
        };
        assert_eq!(media_type.as_deref(), Some(expected));
    }
}

#[test]
fn round_trip_raw_values() {
    for version in ALL {
        round_trip(
            version,
            WriteOptions::default(),
            names::URL,
            &PropertyValue::Raw("https://example.com/path?q=1".into()),
        );
        round_trip(
            version,
            WriteOptions::default(),
            names::BDAY,
            &PropertyValue::Raw("19960415".into()),
        );
    }
}

#[test]
fn round_trip_embedded_agent_2_1() {
    let nested = "BEGIN:VCARD\r\nVERSION:2.1\r\nFN:Assistant\r\nEND:VCARD";
    round_trip(
        VCardVersion::V2_1,
        WriteOptions::default(),
        names::AGENT,
        &PropertyValue::Embedded(nested.into()),
    );
}

#[test]
fn round_trip_embedded_agent_3_0() {
    let nested = "BEGIN:VCARD\nVERSION:3.0\nFN:Assistant\nEND:VCARD";
    round_trip(
        VCardVersion::V3,
        WriteOptions::default(),
        names::AGENT,
        &PropertyValue::Embedded(nested.into()),
    );
}

#[test]
fn round_trip_embedded_agent_with_base64_photo() {
    let nested = "BEGIN:VCARD\r\n\
VERSION:2.1\r\n\
PHOTO;ENCODING=BASE64:aGVsbG8=\r\n\
\r\n\
FN:Inner\r\n\
END:VCARD";
    let value = PropertyValue::Embedded(nested.into());
    round_trip(VCardVersion::V2_1, WriteOptions::default(), names::AGENT, &value);

    let row = write_and_read(
        VCardVersion::V2_1,
        WriteOptions::default(),
        names::AGENT,
        &Parameters::new(),
        &value,
    )
    .unwrap();
    let PropertyValue::Embedded(card) = decode_value(&row).unwrap() else {
        panic!("AGENT not decoded as an embedded card");
    };
    let inner = RowSource::open_str(&card).next_card().unwrap().unwrap();
    let names: Vec<_> = inner.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["VERSION", "PHOTO", "FN"]);
    let PropertyValue::Binary { data, .. } = decode_value(&inner[1]).unwrap() else {
        panic!("PHOTO not decoded as binary");
    };
    assert_eq!(data, b"hello");
}

/// Quoted-Printable soft breaks can leave a card delimiter alone on a
/// continuation line; every break position is tried.
#[test]
fn round_trip_quoted_printable_delimiter_text() {
    for suffix in ["BEGIN:VCARD", "END:VCARD"] {
        for width in 0..80 {
            let value = format!("\u{fc}{}{suffix}", "x".repeat(width));
            round_trip(VCardVersion::V2_1, WriteOptions::default(), "NOTE", &text(&value));
        }
    }
}

#[test]
fn round_trip_underscore_group() {
    for version in ALL {
        let mut writer = VCardWriter::new(version, WriteOptions::default());
        writer.begin_card();
        writer
            .property(Some("my_group"), "TEL", &Parameters::new(), &PropertyValue::Raw("1".into()))
            .unwrap();
        writer.end_card();
        let text = writer.finish();
        assert!(text.contains("my_group.TEL:1\r\n"), "{version}");

        let rows = RowSource::open_str(&text).next_card().unwrap().unwrap();
        assert_eq!(rows.len(), 2, "{version}: {text}");
        assert_eq!(rows[1].group.as_deref(), Some("my_group"));
        assert_eq!(rows[1].name, "TEL");
        assert_eq!(rows[1].value, "1");
    }
}

#[test]
fn round_trip_parameters() {
    let mut params = Parameters::new();
    params.add_type("work");
    params.add_type("voice");
    params.pref = Some(1);
    params.label = Some("Main St: 1, Springfield".into());
    params.add_extra(VCardParameter::new("X-SERVICE-TYPE", "Skype"));

    for version in ALL {
        let row = write_and_read(
            version,
            WriteOptions::default(),
            "TEL",
            &params,
            &PropertyValue::Raw("+1-555-0100".into()),
        )
        .unwrap_or_else(|e| panic!("{version}: {e}"));

        assert_eq!(row.parameters.types, params.types, "{version}");
        assert_eq!(row.parameters.pref, Some(1), "{version}");
        assert_eq!(row.parameters.label, params.label, "{version}");
        assert_eq!(row.parameters.extra, params.extra, "{version}");
        assert_eq!(row.value, "+1-555-0100");
    }
}

#[test]
fn round_trip_caret_parameters_4_0() {
    let mut params = Parameters::new();
    params.add_extra(VCardParameter::new("X-NOTE", "say \"hi\"\nbye ^"));
    let row = write_and_read(
        VCardVersion::V4,
        WriteOptions::default(),
        "X-THING",
        &params,
        &text("v"),
    )
    .unwrap();
    assert_eq!(row.parameters.extra, params.extra);
}

/// Reads every fixture, rewrites each row in the same version and reads it
/// again; the decoded values and parameters must survive.
#[test]
fn fixtures_survive_rewrite() {
    for fixture in [V21_OUTLOOK, V21_AGENT, V30_APPLE, V40_SYNC] {
        let original = RowSource::open_str(fixture).next_card().unwrap().unwrap();
        let version = original[0].version;

        let mut writer = VCardWriter::new(version, WriteOptions::default());
        writer.begin_card();
        for row in original.iter().filter(|r| !r.is(names::VERSION)) {
            let value = decode_value(row).unwrap();
            writer
                .property(row.group.as_deref(), &row.name, &row.parameters, &value)
                .unwrap();
        }
        writer.end_card();
        let rewritten_text = writer.finish();

        let rewritten = RowSource::open_str(&rewritten_text)
            .next_card()
            .unwrap()
            .unwrap();
        assert_eq!(rewritten.len(), original.len(), "{rewritten_text}");

        for (before, after) in original.iter().zip(&rewritten) {
            assert_eq!(before.name, after.name);
            assert_eq!(before.group, after.group);
            assert_eq!(
                decode_value(before).unwrap(),
                decode_value(after).unwrap(),
                "{}\n{rewritten_text}",
                before.name
            );
            assert_eq!(before.parameters.types, after.parameters.types);
            assert_eq!(before.parameters.pids, after.parameters.pids);
            assert_eq!(before.parameters.extra, after.parameters.extra);
        }
    }
}
