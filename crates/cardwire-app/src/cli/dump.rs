//! `cardwire dump`: one line per property.

use std::fmt::Write as _;
use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cardwire_core::config::{CodecConfig, Settings};
use cardwire_rfc::rfc::vcard::{ParsedRow, PropertyValue, RowSource, decode_value};

use super::{open_input, write_output};

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// VCF file to read (default: stdin).
    pub input: Option<PathBuf>,

    /// Emit one JSON object per row instead of text.
    #[arg(long)]
    pub json: bool,
}

pub fn handle(args: &DumpArgs, settings: &Settings) -> Result<()> {
    let input = open_input(args.input.as_deref())?;
    let text = dump(input, &settings.codec, args.json)?;
    write_output(None, &text)
}

/// Renders every row of every card in `input`.
///
/// ## Errors
/// Returns an error if reading fails or a row cannot be serialized.
pub fn dump(input: impl BufRead, codec: &CodecConfig, json: bool) -> Result<String> {
    let mut source = RowSource::from_config(input, codec);
    let mut out = String::new();
    let mut cards = 0usize;

    while let Some(rows) = source.next_card()? {
        cards += 1;
        if !json {
            writeln!(out, "# card {cards}")?;
        }
        for row in &rows {
            if json {
                let line = serde_json::to_string(row)
                    .with_context(|| format!("Failed to serialize row at line {}", row.line))?;
                out.push_str(&line);
                out.push('\n');
            } else {
                writeln!(out, "{}", describe_row(row))?;
            }
        }
    }

    if source.is_truncated() {
        tracing::warn!("Input ends inside a card");
    }
    if source.skipped() > 0 {
        tracing::warn!(skipped = source.skipped(), "Skipped malformed lines");
    }
    tracing::info!(cards, "Dump finished");

    Ok(out)
}

fn describe_row(row: &ParsedRow) -> String {
    let mut line = format!("{:>5}  ", row.line);
    if let Some(group) = &row.group {
        line.push_str(group);
        line.push('.');
    }
    line.push_str(&row.name);
    for param in &row.params {
        line.push(';');
        line.push_str(&param.name);
        if !param.values.is_empty() {
            line.push('=');
            line.push_str(&param.values.join(","));
        }
    }
    line.push_str(" = ");

    match decode_value(row) {
        Ok(value) => line.push_str(&describe_value(&value)),
        Err(e) => {
            tracing::debug!(line = row.line, error = %e, "Value not decodable");
            line.push_str(&format!("<undecodable: {e}>"));
        }
    }
    line
}

fn describe_value(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Text(s) | PropertyValue::Raw(s) | PropertyValue::Embedded(s) => {
            s.escape_debug().to_string()
        }
        PropertyValue::List(items) => items.join(" | "),
        PropertyValue::Components(components) => components
            .iter()
            .map(|items| items.join(","))
            .collect::<Vec<_>>()
            .join(" ; "),
        PropertyValue::Binary { data, media_type } => format!(
            "<{} bytes, {}>",
            data.len(),
            media_type.as_deref().unwrap_or("unknown type")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = "BEGIN:VCARD\r\n\
VERSION:2.1\r\n\
N;CHARSET=UTF-8;ENCODING=QUOTED-PRINTABLE:M=C3=BCller;Hans\r\n\
item1.TEL;WORK:+49 221 1\r\n\
PHOTO;ENCODING=BASE64;TYPE=GIF:R0lGODlh\r\n\
\r\n\
END:VCARD\r\n";

    fn codec() -> CodecConfig {
        Settings::from_toml_str("").unwrap().codec
    }

    #[test_log::test]
    fn text_dump_decodes_values() {
        let out = dump(CARD.as_bytes(), &codec(), false).unwrap();
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines[0], "# card 1");
        assert_eq!(lines[1], "    2  VERSION = 2.1");
        assert_eq!(
            lines[2],
            "    3  N;CHARSET=UTF-8;ENCODING=QUOTED-PRINTABLE = Müller ; Hans"
        );
        assert_eq!(lines[3], "    4  item1.TEL;WORK = +49 221 1");
        assert_eq!(lines[4], "    5  PHOTO;ENCODING=BASE64;TYPE=GIF = <6 bytes, GIF>");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn json_dump_is_one_object_per_row() {
        let out = dump(CARD.as_bytes(), &codec(), true).unwrap();
        let rows: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["name"], "VERSION");
        assert_eq!(rows[0]["version"], "2.1");
        assert_eq!(rows[2]["group"], "item1");
        assert_eq!(rows[2]["value"], "+49 221 1");
        assert_eq!(rows[3]["parameters"]["types"][0], "GIF");
    }

    #[test]
    fn empty_input_dumps_nothing() {
        assert_eq!(dump("".as_bytes(), &codec(), false).unwrap(), "");
    }
}
