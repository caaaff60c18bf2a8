//! `cardwire convert`: rewrite a VCF document in another version.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cardwire_core::config::{CodecConfig, Settings};
use cardwire_rfc::rfc::vcard::sync::{current_app, generate_app_uri, register_once};
use cardwire_rfc::rfc::vcard::core::names;
use cardwire_rfc::rfc::vcard::{
    Parameters, ParsedRow, PidSynchronizer, PropertyValue, RowSource, VCardParameter, VCardVersion,
    VCardWriter, WriteOptions, decode_value,
};

use super::{open_input, parse_version, write_output};

/// Properties that receive a `PID` when IDs are assigned.
const SYNCED_PROPERTIES: &[&str] = &[
    names::FN,
    names::NICKNAME,
    names::PHOTO,
    names::ADR,
    names::TEL,
    names::EMAIL,
    names::IMPP,
    names::LANG,
    names::TZ,
    names::GEO,
    names::TITLE,
    names::ROLE,
    names::LOGO,
    names::ORG,
    names::MEMBER,
    names::RELATED,
    names::CATEGORIES,
    names::NOTE,
    names::SOUND,
    names::URL,
    names::KEY,
    names::FBURL,
    names::CALADRURI,
    names::CALURI,
    names::SOURCE,
];

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// VCF file to read (default: stdin).
    pub input: Option<PathBuf>,

    /// Target version: 2.1, 3.0 or 4.0.
    #[arg(long, value_parser = parse_version)]
    pub to: VCardVersion,

    /// Output file (default: stdout).
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Give every property a PID from this application (4.0 output only).
    #[arg(long)]
    pub assign_pids: bool,

    /// Application URI used with `--assign-pids` (default: a fresh urn:uuid).
    #[arg(long, requires = "assign_pids")]
    pub app_uri: Option<String>,
}

/// Result of a conversion.
#[derive(Debug)]
pub struct Conversion {
    pub text: String,
    pub cards: usize,
    pub skipped: usize,
    pub truncated: bool,
}

pub fn handle(args: &ConvertArgs, settings: &Settings) -> Result<()> {
    let pid_app = if args.assign_pids {
        if args.to != VCardVersion::V4 {
            tracing::warn!(to = %args.to, "PIDs exist only in vCard 4.0; not assigning");
        }
        register_once(args.app_uri.clone().unwrap_or_else(generate_app_uri));
        current_app()
    } else {
        None
    };

    let input = open_input(args.input.as_deref())?;
    let conversion = convert(input, &settings.codec, args.to, pid_app.as_deref())?;

    if conversion.truncated {
        tracing::warn!("Input ends inside a card; wrote the complete properties read so far");
    }
    if conversion.skipped > 0 {
        tracing::warn!(skipped = conversion.skipped, "Skipped malformed lines");
    }
    tracing::info!(cards = conversion.cards, to = %args.to, "Conversion finished");

    write_output(args.output.as_deref(), &conversion.text)
}

/// Reads every card from `input` and writes it again as `target`.
///
/// With `pid_app`, 4.0 output gets a `PID` from that application on every
/// property listed in [`SYNCED_PROPERTIES`] and the matching `CLIENTPIDMAP`.
///
/// ## Errors
/// Returns an error if reading fails, a value cannot be decoded or a
/// property cannot be written.
#[tracing::instrument(skip(input, codec))]
pub fn convert(
    input: impl BufRead,
    codec: &CodecConfig,
    target: VCardVersion,
    pid_app: Option<&str>,
) -> Result<Conversion> {
    let mut source = RowSource::from_config(input, codec);
    let mut writer = VCardWriter::new(target, WriteOptions::from(codec));
    let mut cards = 0;

    while let Some(rows) = source.next_card()? {
        cards += 1;
        write_card(&mut writer, &rows, pid_app)
            .with_context(|| format!("Failed to convert card {cards}"))?;
    }

    Ok(Conversion {
        text: writer.finish(),
        cards,
        skipped: source.skipped(),
        truncated: source.is_truncated(),
    })
}

fn write_card(writer: &mut VCardWriter, rows: &[ParsedRow], pid_app: Option<&str>) -> Result<()> {
    let target = writer.version();
    let mut sync = match pid_app {
        Some(app) if target == VCardVersion::V4 => Some(PidSynchronizer::with_app(app)),
        _ => None,
    };
    if let Some(sync) = &mut sync {
        rows.iter().for_each(|row| sync.observe(row));
    }

    writer.begin_card();
    for row in rows
        .iter()
        .filter(|r| !r.is(names::VERSION) && !r.is(names::CLIENTPIDMAP))
    {
        let mut params = row.parameters.clone();
        let mut value = decode_value(row)
            .with_context(|| format!("Failed to decode {} at line {}", row.name, row.line))?;
        adapt(&mut params, &mut value, target);

        if let Some(sync) = &mut sync
            && SYNCED_PROPERTIES.contains(&row.name.as_str())
        {
            sync.assign(&row.name, &mut params)?;
        }

        writer.property(row.group.as_deref(), &row.name, &params, &value)?;
    }

    if target == VCardVersion::V4 {
        let clients = match &sync {
            Some(sync) => sync.client_pid_maps().to_vec(),
            None => {
                let mut observer = PidSynchronizer::new();
                rows.iter().for_each(|row| observer.observe(row));
                observer.client_pid_maps().to_vec()
            }
        };
        for client in clients {
            writer.property(
                None,
                names::CLIENTPIDMAP,
                &Parameters::new(),
                &PropertyValue::Raw(client.to_value()),
            )?;
        }
    }

    writer.end_card();
    Ok(())
}

/// Adjusts parameters and values that do not carry over between versions.
fn adapt(params: &mut Parameters, value: &mut PropertyValue, target: VCardVersion) {
    if target != VCardVersion::V2_1 {
        bare_tokens_to_types(params, target);
    }

    if target != VCardVersion::V4 {
        params.pids.clear();
        return;
    }

    // 2.1/3.0 name the image format in TYPE; 4.0 puts a media type in the data URI.
    if let PropertyValue::Binary {
        media_type: Some(media_type),
        ..
    } = value
        && !media_type.contains('/')
    {
        let subtype = media_type.to_ascii_lowercase();
        params.types.retain(|t| !t.eq_ignore_ascii_case(&subtype));
        *media_type = format!("image/{subtype}");
    }
}

/// Bare 2.1 tokens (`TEL;WORK;VOICE`) become lowercase `TYPE` values. In
/// 4.0 a bare `PREF` becomes `PREF=1`.
fn bare_tokens_to_types(params: &mut Parameters, target: VCardVersion) {
    let (bare, named): (Vec<_>, Vec<_>) = std::mem::take(&mut params.extra)
        .into_iter()
        .partition(VCardParameter::is_bare);
    params.extra = named;

    for token in bare {
        let token = token.name.trim().to_ascii_lowercase();
        if target == VCardVersion::V4 && token == "pref" {
            params.pref.get_or_insert(1);
        } else {
            params.add_type(token);
        }
    }
}
