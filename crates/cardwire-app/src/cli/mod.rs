//! Command-line wiring for the `cardwire` binary.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cardwire_core::config::Settings;
use cardwire_rfc::rfc::vcard::VCardVersion;

pub mod convert;
pub mod dump;

/// Read, inspect and convert VCF address books.
#[derive(Parser, Debug)]
#[command(name = "cardwire", version, about = "vCard 2.1 / 3.0 / 4.0 codec")]
pub struct Cli {
    /// Configuration file (default: ./cardwire.toml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, overriding `logging.level` (e.g. `debug`, `cardwire_rfc=trace`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the rows of every card.
    Dump(dump::DumpArgs),
    /// Rewrite every card in another vCard version.
    Convert(convert::ConvertArgs),
}

/// Executes the requested command.
///
/// ## Errors
/// Returns an error if the input cannot be read, a value cannot be decoded
/// or the output cannot be written.
pub fn run(command: Command, settings: &Settings) -> Result<()> {
    match command {
        Command::Dump(args) => dump::handle(&args, settings),
        Command::Convert(args) => convert::handle(&args, settings),
    }
}

/// Opens `path`, or stdin when absent or `-`.
fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path.filter(|p| *p != Path::new("-")) {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Writes `text` to `path`, or stdout when absent or `-`.
fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path.filter(|p| *p != Path::new("-")) {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Parses `2.1`, `3.0` or `4.0` (also `3` and `4`).
fn parse_version(s: &str) -> Result<VCardVersion, String> {
    match s.trim() {
        "3" => Ok(VCardVersion::V3),
        "4" => Ok(VCardVersion::V4),
        other => other
            .parse()
            .map_err(|()| format!("unsupported vCard version {other:?} (expected 2.1, 3.0 or 4.0)")),
    }
}
