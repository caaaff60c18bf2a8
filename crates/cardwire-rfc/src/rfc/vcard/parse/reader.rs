//! Record reassembly.
//!
//! Turns a byte stream into unfolded records, one card at a time. Besides
//! ordinary folding (a physical line starting with a space or tab continues
//! the previous one) vCard 2.1 has three continuation forms that only make
//! sense once the pending record's parameters are known:
//!
//! - a Quoted-Printable value ending in `=` continues on the next line
//! - a Base64 value continues until a blank line
//! - an `AGENT` value may be a whole nested card
//!
//! Records borrow the reader's buffer, so the borrow checker enforces that a
//! record is dropped before the next one is requested.

use std::io::BufRead;

use cardwire_core::constants::{BEGIN_VCARD, CRLF, END_VCARD};

use super::lexer::find_value_separator;
use crate::error::RfcResult;
use crate::rfc::vcard::codec::split::split_quoted;
use crate::rfc::vcard::core::{Encoding, Record, VCardVersion};

/// Pull-based reader yielding one unfolded [`Record`] at a time.
#[derive(Debug)]
pub struct RecordReader<R> {
    input: R,
    hint: VCardVersion,
    /// Working version of the current card.
    version: VCardVersion,
    version_seen: bool,
    raw: Vec<u8>,
    line: String,
    line_number: usize,
    pending: String,
    pending_line: usize,
    emitted: String,
    emitted_line: usize,
    emitted_version: VCardVersion,
    base64_closed: bool,
    in_card: bool,
    /// The last record of a card went out with its `END:VCARD`.
    card_done: bool,
    eof: bool,
    truncated: bool,
    cards: usize,
}

impl<R: BufRead> RecordReader<R> {
    /// Creates a reader. `hint` is the version assumed for each card until
    /// its `VERSION` line is seen.
    #[must_use]
    pub fn new(input: R, hint: VCardVersion) -> Self {
        Self {
            input,
            hint,
            version: hint,
            version_seen: false,
            raw: Vec::new(),
            line: String::new(),
            line_number: 0,
            pending: String::new(),
            pending_line: 0,
            emitted: String::new(),
            emitted_line: 0,
            emitted_version: hint,
            base64_closed: false,
            in_card: false,
            card_done: false,
            eof: false,
            truncated: false,
            cards: 0,
        }
    }

    /// Returns the next record of the current card.
    ///
    /// When no card is open, skips ahead to the next `BEGIN:VCARD`. Returns
    /// `None` at the end of each card and, once the input is exhausted, on
    /// every further call.
    ///
    /// ## Errors
    /// Returns `RfcError::IoError` if reading the underlying stream fails.
    pub fn next_record(&mut self) -> RfcResult<Option<Record<'_>>> {
        if self.advance()? {
            Ok(Some(Record {
                text: &self.emitted,
                version: self.emitted_version,
                line: self.emitted_line,
            }))
        } else {
            Ok(None)
        }
    }

    /// Whether the input is exhausted.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.eof
    }

    /// Whether the input ended inside a card.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Number of `BEGIN:VCARD` lines seen so far.
    #[must_use]
    pub const fn card_count(&self) -> usize {
        self.cards
    }

    /// Version in force for the current (or last) card.
    #[must_use]
    pub const fn version(&self) -> VCardVersion {
        self.version
    }

    /// Moves to the next finished record. Returns `false` at the end of a
    /// card or of the input.
    fn advance(&mut self) -> RfcResult<bool> {
        if self.card_done {
            self.card_done = false;
            return Ok(false);
        }

        if !self.in_card && !self.open_card()? {
            return Ok(false);
        }

        loop {
            if !self.read_line()? {
                tracing::debug!(
                    line = self.line_number,
                    card = self.cards,
                    "Input ended before END:VCARD"
                );
                self.truncate();
                return Ok(false);
            }

            let trimmed = self.line.trim();
            let is_end = trimmed.eq_ignore_ascii_case(END_VCARD);
            let is_begin = trimmed.eq_ignore_ascii_case(BEGIN_VCARD);
            let is_blank = trimmed.is_empty();

            // A soft-broken Quoted-Printable value owns the next line whatever
            // it looks like. An open Base64 block still ends at `END:VCARD`.
            if self.version == VCardVersion::V2_1 && !self.pending.is_empty() {
                match self.pending_encoding() {
                    Some(Encoding::QuotedPrintable) if self.pending.ends_with('=') => {
                        self.pending.pop();
                        if !is_blank {
                            self.pending.push_str(&self.line);
                        }
                        continue;
                    }
                    Some(encoding) if encoding.is_base64() && !self.base64_closed && !is_end => {
                        if is_blank {
                            self.base64_closed = true;
                        } else {
                            self.pending.push_str(&self.line);
                        }
                        continue;
                    }
                    _ => {}
                }
            }

            if is_end {
                self.in_card = false;
                tracing::trace!(line = self.line_number, card = self.cards, "End of card");
                let ready = self.take_pending();
                self.card_done = ready;
                return Ok(ready);
            }

            if is_begin && self.version == VCardVersion::V2_1 && !self.pending.is_empty() {
                if !self.capture_nested()? {
                    return Ok(false);
                }
                continue;
            }

            if self.line.starts_with([' ', '\t']) && !self.pending.is_empty() {
                if self.version.keeps_fold_whitespace() {
                    self.pending.push_str(&self.line);
                } else {
                    self.pending.push_str(&self.line[1..]);
                }
                continue;
            }

            if is_blank {
                continue;
            }

            let ready = self.take_pending();
            self.start_record();
            if ready {
                return Ok(true);
            }
        }
    }

    /// Skips to the next `BEGIN:VCARD` and resets the per-card state.
    fn open_card(&mut self) -> RfcResult<bool> {
        if self.eof {
            return Ok(false);
        }

        loop {
            if !self.read_line()? {
                self.eof = true;
                return Ok(false);
            }
            if self.line.trim().eq_ignore_ascii_case(BEGIN_VCARD) {
                break;
            }
        }

        self.in_card = true;
        self.cards += 1;
        self.version = self.hint;
        self.version_seen = false;
        self.base64_closed = false;
        self.pending.clear();
        tracing::trace!(line = self.line_number, card = self.cards, "Start of card");
        Ok(true)
    }

    /// Reads one physical line into `self.line`, without its terminator.
    fn read_line(&mut self) -> RfcResult<bool> {
        self.raw.clear();
        if self.input.read_until(b'\n', &mut self.raw)? == 0 {
            return Ok(false);
        }
        self.line_number += 1;

        while matches!(self.raw.last(), Some(b'\n' | b'\r')) {
            self.raw.pop();
        }

        self.line.clear();
        let text = String::from_utf8_lossy(&self.raw);
        if self.line_number == 1 {
            self.line.push_str(text.trim_start_matches('\u{feff}'));
        } else {
            self.line.push_str(&text);
        }
        Ok(true)
    }

    /// Begins a new pending record from the current line.
    fn start_record(&mut self) {
        self.pending.push_str(self.line.trim_start());
        self.pending_line = self.line_number;
        self.base64_closed = false;

        if !self.version_seen
            && let Some(value) = version_value(&self.pending)
        {
            self.version = VCardVersion::detect(value);
            self.version_seen = true;
            tracing::trace!(version = %self.version, card = self.cards, "Detected card version");
        }
    }

    /// Moves the pending record into the emitted buffer.
    fn take_pending(&mut self) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        std::mem::swap(&mut self.pending, &mut self.emitted);
        self.pending.clear();
        self.emitted_line = self.pending_line;
        self.emitted_version = self.version;
        true
    }

    /// Appends a nested 2.1 card (starting at the current line) to the
    /// pending record, joined with CRLF.
    fn capture_nested(&mut self) -> RfcResult<bool> {
        let mut depth = 1usize;
        self.pending.push_str(self.line.trim());

        while depth > 0 {
            if !self.read_line()? {
                tracing::debug!(line = self.line_number, "Input ended inside a nested card");
                self.truncate();
                return Ok(false);
            }

            let trimmed = self.line.trim();
            if trimmed.eq_ignore_ascii_case(BEGIN_VCARD) {
                depth += 1;
            } else if trimmed.eq_ignore_ascii_case(END_VCARD) {
                depth -= 1;
            }

            self.pending.push_str(CRLF);
            self.pending.push_str(&self.line);
        }

        Ok(true)
    }

    /// Sniffs the `ENCODING` of the pending record from its parameters.
    fn pending_encoding(&self) -> Option<Encoding> {
        let key_section = match find_value_separator(&self.pending) {
            Some(pos) => &self.pending[..pos],
            None => &self.pending,
        };

        split_quoted(key_section, ';')
            .into_iter()
            .skip(1)
            .find_map(|segment| match segment.split_once('=') {
                Some((name, value)) if name.trim().eq_ignore_ascii_case("ENCODING") => {
                    Encoding::parse(value)
                }
                Some(_) => None,
                None => Encoding::parse(segment).filter(|e| *e != Encoding::B),
            })
    }

    fn truncate(&mut self) {
        self.eof = true;
        self.truncated = true;
        self.in_card = false;
        self.pending.clear();
    }
}

/// Returns the value of a `VERSION:` record.
fn version_value(record: &str) -> Option<&str> {
    let (key, value) = record.split_once(':')?;
    key.trim()
        .eq_ignore_ascii_case("VERSION")
        .then_some(value)
}
