//! Row source: reader plus tokenizer.

use std::io::BufRead;

use cardwire_core::config::CodecConfig;

use super::lexer::{ParseOptions, parse_content_line};
use super::reader::RecordReader;
use crate::error::RfcResult;
use crate::rfc::vcard::core::{ParsedRow, VCardVersion};

/// Yields tokenized rows from a vCard stream.
///
/// Records that fail to tokenize are logged and skipped. Iterating the
/// source yields whole cards.
#[derive(Debug)]
pub struct RowSource<R> {
    reader: RecordReader<R>,
    options: ParseOptions,
    skipped: usize,
}

impl<R: BufRead> RowSource<R> {
    /// Opens a source over `input`, assuming `hint` until a card declares
    /// its version.
    #[must_use]
    #[tracing::instrument(skip(input))]
    pub fn open(input: R, hint: VCardVersion) -> Self {
        Self {
            reader: RecordReader::new(input, hint),
            options: ParseOptions::default(),
            skipped: 0,
        }
    }

    /// Opens a source configured from the codec settings.
    #[must_use]
    pub fn from_config(input: R, config: &CodecConfig) -> Self {
        Self::open(input, VCardVersion::detect(&config.default_version))
            .with_options(ParseOptions::from(config))
    }

    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the next row of the current card, or `None` at its end.
    ///
    /// ## Errors
    /// Returns `RfcError::IoError` if reading the stream fails.
    pub fn next_row(&mut self) -> RfcResult<Option<ParsedRow>> {
        loop {
            let Some(record) = self.reader.next_record()? else {
                return Ok(None);
            };

            match parse_content_line(&record, &self.options) {
                Ok(row) => return Ok(Some(row)),
                Err(err) => {
                    tracing::debug!(error = %err, "Skipping malformed record");
                    self.skipped += 1;
                }
            }
        }
    }

    /// Reads all rows of the next card.
    ///
    /// Returns `None` once no further card starts. A card that turns out to
    /// be truncated still yields the rows read before the input ended.
    ///
    /// ## Errors
    /// Returns `RfcError::IoError` if reading the stream fails.
    pub fn next_card(&mut self) -> RfcResult<Option<Vec<ParsedRow>>> {
        let before = self.reader.card_count();
        let mut rows = Vec::new();

        while let Some(row) = self.next_row()? {
            rows.push(row);
        }

        if rows.is_empty() && self.reader.card_count() == before {
            return Ok(None);
        }

        tracing::trace!(card = self.reader.card_count(), rows = rows.len(), "Read card");
        Ok(Some(rows))
    }

    /// Whether the input is exhausted.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.reader.is_eof()
    }

    /// Whether the input ended inside a card.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.reader.is_truncated()
    }

    /// Number of records dropped because they could not be tokenized.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<'a> RowSource<&'a [u8]> {
    /// Opens a source over an in-memory document, assuming 2.1 until told
    /// otherwise.
    #[must_use]
    pub fn open_str(input: &'a str) -> Self {
        Self::open(input.as_bytes(), VCardVersion::V2_1)
    }
}

impl<R: BufRead> Iterator for RowSource<R> {
    type Item = RfcResult<Vec<ParsedRow>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_card().transpose()
    }
}
