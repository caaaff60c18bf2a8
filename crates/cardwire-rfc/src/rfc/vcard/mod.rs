//! vCard codec (vCard 2.1, RFC 2426, RFC 6350).
//!
//! Reads and writes VCF text one property at a time. No contact object
//! model lives here: callers get tokenized rows and hand back values to
//! serialize.
//!
//! ## Usage
//!
//! ### Reading
//!
//! ```rust
//! use cardwire_rfc::rfc::vcard::{RowSource, decode_components};
//!
//! let input = "\
//! BEGIN:VCARD\r\n\
//! VERSION:2.1\r\n\
//! N;CHARSET=UTF-8;ENCODING=QUOTED-PRINTABLE:M=C3=BCller;Hans\r\n\
//! END:VCARD\r\n";
//!
//! let mut source = RowSource::open_str(input);
//! let row = source.next_row().unwrap().unwrap();
//! assert_eq!(row.name, "VERSION");
//! let row = source.next_row().unwrap().unwrap();
//! assert_eq!(decode_components(&row)[0], vec!["Müller"]);
//! ```
//!
//! ### Writing
//!
//! ```rust
//! use cardwire_rfc::rfc::vcard::{Parameters, PropertyValue, PropertyWriter, VCardVersion, WriteOptions};
//!
//! let writer = PropertyWriter::new(VCardVersion::V3, WriteOptions::default());
//! let mut out = String::new();
//! writer
//!     .write(&mut out, Some("item1"), "EMAIL", &Parameters::new(), &PropertyValue::Raw("a@b.c".into()))
//!     .unwrap();
//! assert_eq!(out, "item1.EMAIL:a@b.c\r\n");
//! ```
//!
//! ## Submodules
//!
//! - [`core`] - version tag, rows, parameter model
//! - [`codec`] - escaping, splitting, Quoted-Printable, Base64
//! - [`parse`] - record reader, tokenizer, value decoding
//! - [`build`] - property writer and folding
//! - [`sync`] - property-ID synchronization

pub mod build;
pub mod codec;
pub mod core;
pub mod parse;
pub mod sync;

#[cfg(test)]
mod tests;

pub use build::{PropertyValue, PropertyWriter, VCardWriter, WriteOptions};
pub use core::{Parameters, ParsedRow, Record, VCardParameter, VCardVersion};
pub use parse::{
    ParseError, ParseOptions, ParseResult, RecordReader, RowSource, decode_binary,
    decode_components, decode_list, decode_raw, decode_text, decode_value,
};
pub use sync::{ClientPidMap, PidSynchronizer};
