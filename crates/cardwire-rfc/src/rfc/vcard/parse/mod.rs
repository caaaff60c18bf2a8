//! vCard parsing.
//!
//! ## Usage
//!
//! ```rust
//! use cardwire_rfc::rfc::vcard::parse::{RowSource, decode_text};
//!
//! let input = "\
//! BEGIN:VCARD\r\n\
//! VERSION:3.0\r\n\
//! FN:John Doe\r\n\
//! NOTE:first\\nsecond\r\n\
//! END:VCARD\r\n";
//!
//! let mut source = RowSource::open_str(input);
//! let card = source.next_card().unwrap().unwrap();
//! assert_eq!(card[1].value, "John Doe");
//! assert_eq!(decode_text(&card[2]), "first\nsecond");
//! ```
//!
//! ## Layers
//!
//! - [`RecordReader`] reassembles physical lines into records
//! - [`parse_content_line`] tokenizes one record into a [`ParsedRow`](crate::rfc::vcard::core::ParsedRow)
//! - [`RowSource`] combines both and skips malformed records
//! - `decode_*` turn a row's raw value into text, lists, components or bytes

mod error;
mod lexer;
mod params;
mod reader;
mod source;
mod values;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{ParseOptions, parse_content_line};
pub use params::typed_parameters;
pub use reader::RecordReader;
pub use source::RowSource;
pub use values::{
    BinaryValue, decode_binary, decode_components, decode_list, decode_raw, decode_text,
    decode_value,
};
