//! Value codecs shared by the reader and the writer.
//!
//! - [`escape`] - version-aware backslash escaping and RFC 6868 carets
//! - [`split`] - splitting composite values on unescaped separators
//! - [`quoted_printable`] - `=XX` encoding with soft line breaks
//! - [`base64`] - inline binary payloads and `data:` URIs

pub mod base64;
pub mod escape;
pub mod quoted_printable;
pub mod split;

pub use escape::{decode_caret, escape, escape_param_value, unescape};
pub use split::{split_components, split_escaped, split_list, split_param_values, split_quoted};
