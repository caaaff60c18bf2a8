//! vCard serialization.
//!
//! ## Usage
//!
//! ```rust
//! use cardwire_rfc::rfc::vcard::build::{PropertyValue, VCardWriter, WriteOptions};
//! use cardwire_rfc::rfc::vcard::core::{Parameters, VCardVersion};
//!
//! let mut writer = VCardWriter::new(VCardVersion::V4, WriteOptions::default());
//! writer.begin_card();
//! writer
//!     .property(None, "FN", &Parameters::new(), &PropertyValue::Text("Jane Doe".into()))
//!     .unwrap();
//! writer.end_card();
//!
//! assert!(writer.finish().contains("FN:Jane Doe\r\n"));
//! ```

mod fold;
mod writer;

pub use fold::{fold_at_whitespace, fold_for, fold_line};
pub use writer::{PropertyValue, PropertyWriter, VCardWriter, WriteOptions};
