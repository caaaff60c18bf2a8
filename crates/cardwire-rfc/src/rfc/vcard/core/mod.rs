//! vCard core types.
//!
//! - [`VCardVersion`] - version tag threaded through every codec call
//! - [`Record`] - one unfolded content line, borrowed from the reader
//! - [`ParsedRow`] - a tokenized content line
//! - [`VCardParameter`] / [`Parameters`] - raw and typed parameters
//! - [`ValueShape`] - how a property lays out its value

mod parameter;
mod property;
mod row;
mod version;
mod vocab;

pub use parameter::{Parameters, VCardParameter, types};
pub use property::{ValueShape, names};
pub use row::{ParsedRow, Record};
pub use version::VCardVersion;
pub use vocab::{ContentLocation, Encoding, KNOWN_CHARSETS, Level, PropertyId, ValueType};
