//! vCard parameter types.

use serde::Serialize;

use super::vocab::{ContentLocation, Encoding, Level, PropertyId, ValueType};

/// A vCard parameter exactly as it appeared on the content line.
///
/// `name` keeps its original spelling so unknown parameters can be written
/// back verbatim. An empty `values` list marks a bare 2.1 token such as
/// `TEL;WORK:...`, which is distinct from `KEY=` (one empty value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VCardParameter {
    /// Parameter name as written.
    pub name: String,
    /// Parameter values.
    pub values: Vec<String>,
}

impl VCardParameter {
    /// Creates a new parameter with a single value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }

    /// Creates a parameter with multiple values.
    #[must_use]
    pub fn multi(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Creates a valueless (bare) parameter.
    #[must_use]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Returns the first value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Whether this is a bare token without `=`.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns whether the parameter has the specified value (case-insensitive).
    #[must_use]
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.eq_ignore_ascii_case(value))
    }

    /// Case-insensitive name comparison.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Typed projection of a property's parameters.
///
/// Every recognised key lands in exactly one field; anything else is kept in
/// [`Parameters::extra`] with its original spelling so a parse/serialize
/// round trip loses nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Parameters {
    pub language: Option<String>,
    pub value: Option<ValueType>,
    pub content_location: Option<ContentLocation>,
    /// Preference, 1 (most preferred) to 100.
    pub pref: Option<u8>,
    pub pids: Vec<PropertyId>,
    pub types: Vec<String>,
    pub geo: Option<String>,
    pub tz: Option<String>,
    pub sort_as: Vec<String>,
    pub calscale: Option<String>,
    pub encoding: Option<Encoding>,
    pub charset: Option<String>,
    pub alt_id: Option<String>,
    pub media_type: Option<String>,
    pub label: Option<String>,
    pub context: Option<String>,
    /// ISO 3166 country code (RFC 8605 `CC`).
    pub cc: Option<String>,
    /// Position among same-named properties (RFC 6715 `INDEX`).
    pub index: Option<u32>,
    pub level: Option<Level>,
    /// Unrecognised and vendor parameters, in order of appearance.
    pub extra: Vec<VCardParameter>,
}

impl Parameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether this property has the specified TYPE value (case-insensitive).
    #[must_use]
    pub fn has_type(&self, type_value: &str) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case(type_value))
    }

    /// Adds a TYPE value unless it is already present.
    pub fn add_type(&mut self, type_value: impl Into<String>) {
        let type_value = type_value.into();
        if !self.has_type(&type_value) {
            self.types.push(type_value);
        }
    }

    /// Returns the first residual parameter with the given name.
    #[must_use]
    pub fn get_extra(&self, name: &str) -> Option<&VCardParameter> {
        self.extra.iter().find(|p| p.is_named(name))
    }

    /// Appends a residual parameter.
    pub fn add_extra(&mut self, param: VCardParameter) {
        self.extra.push(param);
    }

    /// Whether the value is declared as Quoted-Printable.
    #[must_use]
    pub fn is_quoted_printable(&self) -> bool {
        self.encoding == Some(Encoding::QuotedPrintable)
    }

    /// Whether the value is declared as Base64 (`BASE64` or `b`).
    #[must_use]
    pub fn is_base64(&self) -> bool {
        self.encoding.is_some_and(Encoding::is_base64)
    }
}

/// Common TYPE values as constants.
pub mod types {
    pub const HOME: &str = "home";
    pub const WORK: &str = "work";
    pub const PREF: &str = "pref";

    // Telephone types
    pub const VOICE: &str = "voice";
    pub const FAX: &str = "fax";
    pub const CELL: &str = "cell";
    pub const PAGER: &str = "pager";

    // Image formats used by 2.1 PHOTO/LOGO
    pub const JPEG: &str = "JPEG";
    pub const PNG: &str = "PNG";
    pub const GIF: &str = "GIF";
}
