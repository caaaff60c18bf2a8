//! Parameter value vocabularies.
//!
//! Each type only carries its parsing contract and its wire spelling.

use serde::Serialize;

/// `ENCODING` parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    QuotedPrintable,
    /// vCard 2.1 spelling of Base64.
    Base64,
    /// vCard 3.0 spelling of Base64 (`ENCODING=b`).
    B,
    EightBit,
    SevenBit,
}

impl Encoding {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QUOTED-PRINTABLE" => Some(Self::QuotedPrintable),
            "BASE64" => Some(Self::Base64),
            "B" => Some(Self::B),
            "8BIT" => Some(Self::EightBit),
            "7BIT" => Some(Self::SevenBit),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QuotedPrintable => "QUOTED-PRINTABLE",
            Self::Base64 => "BASE64",
            Self::B => "b",
            Self::EightBit => "8BIT",
            Self::SevenBit => "7BIT",
        }
    }

    /// Whether the value is Base64 text, in either spelling.
    #[must_use]
    pub const fn is_base64(self) -> bool {
        matches!(self, Self::Base64 | Self::B)
    }
}

/// `VALUE` parameter data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    Text,
    Uri,
    Date,
    Time,
    DateTime,
    DateAndOrTime,
    Timestamp,
    Boolean,
    Integer,
    Float,
    UtcOffset,
    LanguageTag,
    /// vCard 3.0 only.
    Binary,
    /// vCard 3.0 only.
    PhoneNumber,
    /// vCard 3.0 `AGENT;VALUE=vcard`.
    Vcard,
}

impl ValueType {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "uri" => Some(Self::Uri),
            "date" => Some(Self::Date),
            "time" => Some(Self::Time),
            "date-time" => Some(Self::DateTime),
            "date-and-or-time" => Some(Self::DateAndOrTime),
            "timestamp" => Some(Self::Timestamp),
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            "float" => Some(Self::Float),
            "utc-offset" => Some(Self::UtcOffset),
            "language-tag" => Some(Self::LanguageTag),
            "binary" => Some(Self::Binary),
            "phone-number" => Some(Self::PhoneNumber),
            "vcard" => Some(Self::Vcard),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Uri => "uri",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "date-time",
            Self::DateAndOrTime => "date-and-or-time",
            Self::Timestamp => "timestamp",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::UtcOffset => "utc-offset",
            Self::LanguageTag => "language-tag",
            Self::Binary => "binary",
            Self::PhoneNumber => "phone-number",
            Self::Vcard => "vcard",
        }
    }
}

/// vCard 2.1 `VALUE` parameter values that say where the data lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentLocation {
    Inline,
    Url,
    ContentId,
}

impl ContentLocation {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INLINE" => Some(Self::Inline),
            "URL" => Some(Self::Url),
            "CONTENT-ID" | "CID" => Some(Self::ContentId),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "INLINE",
            Self::Url => "URL",
            Self::ContentId => "CONTENT-ID",
        }
    }
}

/// `LEVEL` parameter (RFC 6715): expertise for `EXPERTISE`, interest for
/// `HOBBY` and `INTEREST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Average,
    Expert,
    High,
    Medium,
    Low,
}

impl Level {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "average" => Some(Self::Average),
            "expert" => Some(Self::Expert),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Average => "average",
            Self::Expert => "expert",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// One `PID` parameter value: `local[.client]` (RFC 6350 §5.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PropertyId {
    /// Identifier of the property instance within the card.
    pub local_id: u32,
    /// `CLIENTPIDMAP` source id of the application that assigned it.
    pub client_id: Option<u32>,
}

impl PropertyId {
    #[must_use]
    pub const fn new(local_id: u32, client_id: Option<u32>) -> Self {
        Self {
            local_id,
            client_id,
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.split_once('.') {
            Some((local, client)) => Some(Self::new(local.parse().ok()?, Some(client.parse().ok()?))),
            None => Some(Self::new(s.parse().ok()?, None)),
        }
    }
}

impl std::fmt::Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.client_id {
            Some(client) => write!(f, "{}.{client}", self.local_id),
            None => write!(f, "{}", self.local_id),
        }
    }
}

/// Charset names recognised as bare 2.1 parameter tokens.
pub const KNOWN_CHARSETS: &[&str] = &[
    "UTF-8",
    "UTF-16",
    "US-ASCII",
    "ISO-8859-1",
    "ISO-8859-2",
    "ISO-8859-15",
    "WINDOWS-1250",
    "WINDOWS-1251",
    "WINDOWS-1252",
    "SHIFT_JIS",
    "EUC-JP",
    "ISO-2022-JP",
    "GB2312",
    "BIG5",
    "KOI8-R",
];
