//! vCard version tag.

use serde::Serialize;

/// vCard version.
///
/// Escaping, folding and default encodings all differ per version, so the
/// tag travels with every codec call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum VCardVersion {
    /// vCard 2.1 (versit consortium).
    #[default]
    #[serde(rename = "2.1")]
    V2_1,
    /// vCard 3.0 (RFC 2426).
    #[serde(rename = "3.0")]
    V3,
    /// vCard 4.0 (RFC 6350).
    #[serde(rename = "4.0")]
    V4,
}

impl VCardVersion {
    /// Interprets the value of a `VERSION` line.
    ///
    /// Best effort: anything mentioning 2.1 is 2.1, anything starting with
    /// 3 is 3.0, everything else is treated as 4.0.
    #[must_use]
    pub fn detect(value: &str) -> Self {
        let value = value.trim();
        if value.contains("2.1") {
            Self::V2_1
        } else if value.starts_with('3') {
            Self::V3
        } else {
            Self::V4
        }
    }

    /// Returns the version string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V2_1 => "2.1",
            Self::V3 => "3.0",
            Self::V4 => "4.0",
        }
    }

    /// Whether continuation lines keep their leading whitespace when unfolded.
    #[must_use]
    pub const fn keeps_fold_whitespace(self) -> bool {
        matches!(self, Self::V2_1)
    }
}

impl core::str::FromStr for VCardVersion {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2.1" => Ok(Self::V2_1),
            "3.0" => Ok(Self::V3),
            "4.0" => Ok(Self::V4),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for VCardVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
