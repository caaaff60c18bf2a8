//! Property names and the value shape each one uses on the wire.

/// How a property's value is laid out between the separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// Single escaped text value.
    Text,
    /// `,`-separated escaped text values.
    List,
    /// `;`-separated components, each a `,`-separated list.
    Structured,
    /// Written without escaping (URIs, dates, identifiers).
    Raw,
    /// Inline binary payload or a reference to one.
    Binary,
    /// A complete nested vCard (2.1/3.0 `AGENT`).
    Embedded,
}

impl ValueShape {
    /// Returns the default shape for a property name.
    #[must_use]
    pub fn of(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            names::N | names::ADR | names::ORG | names::GENDER | names::CLIENTPIDMAP => {
                Self::Structured
            }
            names::CATEGORIES | names::NICKNAME => Self::List,
            names::PHOTO | names::LOGO | names::SOUND | names::KEY => Self::Binary,
            names::AGENT => Self::Embedded,
            names::URL
            | names::UID
            | names::BDAY
            | names::ANNIVERSARY
            | names::REV
            | names::GEO
            | names::TZ
            | names::SOURCE
            | names::MEMBER
            | names::RELATED
            | names::IMPP
            | names::FBURL
            | names::CALADRURI
            | names::CALURI
            | names::LANG
            | names::KIND
            | names::VERSION => Self::Raw,
            _ => Self::Text,
        }
    }
}

/// Common property names as constants.
pub mod names {
    // Identification properties
    pub const FN: &str = "FN";
    pub const N: &str = "N";
    pub const NICKNAME: &str = "NICKNAME";
    pub const PHOTO: &str = "PHOTO";
    pub const BDAY: &str = "BDAY";
    pub const ANNIVERSARY: &str = "ANNIVERSARY";
    pub const GENDER: &str = "GENDER";

    // Delivery addressing
    pub const ADR: &str = "ADR";
    pub const LABEL: &str = "LABEL";

    // Communications
    pub const TEL: &str = "TEL";
    pub const EMAIL: &str = "EMAIL";
    pub const IMPP: &str = "IMPP";
    pub const LANG: &str = "LANG";

    // Geographical
    pub const TZ: &str = "TZ";
    pub const GEO: &str = "GEO";

    // Organizational
    pub const TITLE: &str = "TITLE";
    pub const ROLE: &str = "ROLE";
    pub const LOGO: &str = "LOGO";
    pub const AGENT: &str = "AGENT";
    pub const ORG: &str = "ORG";
    pub const MEMBER: &str = "MEMBER";
    pub const RELATED: &str = "RELATED";

    // Explanatory
    pub const CATEGORIES: &str = "CATEGORIES";
    pub const NOTE: &str = "NOTE";
    pub const PRODID: &str = "PRODID";
    pub const REV: &str = "REV";
    pub const SOUND: &str = "SOUND";
    pub const UID: &str = "UID";
    pub const CLIENTPIDMAP: &str = "CLIENTPIDMAP";
    pub const URL: &str = "URL";

    // Security
    pub const KEY: &str = "KEY";

    // Calendar
    pub const FBURL: &str = "FBURL";
    pub const CALADRURI: &str = "CALADRURI";
    pub const CALURI: &str = "CALURI";

    // General/structural
    pub const BEGIN: &str = "BEGIN";
    pub const END: &str = "END";
    pub const VERSION: &str = "VERSION";
    pub const SOURCE: &str = "SOURCE";
    pub const KIND: &str = "KIND";
}
