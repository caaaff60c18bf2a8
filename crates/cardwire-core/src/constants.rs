/// Format constants shared across crates
pub const VCARD_COMPONENT: &str = "VCARD";
pub const BEGIN_VCARD: &str = const_str::concat!("BEGIN:", VCARD_COMPONENT);
pub const END_VCARD: &str = const_str::concat!("END:", VCARD_COMPONENT);

/// Canonical line terminator, independent of the host platform.
pub const CRLF: &str = "\r\n";

/// Maximum content line length in octets before folding (RFC 6350 §3.2).
pub const FOLD_LINE_OCTETS: usize = 75;

/// Maximum encoded line length for Quoted-Printable (RFC 2045 §6.7).
pub const QP_LINE_LENGTH: usize = 76;

pub const DEFAULT_CHARSET: &str = "UTF-8";
