use thiserror::Error;

use crate::rfc::vcard::parse::ParseError;

/// Codec errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Base64 error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    CoreError(#[from] cardwire_core::error::CoreError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
