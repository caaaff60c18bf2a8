//! VCF (vCard 2.1 / 3.0 / 4.0) reading and writing.
//!
//! See [`rfc::vcard`] for the codec pipeline.

pub mod error;
pub mod rfc;
