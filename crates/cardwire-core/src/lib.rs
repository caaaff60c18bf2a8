//! Shared building blocks for the cardwire crates: the core error type,
//! layered configuration and the VCF format constants.

pub mod config;
pub mod constants;
pub mod error;
