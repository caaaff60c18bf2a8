use std::path::Path;

use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, FileFormat};
use serde::Deserialize;

use crate::constants::{FOLD_LINE_OCTETS, QP_LINE_LENGTH};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub codec: CodecConfig,
    pub logging: LoggingConfig,
}

/// What the tokenizer does with a bare 2.1 parameter token (`TEL;WORK:...`)
/// that is neither a known encoding, charset nor value location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BareParamPolicy {
    /// Keep it as a valueless non-standard parameter.
    #[default]
    Residual,
    /// Treat it as a `TYPE` value.
    Type,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodecConfig {
    /// Version assumed until a card's `VERSION` line says otherwise.
    pub default_version: String,
    pub fold_length: usize,
    pub qp_line_length: usize,
    pub fold_lines: bool,
    pub include_empty: bool,
    pub write_groups: bool,
    pub bare_params: BareParamPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    fn builder() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("codec.default_version", "2.1")?
            .set_default("codec.fold_length", i64::try_from(FOLD_LINE_OCTETS)?)?
            .set_default("codec.qp_line_length", i64::try_from(QP_LINE_LENGTH)?)?
            .set_default("codec.fold_lines", false)?
            .set_default("codec.include_empty", false)?
            .set_default("codec.write_groups", true)?
            .set_default("codec.bare_params", "residual")?
            .set_default("logging.level", "info")?)
    }

    /// ## Summary
    /// Loads configuration from an optional `cardwire.toml` (or the given file)
    /// and `CARDWIRE__*` environment variables. Environment variables take
    /// precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let builder = match file {
            Some(path) => Self::builder()?.add_source(config::File::from(path).required(true)),
            None => Self::builder()?
                .add_source(config::File::with_name("cardwire.toml").required(false)),
        };

        Ok(builder
            .add_source(
                config::Environment::with_prefix("CARDWIRE")
                    .prefix_separator("__")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Builds settings from a TOML document layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the document is not valid TOML or has the wrong shape.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(Self::builder()?
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables, `.env` and the config file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config(file: Option<&Path>) -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load(file)?;
    tracing::debug!(codec = ?settings.codec, "Configuration loaded");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn defaults_apply_without_sources() {
        let settings = Settings::from_toml_str("").unwrap();

        assert_eq!(settings.codec.default_version, "2.1");
        assert_eq!(settings.codec.fold_length, 75);
        assert_eq!(settings.codec.qp_line_length, 76);
        assert!(!settings.codec.fold_lines);
        assert!(settings.codec.write_groups);
        assert_eq!(settings.codec.bare_params, BareParamPolicy::Residual);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn toml_overrides_defaults() {
        let settings = Settings::from_toml_str(
            "[codec]\ndefault_version = \"4.0\"\nfold_lines = true\nbare_params = \"type\"\n\n[logging]\nlevel = \"trace\"\n",
        )
        .unwrap();

        assert_eq!(settings.codec.default_version, "4.0");
        assert!(settings.codec.fold_lines);
        assert_eq!(settings.codec.bare_params, BareParamPolicy::Type);
        assert_eq!(settings.logging.level, "trace");
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let result = Settings::from_toml_str("[codec]\nbare_params = \"sometimes\"\n");
        assert!(result.is_err());
    }
}
