//! Config parsing, validation, and policy resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod error;
mod keys;
mod model;
mod resolve;

pub use error::ConfigError;
pub use model::{
    AdvisoriesConfig, BansConfig, DepauditConfigV1, LicenseExceptionConfig, LicensesConfig,
    PrivateConfig, SourcesConfig,
};
pub use resolve::{
    AdvisoryDbSettings, DEFAULT_FETCH_TIMEOUT_SECS, Overrides, ResolvedConfig, SCHEMA_CONFIG_V1,
};

/// Parse `depaudit.toml` into a typed model, rejecting unknown keys by path.
pub fn parse_config_toml(input: &str) -> Result<DepauditConfigV1, ConfigError> {
    let table: toml::Table = toml::from_str(input).map_err(parse_error)?;
    keys::check_known_keys(&table)?;
    let cfg: DepauditConfigV1 = toml::from_str(input).map_err(parse_error)?;
    Ok(cfg)
}

/// Resolve the immutable policy (plus advisory database settings) used by the engine.
pub fn resolve_config(
    cfg: DepauditConfigV1,
    overrides: Overrides,
) -> Result<ResolvedConfig, ConfigError> {
    resolve::resolve_config(cfg, overrides)
}

fn parse_error(err: toml::de::Error) -> ConfigError {
    ConfigError::Parse {
        message: err.to_string().trim_end().to_string(),
    }
}
