//! Settings loading
//!
//! Sources, later ones winning:
//!
//! 1. Built-in defaults (the serde defaults of [`JwtSettings`])
//! 2. `--config <path>`, or `claimgate.{toml,json,yaml}` in the working directory if present
//! 3. `CLAIMGATE_*` environment variables, nested with `__`
//!    (`CLAIMGATE_VALIDATION__LEEWAY_SECONDS=30`); `CLAIMGATE_DEFAULT_ROLES`
//!    takes a comma-separated list
//!
//! Environment values stay strings until [`JwtSettings`] deserializes them, so
//! a key like `0012` or an issuer like `1e3` is kept exactly as written.

use std::path::Path;

use claimgate_auth::JwtSettings;
use config::{Config, Environment, File};
use tracing::debug;

use crate::error::CliResult;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CLAIMGATE";

/// Settings file looked up in the working directory
pub const DEFAULT_CONFIG_NAME: &str = "claimgate";

/// Environment source for `CLAIMGATE_*` variables
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

/// Load settings from the file and process environment
///
/// # Errors
///
/// Returns [`CliError::Config`](crate::CliError::Config) if an explicit file
/// is missing or any source fails to parse.
pub fn load_settings(path: Option<&Path>) -> CliResult<JwtSettings> {
    load_settings_with(path, environment())
}

/// Load settings from the file and the given environment source
///
/// # Errors
///
/// Same as [`load_settings`].
pub fn load_settings_with(path: Option<&Path>, env: Environment) -> CliResult<JwtSettings> {
    let file = match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading settings file");
            File::from(path).required(true)
        }
        None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let settings = Config::builder()
        .add_source(file)
        .add_source(env)
        .build()?
        .try_deserialize::<JwtSettings>()?;

    Ok(settings)
}
