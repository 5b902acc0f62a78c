//! Error types for CLI operations

use claimgate_auth::AuthError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Token issuance or verification failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Settings could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    /// JSON output failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The verified identity lacks the requested role
    #[error("'{principal}' does not hold role '{role}'")]
    RoleMissing {
        /// Requested role
        role: String,
        /// Principal name, or `<anonymous>`
        principal: String,
    },
}

impl CliError {
    /// User-facing hints for resolving the error
    pub fn suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Auth(AuthError::Configuration(_)) => vec![
                "Set sign_key in claimgate.toml or CLAIMGATE_SIGN_KEY",
                "Use --config to point at a settings file",
            ],
            Self::Auth(AuthError::SignatureInvalid) => vec![
                "Check the token was issued with the same signing key",
            ],
            Self::Auth(e) if e.is_lifetime_failure() => vec![
                "Issue a new token",
                "Use --leeway to tolerate clock skew",
            ],
            Self::Auth(AuthError::MalformedToken(_)) => vec![
                "Pass the complete token (header.payload.signature)",
            ],
            Self::Config(_) => vec!["Check the settings file syntax and CLAIMGATE_* variables"],
            _ => vec![],
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
