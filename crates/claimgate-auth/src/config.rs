//! Token settings
//!
//! [`JwtSettings`] is loaded once at startup and treated as immutable. The
//! [`JwtAuthenticator`](crate::JwtAuthenticator) may swap in a whole new
//! snapshot, but never mutates one in place.

use chrono::Duration;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};
use crate::identity::DEFAULT_AUTHENTICATION_SCHEME;
use crate::jwt::ValidationConfig;

/// Default token lifetime in minutes
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: u32 = 30;

/// Issuer and signing settings for HS256 bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtSettings {
    /// Value written to the `iss` claim
    #[serde(default)]
    pub issuer: String,

    /// HMAC secret (zeroized on drop, redacted in `Debug`)
    #[serde(
        default = "empty_secret",
        serialize_with = "serialize_secret",
        deserialize_with = "deserialize_secret"
    )]
    pub sign_key: SecretString,

    /// Tag verified identities with the authentication scheme
    #[serde(default)]
    pub include_authentication_scheme: bool,

    /// Scheme name recorded on identities and tickets
    #[serde(default = "default_authentication_scheme")]
    pub authentication_scheme: String,

    /// Lifetime of issued tokens
    #[serde(default = "default_token_lifetime_minutes")]
    pub token_lifetime_minutes: u32,

    /// Roles written into tokens when the caller supplies none
    ///
    /// Accepts a list or a comma-separated string.
    #[serde(default = "default_roles", deserialize_with = "deserialize_roles")]
    pub default_roles: Vec<String>,

    /// Time and issuer checks applied after signature verification
    #[serde(default)]
    pub validation: ValidationConfig,
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_authentication_scheme() -> String {
    DEFAULT_AUTHENTICATION_SCHEME.to_string()
}

fn default_token_lifetime_minutes() -> u32 {
    DEFAULT_TOKEN_LIFETIME_MINUTES
}

fn default_roles() -> Vec<String> {
    vec!["Admin".to_string(), "Users".to_string()]
}

fn deserialize_roles<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RoleList {
        List(Vec<String>),
        Csv(String),
    }

    Ok(match RoleList::deserialize(deserializer)? {
        RoleList::List(roles) => roles,
        RoleList::Csv(roles) => roles
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

fn serialize_secret<S>(secret: &SecretString, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(secret.expose_secret())
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<SecretString, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Ok(SecretString::new(s))
}

impl JwtSettings {
    /// Create settings with defaults for everything but issuer and key
    pub fn new(issuer: impl Into<String>, sign_key: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            sign_key: SecretString::new(sign_key.into()),
            include_authentication_scheme: false,
            authentication_scheme: default_authentication_scheme(),
            token_lifetime_minutes: DEFAULT_TOKEN_LIFETIME_MINUTES,
            default_roles: default_roles(),
            validation: ValidationConfig::default(),
        }
    }

    /// Set whether identities carry the authentication scheme
    pub fn with_authentication_scheme_included(mut self, include: bool) -> Self {
        self.include_authentication_scheme = include;
        self
    }

    /// Override the scheme name
    pub fn with_authentication_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.authentication_scheme = scheme.into();
        self
    }

    /// Override the token lifetime
    pub fn with_token_lifetime_minutes(mut self, minutes: u32) -> Self {
        self.token_lifetime_minutes = minutes;
        self
    }

    /// Override the default roles
    pub fn with_default_roles(mut self, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.default_roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Override the post-verification checks
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    /// Raw HMAC key bytes
    pub fn sign_key_bytes(&self) -> &[u8] {
        self.sign_key.expose_secret().as_bytes()
    }

    /// Lifetime of issued tokens
    pub fn token_lifetime(&self) -> Duration {
        Duration::minutes(i64::from(self.token_lifetime_minutes))
    }

    /// Check the settings are usable
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the signing key is empty, the
    /// token lifetime is zero, or the scheme name is blank.
    pub fn validate(&self) -> Result<()> {
        if self.sign_key.expose_secret().is_empty() {
            return Err(AuthError::Configuration(
                "sign_key must not be empty".to_string(),
            ));
        }
        if self.token_lifetime_minutes == 0 {
            return Err(AuthError::Configuration(
                "token_lifetime_minutes must be greater than zero".to_string(),
            ));
        }
        if self.authentication_scheme.trim().is_empty() {
            return Err(AuthError::Configuration(
                "authentication_scheme must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}
