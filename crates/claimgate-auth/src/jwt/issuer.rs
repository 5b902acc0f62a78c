//! Token issuance
//!
//! Builds the claim set written for a signed-in user and signs it. Claims are
//! written in a fixed order: `jti`, `iss`, `sub`, `exp`, `nbf`, `iat`, `role`,
//! `name`.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use super::codec;
use crate::claims::{ClaimSet, claim_types};
use crate::config::JwtSettings;
use crate::error::Result;

/// Issues signed tokens for a username
///
/// # Example
///
/// ```rust
/// use claimgate_auth::{JwtSettings, jwt::TokenIssuer};
///
/// let settings = JwtSettings::new("JwtAuthDemo", "0123456789abcdef0123456789abcdef");
/// let token = TokenIssuer::new(&settings)
///     .with_roles(["Admin"])
///     .issue("alice")?;
///
/// assert_eq!(token.split('.').count(), 3);
/// # Ok::<(), claimgate_auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TokenIssuer<'a> {
    settings: &'a JwtSettings,
    lifetime: Duration,
    roles: Vec<String>,
}

impl<'a> TokenIssuer<'a> {
    /// Create an issuer using the configured lifetime and default roles
    pub fn new(settings: &'a JwtSettings) -> Self {
        Self {
            settings,
            lifetime: settings.token_lifetime(),
            roles: settings.default_roles.clone(),
        }
    }

    /// Override the token lifetime
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Override the roles written into the token
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Claim set for `username` as of `now`
    ///
    /// A fresh `jti` is generated on every call.
    pub fn claims_for(&self, username: &str, now: DateTime<Utc>) -> ClaimSet {
        let issued_at = now.timestamp();

        ClaimSet::new()
            .with(claim_types::JTI, Uuid::new_v4().to_string())
            .with(claim_types::ISS, self.settings.issuer.as_str())
            .with(claim_types::SUB, username)
            .with(claim_types::EXP, (now + self.lifetime).timestamp())
            .with(claim_types::NBF, issued_at)
            .with(claim_types::IAT, issued_at)
            .with(claim_types::ROLE, self.roles.clone())
            .with(claim_types::NAME, username)
    }

    /// Issue a token valid from now
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`](crate::AuthError::Configuration)
    /// if the signing key is empty.
    pub fn issue(&self, username: &str) -> Result<String> {
        self.issue_at(username, Utc::now())
    }

    /// Issue a token as of `now`
    ///
    /// # Errors
    ///
    /// Same as [`TokenIssuer::issue`].
    pub fn issue_at(&self, username: &str, now: DateTime<Utc>) -> Result<String> {
        let claims = self.claims_for(username, now);
        let token = codec::encode(&claims, self.settings.sign_key_bytes())?;

        debug!(
            subject = username,
            jti = claims.jwt_id().unwrap_or_default(),
            expires_at = claims.expires_at().unwrap_or_default(),
            "Issued token"
        );

        Ok(token)
    }
}
