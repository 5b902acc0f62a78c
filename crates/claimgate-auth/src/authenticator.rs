//! Bearer token authenticator
//!
//! [`JwtAuthenticator`] ties issuance, verification, identity building and
//! ticket assembly to one settings snapshot. Settings can be replaced at
//! runtime with [`JwtAuthenticator::reload`]; a call that already loaded the
//! previous snapshot finishes with it.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, info};

use crate::challenge::extract_bearer;
use crate::claims::ClaimSet;
use crate::config::JwtSettings;
use crate::error::Result;
use crate::identity::{ClaimsIdentity, IdentityBuilder};
use crate::jwt::{TokenIssuer, codec, validation};
use crate::ticket::AuthenticationTicket;

/// Issues and verifies HS256 bearer tokens
#[derive(Debug)]
pub struct JwtAuthenticator {
    settings: ArcSwap<JwtSettings>,
}

impl JwtAuthenticator {
    /// Create an authenticator
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`](crate::AuthError::Configuration)
    /// if the settings fail [`JwtSettings::validate`].
    pub fn new(settings: JwtSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings: ArcSwap::from_pointee(settings),
        })
    }

    /// Current settings snapshot
    pub fn settings(&self) -> Arc<JwtSettings> {
        self.settings.load_full()
    }

    /// Replace the settings
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`](crate::AuthError::Configuration)
    /// and keeps the current settings if the new ones are unusable.
    pub fn reload(&self, settings: JwtSettings) -> Result<()> {
        settings.validate()?;
        info!(issuer = %settings.issuer, "Reloading token settings");
        self.settings.store(Arc::new(settings));
        Ok(())
    }

    /// Issue a token for `username` with the configured default roles
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be signed.
    pub fn issue_token(&self, username: &str) -> Result<String> {
        let settings = self.settings.load();
        TokenIssuer::new(&settings).issue(username)
    }

    /// Issue a token for `username` carrying `roles`
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be signed.
    pub fn issue_token_with_roles(
        &self,
        username: &str,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<String> {
        let settings = self.settings.load();
        TokenIssuer::new(&settings).with_roles(roles).issue(username)
    }

    /// Verify a token and run the configured post-verification checks
    ///
    /// # Errors
    ///
    /// Any token failure from [`codec::decode`] or [`validation::validate`].
    pub fn decode(&self, token: &str) -> Result<ClaimSet> {
        let settings = self.settings.load();
        Self::decode_with(&settings, token)
    }

    fn decode_with(settings: &JwtSettings, token: &str) -> Result<ClaimSet> {
        let claims = codec::decode(token, settings.sign_key_bytes())?;
        validation::validate(&claims, &settings.validation)?;

        debug!(
            subject = claims.subject().unwrap_or_default(),
            jti = claims.jwt_id().unwrap_or_default(),
            "Token verified"
        );
        Ok(claims)
    }

    /// Verify a token and build its identity
    ///
    /// # Errors
    ///
    /// Same as [`JwtAuthenticator::decode`].
    pub fn verify_token(&self, token: &str) -> Result<ClaimsIdentity> {
        let settings = self.settings.load();
        let claims = Self::decode_with(&settings, token)?;
        Ok(IdentityBuilder::from_settings(&settings).build(Some(&claims)))
    }

    /// Verify a token and assemble an authentication ticket
    ///
    /// The ticket carries default properties; token timestamps stay on the
    /// claim set returned by [`JwtAuthenticator::decode`].
    ///
    /// # Errors
    ///
    /// Same as [`JwtAuthenticator::decode`].
    pub fn authenticate(&self, token: &str) -> Result<AuthenticationTicket> {
        let settings = self.settings.load();
        let claims = Self::decode_with(&settings, token)?;
        Ok(Self::ticket_with(&settings, &claims))
    }

    /// Assemble a ticket from an already verified claim set
    pub fn ticket_for(&self, claims: &ClaimSet) -> AuthenticationTicket {
        let settings = self.settings.load();
        Self::ticket_with(&settings, claims)
    }

    fn ticket_with(settings: &JwtSettings, claims: &ClaimSet) -> AuthenticationTicket {
        let identity = IdentityBuilder::from_settings(settings).build(Some(claims));
        AuthenticationTicket::assemble(identity, settings.authentication_scheme.as_str())
    }

    /// Authenticate from an `Authorization` header value
    ///
    /// # Errors
    ///
    /// [`AuthError::MissingCredentials`](crate::AuthError::MissingCredentials)
    /// if the header is not a bearer credential, otherwise same as
    /// [`JwtAuthenticator::authenticate`].
    pub fn authenticate_header(&self, header_value: &str) -> Result<AuthenticationTicket> {
        let token = extract_bearer(header_value)?;
        self.authenticate(token)
    }
}
