//! Principals and authentication tickets

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::claims::Claim;
use crate::identity::ClaimsIdentity;

/// The authenticated entity a request acts as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimsPrincipal {
    identity: ClaimsIdentity,
}

impl ClaimsPrincipal {
    /// Wrap an identity
    pub fn new(identity: ClaimsIdentity) -> Self {
        Self { identity }
    }

    /// The primary identity
    pub fn identity(&self) -> &ClaimsIdentity {
        &self.identity
    }

    /// Consume the principal, returning its identity
    pub fn into_identity(self) -> ClaimsIdentity {
        self.identity
    }

    /// Claims of the primary identity
    pub fn claims(&self) -> &[Claim] {
        self.identity.claims()
    }

    /// See [`ClaimsIdentity::is_authenticated`]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_authenticated()
    }

    /// See [`ClaimsIdentity::has_role`]
    pub fn has_role(&self, role: &str) -> bool {
        self.identity.has_role(role)
    }

    /// See [`ClaimsIdentity::has_any_role`]
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        self.identity.has_any_role(roles)
    }

    /// See [`ClaimsIdentity::has_all_roles`]
    pub fn has_all_roles(&self, roles: &[&str]) -> bool {
        self.identity.has_all_roles(roles)
    }

    /// See [`ClaimsIdentity::find_first`]
    pub fn find_first(&self, claim_type: &str) -> Option<&Claim> {
        self.identity.find_first(claim_type)
    }

    /// See [`ClaimsIdentity::has_claim`]
    pub fn has_claim(&self, claim_type: &str, value: &str) -> bool {
        self.identity.has_claim(claim_type, value)
    }

    /// See [`ClaimsIdentity::name`]
    pub fn name(&self) -> Option<&str> {
        self.identity.name()
    }
}

impl From<ClaimsIdentity> for ClaimsPrincipal {
    fn from(identity: ClaimsIdentity) -> Self {
        Self::new(identity)
    }
}

/// Metadata attached to an authentication result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthenticationProperties {
    /// When the token was issued (`iat`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_utc: Option<DateTime<Utc>>,
    /// When the token expires (`exp`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_utc: Option<DateTime<Utc>>,
    /// Free-form items
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub items: BTreeMap<String, String>,
}

impl AuthenticationProperties {
    /// Properties with token timestamps (Unix seconds); out-of-range values are dropped
    pub fn from_timestamps(issued_at: Option<i64>, expires_at: Option<i64>) -> Self {
        Self {
            issued_utc: issued_at.and_then(|t| DateTime::from_timestamp(t, 0)),
            expires_utc: expires_at.and_then(|t| DateTime::from_timestamp(t, 0)),
            items: BTreeMap::new(),
        }
    }

    /// Add an item
    pub fn with_item(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.insert(key.into(), value.into());
        self
    }
}

/// A principal bound to the scheme that authenticated it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationTicket {
    principal: ClaimsPrincipal,
    properties: AuthenticationProperties,
    authentication_scheme: String,
}

impl AuthenticationTicket {
    /// Create a ticket
    pub fn new(
        principal: ClaimsPrincipal,
        properties: AuthenticationProperties,
        authentication_scheme: impl Into<String>,
    ) -> Self {
        Self {
            principal,
            properties,
            authentication_scheme: authentication_scheme.into(),
        }
    }

    /// Wrap `identity` in a principal and bind it to `scheme` with default properties
    pub fn assemble(identity: ClaimsIdentity, scheme: impl Into<String>) -> Self {
        Self::new(
            ClaimsPrincipal::new(identity),
            AuthenticationProperties::default(),
            scheme,
        )
    }

    /// Replace the properties
    pub fn with_properties(mut self, properties: AuthenticationProperties) -> Self {
        self.properties = properties;
        self
    }

    /// The authenticated principal
    pub fn principal(&self) -> &ClaimsPrincipal {
        &self.principal
    }

    /// Consume the ticket, returning the principal
    pub fn into_principal(self) -> ClaimsPrincipal {
        self.principal
    }

    /// Ticket metadata
    pub fn properties(&self) -> &AuthenticationProperties {
        &self.properties
    }

    /// Scheme that produced the ticket
    pub fn authentication_scheme(&self) -> &str {
        &self.authentication_scheme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble() {
        let identity = ClaimsIdentity::with_authentication_type(
            vec![Claim::new("role", "Admin"), Claim::new("sub", "alice")],
            "Bearer",
        );
        let ticket = AuthenticationTicket::assemble(identity.clone(), "Bearer");

        assert_eq!(ticket.authentication_scheme(), "Bearer");
        assert_eq!(ticket.principal().identity(), &identity);
        assert_eq!(ticket.properties(), &AuthenticationProperties::default());
        assert!(ticket.principal().has_role("Admin"));
        assert_eq!(ticket.principal().name(), Some("alice"));
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let identity = ClaimsIdentity::new(vec![Claim::new("sub", "bob")]);
        assert_eq!(
            AuthenticationTicket::assemble(identity.clone(), "Bearer"),
            AuthenticationTicket::assemble(identity, "Bearer")
        );
    }

    #[test]
    fn test_properties_from_timestamps() {
        let props = AuthenticationProperties::from_timestamps(Some(1_700_000_000), None)
            .with_item("jti", "abc");
        assert_eq!(
            props.issued_utc.map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
        assert!(props.expires_utc.is_none());
        assert_eq!(props.items.get("jti").map(String::as_str), Some("abc"));
    }
}
