//! Claims-based identities
//!
//! A [`ClaimsIdentity`] is built fresh from every verified claim set and
//! dropped with the request that created it. The [`IdentityBuilder`] does
//! shape dispatch only:
//!
//! | Payload value | Claims emitted |
//! |---------------|----------------|
//! | `"x"` | one claim |
//! | `["a", "b"]` | one claim per element, in order |
//! | `[]` | none |
//! | numbers, booleans, objects, mixed arrays | none |
//!
//! Claim types are never interpreted here; `role` and `sub` go through the
//! same path as any other string claim.

use crate::claims::{Claim, ClaimSet, ClaimValue, claim_types};
use crate::config::JwtSettings;

/// Scheme name recorded on identities when none is configured
pub const DEFAULT_AUTHENTICATION_SCHEME: &str = "Bearer";

/// An ordered set of claims with an optional authentication scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimsIdentity {
    claims: Vec<Claim>,
    authentication_type: Option<String>,
    name_claim_type: String,
    role_claim_type: String,
}

impl ClaimsIdentity {
    /// Identity without an authentication scheme
    pub fn new(claims: Vec<Claim>) -> Self {
        Self {
            claims,
            authentication_type: None,
            name_claim_type: claim_types::NAME.to_string(),
            role_claim_type: claim_types::ROLE.to_string(),
        }
    }

    /// Identity tagged with an authentication scheme
    pub fn with_authentication_type(claims: Vec<Claim>, scheme: impl Into<String>) -> Self {
        Self {
            authentication_type: Some(scheme.into()),
            ..Self::new(claims)
        }
    }

    /// Change which claim type answers [`ClaimsIdentity::name`]
    pub fn with_name_claim_type(mut self, claim_type: impl Into<String>) -> Self {
        self.name_claim_type = claim_type.into();
        self
    }

    /// Change which claim type counts as a role (in addition to the aliases)
    pub fn with_role_claim_type(mut self, claim_type: impl Into<String>) -> Self {
        self.role_claim_type = claim_type.into();
        self
    }

    /// Claims in insertion order
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Consume the identity, returning its claims
    pub fn into_claims(self) -> Vec<Claim> {
        self.claims
    }

    /// Append a claim
    pub fn add_claim(&mut self, claim: Claim) {
        self.claims.push(claim);
    }

    /// Authentication scheme, if the identity was tagged with one
    pub fn authentication_type(&self) -> Option<&str> {
        self.authentication_type.as_deref()
    }

    /// Whether the identity counts as authenticated
    ///
    /// Only identities tagged with a scheme do; claim content is irrelevant.
    pub fn is_authenticated(&self) -> bool {
        self.authentication_type.is_some()
    }

    /// Claim type used for the principal name
    pub fn name_claim_type(&self) -> &str {
        &self.name_claim_type
    }

    /// Claim type used for roles
    pub fn role_claim_type(&self) -> &str {
        &self.role_claim_type
    }
}

/// Turns a verified claim set into a [`ClaimsIdentity`]
#[derive(Debug, Clone)]
pub struct IdentityBuilder {
    include_authentication_scheme: bool,
    scheme: String,
}

impl Default for IdentityBuilder {
    fn default() -> Self {
        Self::new(false)
    }
}

impl IdentityBuilder {
    /// Create a builder; `include_authentication_scheme` tags built identities
    /// with [`DEFAULT_AUTHENTICATION_SCHEME`]
    pub fn new(include_authentication_scheme: bool) -> Self {
        Self {
            include_authentication_scheme,
            scheme: DEFAULT_AUTHENTICATION_SCHEME.to_string(),
        }
    }

    /// Builder configured from settings
    pub fn from_settings(settings: &JwtSettings) -> Self {
        Self::new(settings.include_authentication_scheme)
            .with_scheme(settings.authentication_scheme.clone())
    }

    /// Override the scheme name
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Scheme name recorded when tagging is enabled
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Flatten a payload into claims
    ///
    /// An absent or empty payload yields no claims.
    pub fn claims(payload: Option<&ClaimSet>) -> Vec<Claim> {
        let Some(payload) = payload else {
            return Vec::new();
        };

        let mut claims = Vec::with_capacity(payload.len());
        for (claim_type, value) in payload.iter() {
            match value {
                ClaimValue::Scalar(v) => claims.push(Claim::new(claim_type, v.as_str())),
                ClaimValue::Sequence(values) => claims.extend(
                    values
                        .iter()
                        .map(|v| Claim::new(claim_type, v.as_str())),
                ),
                ClaimValue::NumericDate(_) | ClaimValue::Other(_) => {}
            }
        }
        claims
    }

    /// Build an identity from a payload
    pub fn build(&self, payload: Option<&ClaimSet>) -> ClaimsIdentity {
        let claims = Self::claims(payload);
        if self.include_authentication_scheme {
            ClaimsIdentity::with_authentication_type(claims, self.scheme.clone())
        } else {
            ClaimsIdentity::new(claims)
        }
    }
}
