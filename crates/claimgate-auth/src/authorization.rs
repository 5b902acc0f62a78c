//! Authorization predicates
//!
//! Role and claim queries over a [`ClaimsIdentity`], plus declarative
//! [`Policy`] checks over a [`ClaimsPrincipal`]. All comparisons are exact and
//! case-sensitive.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::claims::{Claim, claim_types};
use crate::error::{AuthError, Result};
use crate::identity::ClaimsIdentity;
use crate::ticket::ClaimsPrincipal;

impl ClaimsIdentity {
    fn is_role_type(&self, claim_type: &str) -> bool {
        claim_type == self.role_claim_type() || claim_types::ROLE_ALIASES.contains(&claim_type)
    }

    /// Check if the identity carries a role
    pub fn has_role(&self, role: &str) -> bool {
        self.claims()
            .iter()
            .any(|c| c.value == role && self.is_role_type(&c.claim_type))
    }

    /// Check if the identity carries any of the roles
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|r| self.has_role(r))
    }

    /// Check if the identity carries all of the roles
    pub fn has_all_roles(&self, roles: &[&str]) -> bool {
        roles.iter().all(|r| self.has_role(r))
    }

    /// All role values, in claim order
    pub fn roles(&self) -> Vec<&str> {
        self.claims()
            .iter()
            .filter(|c| self.is_role_type(&c.claim_type))
            .map(|c| c.value.as_str())
            .collect()
    }

    /// First claim of a type, in insertion order
    pub fn find_first(&self, claim_type: &str) -> Option<&Claim> {
        self.claims().iter().find(|c| c.claim_type == claim_type)
    }

    /// All values of a claim type, in insertion order
    pub fn find_all(&self, claim_type: &str) -> Vec<&str> {
        self.claims()
            .iter()
            .filter(|c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
            .collect()
    }

    /// Check for an exact `(type, value)` claim
    pub fn has_claim(&self, claim_type: &str, value: &str) -> bool {
        self.claims()
            .iter()
            .any(|c| c.claim_type == claim_type && c.value == value)
    }

    /// Principal name
    ///
    /// Looks at the configured name claim type, then the name aliases, then
    /// `sub`.
    pub fn name(&self) -> Option<&str> {
        std::iter::once(self.name_claim_type())
            .chain(claim_types::NAME_ALIASES.iter().copied())
            .chain(std::iter::once(claim_types::SUB))
            .find_map(|t| self.find_first(t))
            .map(|c| c.value.as_str())
    }
}

/// A single authorization condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    /// The principal's identity is tagged with an authentication scheme
    Authenticated,
    /// The principal holds at least one of these roles
    Role {
        /// Accepted roles
        any_of: Vec<String>,
    },
    /// The principal holds a claim of this type
    Claim {
        /// Claim type
        claim_type: String,
        /// Accepted values; empty accepts any value
        #[serde(default)]
        values: Vec<String>,
    },
}

impl Requirement {
    /// Requirement satisfied by any of `roles`
    pub fn role(roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Role {
            any_of: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Requirement for a claim type with one of `values` (or any value)
    pub fn claim(
        claim_type: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::Claim {
            claim_type: claim_type.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Check the requirement against a principal
    pub fn is_satisfied_by(&self, principal: &ClaimsPrincipal) -> bool {
        let identity = principal.identity();
        match self {
            Self::Authenticated => identity.is_authenticated(),
            Self::Role { any_of } => any_of.iter().any(|r| identity.has_role(r)),
            Self::Claim { claim_type, values } if values.is_empty() => {
                identity.find_first(claim_type).is_some()
            }
            Self::Claim { claim_type, values } => {
                values.iter().any(|v| identity.has_claim(claim_type, v))
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Authenticated => "authenticated principal required".to_string(),
            Self::Role { any_of } => format!("one of roles [{}] required", any_of.join(", ")),
            Self::Claim { claim_type, values } if values.is_empty() => {
                format!("claim '{claim_type}' required")
            }
            Self::Claim { claim_type, values } => {
                format!("claim '{claim_type}' in [{}] required", values.join(", "))
            }
        }
    }
}

/// Named set of requirements that must all hold
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Policy name, used in log output
    pub name: String,
    /// Requirements, checked in order
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

impl Policy {
    /// Create an empty policy
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requirements: Vec::new(),
        }
    }

    /// Add a requirement
    pub fn require(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Require an authenticated principal
    pub fn require_authenticated(self) -> Self {
        self.require(Requirement::Authenticated)
    }

    /// Require any of `roles`
    pub fn require_role(self, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.require(Requirement::role(roles))
    }

    /// Evaluate the policy
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] naming the first unmet requirement.
    pub fn evaluate(&self, principal: &ClaimsPrincipal) -> Result<()> {
        match self
            .requirements
            .iter()
            .find(|r| !r.is_satisfied_by(principal))
        {
            None => Ok(()),
            Some(unmet) => {
                debug!(
                    policy = %self.name,
                    principal = principal.name().unwrap_or_default(),
                    "Authorization requirement not met"
                );
                Err(AuthError::Forbidden(unmet.describe()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::ClaimSet;
    use crate::identity::IdentityBuilder;

    fn identity(claims: &[(&str, &str)]) -> ClaimsIdentity {
        ClaimsIdentity::with_authentication_type(
            claims.iter().map(|(t, v)| Claim::new(*t, *v)).collect(),
            "Bearer",
        )
    }

    #[test]
    fn test_has_role() {
        let id = identity(&[("role", "Admin"), ("role", "Users"), ("sub", "alice")]);
        assert!(id.has_role("Admin"));
        assert!(id.has_role("Users"));
        assert!(!id.has_role("Guest"));
        assert!(!id.has_role("admin"));
        assert!(!id.has_role("alice"));
    }

    #[test]
    fn test_role_aliases() {
        let id = identity(&[
            ("roles", "Auditor"),
            (claim_types::ROLE_URI, "Operator"),
            ("group", "Staff"),
        ]);
        assert!(id.has_role("Auditor"));
        assert!(id.has_role("Operator"));
        assert!(!id.has_role("Staff"));
        assert_eq!(id.roles(), vec!["Auditor", "Operator"]);
    }

    #[test]
    fn test_custom_role_claim_type() {
        let id = identity(&[("group", "Staff")]).with_role_claim_type("group");
        assert!(id.has_role("Staff"));
    }

    #[test]
    fn test_any_and_all_roles() {
        let id = identity(&[("role", "Admin"), ("role", "Users")]);
        assert!(id.has_any_role(&["Guest", "Users"]));
        assert!(!id.has_any_role(&["Guest"]));
        assert!(!id.has_any_role(&[]));
        assert!(id.has_all_roles(&["Admin", "Users"]));
        assert!(!id.has_all_roles(&["Admin", "Guest"]));
        assert!(id.has_all_roles(&[]));
    }

    #[test]
    fn test_find_first_and_all() {
        let id = identity(&[("role", "Admin"), ("role", "Users"), ("sub", "alice")]);
        assert_eq!(id.find_first("role").map(|c| c.value.as_str()), Some("Admin"));
        assert_eq!(id.find_all("role"), vec!["Admin", "Users"]);
        assert!(id.find_first("email").is_none());
        assert!(id.find_all("email").is_empty());
        assert!(id.has_claim("sub", "alice"));
        assert!(!id.has_claim("sub", "bob"));
    }

    #[test]
    fn test_name_resolution() {
        assert_eq!(
            identity(&[("sub", "alice-id"), ("name", "Alice")]).name(),
            Some("Alice")
        );
        assert_eq!(
            identity(&[(claim_types::NAME_URI, "Alice")]).name(),
            Some("Alice")
        );
        assert_eq!(identity(&[("sub", "alice-id")]).name(), Some("alice-id"));
        assert_eq!(identity(&[("role", "Admin")]).name(), None);
        assert_eq!(
            identity(&[("email", "a@example.com"), ("name", "Alice")])
                .with_name_claim_type("email")
                .name(),
            Some("a@example.com")
        );
    }

    #[test]
    fn test_policy_evaluation() {
        let set: ClaimSet = serde_json::from_value(serde_json::json!({
            "sub": "alice",
            "role": ["Admin", "Users"],
            "tenant": "acme"
        }))
        .unwrap();
        let principal = ClaimsPrincipal::new(IdentityBuilder::new(true).build(Some(&set)));

        let admin = Policy::new("admin")
            .require_authenticated()
            .require_role(["Admin"]);
        assert!(admin.evaluate(&principal).is_ok());

        let tenant = Policy::new("tenant").require(Requirement::claim("tenant", ["acme"]));
        assert!(tenant.evaluate(&principal).is_ok());

        let any_tenant =
            Policy::new("any-tenant").require(Requirement::claim("tenant", Vec::<String>::new()));
        assert!(any_tenant.evaluate(&principal).is_ok());

        let other_tenant = Policy::new("other").require(Requirement::claim("tenant", ["globex"]));
        assert!(matches!(
            other_tenant.evaluate(&principal),
            Err(AuthError::Forbidden(msg)) if msg.contains("tenant")
        ));

        let auditors = Policy::new("auditors").require_role(["Auditor"]);
        assert!(matches!(
            auditors.evaluate(&principal),
            Err(AuthError::Forbidden(_))
        ));
    }

    #[test]
    fn test_authenticated_requirement() {
        let untagged = ClaimsPrincipal::new(ClaimsIdentity::new(vec![Claim::new("sub", "x")]));
        let policy = Policy::new("signed-in").require_authenticated();
        assert!(policy.evaluate(&untagged).is_err());
        assert!(Policy::new("open").evaluate(&untagged).is_ok());
    }

    #[test]
    fn test_requirement_from_json() {
        let policy: Policy = serde_json::from_value(serde_json::json!({
            "name": "ops",
            "requirements": [
                { "kind": "authenticated" },
                { "kind": "role", "any_of": ["Admin", "Operator"] },
                { "kind": "claim", "claim_type": "tenant" }
            ]
        }))
        .unwrap();
        assert_eq!(policy.requirements.len(), 3);
        assert_eq!(
            policy.requirements[2],
            Requirement::claim("tenant", Vec::<String>::new())
        );
    }
}
