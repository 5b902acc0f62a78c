//! Claim model shared by issuance and verification
//!
//! A [`ClaimSet`] is the JSON object carried in a token payload. It keeps
//! claim types in insertion order so that what is signed at issuance is what
//! comes back out of verification, including the order of multi-valued claims
//! such as roles.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Well-known claim types
pub mod claim_types {
    /// JWT ID (RFC 7519 §4.1.7)
    pub const JTI: &str = "jti";
    /// Issuer (RFC 7519 §4.1.1)
    pub const ISS: &str = "iss";
    /// Subject (RFC 7519 §4.1.2)
    pub const SUB: &str = "sub";
    /// Expiration time (RFC 7519 §4.1.4)
    pub const EXP: &str = "exp";
    /// Not before (RFC 7519 §4.1.5)
    pub const NBF: &str = "nbf";
    /// Issued at (RFC 7519 §4.1.6)
    pub const IAT: &str = "iat";
    /// Role claim written at issuance
    pub const ROLE: &str = "role";
    /// Plural role claim used by some issuers
    pub const ROLES: &str = "roles";
    /// Display/principal name claim written at issuance
    pub const NAME: &str = "name";
    /// Role claim type used by WS-* / .NET issuers
    pub const ROLE_URI: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";
    /// Name claim type used by WS-* / .NET issuers
    pub const NAME_URI: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";

    /// Claim types treated as role claims regardless of identity configuration
    pub const ROLE_ALIASES: &[&str] = &[ROLE, ROLES, ROLE_URI];
    /// Claim types treated as name claims regardless of identity configuration
    pub const NAME_ALIASES: &[&str] = &[NAME, NAME_URI];
}

/// A single `(type, value)` fact about a principal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    /// Claim type (e.g. `role`, `sub`)
    #[serde(rename = "type")]
    pub claim_type: String,
    /// Claim value
    pub value: String,
}

impl Claim {
    /// Create a claim
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.claim_type, self.value)
    }
}

/// Value of one payload entry
///
/// Strings and arrays of strings are claim material. Integer timestamps are
/// kept typed so lifetime checks can read them; anything else is carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    /// Single string value
    Scalar(String),
    /// Ordered list of strings (e.g. roles)
    Sequence(Vec<String>),
    /// Integer, typically a NumericDate (`exp`, `nbf`, `iat`)
    NumericDate(i64),
    /// Any other JSON value (bool, float, object, mixed array, null)
    Other(Value),
}

impl ClaimValue {
    /// Classify a JSON value into the most specific variant
    ///
    /// This is the same shape a value takes after a trip through a token
    /// payload, so `Other` only ever holds what no other variant covers.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Scalar(s),
            Value::Number(n) => match n.as_i64() {
                Some(n) => Self::NumericDate(n),
                None => Self::Other(Value::Number(n)),
            },
            Value::Array(items) if items.iter().all(Value::is_string) => Self::Sequence(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            other => Self::Other(other),
        }
    }

    fn normalized(self) -> Self {
        match self {
            Self::Other(value) => Self::from_json(value),
            shaped => shaped,
        }
    }

    /// The scalar string, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// The integer value, if this is one
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::NumericDate(n) => Some(*n),
            _ => None,
        }
    }

    /// The string sequence, if this is one
    pub fn as_sequence(&self) -> Option<&[String]> {
        match self {
            Self::Sequence(values) => Some(values),
            _ => None,
        }
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<Vec<String>> for ClaimValue {
    fn from(values: Vec<String>) -> Self {
        Self::Sequence(values)
    }
}

impl From<&[&str]> for ClaimValue {
    fn from(values: &[&str]) -> Self {
        Self::Sequence(values.iter().map(|v| (*v).to_string()).collect())
    }
}

impl From<Value> for ClaimValue {
    fn from(value: Value) -> Self {
        Self::from_json(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        Self::NumericDate(value)
    }
}

/// Ordered mapping from claim type to value
///
/// Inserting a type that is already present replaces its value in place,
/// keeping the original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimSet {
    entries: Vec<(String, ClaimValue)>,
}

impl ClaimSet {
    /// Create an empty claim set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a claim, returning the previous value
    ///
    /// A [`ClaimValue::Other`] holding a string, integer or string array is
    /// stored as the matching typed variant.
    pub fn insert(
        &mut self,
        claim_type: impl Into<String>,
        value: impl Into<ClaimValue>,
    ) -> Option<ClaimValue> {
        let claim_type = claim_type.into();
        let value = value.into().normalized();
        match self.entries.iter_mut().find(|(t, _)| *t == claim_type) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((claim_type, value));
                None
            }
        }
    }

    /// Builder form of [`ClaimSet::insert`]
    pub fn with(mut self, claim_type: impl Into<String>, value: impl Into<ClaimValue>) -> Self {
        self.insert(claim_type, value);
        self
    }

    /// Look up a claim value
    pub fn get(&self, claim_type: &str) -> Option<&ClaimValue> {
        self.entries
            .iter()
            .find(|(t, _)| t == claim_type)
            .map(|(_, v)| v)
    }

    /// Remove a claim, returning its value
    pub fn remove(&mut self, claim_type: &str) -> Option<ClaimValue> {
        let index = self.entries.iter().position(|(t, _)| t == claim_type)?;
        Some(self.entries.remove(index).1)
    }

    /// Whether a claim type is present
    pub fn contains(&self, claim_type: &str) -> bool {
        self.get(claim_type).is_some()
    }

    /// Number of claim types
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no claims are present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClaimValue)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v))
    }

    /// `sub` claim
    pub fn subject(&self) -> Option<&str> {
        self.get(claim_types::SUB).and_then(ClaimValue::as_str)
    }

    /// `iss` claim
    pub fn issuer(&self) -> Option<&str> {
        self.get(claim_types::ISS).and_then(ClaimValue::as_str)
    }

    /// `jti` claim
    pub fn jwt_id(&self) -> Option<&str> {
        self.get(claim_types::JTI).and_then(ClaimValue::as_str)
    }

    /// `exp` claim (Unix seconds)
    pub fn expires_at(&self) -> Option<i64> {
        self.get(claim_types::EXP).and_then(ClaimValue::as_i64)
    }

    /// `nbf` claim (Unix seconds)
    pub fn not_before(&self) -> Option<i64> {
        self.get(claim_types::NBF).and_then(ClaimValue::as_i64)
    }

    /// `iat` claim (Unix seconds)
    pub fn issued_at(&self) -> Option<i64> {
        self.get(claim_types::IAT).and_then(ClaimValue::as_i64)
    }
}

impl<K: Into<String>, V: Into<ClaimValue>> FromIterator<(K, V)> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl Serialize for ClaimSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (claim_type, value) in &self.entries {
            map.serialize_entry(claim_type, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ClaimSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ClaimSetVisitor;

        impl<'de> Visitor<'de> for ClaimSetVisitor {
            type Value = ClaimSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object of claims")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ClaimSet, A::Error> {
                let mut set = ClaimSet::new();
                while let Some((claim_type, value)) =
                    access.next_entry::<String, ClaimValue>()?
                {
                    set.insert(claim_type, value);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(ClaimSetVisitor)
    }
}
