//! HS256 JSON Web Tokens
//!
//! This module implements the compact JWS serialization for symmetric tokens:
//!
//! ```text
//! base64url(header) . base64url(payload) . base64url(HMAC-SHA256(secret, signing_input))
//! └──────────── signing_input ─────────┘
//! ```
//!
//! # Modules
//!
//! - `codec` - encode a [`ClaimSet`](crate::ClaimSet) into a token and verify it back
//! - `issuer` - build the standard claim set for a user
//! - `validation` - optional `exp`/`nbf`/`iss` checks, kept separate from the codec
//!
//! The codec only answers "is this byte content authentic and well-formed".
//! Whether an expired token is acceptable is a policy decision made by the
//! caller through [`ValidationConfig`].

pub mod codec;
pub mod issuer;
pub mod validation;

pub use codec::{decode, encode};
pub use issuer::TokenIssuer;
pub use validation::{ValidationConfig, validate, validate_at};

use serde::{Deserialize, Serialize};

/// The only signing algorithm this crate produces or accepts
pub const ALGORITHM: &str = "HS256";

/// `typ` header value written at issuance
pub const TOKEN_TYPE: &str = "JWT";

/// JOSE header
///
/// Unknown header parameters are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtHeader {
    /// Algorithm
    pub alg: String,

    /// Token type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,

    /// Key ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl Default for JwtHeader {
    fn default() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: Some(TOKEN_TYPE.to_string()),
            kid: None,
        }
    }
}
