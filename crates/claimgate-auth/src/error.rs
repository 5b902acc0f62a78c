//! Authentication errors
//!
//! Every failure in this crate is terminal for the call that produced it.
//! Nothing is retried internally; the caller decides how a failure is
//! surfaced (status code, challenge header).

use http::StatusCode;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, AuthError>;

/// Authentication and authorization errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Settings are unusable (empty signing key, zero lifetime)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Token structure is wrong: segment count, base64url, or JSON content
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Header names an algorithm other than HS256
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Recomputed signature does not match the supplied one
    #[error("Invalid token signature")]
    SignatureInvalid,

    /// `exp` has passed
    #[error("Token expired")]
    TokenExpired,

    /// `nbf` is still in the future
    #[error("Token not yet valid")]
    TokenNotYetValid,

    /// `iss` does not match the configured issuer
    #[error("Invalid issuer: expected '{expected}', got '{actual}'")]
    InvalidIssuer {
        /// Expected issuer
        expected: String,
        /// Issuer found in the token (empty when missing)
        actual: String,
    },

    /// No bearer credential was presented
    #[error("No bearer credentials provided")]
    MissingCredentials,

    /// The principal is authenticated but fails an authorization requirement
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Claim set could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AuthError {
    /// True for failures that mean "this token cannot be trusted"
    ///
    /// These all map to an `invalid_token` challenge.
    pub fn is_invalid_token(&self) -> bool {
        matches!(
            self,
            Self::MalformedToken(_)
                | Self::UnsupportedAlgorithm(_)
                | Self::SignatureInvalid
                | Self::TokenExpired
                | Self::TokenNotYetValid
                | Self::InvalidIssuer { .. }
        )
    }

    /// True when re-authenticating would help (as opposed to a tampered token)
    pub fn is_lifetime_failure(&self) -> bool {
        matches!(self, Self::TokenExpired | Self::TokenNotYetValid)
    }

    /// HTTP status a caller would typically answer with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Configuration(_) | Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}
