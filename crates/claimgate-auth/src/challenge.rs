//! Bearer credentials and `WWW-Authenticate` challenges (RFC 6750)
//!
//! ```text
//! Authorization: Bearer eyJhbGciOi...            -> extract_bearer
//! WWW-Authenticate: Bearer realm="api", error="invalid_token", error_description="Token expired"
//! ```

use std::fmt;

use http::HeaderValue;
use http::header::InvalidHeaderValue;

use crate::error::{AuthError, Result};

/// Scheme prefix of an `Authorization` header carrying a bearer token
pub const BEARER_SCHEME: &str = "Bearer";

/// Extract the token from an `Authorization` header value
///
/// The scheme is matched case-insensitively and surrounding whitespace is
/// ignored.
///
/// # Errors
///
/// Returns [`AuthError::MissingCredentials`] if the value is not a bearer
/// credential or the token is empty.
pub fn extract_bearer(header_value: &str) -> Result<&str> {
    let value = header_value.trim();
    let Some((scheme, token)) = value.split_once(char::is_whitespace) else {
        return Err(AuthError::MissingCredentials);
    };

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(AuthError::MissingCredentials);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(token)
}

/// Error codes defined by RFC 6750 §3.1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BearerError {
    /// The request is missing a parameter or is otherwise malformed
    InvalidRequest,
    /// The token is expired, malformed, or fails verification
    InvalidToken,
    /// The token is valid but lacks the required privileges
    InsufficientScope,
}

impl BearerError {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::InvalidToken => "invalid_token",
            Self::InsufficientScope => "insufficient_scope",
        }
    }
}

impl fmt::Display for BearerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `WWW-Authenticate: Bearer` challenge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Challenge {
    realm: Option<String>,
    error: Option<BearerError>,
    error_description: Option<String>,
}

impl Challenge {
    /// A bare challenge with no parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Challenge answering a failed authentication or authorization
    ///
    /// Missing credentials get a bare challenge, token failures get
    /// `invalid_token` and [`AuthError::Forbidden`] gets `insufficient_scope`.
    /// Server-side failures get no error code.
    pub fn for_error(error: &AuthError) -> Self {
        let code = match error {
            AuthError::MissingCredentials => None,
            AuthError::Forbidden(_) => Some(BearerError::InsufficientScope),
            e if e.is_invalid_token() => Some(BearerError::InvalidToken),
            _ => None,
        };

        Self {
            realm: None,
            error: code,
            error_description: code.map(|_| error.to_string()),
        }
    }

    /// Set the protection realm
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    /// Set the error code
    pub fn with_error(mut self, error: BearerError) -> Self {
        self.error = Some(error);
        self
    }

    /// Set the human-readable description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.error_description = Some(description.into());
        self
    }

    /// Error code, if any
    pub fn error(&self) -> Option<BearerError> {
        self.error
    }

    /// Render as a header value
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHeaderValue`] if a parameter contains bytes that are
    /// not allowed in a header.
    pub fn to_header_value(&self) -> std::result::Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.to_string())
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut params = Vec::new();
        if let Some(ref realm) = self.realm {
            params.push(format!("realm=\"{}\"", escape_param_value(realm)));
        }
        if let Some(error) = self.error {
            params.push(format!("error=\"{error}\""));
        }
        if let Some(ref description) = self.error_description {
            params.push(format!(
                "error_description=\"{}\"",
                escape_param_value(description)
            ));
        }

        if params.is_empty() {
            f.write_str(BEARER_SCHEME)
        } else {
            write!(f, "{BEARER_SCHEME} {}", params.join(", "))
        }
    }
}

/// Quote-escape an auth-param value, dropping control characters
fn escape_param_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_control())
        .flat_map(|c| match c {
            '"' | '\\' => vec!['\\', c],
            _ => vec![c],
        })
        .collect()
}
