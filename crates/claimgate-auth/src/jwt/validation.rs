//! Time and issuer checks applied after signature verification
//!
//! Every check is off by default: a verified token is accepted regardless of
//! `exp`/`nbf` unless the caller opts in. Turning a check on makes the claim
//! mandatory only in the sense that a present-but-unreadable value is
//! rejected; a token without `exp` still passes `validate_exp`.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::claims::{ClaimSet, ClaimValue, claim_types};
use crate::error::{AuthError, Result};

/// Which post-verification checks to run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject tokens whose `exp` has passed
    pub validate_exp: bool,
    /// Reject tokens whose `nbf` is in the future
    pub validate_nbf: bool,
    /// Clock skew tolerance in seconds for `exp`/`nbf`
    pub leeway_seconds: u64,
    /// Expected `iss` value
    pub issuer: Option<String>,
}

impl ValidationConfig {
    /// Enable `exp` and `nbf` checks with the given clock skew tolerance
    pub fn lifetime(leeway: Duration) -> Self {
        Self {
            validate_exp: true,
            validate_nbf: true,
            leeway_seconds: leeway.as_secs(),
            issuer: None,
        }
    }

    /// Also require a specific issuer
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Clock skew tolerance
    pub fn leeway(&self) -> Duration {
        Duration::from_secs(self.leeway_seconds)
    }

    /// True when no check is enabled
    pub fn is_disabled(&self) -> bool {
        !self.validate_exp && !self.validate_nbf && self.issuer.is_none()
    }
}

/// Run the configured checks against the current time
///
/// # Errors
///
/// See [`validate_at`].
pub fn validate(claims: &ClaimSet, config: &ValidationConfig) -> Result<()> {
    validate_at(claims, config, Utc::now().timestamp())
}

/// Run the configured checks against `now` (Unix seconds)
///
/// # Errors
///
/// - [`AuthError::TokenExpired`] when `now >= exp + leeway`
/// - [`AuthError::TokenNotYetValid`] when `now + leeway < nbf`
/// - [`AuthError::MalformedToken`] when a checked time claim is not numeric
/// - [`AuthError::InvalidIssuer`] when `iss` is missing or differs
pub fn validate_at(claims: &ClaimSet, config: &ValidationConfig, now: i64) -> Result<()> {
    let leeway = i64::try_from(config.leeway_seconds).unwrap_or(i64::MAX);

    if config.validate_exp
        && let Some(exp) = numeric_date(claims, claim_types::EXP)?
        && now >= exp.saturating_add(leeway)
    {
        debug!(exp, now, "Token expired");
        return Err(AuthError::TokenExpired);
    }

    if config.validate_nbf
        && let Some(nbf) = numeric_date(claims, claim_types::NBF)?
        && now.saturating_add(leeway) < nbf
    {
        debug!(nbf, now, "Token not yet valid");
        return Err(AuthError::TokenNotYetValid);
    }

    if let Some(ref expected) = config.issuer {
        match claims.issuer() {
            Some(actual) if actual == expected => {}
            actual => {
                return Err(AuthError::InvalidIssuer {
                    expected: expected.clone(),
                    actual: actual.unwrap_or_default().to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Read a NumericDate claim, accepting integer or fractional seconds
fn numeric_date(claims: &ClaimSet, claim_type: &str) -> Result<Option<i64>> {
    match claims.get(claim_type) {
        None => Ok(None),
        Some(ClaimValue::NumericDate(n)) => Ok(Some(*n)),
        Some(ClaimValue::Other(Value::Number(n))) => n
            .as_f64()
            .map(|secs| Some(secs.floor() as i64))
            .ok_or_else(|| AuthError::MalformedToken(format!("{claim_type} is not a NumericDate"))),
        Some(_) => Err(AuthError::MalformedToken(format!(
            "{claim_type} is not a NumericDate"
        ))),
    }
}
