//! Compact token encoding and signature verification
//!
//! # Security Properties
//!
//! - The header algorithm is checked against [`ALGORITHM`] before any
//!   signature work, so `none` and asymmetric algorithm names are rejected
//!   outright.
//! - Signatures are compared with `subtle::ConstantTimeEq`; the comparison
//!   does not exit early on the first differing byte.
//! - Structural failures are always reported as
//!   [`AuthError::MalformedToken`], never as a signature failure.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::{ALGORITHM, JwtHeader};
use crate::claims::ClaimSet;
use crate::error::{AuthError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Sign a claim set, producing a compact token
///
/// # Errors
///
/// - [`AuthError::Configuration`] if `secret` is empty
/// - [`AuthError::Serialization`] if the claim set cannot be serialized
pub fn encode(claims: &ClaimSet, secret: &[u8]) -> Result<String> {
    ensure_secret(secret)?;

    let header = serde_json::to_vec(&JwtHeader::default())?;
    let payload = serde_json::to_vec(claims)?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header),
        URL_SAFE_NO_PAD.encode(payload)
    );
    let signature = sign(signing_input.as_bytes(), secret)?;

    Ok(format!(
        "{signing_input}.{}",
        URL_SAFE_NO_PAD.encode(signature)
    ))
}

/// Verify a compact token and return its claim set
///
/// Lifetime claims are not inspected; see [`super::validate`].
///
/// # Errors
///
/// - [`AuthError::Configuration`] if `secret` is empty
/// - [`AuthError::MalformedToken`] for a wrong segment count, invalid
///   base64url, or a header/payload that is not a JSON object
/// - [`AuthError::UnsupportedAlgorithm`] if the header names anything but HS256
/// - [`AuthError::SignatureInvalid`] if the signature does not match
pub fn decode(token: &str, secret: &[u8]) -> Result<ClaimSet> {
    ensure_secret(secret)?;

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        debug!(segments = parts.len(), "Rejecting token with wrong segment count");
        return Err(AuthError::MalformedToken(format!(
            "expected 3 segments, found {}",
            parts.len()
        )));
    }

    let header_bytes = decode_segment(parts[0], "header")?;
    let header: JwtHeader = serde_json::from_slice(&header_bytes)
        .map_err(|e| AuthError::MalformedToken(format!("invalid header: {e}")))?;

    let payload_bytes = decode_segment(parts[1], "payload")?;
    let claims: ClaimSet = serde_json::from_slice(&payload_bytes)
        .map_err(|e| AuthError::MalformedToken(format!("invalid payload: {e}")))?;

    let signature = decode_segment(parts[2], "signature")?;

    if header.alg != ALGORITHM {
        warn!(algorithm = %header.alg, "Token algorithm not allowed");
        return Err(AuthError::UnsupportedAlgorithm(header.alg));
    }

    // The signing input is the raw header and payload segments, not a re-encoding
    let signing_input = &token[..parts[0].len() + 1 + parts[1].len()];
    verify_signature(signing_input.as_bytes(), &signature, secret)?;

    Ok(claims)
}

/// HMAC-SHA256 over `input`
fn sign(input: &[u8], secret: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AuthError::Configuration(format!("unusable signing key: {e}")))?;
    mac.update(input);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn verify_signature(input: &[u8], signature: &[u8], secret: &[u8]) -> Result<()> {
    let expected = sign(input, secret)?;

    // ct_eq on slices of different length yields false without comparing bytes
    if bool::from(expected.as_slice().ct_eq(signature)) {
        Ok(())
    } else {
        warn!("Token signature verification failed");
        Err(AuthError::SignatureInvalid)
    }
}

fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| AuthError::MalformedToken(format!("invalid {name} encoding: {e}")))
}

fn ensure_secret(secret: &[u8]) -> Result<()> {
    if secret.is_empty() {
        return Err(AuthError::Configuration(
            "signing secret must not be empty".to_string(),
        ));
    }
    Ok(())
}
