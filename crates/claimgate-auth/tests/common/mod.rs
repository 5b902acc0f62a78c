//! Common test utilities for integration tests
//!
//! Shared settings, clock helpers and a raw token forger for building inputs
//! the issuer would never produce.

#![allow(dead_code)]

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use claimgate_auth::{JwtAuthenticator, JwtSettings};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

/// HS256 test secret
pub const SECRET: &str = "test_secret_key_at_least_32_bytes_long_12345678";

/// Issuer used by test settings
pub const ISSUER: &str = "JwtAuthDemo";

/// Current Unix timestamp in seconds
pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs() as i64
}

/// Settings with the test issuer and secret
pub fn test_settings() -> JwtSettings {
    JwtSettings::new(ISSUER, SECRET)
}

/// Authenticator over [`test_settings`]
pub fn test_authenticator() -> JwtAuthenticator {
    JwtAuthenticator::new(test_settings()).expect("test settings are valid")
}

/// Sign arbitrary header and payload JSON with HMAC-SHA256
pub fn forge_token(header: &serde_json::Value, payload: &serde_json::Value, secret: &[u8]) -> String {
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(header).expect("header serializes")),
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).expect("payload serializes"))
    );
    let mut mac = Hmac::<Sha256>::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    format!("{signing_input}.{signature}")
}

/// Flip one bit of the decoded signature and re-encode it
pub fn flip_signature_bit(token: &str, bit: usize) -> String {
    let (signing_input, signature) = token.rsplit_once('.').expect("token has a signature");
    let mut raw = URL_SAFE_NO_PAD.decode(signature).expect("signature is base64url");
    let index = (bit / 8) % raw.len();
    raw[index] ^= 1 << (bit % 8);
    format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(raw))
}
