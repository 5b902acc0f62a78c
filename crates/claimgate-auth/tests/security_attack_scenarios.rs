//! Attack scenario tests
//!
//! Covers:
//! - Signature tampering (bit flips, payload swaps)
//! - Wrong-secret verification
//! - Algorithm confusion (`none`, asymmetric names, lowercase)
//! - Structural garbage that must be reported as malformed, not as a bad signature

mod common;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use claimgate_auth::{AuthError, Challenge, jwt::codec};
use common::{SECRET, flip_signature_bit, forge_token, test_authenticator};
use serde_json::json;

#[test]
fn test_every_signature_bit_is_checked() {
    let auth = test_authenticator();
    let token = auth.issue_token("alice").expect("issue");

    for bit in 0..256 {
        let tampered = flip_signature_bit(&token, bit);
        assert!(
            matches!(auth.verify_token(&tampered), Err(AuthError::SignatureInvalid)),
            "bit {bit} flip was accepted"
        );
    }
}

#[test]
fn test_payload_swap_keeps_old_signature() {
    let auth = test_authenticator();
    let token = auth.issue_token("alice").expect("issue");
    let parts: Vec<&str> = token.split('.').collect();

    let escalated = URL_SAFE_NO_PAD.encode(
        serde_json::to_vec(&json!({ "sub": "alice", "role": ["Admin", "SuperUser"] })).unwrap(),
    );
    let forged = format!("{}.{}.{}", parts[0], escalated, parts[2]);
    assert!(matches!(
        auth.verify_token(&forged),
        Err(AuthError::SignatureInvalid)
    ));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let token = forge_token(
        &json!({ "alg": "HS256", "typ": "JWT" }),
        &json!({ "sub": "mallory", "role": ["Admin"] }),
        b"attacker-controlled-secret",
    );
    let err = test_authenticator().verify_token(&token).unwrap_err();
    assert!(matches!(err, AuthError::SignatureInvalid));
    assert!(err.is_invalid_token());
    assert!(!err.is_lifetime_failure());
}

#[test]
fn test_alg_none_is_rejected() {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"mallory","role":["Admin"]}"#);

    for token in [format!("{header}.{payload}."), format!("{header}.{payload}")] {
        assert!(
            test_authenticator().verify_token(&token).is_err(),
            "{token} was accepted"
        );
    }
    assert!(matches!(
        codec::decode(&format!("{header}.{payload}."), SECRET.as_bytes()),
        Err(AuthError::UnsupportedAlgorithm(_))
    ));
}

#[test]
fn test_algorithm_names_other_than_hs256() {
    // Correctly signed with the shared secret, but the header lies about the algorithm
    for alg in ["RS256", "HS512", "hs256", "ES256", ""] {
        let token = forge_token(
            &json!({ "alg": alg, "typ": "JWT" }),
            &json!({ "sub": "alice" }),
            SECRET.as_bytes(),
        );
        assert!(
            matches!(
                codec::decode(&token, SECRET.as_bytes()),
                Err(AuthError::UnsupportedAlgorithm(a)) if a == alg
            ),
            "alg {alg:?} was not rejected"
        );
    }
}

#[test]
fn test_missing_alg_is_malformed() {
    let token = forge_token(&json!({ "typ": "JWT" }), &json!({}), SECRET.as_bytes());
    assert!(matches!(
        codec::decode(&token, SECRET.as_bytes()),
        Err(AuthError::MalformedToken(_))
    ));
}

#[test]
fn test_structural_garbage_is_malformed() {
    let auth = test_authenticator();
    let valid = auth.issue_token("alice").expect("issue");
    let parts: Vec<&str> = valid.split('.').collect();

    let cases = [
        String::new(),
        "not-a-token".to_string(),
        format!("{}.{}", parts[0], parts[1]),
        format!("{valid}.extra"),
        format!("{}.%%%.{}", parts[0], parts[2]),
        format!("{}.{}.{}", URL_SAFE_NO_PAD.encode(b"not json"), parts[1], parts[2]),
        format!("{}.{}.{}", parts[0], URL_SAFE_NO_PAD.encode(b"\"a string\""), parts[2]),
        format!("{}.{}.@@@", parts[0], parts[1]),
    ];

    for token in &cases {
        let err = auth.verify_token(token).unwrap_err();
        assert!(
            matches!(err, AuthError::MalformedToken(_)),
            "{token:?} gave {err:?}"
        );
    }
}

#[test]
fn test_challenge_for_rejected_token() {
    let auth = test_authenticator();
    let err = auth.verify_token("a.b").unwrap_err();
    let challenge = Challenge::for_error(&err).with_realm("claimgate");
    let header = challenge.to_header_value().expect("header value");
    let header = header.to_str().unwrap();
    assert!(header.starts_with("Bearer realm=\"claimgate\""));
    assert!(header.contains("error=\"invalid_token\""));
}
