//! Property-based tests for the token codec and identity builder
//!
//! Uses proptest to verify:
//! - Encode/decode round-trips arbitrary claim sets
//! - Any single-bit signature change is detected
//! - A different secret never verifies
//! - Fewer than three segments is always malformed
//! - Identity claim counts follow payload shape

mod common;

use claimgate_auth::{AuthError, ClaimSet, ClaimValue, IdentityBuilder, jwt::codec};
use common::flip_signature_bit;
use proptest::prelude::*;
use serde_json::json;

// =============================================================================
// STRATEGIES
// =============================================================================

fn claim_value_strategy() -> impl Strategy<Value = ClaimValue> {
    prop_oneof![
        "\\PC{0,16}".prop_map(ClaimValue::Scalar),
        prop::collection::vec("\\PC{0,8}", 0..4).prop_map(ClaimValue::Sequence),
        any::<i64>().prop_map(ClaimValue::NumericDate),
        other_value_strategy(),
    ]
}

/// Values only `ClaimValue::Other` can carry, plus shapes it must hand off
fn other_value_strategy() -> impl Strategy<Value = ClaimValue> {
    prop_oneof![
        any::<bool>().prop_map(|b| json!(b)),
        (-1000i32..1000).prop_map(|n| json!(f64::from(n) + 0.5)),
        Just(json!(null)),
        ("[a-z]{1,4}", "\\PC{0,8}")
            .prop_map(|(k, v)| serde_json::Value::Object([(k, json!(v))].into_iter().collect())),
        ("\\PC{0,8}", any::<i32>()).prop_map(|(s, n)| json!([s, n])),
        "\\PC{0,8}".prop_map(|s| json!(s)),
        any::<i64>().prop_map(|n| json!(n)),
        prop::collection::vec("\\PC{0,8}", 0..3).prop_map(|v| json!(v)),
    ]
    .prop_map(ClaimValue::Other)
}

fn claim_set_strategy() -> impl Strategy<Value = ClaimSet> {
    prop::collection::vec(("[a-z_]{1,8}", claim_value_strategy()), 0..8)
        .prop_map(|entries| entries.into_iter().collect())
}

/// Non-zero bytes up to one HMAC block, so distinct secrets are distinct keys
fn secret_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1u8..=255, 1..=64)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: decode(encode(C, S), S) == C
    #[test]
    fn prop_roundtrip(claims in claim_set_strategy(), secret in secret_strategy()) {
        let token = codec::encode(&claims, &secret).unwrap();
        let decoded = codec::decode(&token, &secret).unwrap();
        prop_assert_eq!(decoded, claims);
    }

    /// Property: flipping any signature bit yields SignatureInvalid
    #[test]
    fn prop_tamper_detected(
        claims in claim_set_strategy(),
        secret in secret_strategy(),
        bit in 0usize..256
    ) {
        let token = codec::encode(&claims, &secret).unwrap();
        let tampered = flip_signature_bit(&token, bit);
        prop_assert!(matches!(
            codec::decode(&tampered, &secret),
            Err(AuthError::SignatureInvalid)
        ));
    }

    /// Property: a different secret yields SignatureInvalid
    #[test]
    fn prop_secret_sensitivity(
        claims in claim_set_strategy(),
        secret in secret_strategy(),
        other in secret_strategy()
    ) {
        prop_assume!(secret != other);
        let token = codec::encode(&claims, &secret).unwrap();
        prop_assert!(matches!(
            codec::decode(&token, &other),
            Err(AuthError::SignatureInvalid)
        ));
    }

    /// Property: one or two segments is malformed, never a signature failure
    #[test]
    fn prop_short_tokens_malformed(token in "[A-Za-z0-9_-]{0,24}(\\.[A-Za-z0-9_-]{0,24})?") {
        prop_assert!(matches!(
            codec::decode(&token, b"secret"),
            Err(AuthError::MalformedToken(_))
        ));
    }

    /// Property: strings and string arrays become claims, other values do not
    #[test]
    fn prop_identity_claim_count(claims in claim_set_strategy()) {
        let expected: usize = claims
            .iter()
            .map(|(_, value)| match value {
                ClaimValue::Scalar(_) => 1,
                ClaimValue::Sequence(values) => values.len(),
                _ => 0,
            })
            .sum();
        let identity = IdentityBuilder::default().build(Some(&claims));
        prop_assert_eq!(identity.claims().len(), expected);
    }
}
