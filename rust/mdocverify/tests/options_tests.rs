// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use mdocverify::{CoseAlgorithm, ProcessError, VerifyOptions, DEFAULT_MAX_PAYLOAD_LEN};

#[test]
fn defaults() {
    let options = VerifyOptions::default();
    assert_eq!(options.expected_alg, None);
    assert_eq!(options.max_payload_len, DEFAULT_MAX_PAYLOAD_LEN);
    assert_eq!(options.max_payload_len, 1024 * 1024);
    assert_eq!(options.max_nesting_depth, 64);
}

#[test]
fn builders_set_fields() {
    let options = VerifyOptions::default()
        .with_expected_alg(CoseAlgorithm::ES512)
        .with_max_payload_len(10)
        .with_max_nesting_depth(3);
    assert_eq!(options.expected_alg, Some(CoseAlgorithm::ES512));
    assert_eq!(options.max_payload_len, 10);
    assert_eq!(options.max_nesting_depth, 3);
}

#[test]
fn deserializes_partial_configuration() {
    let options: VerifyOptions = serde_json::from_str(r#"{"expected_alg": "ES256"}"#).unwrap();
    assert_eq!(options, VerifyOptions::default().with_expected_alg(CoseAlgorithm::ES256));

    let options: VerifyOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options, VerifyOptions::default());

    let options: VerifyOptions =
        serde_json::from_str(r#"{"max_payload_len": 4096, "max_nesting_depth": 8, "expected_alg": null}"#).unwrap();
    assert_eq!(options.max_payload_len, 4096);
    assert_eq!(options.max_nesting_depth, 8);
}

#[test]
fn rejects_unknown_fields_and_algorithms() {
    assert!(serde_json::from_str::<VerifyOptions>(r#"{"max_len": 1}"#).is_err());
    assert!(serde_json::from_str::<VerifyOptions>(r#"{"expected_alg": "RS256"}"#).is_err());
}

#[test]
fn handler_internal_keeps_its_cause() {
    let err = ProcessError::handler_internal("boom");
    assert_eq!(err.to_string(), "COSE handler failed: boom");
    assert!(std::error::Error::source(&err).is_some());
}
