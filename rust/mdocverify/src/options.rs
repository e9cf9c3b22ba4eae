// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use mdocverify_common::{CoseAlgorithm, DEFAULT_MAX_NESTING_DEPTH};

/// Default upper bound on a transport payload.
pub const DEFAULT_MAX_PAYLOAD_LEN: usize = 1024 * 1024;

/// Verification limits and policy.
///
/// Deserializable so hosts can load it from their own configuration; missing
/// fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifyOptions {
    /// If set, verification fails unless the COSE `alg` header equals this value.
    pub expected_alg: Option<CoseAlgorithm>,

    /// Payloads longer than this are rejected before any CBOR decoding.
    pub max_payload_len: usize,

    /// Nesting bound applied when converting the signed content to JSON.
    pub max_nesting_depth: usize,
}

impl VerifyOptions {
    pub fn with_expected_alg(mut self, alg: CoseAlgorithm) -> Self {
        self.expected_alg = Some(alg);
        self
    }

    pub fn with_max_payload_len(mut self, max: usize) -> Self {
        self.max_payload_len = max;
        self
    }

    pub fn with_max_nesting_depth(mut self, max: usize) -> Self {
        self.max_nesting_depth = max;
        self
    }
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            expected_alg: None,
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}
