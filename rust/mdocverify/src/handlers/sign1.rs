// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! COSE_Sign1 handler.
//!
//! Flow:
//! 1) Parse the COSE_Sign1 structure (tag 18 or untagged).
//! 2) Convert the caller's key into a verification key.
//! 3) Resolve `alg` and enforce the configured expectation.
//! 4) Verify the signature over the Sig_structure.
//! 5) Only then decode the content and map it to JSON.

use mdocverify_common::{
    cbor_to_json_with_max_depth, encode_signature1_sig_structure, parse_cose_sign1, CoseAlgorithm,
    CoseMessageTag, CoseSign1Error, DecodeError,
};
use mdocverify_keys::{KeyConverterRegistry, PublicKey};

use crate::verifier::verify_signature;
use crate::{CoseMessageHandler, ProcessError, VerifiedClaims, VerifyOptions};

#[derive(Debug)]
pub struct Sign1Handler {
    converters: KeyConverterRegistry,
    expected_alg: Option<CoseAlgorithm>,
    max_nesting_depth: usize,
}

impl Sign1Handler {
    pub fn new(converters: KeyConverterRegistry, options: &VerifyOptions) -> Self {
        Self {
            converters,
            expected_alg: options.expected_alg,
            max_nesting_depth: options.max_nesting_depth,
        }
    }
}

impl Default for Sign1Handler {
    fn default() -> Self {
        Self::new(KeyConverterRegistry::default(), &VerifyOptions::default())
    }
}

impl CoseMessageHandler for Sign1Handler {
    fn name(&self) -> &'static str {
        "sign1"
    }

    fn supports(&self, tag: CoseMessageTag) -> bool {
        tag == CoseMessageTag::Sign1
    }

    fn handle(&self, payload: &[u8], key: &PublicKey) -> Result<VerifiedClaims, ProcessError> {
        let parsed = parse_cose_sign1(payload).map_err(parse_error)?;
        let verification_key = self.converters.convert(key)?;

        let alg_id = parsed
            .alg()
            .ok_or_else(|| ProcessError::MissingOrInvalidAlg("missing alg header".to_string()))?;
        let alg = CoseAlgorithm::from_i64(alg_id)
            .ok_or_else(|| ProcessError::MissingOrInvalidAlg(format!("unsupported alg: {alg_id}")))?;
        if let Some(expected) = self.expected_alg {
            if expected != alg {
                return Err(ProcessError::AlgorithmMismatch { expected, actual: alg });
            }
        }

        let content = parsed
            .payload
            .as_deref()
            .ok_or_else(|| ProcessError::handler_internal(CoseSign1Error::DetachedPayload))?;
        let sig_structure = encode_signature1_sig_structure(&parsed, None).map_err(ProcessError::handler_internal)?;

        verify_signature(&verification_key, alg, &sig_structure, &parsed.signature)?;
        tracing::debug!(alg = %alg, content_len = content.len(), "COSE_Sign1 signature verified");

        let json = cbor_to_json_with_max_depth(content, self.max_nesting_depth).map_err(ProcessError::handler_internal)?;
        Ok(VerifiedClaims::from_json(&json))
    }
}

fn parse_error(e: CoseSign1Error) -> ProcessError {
    match e {
        CoseSign1Error::UnexpectedTag(tag) => ProcessError::UnsupportedMessageTag(tag),
        other => ProcessError::Decode(DecodeError::MalformedCbor(other.to_string())),
    }
}
