// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! ECDSA verification of COSE signatures.
//!
//! COSE carries ECDSA signatures as the raw `r || s` concatenation, so
//! signatures are read with `Signature::from_slice`. A signature of the wrong
//! length is treated the same as one that does not verify.

use mdocverify_common::CoseAlgorithm;
use mdocverify_keys::VerificationKey;
use signature::Verifier;

use crate::ProcessError;

/// Verify `signature` over `sig_structure` with `key` using `alg`.
///
/// `alg` must be the algorithm the key was converted for.
pub(crate) fn verify_signature(
    key: &VerificationKey,
    alg: CoseAlgorithm,
    sig_structure: &[u8],
    signature: &[u8],
) -> Result<(), ProcessError> {
    if key.alg() != alg {
        return Err(ProcessError::AlgorithmMismatch {
            expected: key.alg(),
            actual: alg,
        });
    }

    let VerificationKey::Ec2(ec2) = key;
    let point = ec2.sec1_uncompressed();
    let verified = match alg {
        CoseAlgorithm::ES256 => verify_ecdsa_p256(&point, sig_structure, signature)?,
        CoseAlgorithm::ES384 => verify_ecdsa_p384(&point, sig_structure, signature)?,
        CoseAlgorithm::ES512 => verify_ecdsa_p521(&point, sig_structure, signature)?,
    };

    if !verified {
        tracing::warn!(alg = %alg, signature_len = signature.len(), "COSE signature did not verify");
        return Err(ProcessError::InvalidSignature);
    }
    Ok(())
}

fn verify_ecdsa_p256(point: &[u8], msg: &[u8], sig: &[u8]) -> Result<bool, ProcessError> {
    let vk = p256::ecdsa::VerifyingKey::from_sec1_bytes(point)
        .map_err(|e| ProcessError::InvalidPublicKey(format!("bad P-256 public key: {e}")))?;
    let Ok(signature) = p256::ecdsa::Signature::from_slice(sig) else {
        return Ok(false);
    };
    Ok(vk.verify(msg, &signature).is_ok())
}

fn verify_ecdsa_p384(point: &[u8], msg: &[u8], sig: &[u8]) -> Result<bool, ProcessError> {
    let vk = p384::ecdsa::VerifyingKey::from_sec1_bytes(point)
        .map_err(|e| ProcessError::InvalidPublicKey(format!("bad P-384 public key: {e}")))?;
    let Ok(signature) = p384::ecdsa::Signature::from_slice(sig) else {
        return Ok(false);
    };
    Ok(vk.verify(msg, &signature).is_ok())
}

fn verify_ecdsa_p521(point: &[u8], msg: &[u8], sig: &[u8]) -> Result<bool, ProcessError> {
    let vk = p521::ecdsa::VerifyingKey::from_sec1_bytes(point)
        .map_err(|e| ProcessError::InvalidPublicKey(format!("bad P-521 public key: {e}")))?;
    let Ok(signature) = p521::ecdsa::Signature::from_slice(sig) else {
        return Ok(false);
    };
    Ok(vk.verify(msg, &signature).is_ok())
}
