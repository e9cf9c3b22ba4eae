// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared helpers for `mdocverify` integration tests.
//!
//! Messages are built by hand with `minicbor` so each test controls the exact
//! bytes, and signed with freshly generated keys.

#![allow(dead_code)]

use mdocverify::{NdefMessage, NdefRecord, NfcAction, NfcEvent, NfcTransport, PublicKey};
use minicbor::data::Tag;
use minicbor::Encoder;
use signature::Signer as _;

pub const TAG_SIGN1: u64 = 18;
pub const TAG_MAC0: u64 = 17;

pub const ALG_ES256: i64 = -7;
pub const ALG_ES384: i64 = -35;

/// CBOR for `{"name": "Jamie"}`.
pub fn jamie_claims() -> Vec<u8> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    enc.map(1).unwrap().str("name").unwrap().str("Jamie").unwrap();
    out
}

/// Protected header bstr contents: `{1: alg}`.
pub fn protected_alg(alg: i64) -> Vec<u8> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    enc.map(1).unwrap().i64(1).unwrap().i64(alg).unwrap();
    out
}

pub fn sig_structure(protected: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    enc.array(4)
        .unwrap()
        .str("Signature1")
        .unwrap()
        .bytes(protected)
        .unwrap()
        .bytes(&[])
        .unwrap()
        .bytes(payload)
        .unwrap();
    out
}

/// Encode a COSE_Sign1 array with an optional outer tag and an empty unprotected map.
pub fn encode_sign1(tag: Option<u64>, protected: &[u8], payload: Option<&[u8]>, signature: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    if let Some(tag) = tag {
        enc.tag(Tag::new(tag)).unwrap();
    }
    enc.array(4).unwrap();
    enc.bytes(protected).unwrap();
    enc.map(0).unwrap();
    match payload {
        Some(p) => enc.bytes(p).unwrap(),
        None => enc.null().unwrap(),
    };
    enc.bytes(signature).unwrap();
    out
}

pub fn sign_es256(sk: &p256::ecdsa::SigningKey, payload: &[u8]) -> Vec<u8> {
    let protected = protected_alg(ALG_ES256);
    let sig: p256::ecdsa::Signature = sk.sign(&sig_structure(&protected, payload));
    encode_sign1(Some(TAG_SIGN1), &protected, Some(payload), &sig.to_bytes())
}

pub fn sign_es384(sk: &p384::ecdsa::SigningKey, payload: &[u8]) -> Vec<u8> {
    let protected = protected_alg(ALG_ES384);
    let sig: p384::ecdsa::Signature = sk.sign(&sig_structure(&protected, payload));
    encode_sign1(Some(TAG_SIGN1), &protected, Some(payload), &sig.to_bytes())
}

pub fn p256_keypair() -> (p256::ecdsa::SigningKey, PublicKey) {
    let sk = p256::ecdsa::SigningKey::random(&mut rand_core::OsRng);
    let pk = PublicKey::from(sk.verifying_key().clone());
    (sk, pk)
}

pub fn p384_keypair() -> (p384::ecdsa::SigningKey, PublicKey) {
    let sk = p384::ecdsa::SigningKey::random(&mut rand_core::OsRng);
    let pk = PublicKey::from(sk.verifying_key().clone());
    (sk, pk)
}

/// An `NDEF_DISCOVERED` event whose first record carries `payload`.
pub fn nfc_transport(payload: &[u8]) -> NfcTransport {
    nfc_transport_with_action(NfcAction::NdefDiscovered, payload)
}

pub fn nfc_transport_with_action(action: NfcAction, payload: &[u8]) -> NfcTransport {
    let record = NdefRecord::mime("application/cose", payload.to_vec()).unwrap();
    NfcTransport::new(NfcEvent::new(action).with_messages(vec![NdefMessage::new(vec![record])]))
}

/// A Mac0 message; the contents are never examined before dispatch rejects it.
pub fn mac0_message() -> Vec<u8> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    enc.tag(Tag::new(TAG_MAC0)).unwrap();
    enc.array(4).unwrap();
    enc.bytes(&protected_alg(5)).unwrap();
    enc.map(0).unwrap();
    enc.bytes(&jamie_claims()).unwrap();
    enc.bytes(&[0u8; 32]).unwrap();
    out
}
