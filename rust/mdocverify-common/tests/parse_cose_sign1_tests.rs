// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Positive COSE_Sign1 parsing tests.
//!
//! These focus on accepted encodings (tagged/untagged, detached payload),
//! header-map decoding and the Sig_structure built from a parsed message.

use mdocverify_common::cose_sign1::SIG_STRUCTURE_CONTEXT_SIGNATURE1;
use mdocverify_common::header_map::{ALG_LABEL, CONTENT_TYPE_LABEL, KID_LABEL};
use mdocverify_common::{encode_signature1_sig_structure, parse_cose_sign1, CoseSign1Error, HeaderValue};
use minicbor::data::Tag;
use minicbor::Encoder;

fn protected_es256() -> Vec<u8> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf);
    enc.map(1).unwrap();
    enc.i64(1).unwrap(); // alg
    enc.i64(-7).unwrap(); // ES256
    buf
}

// COSE_Sign1 = [ protected : bstr, unprotected : map, payload : bstr / nil, signature : bstr ]
fn make_basic_sign1(tagged: bool, detached: bool) -> Vec<u8> {
    let protected = protected_es256();

    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    if tagged {
        enc.tag(Tag::new(18)).unwrap();
    }
    enc.array(4).unwrap();
    enc.bytes(&protected).unwrap();
    enc.map(0).unwrap();
    if detached {
        enc.null().unwrap();
    } else {
        enc.bytes(b"payload").unwrap();
    }
    enc.bytes(b"sig").unwrap();
    out
}

#[test]
fn parse_accepts_tagged_and_untagged() {
    for tagged in [false, true] {
        let cose = make_basic_sign1(tagged, false);
        let parsed = parse_cose_sign1(&cose).expect("parse");
        assert_eq!(parsed.signature, b"sig");
        assert_eq!(parsed.payload.as_deref(), Some(b"payload".as_slice()));
        assert_eq!(parsed.protected_headers.get_i64(ALG_LABEL), Some(-7));
        assert_eq!(parsed.alg(), Some(-7));
    }
}

#[test]
fn parse_skips_self_described_cbor_tag() {
    let mut cose = Vec::new();
    Encoder::new(&mut cose).tag(Tag::new(55799)).unwrap();
    cose.extend_from_slice(&make_basic_sign1(true, false));

    let parsed = parse_cose_sign1(&cose).expect("parse");
    assert_eq!(parsed.signature, b"sig");
}

#[test]
fn parse_rejects_mac0_tag() {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    enc.tag(Tag::new(17)).unwrap();
    enc.array(4).unwrap();
    enc.bytes(&[]).unwrap();
    enc.map(0).unwrap();
    enc.bytes(b"p").unwrap();
    enc.bytes(b"s").unwrap();

    let err = parse_cose_sign1(&out).unwrap_err();
    assert_eq!(err, CoseSign1Error::UnexpectedTag(17));
}

#[test]
fn parse_supports_detached_payload_but_sig_structure_needs_it() {
    let cose = make_basic_sign1(false, true);
    let parsed = parse_cose_sign1(&cose).expect("parse");
    assert!(parsed.payload.is_none());

    let err = encode_signature1_sig_structure(&parsed, None).unwrap_err();
    assert_eq!(err, CoseSign1Error::DetachedPayload);

    let sig_struct = encode_signature1_sig_structure(&parsed, Some(b"external")).expect("sig structure");
    assert!(!sig_struct.is_empty());
}

#[test]
fn sig_structure_uses_original_protected_bytes() {
    let cose = make_basic_sign1(true, false);
    let parsed = parse_cose_sign1(&cose).unwrap();

    let mut expected = Vec::new();
    let mut enc = Encoder::new(&mut expected);
    enc.array(4).unwrap();
    enc.str(SIG_STRUCTURE_CONTEXT_SIGNATURE1).unwrap();
    enc.bytes(&protected_es256()).unwrap();
    enc.bytes(&[]).unwrap();
    enc.bytes(b"payload").unwrap();

    assert_eq!(encode_signature1_sig_structure(&parsed, None).unwrap(), expected);
}

#[test]
fn parse_accepts_empty_protected_headers_bstr() {
    let mut sign1 = Vec::new();
    let mut enc = Encoder::new(&mut sign1);
    enc.array(4).unwrap();
    enc.bytes(&[]).unwrap();
    enc.map(0).unwrap();
    enc.bytes(b"p").unwrap();
    enc.bytes(&[0u8; 64]).unwrap();

    let parsed = parse_cose_sign1(&sign1).unwrap();
    assert!(parsed.protected_headers.is_empty());
    assert_eq!(parsed.alg(), None);
}

#[test]
fn unprotected_headers_decode_kid_and_nested_values() {
    let mut msg = Vec::new();
    let mut enc = Encoder::new(&mut msg);
    enc.array(4).unwrap();
    enc.bytes(&protected_es256()).unwrap();
    enc.map(3).unwrap();
    enc.i64(4).unwrap();
    enc.bytes(b"kid-1").unwrap();
    enc.i64(33).unwrap();
    enc.array(1).unwrap();
    enc.bytes(b"cert").unwrap();
    enc.str("label").unwrap();
    enc.null().unwrap();
    enc.bytes(b"p").unwrap();
    enc.bytes(b"s").unwrap();

    let parsed = parse_cose_sign1(&msg).unwrap();
    assert!(parsed.unprotected_headers.encoded_map_cbor().is_empty());
    assert_eq!(parsed.unprotected_headers.get_bytes(KID_LABEL), Some(b"kid-1".as_slice()));
    match parsed.unprotected_headers.get(33) {
        Some(HeaderValue::Array(items)) => assert_eq!(items, &vec![HeaderValue::Bytes(b"cert".to_vec())]),
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn protected_content_type_is_readable_as_text() {
    let mut protected = Vec::new();
    let mut enc = Encoder::new(&mut protected);
    enc.map(2).unwrap();
    enc.i64(ALG_LABEL).unwrap().i64(-7).unwrap();
    enc.i64(CONTENT_TYPE_LABEL).unwrap().str("application/cbor").unwrap();

    let mut msg = Vec::new();
    let mut enc = Encoder::new(&mut msg);
    enc.array(4).unwrap();
    enc.bytes(&protected).unwrap();
    enc.map(0).unwrap();
    enc.bytes(b"p").unwrap();
    enc.bytes(b"s").unwrap();

    let parsed = parse_cose_sign1(&msg).unwrap();
    assert_eq!(parsed.protected_headers.get_text(CONTENT_TYPE_LABEL), Some("application/cbor"));
    assert_eq!(parsed.protected_headers.get_text(ALG_LABEL), None);
    assert_eq!(parsed.protected_headers.get_i64(CONTENT_TYPE_LABEL), None);
}

#[test]
fn alg_falls_back_to_unprotected_header() {
    let mut msg = Vec::new();
    let mut enc = Encoder::new(&mut msg);
    enc.array(4).unwrap();
    enc.bytes(&[]).unwrap();
    enc.map(1).unwrap();
    enc.i64(1).unwrap();
    enc.i64(-35).unwrap();
    enc.bytes(b"p").unwrap();
    enc.bytes(b"s").unwrap();

    let parsed = parse_cose_sign1(&msg).unwrap();
    assert_eq!(parsed.alg(), Some(-35));
}
