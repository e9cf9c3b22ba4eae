// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! COSE_Sign1 parsing and Sig_structure encoding (RFC 9052 section 4.2).

use minicbor::data::Type;
use minicbor::{Decoder, Encoder};

use crate::header_map::{CoseHeaderMap, ALG_LABEL};
use crate::message_tag::{CoseMessageTag, SELF_DESCRIBED_CBOR_TAG};

pub const SIG_STRUCTURE_CONTEXT_SIGNATURE1: &str = "Signature1";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoseSign1Error {
    #[error("empty input")]
    Empty,

    #[error("unexpected CBOR tag {0} (expected COSE_Sign1 tag 18 or no tag)")]
    UnexpectedTag(u64),

    #[error("COSE_Sign1 must be an array(4): {0}")]
    NotSign1(String),

    #[error("invalid COSE_Sign1 field: {0}")]
    Field(String),

    #[error("trailing bytes after COSE_Sign1")]
    TrailingBytes,

    #[error("detached payload requires external payload bytes")]
    DetachedPayload,

    #[error("CBOR encode failed: {0}")]
    Encode(String),
}

#[derive(Debug, Clone)]
pub struct SigStructureView<'a> {
    pub context: &'static str,
    pub body_protected: &'a [u8],
    pub external_aad: &'a [u8],
    pub payload: Option<&'a [u8]>,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedCoseSign1 {
    pub protected_headers: CoseHeaderMap,
    pub unprotected_headers: CoseHeaderMap,
    /// Embedded content; `None` means the payload was detached (`null`).
    pub payload: Option<Vec<u8>>,
    pub signature: Vec<u8>,
}

impl ParsedCoseSign1 {
    pub fn signature1_sig_structure_view(&self) -> SigStructureView<'_> {
        SigStructureView {
            context: SIG_STRUCTURE_CONTEXT_SIGNATURE1,
            body_protected: self.protected_headers.encoded_map_cbor(),
            external_aad: &[],
            payload: self.payload.as_deref(),
        }
    }

    /// The raw `alg` header value. Protected headers win over unprotected ones.
    pub fn alg(&self) -> Option<i64> {
        self.protected_headers
            .get_i64(ALG_LABEL)
            .or_else(|| self.unprotected_headers.get_i64(ALG_LABEL))
    }
}

/// Parse COSE_Sign1 bytes. The structure may be untagged or carry tag 18; any other tag is rejected.
pub fn parse_cose_sign1(input: &[u8]) -> Result<ParsedCoseSign1, CoseSign1Error> {
    if input.is_empty() {
        return Err(CoseSign1Error::Empty);
    }

    let mut dec = Decoder::new(input);

    while matches!(datatype(&mut dec)?, Type::Tag) {
        let tag = dec
            .tag()
            .map_err(|e| CoseSign1Error::NotSign1(format!("failed to read CBOR tag: {e}")))?
            .as_u64();
        if tag == SELF_DESCRIBED_CBOR_TAG {
            continue;
        }
        if tag != CoseMessageTag::Sign1.as_u64() {
            return Err(CoseSign1Error::UnexpectedTag(tag));
        }
        break;
    }

    let len = dec
        .array()
        .map_err(|e| CoseSign1Error::NotSign1(format!("top-level item is not an array: {e}")))?
        .ok_or_else(|| CoseSign1Error::NotSign1("indefinite-length array".to_string()))?;
    if len != 4 {
        return Err(CoseSign1Error::NotSign1(format!("array length was {len}")));
    }

    let protected_bstr = dec
        .bytes()
        .map_err(|e| CoseSign1Error::Field(format!("protected header (bstr): {e}")))?
        .to_vec();
    let protected_headers = CoseHeaderMap::decode_protected(protected_bstr)
        .map_err(|e| CoseSign1Error::Field(format!("protected header: {e}")))?;

    if !matches!(datatype(&mut dec)?, Type::Map) {
        return Err(CoseSign1Error::Field("unprotected header is not a map".to_string()));
    }
    let unprotected_headers = CoseHeaderMap::decode_unprotected(&mut dec)
        .map_err(|e| CoseSign1Error::Field(format!("unprotected header: {e}")))?;

    let payload = match datatype(&mut dec)? {
        Type::Null => {
            dec.null().map_err(|e| CoseSign1Error::Field(e.to_string()))?;
            None
        }
        Type::Bytes => Some(
            dec.bytes()
                .map_err(|e| CoseSign1Error::Field(format!("payload: {e}")))?
                .to_vec(),
        ),
        other => return Err(CoseSign1Error::Field(format!("payload must be bstr or null, got {other:?}"))),
    };

    let signature = dec
        .bytes()
        .map_err(|e| CoseSign1Error::Field(format!("signature (bstr): {e}")))?
        .to_vec();

    if dec.position() != input.len() {
        return Err(CoseSign1Error::TrailingBytes);
    }

    Ok(ParsedCoseSign1 {
        protected_headers,
        unprotected_headers,
        payload,
        signature,
    })
}

/// Encode `Sig_structure = ["Signature1", body_protected, external_aad, payload]`.
pub fn encode_signature1_sig_structure(
    msg: &ParsedCoseSign1,
    external_payload: Option<&[u8]>,
) -> Result<Vec<u8>, CoseSign1Error> {
    let view = msg.signature1_sig_structure_view();
    let payload = view
        .payload
        .or(external_payload)
        .ok_or(CoseSign1Error::DetachedPayload)?;

    let mut out = Vec::with_capacity(32 + view.body_protected.len() + payload.len());
    let mut enc = Encoder::new(&mut out);
    enc.array(4)
        .and_then(|e| e.str(view.context))
        .and_then(|e| e.bytes(view.body_protected))
        .and_then(|e| e.bytes(view.external_aad))
        .and_then(|e| e.bytes(payload))
        .map_err(|e| CoseSign1Error::Encode(e.to_string()))?;
    Ok(out)
}

fn datatype(dec: &mut Decoder<'_>) -> Result<Type, CoseSign1Error> {
    dec.datatype()
        .map_err(|e| CoseSign1Error::NotSign1(e.to_string()))
}
