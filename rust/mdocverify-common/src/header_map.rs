// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! COSE header maps.

use std::collections::BTreeMap;

use minicbor::data::Type;
use minicbor::Decoder;

/// Header label for the signature algorithm.
pub const ALG_LABEL: i64 = 1;
/// Header label for the content type.
pub const CONTENT_TYPE_LABEL: i64 = 3;
/// Header label for the key identifier.
pub const KID_LABEL: i64 = 4;

/// Header values nest; deeper structures are rejected rather than recursed into.
const MAX_HEADER_DEPTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeaderKey {
    Int(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Int(i64),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<HeaderValue>),
    Map(BTreeMap<HeaderKey, HeaderValue>),
    Tagged(u64, Box<HeaderValue>),
    Bool(bool),
    Null,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CoseHeaderMap {
    /// Original bstr content of the protected header. Sig_structure is computed over
    /// these bytes, never over a re-encoding. Empty for unprotected headers.
    encoded_map_cbor: Vec<u8>,
    map: BTreeMap<HeaderKey, HeaderValue>,
}

impl CoseHeaderMap {
    pub fn encoded_map_cbor(&self) -> &[u8] {
        &self.encoded_map_cbor
    }

    pub fn map(&self) -> &BTreeMap<HeaderKey, HeaderValue> {
        &self.map
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, label: i64) -> Option<&HeaderValue> {
        self.map.get(&HeaderKey::Int(label))
    }

    pub fn get_i64(&self, label: i64) -> Option<i64> {
        match self.get(label)? {
            HeaderValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn get_bytes(&self, label: i64) -> Option<&[u8]> {
        match self.get(label)? {
            HeaderValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn get_text(&self, label: i64) -> Option<&str> {
        match self.get(label)? {
            HeaderValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Decode a protected header from its bstr content. An empty bstr is an empty map.
    pub(crate) fn decode_protected(bytes: Vec<u8>) -> Result<Self, String> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }

        let mut dec = Decoder::new(&bytes);
        let map = decode_map(&mut dec, 0)?;
        if dec.position() != bytes.len() {
            return Err("trailing bytes after protected header map".to_string());
        }

        Ok(Self {
            encoded_map_cbor: bytes,
            map,
        })
    }

    /// Decode an unprotected header map inline from `dec`.
    pub(crate) fn decode_unprotected(dec: &mut Decoder<'_>) -> Result<Self, String> {
        Ok(Self {
            encoded_map_cbor: Vec::new(),
            map: decode_map(dec, 0)?,
        })
    }
}

fn decode_map(dec: &mut Decoder<'_>, depth: usize) -> Result<BTreeMap<HeaderKey, HeaderValue>, String> {
    let len = dec
        .map()
        .map_err(|e| format!("expected map: {e}"))?
        .ok_or_else(|| "indefinite-length header maps are not supported".to_string())?;

    let mut map = BTreeMap::new();
    for _ in 0..len {
        let key = decode_key(dec)?;
        let value = decode_value(dec, depth + 1)?;
        if map.insert(key.clone(), value).is_some() {
            return Err(format!("duplicate header label: {key:?}"));
        }
    }
    Ok(map)
}

fn decode_key(dec: &mut Decoder<'_>) -> Result<HeaderKey, String> {
    match dec.datatype().map_err(|e| e.to_string())? {
        Type::U8 | Type::U16 | Type::U32 | Type::U64 | Type::I8 | Type::I16 | Type::I32 | Type::I64 => dec
            .i64()
            .map(HeaderKey::Int)
            .map_err(|e| format!("failed to decode int header label: {e}")),
        Type::String => dec
            .str()
            .map(|s| HeaderKey::Text(s.to_string()))
            .map_err(|e| format!("failed to decode text header label: {e}")),
        other => Err(format!("unsupported header label type: {other:?}")),
    }
}

fn decode_value(dec: &mut Decoder<'_>, depth: usize) -> Result<HeaderValue, String> {
    if depth > MAX_HEADER_DEPTH {
        return Err("header value nesting too deep".to_string());
    }

    let value = match dec.datatype().map_err(|e| e.to_string())? {
        Type::Null => {
            dec.null().map_err(|e| e.to_string())?;
            HeaderValue::Null
        }
        Type::Bool => HeaderValue::Bool(dec.bool().map_err(|e| e.to_string())?),
        Type::Bytes => HeaderValue::Bytes(dec.bytes().map_err(|e| e.to_string())?.to_vec()),
        Type::String => HeaderValue::Text(dec.str().map_err(|e| e.to_string())?.to_string()),
        Type::U8 | Type::U16 | Type::U32 | Type::U64 | Type::I8 | Type::I16 | Type::I32 | Type::I64 => {
            HeaderValue::Int(dec.i64().map_err(|e| e.to_string())?)
        }
        Type::Array => {
            let len = dec
                .array()
                .map_err(|e| format!("failed to read array: {e}"))?
                .ok_or_else(|| "indefinite-length arrays are not supported".to_string())?;
            let mut items = Vec::new();
            for _ in 0..len {
                items.push(decode_value(dec, depth + 1)?);
            }
            HeaderValue::Array(items)
        }
        Type::Map => HeaderValue::Map(decode_map(dec, depth)?),
        Type::Tag => {
            let tag = dec.tag().map_err(|e| e.to_string())?.as_u64();
            HeaderValue::Tagged(tag, Box::new(decode_value(dec, depth + 1)?))
        }
        other => return Err(format!("unsupported header value type: {other:?}")),
    };
    Ok(value)
}
