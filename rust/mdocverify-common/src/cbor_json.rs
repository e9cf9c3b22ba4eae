// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! CBOR to JSON mapping for verified content.
//!
//! Follows the conversion guidance of RFC 8949 section 6.1:
//! - byte strings become unpadded base64url text, unless an enclosing tag 21/22/23
//!   asks for base64url, base64 or base16;
//! - non-finite floats, `undefined` and other simple values become `null`;
//! - map keys that are not text are rendered as JSON text (`1` becomes `"1"`);
//! - other tags are transparent, except bignums (tags 2/3) which become numbers
//!   when they fit in 64 bits.
//!
//! Object keys come out sorted, so the serialized form is stable for a given value.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use minicbor::data::Type;
use minicbor::Decoder;
use serde_json::{Map, Number, Value};

/// Default bound on array/map/tag nesting.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

const TAG_POSITIVE_BIGNUM: u64 = 2;
const TAG_NEGATIVE_BIGNUM: u64 = 3;
const TAG_EXPECT_BASE64URL: u64 = 21;
const TAG_EXPECT_BASE64: u64 = 22;
const TAG_EXPECT_BASE16: u64 = 23;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CborJsonError {
    #[error("malformed CBOR: {0}")]
    Cbor(String),

    #[error("trailing bytes after CBOR data item")]
    TrailingBytes,

    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),

    #[error("integer {0} does not fit a JSON number")]
    IntegerOutOfRange(String),

    #[error("unsupported map key: {0}")]
    UnsupportedKey(String),

    #[error("duplicate map key: {0}")]
    DuplicateKey(String),
}

impl CborJsonError {
    fn cbor<E: std::fmt::Display>(e: E) -> Self {
        Self::Cbor(e.to_string())
    }
}

#[derive(Debug, Clone, Copy)]
enum ByteEncoding {
    Base64Url,
    Base64,
    Base16,
}

impl ByteEncoding {
    fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::Base64Url => URL_SAFE_NO_PAD.encode(bytes),
            Self::Base64 => STANDARD.encode(bytes),
            Self::Base16 => hex::encode(bytes),
        }
    }
}

/// Decode exactly one CBOR data item from `bytes` into a JSON value.
pub fn cbor_to_json(bytes: &[u8]) -> Result<Value, CborJsonError> {
    cbor_to_json_with_max_depth(bytes, DEFAULT_MAX_NESTING_DEPTH)
}

pub fn cbor_to_json_with_max_depth(bytes: &[u8], max_depth: usize) -> Result<Value, CborJsonError> {
    if bytes.is_empty() {
        return Err(CborJsonError::Cbor("empty input".to_string()));
    }

    let mut ctx = Converter {
        dec: Decoder::new(bytes),
        max_depth,
    };
    let value = ctx.value(0, ByteEncoding::Base64Url)?;
    if ctx.dec.position() != bytes.len() {
        return Err(CborJsonError::TrailingBytes);
    }
    Ok(value)
}

struct Converter<'b> {
    dec: Decoder<'b>,
    max_depth: usize,
}

impl Converter<'_> {
    fn value(&mut self, depth: usize, bytes_as: ByteEncoding) -> Result<Value, CborJsonError> {
        if depth > self.max_depth {
            return Err(CborJsonError::TooDeep(self.max_depth));
        }

        let value = match self.dec.datatype().map_err(CborJsonError::cbor)? {
            Type::Null => {
                self.dec.null().map_err(CborJsonError::cbor)?;
                Value::Null
            }
            Type::Undefined => {
                self.dec.undefined().map_err(CborJsonError::cbor)?;
                Value::Null
            }
            Type::Simple => {
                self.dec.simple().map_err(CborJsonError::cbor)?;
                Value::Null
            }
            Type::Bool => Value::Bool(self.dec.bool().map_err(CborJsonError::cbor)?),
            Type::U8
            | Type::U16
            | Type::U32
            | Type::U64
            | Type::I8
            | Type::I16
            | Type::I32
            | Type::I64
            | Type::Int => {
                let i = self.dec.int().map_err(CborJsonError::cbor)?;
                int_to_json(i128::from(i))?
            }
            Type::F16 => float_to_json(f64::from(self.dec.f16().map_err(CborJsonError::cbor)?)),
            Type::F32 => float_to_json(f64::from(self.dec.f32().map_err(CborJsonError::cbor)?)),
            Type::F64 => float_to_json(self.dec.f64().map_err(CborJsonError::cbor)?),
            Type::Bytes | Type::BytesIndef => Value::String(bytes_as.encode(&self.byte_string()?)),
            Type::String | Type::StringIndef => Value::String(self.text_string()?),
            Type::Array | Type::ArrayIndef => {
                let len = self.dec.array().map_err(CborJsonError::cbor)?;
                let mut items = Vec::new();
                match len {
                    Some(n) => {
                        for _ in 0..n {
                            items.push(self.value(depth + 1, bytes_as)?);
                        }
                    }
                    None => {
                        while !self.at_break()? {
                            items.push(self.value(depth + 1, bytes_as)?);
                        }
                    }
                }
                Value::Array(items)
            }
            Type::Map | Type::MapIndef => {
                let len = self.dec.map().map_err(CborJsonError::cbor)?;
                let mut object = Map::new();
                match len {
                    Some(n) => {
                        for _ in 0..n {
                            self.member(&mut object, depth + 1, bytes_as)?;
                        }
                    }
                    None => {
                        while !self.at_break()? {
                            self.member(&mut object, depth + 1, bytes_as)?;
                        }
                    }
                }
                Value::Object(object)
            }
            Type::Tag => {
                let tag = self.dec.tag().map_err(CborJsonError::cbor)?.as_u64();
                match tag {
                    TAG_POSITIVE_BIGNUM | TAG_NEGATIVE_BIGNUM => self.bignum(tag == TAG_NEGATIVE_BIGNUM)?,
                    TAG_EXPECT_BASE64URL => self.value(depth + 1, ByteEncoding::Base64Url)?,
                    TAG_EXPECT_BASE64 => self.value(depth + 1, ByteEncoding::Base64)?,
                    TAG_EXPECT_BASE16 => self.value(depth + 1, ByteEncoding::Base16)?,
                    _ => self.value(depth + 1, bytes_as)?,
                }
            }
            other => return Err(CborJsonError::Cbor(format!("unexpected CBOR item: {other:?}"))),
        };
        Ok(value)
    }

    /// Decode one map entry into `object`. Keys that map to an existing member
    /// name are rejected.
    fn member(
        &mut self,
        object: &mut Map<String, Value>,
        depth: usize,
        bytes_as: ByteEncoding,
    ) -> Result<(), CborJsonError> {
        let key = self.key(depth)?;
        if object.contains_key(&key) {
            return Err(CborJsonError::DuplicateKey(key));
        }
        let value = self.value(depth, bytes_as)?;
        object.insert(key, value);
        Ok(())
    }

    /// Map keys become JSON object member names.
    fn key(&mut self, depth: usize) -> Result<String, CborJsonError> {
        match self.dec.datatype().map_err(CborJsonError::cbor)? {
            Type::String | Type::StringIndef => self.text_string(),
            Type::Bytes | Type::BytesIndef => Ok(URL_SAFE_NO_PAD.encode(self.byte_string()?)),
            Type::Array | Type::ArrayIndef | Type::Map | Type::MapIndef => {
                Err(CborJsonError::UnsupportedKey("arrays and maps cannot be object keys".to_string()))
            }
            _ => match self.value(depth, ByteEncoding::Base64Url)? {
                Value::String(s) => Ok(s),
                v @ (Value::Null | Value::Bool(_) | Value::Number(_)) => Ok(v.to_string()),
                v => Err(CborJsonError::UnsupportedKey(v.to_string())),
            },
        }
    }

    fn bignum(&mut self, negative: bool) -> Result<Value, CborJsonError> {
        if !matches!(
            self.dec.datatype().map_err(CborJsonError::cbor)?,
            Type::Bytes | Type::BytesIndef
        ) {
            return Err(CborJsonError::Cbor("bignum content must be a byte string".to_string()));
        }

        let bytes = self.byte_string()?;
        let digits: Vec<u8> = bytes.iter().copied().skip_while(|b| *b == 0).collect();
        if digits.len() > 8 {
            let sign = if negative { "-" } else { "" };
            return Err(CborJsonError::IntegerOutOfRange(format!(
                "{sign}0x{}",
                hex::encode(&digits)
            )));
        }

        let magnitude = digits.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
        let value = if negative {
            -1 - i128::from(magnitude)
        } else {
            i128::from(magnitude)
        };
        int_to_json(value)
    }

    fn byte_string(&mut self) -> Result<Vec<u8>, CborJsonError> {
        match self.dec.datatype().map_err(CborJsonError::cbor)? {
            Type::BytesIndef => {
                let mut out = Vec::new();
                for chunk in self.dec.bytes_iter().map_err(CborJsonError::cbor)? {
                    out.extend_from_slice(chunk.map_err(CborJsonError::cbor)?);
                }
                Ok(out)
            }
            _ => Ok(self.dec.bytes().map_err(CborJsonError::cbor)?.to_vec()),
        }
    }

    fn text_string(&mut self) -> Result<String, CborJsonError> {
        match self.dec.datatype().map_err(CborJsonError::cbor)? {
            Type::StringIndef => {
                let mut out = String::new();
                for chunk in self.dec.str_iter().map_err(CborJsonError::cbor)? {
                    out.push_str(chunk.map_err(CborJsonError::cbor)?);
                }
                Ok(out)
            }
            _ => Ok(self.dec.str().map_err(CborJsonError::cbor)?.to_string()),
        }
    }

    /// Consume the break stop code of an indefinite-length container if it is next.
    fn at_break(&mut self) -> Result<bool, CborJsonError> {
        if matches!(self.dec.datatype().map_err(CborJsonError::cbor)?, Type::Break) {
            self.dec.set_position(self.dec.position() + 1);
            return Ok(true);
        }
        Ok(false)
    }
}

fn int_to_json(i: i128) -> Result<Value, CborJsonError> {
    if let Ok(v) = i64::try_from(i) {
        return Ok(Value::Number(Number::from(v)));
    }
    if let Ok(v) = u64::try_from(i) {
        return Ok(Value::Number(Number::from(v)));
    }
    Err(CborJsonError::IntegerOutOfRange(i.to_string()))
}

fn float_to_json(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}
