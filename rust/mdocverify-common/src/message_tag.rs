// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! COSE message-type tags and the routing decode.
//!
//! `decode_message` is the first thing that looks at a transport payload. It
//! only establishes that the bytes are exactly one well-formed CBOR data item
//! and which COSE message tag wraps it; interpreting the body is left to the
//! handler selected for that tag.

use std::fmt;

use minicbor::data::Type;
use minicbor::Decoder;

/// Self-described CBOR magic tag (RFC 8949 section 3.4.6). Skipped when looking for the COSE tag.
pub const SELF_DESCRIBED_CBOR_TAG: u64 = 55799;

/// COSE message tags (RFC 9052 section 2).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum CoseMessageTag {
    Encrypt0 = 16,
    Mac0 = 17,
    Sign1 = 18,
    Encrypt = 96,
    Mac = 97,
    Sign = 98,
}

impl CoseMessageTag {
    pub fn from_u64(tag: u64) -> Option<Self> {
        match tag {
            16 => Some(Self::Encrypt0),
            17 => Some(Self::Mac0),
            18 => Some(Self::Sign1),
            96 => Some(Self::Encrypt),
            97 => Some(Self::Mac),
            98 => Some(Self::Sign),
            _ => None,
        }
    }

    pub fn as_u64(self) -> u64 {
        self as u64
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Encrypt0 => "Encrypt0",
            Self::Mac0 => "Mac0",
            Self::Sign1 => "Sign1",
            Self::Encrypt => "Encrypt",
            Self::Mac => "Mac",
            Self::Sign => "Sign",
        }
    }
}

impl fmt::Display for CoseMessageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (tag {})", self.name(), self.as_u64())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed CBOR: {0}")]
    MalformedCbor(String),

    #[error("missing COSE message tag")]
    MissingTag,

    #[error("payload of {len} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { len: usize, max: usize },
}

/// A payload whose outer tag has been read.
///
/// The tag number is kept as found; it need not be one of the COSE message tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedMessage<'a> {
    pub tag: u64,
    /// The complete payload, tag included.
    pub bytes: &'a [u8],
}

impl DecodedMessage<'_> {
    /// The COSE message type, if the tag is one.
    pub fn message_tag(&self) -> Option<CoseMessageTag> {
        CoseMessageTag::from_u64(self.tag)
    }
}

/// Render a tag number, naming it when it is a COSE message tag.
pub fn describe_tag(tag: u64) -> String {
    match CoseMessageTag::from_u64(tag) {
        Some(known) => known.to_string(),
        None => tag.to_string(),
    }
}

/// Check `input` is a single CBOR data item and read its outermost tag.
pub fn decode_message(input: &[u8]) -> Result<DecodedMessage<'_>, DecodeError> {
    if input.is_empty() {
        return Err(DecodeError::MalformedCbor("empty input".to_string()));
    }

    let mut dec = Decoder::new(input);
    dec.skip()
        .map_err(|e| DecodeError::MalformedCbor(e.to_string()))?;
    if dec.position() != input.len() {
        return Err(DecodeError::MalformedCbor(format!(
            "{} trailing bytes after CBOR data item",
            input.len() - dec.position()
        )));
    }

    let mut dec = Decoder::new(input);
    let tag = loop {
        let datatype = dec
            .datatype()
            .map_err(|e| DecodeError::MalformedCbor(e.to_string()))?;
        if !matches!(datatype, Type::Tag) {
            return Err(DecodeError::MissingTag);
        }

        let tag = dec
            .tag()
            .map_err(|e| DecodeError::MalformedCbor(format!("failed to read CBOR tag: {e}")))?
            .as_u64();
        if tag != SELF_DESCRIBED_CBOR_TAG {
            break tag;
        }
    };

    Ok(DecodedMessage { tag, bytes: input })
}
