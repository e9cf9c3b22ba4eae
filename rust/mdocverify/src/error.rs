// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use mdocverify_common::{describe_tag, CoseAlgorithm, CoseMessageTag, DecodeError};
use mdocverify_keys::KeyError;
use mdocverify_transport::TransportError;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every way a verification call can fail.
///
/// Lower-layer errors are wrapped unchanged so callers can match on the
/// original cause.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Well-formed CBOR that no registered handler accepts. Carries the raw
    /// tag number, which may be outside the COSE message tags.
    #[error("Unsupported COSE message tag: {}", describe_tag(*.0))]
    UnsupportedMessageTag(u64),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("missing or invalid alg header: {0}")]
    MissingOrInvalidAlg(String),

    #[error("alg header mismatch: expected {expected}, got {actual}")]
    AlgorithmMismatch {
        expected: CoseAlgorithm,
        actual: CoseAlgorithm,
    },

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("COSE handler failed: {0}")]
    HandlerInternal(#[source] BoxError),
}

impl ProcessError {
    pub fn handler_internal(cause: impl Into<BoxError>) -> Self {
        Self::HandlerInternal(cause.into())
    }

    /// The COSE message type of an `UnsupportedMessageTag`, if its tag is one.
    pub fn unsupported_message_tag(&self) -> Option<CoseMessageTag> {
        match self {
            Self::UnsupportedMessageTag(tag) => CoseMessageTag::from_u64(*tag),
            _ => None,
        }
    }

    /// Stable machine-readable code for the failure.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Decode(_) => "COSE_PARSE_ERROR",
            Self::UnsupportedMessageTag(_) => "UNSUPPORTED_MESSAGE_TAG",
            Self::Key(KeyError::UnsupportedKeyAlgorithm(_)) => "UNSUPPORTED_KEY",
            Self::Key(_) | Self::InvalidPublicKey(_) => "INVALID_PUBLIC_KEY",
            Self::MissingOrInvalidAlg(_) => "MISSING_OR_INVALID_ALG",
            Self::AlgorithmMismatch { .. } => "ALG_MISMATCH",
            Self::InvalidSignature => "BAD_SIGNATURE",
            Self::HandlerInternal(_) => "HANDLER_ERROR",
        }
    }
}
