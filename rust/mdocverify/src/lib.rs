// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! mdoc credential verification.
//!
//! This crate is the primary Rust entry point: hand [`process`] (or a
//! configured [`MdocProcessor`]) a transport source and the issuer's public
//! key, and it returns the signed claims as JSON text once their COSE_Sign1
//! signature has been validated.
//!
//! ```text
//! transport -> payload -> COSE tag -> handler -> key conversion -> signature -> JSON
//! ```

// Internal implementation modules.
mod verifier;

// Public API organization (lib.rs is a publisher).
mod claims;
mod dispatcher;
mod error;
mod handlers;
mod options;
mod processor;

pub use claims::VerifiedClaims;
pub use dispatcher::CoseDispatcher;
pub use error::ProcessError;
pub use handlers::{CoseMessageHandler, Sign1Handler};
pub use options::{VerifyOptions, DEFAULT_MAX_PAYLOAD_LEN};
pub use processor::{process, MdocProcessor, MdocProcessorBuilder};

pub use mdocverify_common::{CoseAlgorithm, CoseMessageTag, DecodeError};
pub use mdocverify_keys::{
    Ec2PublicKeyConverter, EcCurve, EcPublicKey, KeyConverterRegistry, KeyError, PublicKey, PublicKeyConverter,
};
pub use mdocverify_transport::{
    BytesTransport, NdefMessage, NdefRecord, NfcAction, NfcEvent, NfcTransport, TransportError, TransportSource,
};
