// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! CBOR/COSE building blocks shared by the mdoc verification crates.
//!
//! Nothing in here verifies signatures or touches key material. The crate
//! decodes transport payloads far enough to route them (`decode_message`),
//! parses COSE_Sign1 structures, builds the Sig_structure that signatures are
//! computed over, and maps authenticated CBOR content to JSON.

pub mod algorithms;
pub mod cbor_json;
pub mod cose_sign1;
pub mod header_map;
pub mod message_tag;

pub use algorithms::CoseAlgorithm;
pub use cbor_json::{cbor_to_json, cbor_to_json_with_max_depth, CborJsonError, DEFAULT_MAX_NESTING_DEPTH};
pub use cose_sign1::{
    encode_signature1_sig_structure, parse_cose_sign1, CoseSign1Error, ParsedCoseSign1, SigStructureView,
};
pub use header_map::{CoseHeaderMap, HeaderKey, HeaderValue};
pub use message_tag::{decode_message, describe_tag, CoseMessageTag, DecodeError, DecodedMessage};
