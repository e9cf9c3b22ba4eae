// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Public key adapters.
//!
//! Callers hold keys in whatever form their platform gives them (DER SPKI, a
//! curve crate's `PublicKey`, raw affine coordinates). Signature verification
//! needs a COSE EC2 key with fixed-length coordinates. The
//! [`KeyConverterRegistry`] bridges the two: it asks each registered converter,
//! in registration order, whether it supports a key and lets the first match
//! convert it.

pub mod converters;
pub mod cose_key;
pub mod error;
pub mod fixed_len;
pub mod public_key;

pub use converters::{Ec2PublicKeyConverter, KeyConverterRegistry, PublicKeyConverter};
pub use cose_key::{Ec2Key, VerificationKey};
pub use error::KeyError;
pub use fixed_len::to_fixed_len_unsigned;
pub use public_key::{EcCurve, EcPublicKey, PublicKey};
