// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Caller-facing public key types.

use std::fmt;

use mdocverify_common::CoseAlgorithm;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::DecodePublicKey as _;

use crate::KeyError;

/// NIST curves with a COSE EC2 representation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EcCurve {
    P256,
    P384,
    P521,
}

impl EcCurve {
    /// Byte length of a field element, i.e. of each EC2 coordinate.
    pub fn field_len(self) -> usize {
        match self {
            Self::P256 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
        }
    }

    /// COSE Elliptic Curves registry identifier (`crv`).
    pub fn cose_crv(self) -> i64 {
        match self {
            Self::P256 => 1,
            Self::P384 => 2,
            Self::P521 => 3,
        }
    }

    pub fn from_cose_crv(crv: i64) -> Option<Self> {
        match crv {
            1 => Some(Self::P256),
            2 => Some(Self::P384),
            3 => Some(Self::P521),
            _ => None,
        }
    }

    /// The ECDSA algorithm paired with this curve.
    pub fn default_alg(self) -> CoseAlgorithm {
        match self {
            Self::P256 => CoseAlgorithm::ES256,
            Self::P384 => CoseAlgorithm::ES384,
            Self::P521 => CoseAlgorithm::ES512,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
        }
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An elliptic-curve public key given by its affine coordinates.
///
/// Coordinates are unsigned big-endian integers of any length, as handed out
/// by platform key APIs; normalizing them to the field length is the
/// converter's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcPublicKey {
    curve: EcCurve,
    x: Vec<u8>,
    y: Vec<u8>,
}

impl EcPublicKey {
    pub fn new(curve: EcCurve, x: impl Into<Vec<u8>>, y: impl Into<Vec<u8>>) -> Self {
        Self {
            curve,
            x: x.into(),
            y: y.into(),
        }
    }

    /// Decode a SEC1 encoded point (compressed or uncompressed) on `curve`.
    pub fn from_sec1_bytes(curve: EcCurve, bytes: &[u8]) -> Result<Self, KeyError> {
        let invalid = |e: p256::elliptic_curve::Error| KeyError::InvalidKey(format!("bad {curve} point: {e}"));
        match curve {
            EcCurve::P256 => p256::PublicKey::from_sec1_bytes(bytes).map(Self::from).map_err(invalid),
            EcCurve::P384 => p384::PublicKey::from_sec1_bytes(bytes).map(Self::from).map_err(invalid),
            EcCurve::P521 => p521::PublicKey::from_sec1_bytes(bytes).map(Self::from).map_err(invalid),
        }
    }

    pub fn curve(&self) -> EcCurve {
        self.curve
    }

    pub fn x(&self) -> &[u8] {
        &self.x
    }

    pub fn y(&self) -> &[u8] {
        &self.y
    }
}

/// A public key handed in for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    Ec(EcPublicKey),
    Rsa(rsa::RsaPublicKey),
}

impl PublicKey {
    /// Key algorithm family name ("EC", "RSA").
    pub fn algorithm(&self) -> &'static str {
        match self {
            Self::Ec(_) => "EC",
            Self::Rsa(_) => "RSA",
        }
    }

    /// Decode a DER SubjectPublicKeyInfo.
    pub fn from_public_key_der(der: &[u8]) -> Result<Self, KeyError> {
        if let Ok(pk) = p256::PublicKey::from_public_key_der(der) {
            return Ok(pk.into());
        }
        if let Ok(pk) = p384::PublicKey::from_public_key_der(der) {
            return Ok(pk.into());
        }
        if let Ok(pk) = p521::PublicKey::from_public_key_der(der) {
            return Ok(pk.into());
        }
        if let Ok(pk) = rsa::RsaPublicKey::from_public_key_der(der) {
            return Ok(pk.into());
        }
        Err(KeyError::InvalidKey("unrecognized SubjectPublicKeyInfo".to_string()))
    }
}

impl From<EcPublicKey> for PublicKey {
    fn from(key: EcPublicKey) -> Self {
        Self::Ec(key)
    }
}

impl From<rsa::RsaPublicKey> for PublicKey {
    fn from(key: rsa::RsaPublicKey) -> Self {
        Self::Rsa(key)
    }
}

macro_rules! impl_from_curve_key {
    ($krate:ident, $curve:expr) => {
        impl From<$krate::PublicKey> for EcPublicKey {
            fn from(pk: $krate::PublicKey) -> Self {
                // Public keys are never the identity, so both coordinates are present.
                let point = pk.to_encoded_point(false);
                let x = point.x().map(|c| c.to_vec()).unwrap_or_default();
                let y = point.y().map(|c| c.to_vec()).unwrap_or_default();
                Self::new($curve, x, y)
            }
        }

        impl From<$krate::PublicKey> for PublicKey {
            fn from(pk: $krate::PublicKey) -> Self {
                Self::Ec(pk.into())
            }
        }
    };
}

impl_from_curve_key!(p256, EcCurve::P256);
impl_from_curve_key!(p384, EcCurve::P384);
impl_from_curve_key!(p521, EcCurve::P521);

impl From<p256::ecdsa::VerifyingKey> for PublicKey {
    fn from(vk: p256::ecdsa::VerifyingKey) -> Self {
        p256::PublicKey::from(&vk).into()
    }
}

impl From<p384::ecdsa::VerifyingKey> for PublicKey {
    fn from(vk: p384::ecdsa::VerifyingKey) -> Self {
        p384::PublicKey::from(&vk).into()
    }
}
