// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! COSE_Key representation of verification keys (RFC 9053 section 7.1).

use mdocverify_common::CoseAlgorithm;
use minicbor::data::Type;
use minicbor::{Decoder, Encoder};

use crate::{EcCurve, KeyError};

const KTY_LABEL: i64 = 1;
const ALG_LABEL: i64 = 3;
const EC2_CRV_LABEL: i64 = -1;
const EC2_X_LABEL: i64 = -2;
const EC2_Y_LABEL: i64 = -3;
const EC2_D_LABEL: i64 = -4;

const KTY_EC2: i64 = 2;

/// An EC2 public key with coordinates of exactly the curve's field length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ec2Key {
    curve: EcCurve,
    alg: CoseAlgorithm,
    x: Vec<u8>,
    y: Vec<u8>,
}

impl Ec2Key {
    pub fn new(curve: EcCurve, alg: CoseAlgorithm, x: Vec<u8>, y: Vec<u8>) -> Result<Self, KeyError> {
        let expected = curve.field_len();
        if x.len() != expected || y.len() != expected {
            return Err(KeyError::InvalidKey(format!(
                "{curve} coordinates must be {expected} bytes, got x={} y={}",
                x.len(),
                y.len()
            )));
        }
        if alg != curve.default_alg() {
            return Err(KeyError::InvalidKey(format!("{alg} cannot be used with {curve}")));
        }
        Ok(Self { curve, alg, x, y })
    }

    pub fn curve(&self) -> EcCurve {
        self.curve
    }

    pub fn alg(&self) -> CoseAlgorithm {
        self.alg
    }

    pub fn x(&self) -> &[u8] {
        &self.x
    }

    pub fn y(&self) -> &[u8] {
        &self.y
    }

    /// Uncompressed SEC1 point `0x04 || x || y`.
    pub fn sec1_uncompressed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.x.len() + self.y.len());
        out.push(0x04);
        out.extend_from_slice(&self.x);
        out.extend_from_slice(&self.y);
        out
    }
}

/// A key in the form signature verification consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationKey {
    Ec2(Ec2Key),
}

impl VerificationKey {
    pub fn alg(&self) -> CoseAlgorithm {
        match self {
            Self::Ec2(k) => k.alg(),
        }
    }

    /// Encode as a COSE_Key map with labels in deterministic order:
    /// `{1: 2, 3: alg, -1: crv, -2: x, -3: y}`.
    pub fn to_cose_key(&self) -> Result<Vec<u8>, KeyError> {
        let Self::Ec2(key) = self;

        let mut out = Vec::new();
        let mut enc = Encoder::new(&mut out);
        enc.map(5)
            .and_then(|e| e.i64(KTY_LABEL)?.i64(KTY_EC2))
            .and_then(|e| e.i64(ALG_LABEL)?.i64(key.alg.id()))
            .and_then(|e| e.i64(EC2_CRV_LABEL)?.i64(key.curve.cose_crv()))
            .and_then(|e| e.i64(EC2_X_LABEL)?.bytes(&key.x))
            .and_then(|e| e.i64(EC2_Y_LABEL)?.bytes(&key.y))
            .map_err(|e| KeyError::InvalidCoseKey(e.to_string()))?;
        Ok(out)
    }

    /// Decode a COSE_Key map holding an EC2 public key.
    ///
    /// `alg` is optional and defaults to the curve's algorithm. Private key
    /// material (`d`) is rejected.
    pub fn from_cose_key(bytes: &[u8]) -> Result<Self, KeyError> {
        let bad = |msg: String| KeyError::InvalidCoseKey(msg);
        let cbor = |e: minicbor::decode::Error| KeyError::InvalidCoseKey(e.to_string());

        let mut dec = Decoder::new(bytes);
        let len = dec
            .map()
            .map_err(cbor)?
            .ok_or_else(|| bad("indefinite-length maps are not supported".to_string()))?;

        let (mut kty, mut alg, mut crv, mut x, mut y) = (None, None, None, None, None);
        for _ in 0..len {
            if matches!(dec.datatype().map_err(cbor)?, Type::String) {
                dec.str().map_err(cbor)?;
                dec.skip().map_err(cbor)?;
                continue;
            }

            match dec.i64().map_err(cbor)? {
                KTY_LABEL => kty = Some(dec.i64().map_err(cbor)?),
                ALG_LABEL => alg = Some(dec.i64().map_err(cbor)?),
                EC2_CRV_LABEL => crv = Some(dec.i64().map_err(cbor)?),
                EC2_X_LABEL => x = Some(dec.bytes().map_err(cbor)?.to_vec()),
                EC2_Y_LABEL => y = Some(dec.bytes().map_err(cbor)?.to_vec()),
                EC2_D_LABEL => return Err(bad("private key material is not accepted".to_string())),
                _ => dec.skip().map_err(cbor)?,
            }
        }
        if dec.position() != bytes.len() {
            return Err(bad("trailing bytes after COSE_Key".to_string()));
        }

        match kty {
            Some(KTY_EC2) => {}
            Some(other) => return Err(KeyError::UnsupportedKeyAlgorithm(format!("COSE kty {other}"))),
            None => return Err(bad("missing kty".to_string())),
        }

        let crv = crv.ok_or_else(|| bad("missing crv".to_string()))?;
        let curve = EcCurve::from_cose_crv(crv).ok_or_else(|| bad(format!("unsupported crv {crv}")))?;
        let alg = match alg {
            Some(id) => CoseAlgorithm::from_i64(id).ok_or_else(|| bad(format!("unsupported alg {id}")))?,
            None => curve.default_alg(),
        };
        let x = x.ok_or_else(|| bad("missing x coordinate".to_string()))?;
        let y = y.ok_or_else(|| bad("missing y coordinate (compressed points are not supported)".to_string()))?;

        Ok(Self::Ec2(Ec2Key::new(curve, alg, x, y)?))
    }
}
