// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Ordered public key converter registry.
//!
//! Converters are consulted in registration order and the first one whose
//! `supports` returns true performs the conversion. The registry is built
//! once and never mutated afterwards, so a shared reference can be used from
//! any thread.

use crate::{to_fixed_len_unsigned, Ec2Key, KeyError, PublicKey, VerificationKey};

/// Converts a [`PublicKey`] into a [`VerificationKey`].
///
/// Contract:
/// - `supports` must be cheap and side-effect free.
/// - `convert` is only called for keys `supports` accepted, but must still
///   reject anything it cannot represent.
pub trait PublicKeyConverter: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self, key: &PublicKey) -> bool;

    fn convert(&self, key: &PublicKey) -> Result<VerificationKey, KeyError>;
}

/// Elliptic-curve keys to COSE EC2 keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ec2PublicKeyConverter;

impl PublicKeyConverter for Ec2PublicKeyConverter {
    fn name(&self) -> &'static str {
        "ec2"
    }

    fn supports(&self, key: &PublicKey) -> bool {
        matches!(key, PublicKey::Ec(_))
    }

    fn convert(&self, key: &PublicKey) -> Result<VerificationKey, KeyError> {
        let PublicKey::Ec(ec) = key else {
            return Err(KeyError::UnsupportedKeyAlgorithm(key.algorithm().to_string()));
        };

        let curve = ec.curve();
        let x = to_fixed_len_unsigned(ec.x(), curve.field_len())?;
        let y = to_fixed_len_unsigned(ec.y(), curve.field_len())?;
        Ok(VerificationKey::Ec2(Ec2Key::new(curve, curve.default_alg(), x, y)?))
    }
}

pub struct KeyConverterRegistry {
    converters: Vec<Box<dyn PublicKeyConverter>>,
}

impl KeyConverterRegistry {
    /// An empty registry; every key is unsupported until converters are added.
    pub fn empty() -> Self {
        Self { converters: Vec::new() }
    }

    /// Append a converter. Earlier registrations take priority.
    pub fn with_converter(mut self, converter: impl PublicKeyConverter + 'static) -> Self {
        self.converters.push(Box::new(converter));
        self
    }

    pub fn converter_names(&self) -> Vec<&'static str> {
        self.converters.iter().map(|c| c.name()).collect()
    }

    /// Convert `key` with the first converter that supports it.
    pub fn convert(&self, key: &PublicKey) -> Result<VerificationKey, KeyError> {
        let converter = self
            .converters
            .iter()
            .find(|c| c.supports(key))
            .ok_or_else(|| KeyError::UnsupportedKeyAlgorithm(key.algorithm().to_string()))?;

        let converted = converter.convert(key)?;
        tracing::debug!(
            converter = converter.name(),
            algorithm = key.algorithm(),
            alg = %converted.alg(),
            "converted public key"
        );
        Ok(converted)
    }
}

impl Default for KeyConverterRegistry {
    fn default() -> Self {
        Self::empty().with_converter(Ec2PublicKeyConverter)
    }
}

impl std::fmt::Debug for KeyConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyConverterRegistry")
            .field("converters", &self.converter_names())
            .finish()
    }
}
