// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Converter registry behavior: first-match lookup, EC2 padding rules and
//! explicit failures for unsupported algorithms.

use mdocverify_keys::{
    EcCurve, EcPublicKey, KeyConverterRegistry, KeyError, PublicKey, PublicKeyConverter, VerificationKey,
};
use mdocverify_common::CoseAlgorithm;
use rand_core::OsRng;

fn ec2(key: VerificationKey) -> mdocverify_keys::Ec2Key {
    match key {
        VerificationKey::Ec2(k) => k,
    }
}

#[test]
fn converts_p256_key_to_32_byte_coordinates() {
    let sk = p256::ecdsa::SigningKey::random(&mut OsRng);
    let key = PublicKey::from(sk.verifying_key().clone());

    let converted = ec2(KeyConverterRegistry::default().convert(&key).unwrap());
    assert_eq!(converted.curve(), EcCurve::P256);
    assert_eq!(converted.alg(), CoseAlgorithm::ES256);
    assert_eq!(converted.x().len(), 32);
    assert_eq!(converted.y().len(), 32);

    let point = sk.verifying_key().to_encoded_point(false);
    assert_eq!(converted.sec1_uncompressed(), point.as_bytes());
}

#[test]
fn conversion_is_deterministic() {
    let sk = p256::ecdsa::SigningKey::random(&mut OsRng);
    let key = PublicKey::from(sk.verifying_key().clone());
    let registry = KeyConverterRegistry::default();

    assert_eq!(registry.convert(&key).unwrap(), registry.convert(&key).unwrap());
}

#[test]
fn short_coordinates_are_left_padded() {
    let key = PublicKey::from(EcPublicKey::new(EcCurve::P256, vec![0x01, 0x02], vec![0x00, 0x00, 0x03]));

    let converted = ec2(KeyConverterRegistry::default().convert(&key).unwrap());
    let mut expected_x = vec![0u8; 30];
    expected_x.extend_from_slice(&[0x01, 0x02]);
    let mut expected_y = vec![0u8; 31];
    expected_y.push(0x03);
    assert_eq!(converted.x(), expected_x.as_slice());
    assert_eq!(converted.y(), expected_y.as_slice());
}

#[test]
fn sign_byte_prefixed_coordinates_are_accepted() {
    let mut x = vec![0x00];
    x.extend_from_slice(&[0x80; 32]);
    let key = PublicKey::from(EcPublicKey::new(EcCurve::P256, x, vec![0x01; 32]));

    let converted = ec2(KeyConverterRegistry::default().convert(&key).unwrap());
    assert_eq!(converted.x(), [0x80; 32].as_slice());
}

#[test]
fn oversized_coordinate_is_rejected() {
    let key = PublicKey::from(EcPublicKey::new(EcCurve::P256, vec![0x01; 33], vec![0x01; 32]));

    let err = KeyConverterRegistry::default().convert(&key).unwrap_err();
    assert_eq!(err, KeyError::CoordinateTooLong { len: 33, max: 32 });
}

#[test]
fn padding_follows_the_curve_field_length() {
    let sk = p384::ecdsa::SigningKey::random(&mut OsRng);
    let key = PublicKey::from(sk.verifying_key().clone());

    let converted = ec2(KeyConverterRegistry::default().convert(&key).unwrap());
    assert_eq!(converted.curve(), EcCurve::P384);
    assert_eq!(converted.alg(), CoseAlgorithm::ES384);
    assert_eq!(converted.x().len(), 48);

    // 40 bytes fit P-384 but not P-256.
    let p384_key = PublicKey::from(EcPublicKey::new(EcCurve::P384, vec![0x01; 40], vec![0x01; 40]));
    assert!(KeyConverterRegistry::default().convert(&p384_key).is_ok());
    let p256_key = PublicKey::from(EcPublicKey::new(EcCurve::P256, vec![0x01; 40], vec![0x01; 40]));
    assert!(KeyConverterRegistry::default().convert(&p256_key).is_err());
}

#[test]
fn rsa_keys_are_unsupported() {
    let sk = rsa::RsaPrivateKey::new(&mut OsRng, 1024).unwrap();
    let key = PublicKey::from(sk.to_public_key());

    let err = KeyConverterRegistry::default().convert(&key).unwrap_err();
    assert_eq!(err, KeyError::UnsupportedKeyAlgorithm("RSA".to_string()));
    assert!(err.to_string().contains("Unsupported"), "{err}");
}

#[test]
fn empty_registry_supports_nothing() {
    let key = PublicKey::from(EcPublicKey::new(EcCurve::P256, vec![1], vec![2]));
    let err = KeyConverterRegistry::empty().convert(&key).unwrap_err();
    assert_eq!(err, KeyError::UnsupportedKeyAlgorithm("EC".to_string()));
}

struct FixedConverter(&'static str, VerificationKey);

impl PublicKeyConverter for FixedConverter {
    fn name(&self) -> &'static str {
        self.0
    }

    fn supports(&self, key: &PublicKey) -> bool {
        matches!(key, PublicKey::Ec(_))
    }

    fn convert(&self, _key: &PublicKey) -> Result<VerificationKey, KeyError> {
        Ok(self.1.clone())
    }
}

#[test]
fn first_registered_converter_wins() {
    let sk = p256::ecdsa::SigningKey::random(&mut OsRng);
    let key = PublicKey::from(sk.verifying_key().clone());
    let canned = KeyConverterRegistry::default().convert(&PublicKey::from(EcPublicKey::new(
        EcCurve::P256,
        vec![0x07],
        vec![0x09],
    )))
    .unwrap();

    let registry = KeyConverterRegistry::empty()
        .with_converter(FixedConverter("canned", canned.clone()))
        .with_converter(mdocverify_keys::Ec2PublicKeyConverter);
    assert_eq!(registry.converter_names(), vec!["canned", "ec2"]);
    assert_eq!(registry.convert(&key).unwrap(), canned);
}
