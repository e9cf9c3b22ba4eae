// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("Unsupported key algorithm: {0}")]
    UnsupportedKeyAlgorithm(String),

    #[error("coordinate of {len} bytes exceeds the {max} byte field length")]
    CoordinateTooLong { len: usize, max: usize },

    #[error("invalid public key: {0}")]
    InvalidKey(String),

    #[error("invalid COSE_Key: {0}")]
    InvalidCoseKey(String),
}
