// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

/// JSON text of content whose signature has been validated.
///
/// Only the crate's handlers construct this, and only after signature
/// validation succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerifiedClaims(String);

impl VerifiedClaims {
    pub(crate) fn from_json(value: &serde_json::Value) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Parse the claims back into a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.0)
    }
}

impl fmt::Display for VerifiedClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VerifiedClaims {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for VerifiedClaims {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for VerifiedClaims {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
