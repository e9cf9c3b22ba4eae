// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{TransportError, TransportSource};

/// A transport that hands out a fixed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytesTransport {
    payload: Vec<u8>,
}

impl BytesTransport {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self { payload: payload.into() }
    }
}

impl TransportSource for BytesTransport {
    fn name(&self) -> &'static str {
        "bytes"
    }

    fn extract_payload(&self) -> Result<Vec<u8>, TransportError> {
        if self.payload.is_empty() {
            return Err(TransportError::EmptyPayload);
        }
        Ok(self.payload.clone())
    }
}
