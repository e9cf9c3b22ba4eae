// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use mdocverify_common::{decode_message, DecodeError};
use mdocverify_keys::PublicKey;

use crate::{CoseMessageHandler, ProcessError, VerifiedClaims, DEFAULT_MAX_PAYLOAD_LEN};

/// Routes a payload to the first registered handler supporting its COSE tag.
pub struct CoseDispatcher {
    handlers: Vec<Box<dyn CoseMessageHandler>>,
    max_payload_len: usize,
}

impl CoseDispatcher {
    /// A dispatcher with no handlers; every message is unsupported.
    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
        }
    }

    /// Append a handler. Earlier registrations take priority.
    pub fn with_handler(mut self, handler: impl CoseMessageHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub(crate) fn with_boxed_handler(mut self, handler: Box<dyn CoseMessageHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn with_max_payload_len(mut self, max: usize) -> Self {
        self.max_payload_len = max;
        self
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub fn dispatch(&self, payload: &[u8], key: &PublicKey) -> Result<VerifiedClaims, ProcessError> {
        if payload.len() > self.max_payload_len {
            return Err(DecodeError::PayloadTooLarge {
                len: payload.len(),
                max: self.max_payload_len,
            }
            .into());
        }
        tracing::trace!(payload = %hex::encode(payload), "dispatching payload");

        let decoded = decode_message(payload)?;
        let handler = decoded
            .message_tag()
            .and_then(|tag| self.handlers.iter().find(|h| h.supports(tag)))
            .ok_or(ProcessError::UnsupportedMessageTag(decoded.tag))?;

        tracing::debug!(tag = decoded.tag, handler = handler.name(), len = payload.len(), "dispatching COSE message");
        handler.handle(decoded.bytes, key)
    }
}

impl std::fmt::Debug for CoseDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoseDispatcher")
            .field("handlers", &self.handler_names())
            .field("max_payload_len", &self.max_payload_len)
            .finish()
    }
}
