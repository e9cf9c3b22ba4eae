// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Verification entry point.
//!
//! `process` extracts the payload from a transport and hands it to the
//! dispatcher. A transport failure stops the call before any decoding.

use mdocverify_keys::{KeyConverterRegistry, PublicKey};
use mdocverify_transport::TransportSource;

use crate::{CoseDispatcher, CoseMessageHandler, ProcessError, Sign1Handler, VerifiedClaims, VerifyOptions};

/// Transport extraction plus dispatch, configured once and reused.
#[derive(Debug)]
pub struct MdocProcessor {
    dispatcher: CoseDispatcher,
}

impl MdocProcessor {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> MdocProcessorBuilder {
        MdocProcessorBuilder::default()
    }

    pub fn dispatcher(&self) -> &CoseDispatcher {
        &self.dispatcher
    }

    pub fn process(&self, transport: &dyn TransportSource, key: &PublicKey) -> Result<VerifiedClaims, ProcessError> {
        let payload = transport.extract_payload()?;
        tracing::debug!(transport = transport.name(), len = payload.len(), "payload extracted");
        self.dispatcher.dispatch(&payload, key)
    }
}

impl Default for MdocProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
pub struct MdocProcessorBuilder {
    options: VerifyOptions,
    converters: Option<KeyConverterRegistry>,
    handlers: Vec<Box<dyn CoseMessageHandler>>,
}

impl MdocProcessorBuilder {
    pub fn with_options(mut self, options: VerifyOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the key converters used by the built-in COSE_Sign1 handler.
    pub fn with_converters(mut self, converters: KeyConverterRegistry) -> Self {
        self.converters = Some(converters);
        self
    }

    /// Register an extra handler. Extra handlers are consulted before the
    /// built-in COSE_Sign1 handler, in registration order.
    pub fn with_handler(mut self, handler: impl CoseMessageHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn build(self) -> MdocProcessor {
        let sign1 = Sign1Handler::new(self.converters.unwrap_or_default(), &self.options);

        let dispatcher = self
            .handlers
            .into_iter()
            .fold(CoseDispatcher::empty(), CoseDispatcher::with_boxed_handler)
            .with_handler(sign1)
            .with_max_payload_len(self.options.max_payload_len);
        MdocProcessor { dispatcher }
    }
}

/// Verify the message carried by `transport` against `key` with default settings.
pub fn process(transport: &dyn TransportSource, key: &PublicKey) -> Result<VerifiedClaims, ProcessError> {
    MdocProcessor::new().process(transport, key)
}
