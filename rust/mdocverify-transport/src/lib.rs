// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Transport sources.
//!
//! A transport source pulls the raw bytes of a signed message out of a
//! delivery-channel envelope. NFC is the only hardware channel implemented
//! here; [`BytesTransport`] serves fixed payloads for tests and for hosts that
//! already hold the bytes.

pub mod bytes;
pub mod error;
pub mod ndef;
pub mod nfc;

pub use bytes::BytesTransport;
pub use error::TransportError;
pub use ndef::{NdefMessage, NdefRecord, Tnf};
pub use nfc::{NfcAction, NfcEvent, NfcTransport};

/// A source of one raw message payload.
///
/// Contract:
/// - `extract_payload` is a pure function of the envelope the source wraps;
///   calling it twice yields the same result.
/// - A returned payload is never empty.
pub trait TransportSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn extract_payload(&self) -> Result<Vec<u8>, TransportError>;
}

impl<T: TransportSource + ?Sized> TransportSource for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn extract_payload(&self) -> Result<Vec<u8>, TransportError> {
        (**self).extract_payload()
    }
}
