// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! NFC reader events.

use std::fmt;

use crate::{NdefMessage, TransportError, TransportSource};

const ACTION_PREFIX: &str = "android.nfc.action.";

/// The dispatch action a reader reported for a tag or peer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NfcAction {
    NdefDiscovered,
    TechDiscovered,
    TagDiscovered,
    Other(String),
}

impl NfcAction {
    /// Map a reader action identifier. Both the fully qualified Android form
    /// (`android.nfc.action.NDEF_DISCOVERED`) and the bare name are accepted.
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier.strip_prefix(ACTION_PREFIX).unwrap_or(identifier) {
            "NDEF_DISCOVERED" => Self::NdefDiscovered,
            "TECH_DISCOVERED" => Self::TechDiscovered,
            "TAG_DISCOVERED" => Self::TagDiscovered,
            _ => Self::Other(identifier.to_string()),
        }
    }

    pub fn identifier(&self) -> String {
        match self {
            Self::NdefDiscovered => format!("{ACTION_PREFIX}NDEF_DISCOVERED"),
            Self::TechDiscovered => format!("{ACTION_PREFIX}TECH_DISCOVERED"),
            Self::TagDiscovered => format!("{ACTION_PREFIX}TAG_DISCOVERED"),
            Self::Other(s) => s.clone(),
        }
    }
}

impl fmt::Display for NfcAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}

/// A reader event: the action plus any NDEF messages it carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfcEvent {
    action: NfcAction,
    messages: Option<Vec<NdefMessage>>,
}

impl NfcEvent {
    /// An event without a message list.
    pub fn new(action: NfcAction) -> Self {
        Self { action, messages: None }
    }

    pub fn with_messages(mut self, messages: Vec<NdefMessage>) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Attach messages given in binary NDEF form.
    pub fn with_raw_messages<'a>(self, raw: impl IntoIterator<Item = &'a [u8]>) -> Result<Self, TransportError> {
        let messages = raw.into_iter().map(NdefMessage::parse).collect::<Result<Vec<_>, _>>()?;
        Ok(self.with_messages(messages))
    }

    pub fn action(&self) -> &NfcAction {
        &self.action
    }

    pub fn messages(&self) -> Option<&[NdefMessage]> {
        self.messages.as_deref()
    }
}

/// Extracts the payload of the first record of the first NDEF message of an
/// `NDEF_DISCOVERED` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfcTransport {
    event: NfcEvent,
}

impl NfcTransport {
    pub fn new(event: NfcEvent) -> Self {
        Self { event }
    }

    pub fn event(&self) -> &NfcEvent {
        &self.event
    }
}

impl TransportSource for NfcTransport {
    fn name(&self) -> &'static str {
        "nfc"
    }

    fn extract_payload(&self) -> Result<Vec<u8>, TransportError> {
        if self.event.action != NfcAction::NdefDiscovered {
            return Err(TransportError::WrongAction {
                actual: self.event.action.clone(),
            });
        }

        let message = self
            .event
            .messages()
            .and_then(|m| m.first())
            .ok_or(TransportError::MissingMessage)?;
        let record = message.records().first().ok_or(TransportError::EmptyRecordList)?;
        if record.payload().is_empty() {
            return Err(TransportError::EmptyPayload);
        }

        tracing::debug!(
            transport = "nfc",
            messages = self.event.messages().map_or(0, <[_]>::len),
            records = message.records().len(),
            len = record.payload().len(),
            "extracted NDEF record payload"
        );
        Ok(record.payload().to_vec())
    }
}
