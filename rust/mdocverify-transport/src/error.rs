// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::NfcAction;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Not an NFC action: {actual}")]
    WrongAction { actual: NfcAction },

    #[error("Missing NDEF message")]
    MissingMessage,

    #[error("NDEF message has no records")]
    EmptyRecordList,

    #[error("Missing NDEF record payload")]
    EmptyPayload,

    #[error("malformed NDEF message: {0}")]
    MalformedNdef(String),
}
