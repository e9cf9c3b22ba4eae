// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-message-type handlers.

mod sign1;

pub use sign1::Sign1Handler;

use mdocverify_common::CoseMessageTag;
use mdocverify_keys::PublicKey;

use crate::{ProcessError, VerifiedClaims};

/// Handles one or more COSE message types.
///
/// Contract:
/// - `supports` is a pure predicate over the message tag.
/// - `handle` receives the complete payload (tag included) and only returns
///   claims after their authenticity has been established.
pub trait CoseMessageHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self, tag: CoseMessageTag) -> bool;

    fn handle(&self, payload: &[u8], key: &PublicKey) -> Result<VerifiedClaims, ProcessError>;
}
