// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::KeyError;

/// Encode an unsigned big-endian integer as exactly `len` bytes, left-padded with zeros.
///
/// `value` may carry leading zero bytes (for example the sign byte of a two's
/// complement encoding); they are not counted. A value needing more than `len`
/// bytes is an error, never truncated.
pub fn to_fixed_len_unsigned(value: &[u8], len: usize) -> Result<Vec<u8>, KeyError> {
    let start = value.iter().position(|b| *b != 0).unwrap_or(value.len());
    let digits = &value[start..];
    if digits.len() > len {
        return Err(KeyError::CoordinateTooLong {
            len: digits.len(),
            max: len,
        });
    }

    let mut out = vec![0u8; len];
    out[len - digits.len()..].copy_from_slice(digits);
    Ok(out)
}
