use thiserror::Error;

use super::types::ScalarType;

/// Why a single encode/decode call was rejected.
///
/// Every variant is plain data: callers show the message next to the last good
/// result and wait for the user to fix the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid {kind} literal: {input:?}")]
    MalformedNumber { kind: ScalarType, input: String },

    #[error("{value} is out of range for {kind} ({min}..={max})")]
    OutOfRange {
        kind: ScalarType,
        value: String,
        min: i64,
        max: i64,
    },

    #[error("invalid hex character {character:?} at position {index}")]
    MalformedHex { index: usize, character: char },

    #[error("invalid Base64 input: {reason}")]
    MalformedBase64 { reason: String },

    #[error("bytes are not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },

    #[error("{kind} needs exactly {expected} bytes, got {actual}")]
    InvalidLength {
        kind: ScalarType,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported {field}: {token}")]
    UnknownToken { field: &'static str, token: String },
}

pub type CodecResult<T> = Result<T, CodecError>;
