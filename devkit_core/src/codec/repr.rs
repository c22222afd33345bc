//! Base64 and hex renderings of a byte buffer.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use hex::FromHexError;

use super::error::{CodecError, CodecResult};
use super::types::TextRepresentation;

// Accepts what the browser's atob accepts: padding optional, loose trailing bits.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

pub fn to_text(bytes: &[u8], format: TextRepresentation) -> String {
    match format {
        TextRepresentation::Hex => hex::encode(bytes),
        TextRepresentation::Base64 => STANDARD.encode(bytes),
    }
}

pub fn from_text(text: &str, format: TextRepresentation) -> CodecResult<Vec<u8>> {
    match format {
        TextRepresentation::Hex => parse_hex(text),
        TextRepresentation::Base64 => parse_base64(text),
    }
}

/// Parses `[0-9A-Fa-f]*`, treating an odd-length input as if it had a
/// leading `0` nibble.
pub fn parse_hex(text: &str) -> CodecResult<Vec<u8>> {
    let pad = text.len() % 2;
    let padded = if pad == 1 {
        format!("0{text}")
    } else {
        text.to_string()
    };
    hex::decode(padded).map_err(|err| {
        let offset = match err {
            FromHexError::InvalidHexCharacter { index, .. } => index.saturating_sub(pad),
            _ => text.len(),
        };
        malformed_hex(text, offset)
    })
}

// Reports the character covering byte `offset`, counted in characters.
fn malformed_hex(text: &str, offset: usize) -> CodecError {
    let (index, character) = text
        .char_indices()
        .enumerate()
        .take_while(|(_, (start, _))| *start <= offset)
        .last()
        .map(|(index, (_, character))| (index, character))
        .unwrap_or((0, '\0'));
    CodecError::MalformedHex { index, character }
}

/// Drops whitespace, checks `[A-Za-z0-9+/]*={0,2}` and decodes.
pub fn parse_base64(text: &str) -> CodecResult<Vec<u8>> {
    let cleaned: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();
    let body = cleaned.trim_end_matches('=');
    let padding = cleaned.len() - body.len();
    if padding > 2 {
        return Err(CodecError::MalformedBase64 {
            reason: format!("{padding} padding characters, at most 2 allowed"),
        });
    }
    if let Some(bad) = body
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '+' || *ch == '/'))
    {
        return Err(CodecError::MalformedBase64 {
            reason: format!("unexpected character {bad:?}"),
        });
    }
    LENIENT_STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|err| CodecError::MalformedBase64 {
            reason: err.to_string(),
        })
}
