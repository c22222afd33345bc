//! Typed binary codec.
//!
//! A value typed as one of the [`ScalarType`]s is laid out as a big-endian
//! byte buffer, optionally flipped to little-endian, and rendered as hex or
//! Base64. Decoding runs the same pipeline backwards. Every step is pure, so
//! the page can call it on each keystroke and drop stale results freely.
//!
//! # Examples
//!
//! ```rust
//! use devkit_core::codec::{decode, encode, Endianness, ScalarType, TextRepresentation};
//!
//! let hex = encode("1", ScalarType::Int32, Endianness::Little, TextRepresentation::Hex)?;
//! assert_eq!(hex, "01000000");
//! let back = decode(&hex, TextRepresentation::Hex, ScalarType::Int32, Endianness::Little)?;
//! assert_eq!(back, "1");
//! # Ok::<(), devkit_core::codec::CodecError>(())
//! ```

pub mod byte_order;
pub mod error;
pub mod repr;
pub mod scalar;
pub mod types;

use serde::{Deserialize, Serialize};

pub use error::{CodecError, CodecResult};
pub use types::{Endianness, ScalarType, TextRepresentation};

/// Encodes `value` as `kind`, laid out in `order`, rendered as `format`.
pub fn encode(
    value: &str,
    kind: ScalarType,
    order: Endianness,
    format: TextRepresentation,
) -> CodecResult<String> {
    let bytes = encode_bytes(value, kind, order)?;
    Ok(repr::to_text(&bytes, format))
}

/// Builds the byte buffer `encode` would render.
pub fn encode_bytes(value: &str, kind: ScalarType, order: Endianness) -> CodecResult<Vec<u8>> {
    let mut bytes = scalar::value_to_bytes(value, kind)?;
    let width = kind.element_width(bytes.len());
    byte_order::reorder(&mut bytes, order, width);
    Ok(bytes)
}

/// Parses `text` as `format` and renders the bytes back as a `kind` value.
pub fn decode(
    text: &str,
    format: TextRepresentation,
    kind: ScalarType,
    order: Endianness,
) -> CodecResult<String> {
    let bytes = repr::from_text(text, format)?;
    decode_bytes(bytes, kind, order)
}

/// Interprets an already parsed buffer laid out in `order` as `kind`.
pub fn decode_bytes(mut bytes: Vec<u8>, kind: ScalarType, order: Endianness) -> CodecResult<String> {
    scalar::check_integer_length(&bytes, kind)?;
    let width = kind.element_width(bytes.len());
    byte_order::reorder(&mut bytes, order, width);
    scalar::bytes_to_value(&bytes, kind)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Encode,
    Decode,
}

/// One codec call as the page submits it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodecRequest {
    #[serde(default)]
    pub direction: Direction,
    pub input: String,
    #[serde(rename = "type")]
    pub kind: ScalarType,
    #[serde(default)]
    pub order: Endianness,
    #[serde(default)]
    pub format: TextRepresentation,
}

/// Result shape returned to the page: the output or the reason there is none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodecOutcome {
    pub output: Option<String>,
    pub error: Option<String>,
    pub byte_length: Option<usize>,
}

impl CodecRequest {
    pub fn run(&self) -> CodecResult<String> {
        match self.direction {
            Direction::Encode => encode(&self.input, self.kind, self.order, self.format),
            Direction::Decode => decode(&self.input, self.format, self.kind, self.order),
        }
    }

    /// Like [`CodecRequest::run`], folding the error into the outcome.
    pub fn outcome(&self) -> CodecOutcome {
        let bytes = match self.direction {
            Direction::Encode => encode_bytes(&self.input, self.kind, self.order),
            Direction::Decode => repr::from_text(&self.input, self.format),
        };
        let rendered = bytes.and_then(|bytes| {
            let len = bytes.len();
            let text = match self.direction {
                Direction::Encode => repr::to_text(&bytes, self.format),
                Direction::Decode => decode_bytes(bytes, self.kind, self.order)?,
            };
            Ok((text, len))
        });
        match rendered {
            Ok((text, len)) => CodecOutcome {
                output: Some(text),
                error: None,
                byte_length: Some(len),
            },
            Err(err) => CodecOutcome {
                output: None,
                error: Some(err.to_string()),
                byte_length: None,
            },
        }
    }
}
