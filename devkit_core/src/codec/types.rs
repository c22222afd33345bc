use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CodecError;

/// Declared interpretation of a byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "bool")]
    Boolean,
    #[serde(rename = "int8")]
    Int8,
    #[serde(rename = "int16")]
    Int16,
    #[serde(rename = "int32")]
    Int32,
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "bigint")]
    BigInt,
    #[serde(rename = "hex")]
    RawBytes,
}

impl ScalarType {
    pub const ALL: [ScalarType; 8] = [
        Self::Text,
        Self::Boolean,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::BigInt,
        Self::RawBytes,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Boolean => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::BigInt => "bigint",
            Self::RawBytes => "hex",
        }
    }

    /// Byte width of the fixed-width integer types. Decoding one of these
    /// needs a buffer of exactly this size.
    pub fn integer_width(self) -> Option<usize> {
        match self {
            Self::Int8 => Some(1),
            Self::Int16 => Some(2),
            Self::Int32 => Some(4),
            Self::Int64 => Some(8),
            Self::Text | Self::Boolean | Self::BigInt | Self::RawBytes => None,
        }
    }

    /// Inclusive signed range for the fixed-width integer types.
    pub fn signed_range(self) -> Option<(i64, i64)> {
        match self {
            Self::Int8 => Some((i8::MIN.into(), i8::MAX.into())),
            Self::Int16 => Some((i16::MIN.into(), i16::MAX.into())),
            Self::Int32 => Some((i32::MIN.into(), i32::MAX.into())),
            Self::Int64 => Some((i64::MIN, i64::MAX)),
            Self::Text | Self::Boolean | Self::BigInt | Self::RawBytes => None,
        }
    }

    /// Types whose layout does not depend on byte order.
    pub fn is_byte_order_agnostic(self) -> bool {
        matches!(
            self,
            Self::Text | Self::Boolean | Self::Int8 | Self::RawBytes
        )
    }

    /// Size of the unit the byte-order transform reverses within a buffer of
    /// `len` bytes. A width of 1 makes the transform a no-op.
    pub fn element_width(self, len: usize) -> usize {
        match self {
            Self::Text | Self::Boolean | Self::Int8 | Self::RawBytes => 1,
            Self::Int16 => 2,
            Self::Int32 => 4,
            Self::Int64 => 8,
            Self::BigInt => len.max(1),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ScalarType {
    type Err = CodecError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.token() == normalized)
            .ok_or_else(|| CodecError::UnknownToken {
                field: "scalar type",
                token: input.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    Little,
    #[default]
    Big,
}

impl FromStr for Endianness {
    type Err = CodecError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "little" => Ok(Self::Little),
            "big" => Ok(Self::Big),
            _ => Err(CodecError::UnknownToken {
                field: "byte order",
                token: input.to_string(),
            }),
        }
    }
}

/// Text form a byte buffer travels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextRepresentation {
    Base64,
    #[default]
    Hex,
}

impl FromStr for TextRepresentation {
    type Err = CodecError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "base64" => Ok(Self::Base64),
            "hex" => Ok(Self::Hex),
            _ => Err(CodecError::UnknownToken {
                field: "text representation",
                token: input.to_string(),
            }),
        }
    }
}
