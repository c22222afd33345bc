//! Scalar values to big-endian byte buffers and back.

use num_bigint::{BigInt, Sign};
use num_traits::Zero;

use super::error::{CodecError, CodecResult};
use super::repr::parse_hex;
use super::types::ScalarType;

const BIGINT_NEGATIVE: u8 = 0xff;
const BIGINT_GUARD: u8 = 0x00;

/// Turns a user-entered value into its big-endian byte layout.
pub fn value_to_bytes(value: &str, kind: ScalarType) -> CodecResult<Vec<u8>> {
    match kind {
        ScalarType::Text => Ok(value.as_bytes().to_vec()),
        ScalarType::RawBytes => parse_hex(value),
        ScalarType::Boolean => Ok(vec![u8::from(parse_bool(value))]),
        ScalarType::Int8 | ScalarType::Int16 | ScalarType::Int32 | ScalarType::Int64 => {
            fixed_width_bytes(value, kind)
        }
        ScalarType::BigInt => {
            let number = parse_decimal(value, kind)?;
            Ok(bigint_to_bytes(&number))
        }
    }
}

/// Renders a big-endian byte buffer as text for `kind`. Integer buffers are
/// expected to have passed [`check_integer_length`].
pub fn bytes_to_value(bytes: &[u8], kind: ScalarType) -> CodecResult<String> {
    match kind {
        ScalarType::Text => String::from_utf8(bytes.to_vec()).map_err(|err| {
            CodecError::InvalidUtf8 {
                valid_up_to: err.utf8_error().valid_up_to(),
            }
        }),
        ScalarType::RawBytes => Ok(hex::encode(bytes)),
        ScalarType::Boolean => {
            let set = bytes.first().is_some_and(|byte| *byte != 0);
            Ok(set.to_string())
        }
        ScalarType::Int8 | ScalarType::Int16 | ScalarType::Int32 | ScalarType::Int64 => {
            Ok(BigInt::from_signed_bytes_be(bytes).to_string())
        }
        ScalarType::BigInt => Ok(bytes_to_bigint(bytes).to_string()),
    }
}

/// Fails with `InvalidLength` when `kind` is a fixed-width integer and `bytes`
/// has any other size. Other types accept buffers of any length.
pub fn check_integer_length(bytes: &[u8], kind: ScalarType) -> CodecResult<()> {
    match kind.integer_width() {
        Some(expected) if expected != bytes.len() => Err(CodecError::InvalidLength {
            kind,
            expected,
            actual: bytes.len(),
        }),
        _ => Ok(()),
    }
}

fn parse_bool(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed == "1" || trimmed.eq_ignore_ascii_case("true")
}

/// Parses an optionally signed base-10 literal with no size limit.
fn parse_decimal(value: &str, kind: ScalarType) -> CodecResult<BigInt> {
    let trimmed = value.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        tracing::debug!(%kind, input = value, "rejected numeric literal");
        return Err(CodecError::MalformedNumber {
            kind,
            input: value.to_string(),
        });
    }
    let magnitude =
        BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| CodecError::MalformedNumber {
            kind,
            input: value.to_string(),
        })?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn fixed_width_bytes(value: &str, kind: ScalarType) -> CodecResult<Vec<u8>> {
    let number = parse_decimal(value, kind)?;
    let (Some((min, max)), Some(width)) = (kind.signed_range(), kind.integer_width()) else {
        return Err(CodecError::MalformedNumber {
            kind,
            input: value.to_string(),
        });
    };
    let in_range = i64::try_from(&number)
        .ok()
        .filter(|n| (min..=max).contains(n));
    let Some(n) = in_range else {
        tracing::debug!(%kind, %number, "numeric literal out of range");
        return Err(CodecError::OutOfRange {
            kind,
            value: number.to_string(),
            min,
            max,
        });
    };
    let full = n.to_be_bytes();
    Ok(full[full.len() - width..].to_vec())
}

/// Minimal big-endian magnitude, `0xff` sign byte for negatives, and a `0x00`
/// guard when a non-negative magnitude would otherwise start with `0xff`.
pub fn bigint_to_bytes(number: &BigInt) -> Vec<u8> {
    if number.is_zero() {
        return vec![0];
    }
    let (sign, magnitude) = number.to_bytes_be();
    let prefix = match sign {
        Sign::Minus => Some(BIGINT_NEGATIVE),
        _ if magnitude.first() == Some(&BIGINT_NEGATIVE) => Some(BIGINT_GUARD),
        _ => None,
    };
    let mut out = Vec::with_capacity(magnitude.len() + 1);
    out.extend(prefix);
    out.extend_from_slice(&magnitude);
    out
}

pub fn bytes_to_bigint(bytes: &[u8]) -> BigInt {
    match bytes.split_first() {
        Some((&BIGINT_NEGATIVE, magnitude)) => BigInt::from_bytes_be(Sign::Minus, magnitude),
        _ => BigInt::from_bytes_be(Sign::Plus, bytes),
    }
}
