//! Base64 workbench: text and file payloads with the size report the page
//! shows next to each result.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::codec::{self, CodecError, Endianness, ScalarType, TextRepresentation};

const FILE_SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Base64Report {
    pub input: String,
    pub output: String,
    pub input_size: usize,
    pub output_size: usize,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Rounded `(output - input) / input` in percent, encode reports only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_percent: Option<i64>,
}

// Sizes are UTF-16 code units, matching `String.length` on the page.
fn text_size(text: &str) -> usize {
    text.encode_utf16().count()
}

impl Base64Report {
    fn success(input: &str, output: String) -> Self {
        Self {
            input: input.to_string(),
            input_size: text_size(input),
            output_size: text_size(&output),
            output,
            is_valid: true,
            error: None,
            growth_percent: None,
        }
    }

    fn failure(input: &str, err: CodecError) -> Self {
        Self {
            input: input.to_string(),
            output: String::new(),
            input_size: text_size(input),
            output_size: 0,
            is_valid: false,
            error: Some(err.to_string()),
            growth_percent: None,
        }
    }
}

pub fn encode_text_report(text: &str) -> Base64Report {
    match codec::encode(
        text,
        ScalarType::Text,
        Endianness::Big,
        TextRepresentation::Base64,
    ) {
        Ok(encoded) => {
            let mut report = Base64Report::success(text, encoded);
            report.growth_percent = size_growth_percent(report.input_size, report.output_size);
            report
        }
        Err(err) => Base64Report::failure(text, err),
    }
}

pub fn decode_text_report(text: &str) -> Base64Report {
    match codec::decode(
        text,
        TextRepresentation::Base64,
        ScalarType::Text,
        Endianness::Big,
    ) {
        Ok(decoded) => Base64Report::success(text, decoded),
        Err(err) => {
            tracing::debug!(error = %err, "base64 text decode failed");
            Base64Report::failure(text, err)
        }
    }
}

pub fn size_growth_percent(input_size: usize, output_size: usize) -> Option<i64> {
    if input_size == 0 {
        return None;
    }
    let ratio = (output_size as f64 - input_size as f64) / input_size as f64;
    Some((ratio * 100.0).round() as i64)
}

pub fn encode_file_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes a file payload, accepting either bare Base64 or a full data URL.
pub fn decode_file_base64(text: &str) -> Result<Vec<u8>, CodecError> {
    codec::repr::parse_base64(strip_data_url(text))
}

/// Drops a `data:<mime>;base64,` prefix when present.
pub fn strip_data_url(text: &str) -> &str {
    let trimmed = text.trim_start();
    if !trimmed.starts_with("data:") {
        return text;
    }
    match trimmed.split_once(',') {
        Some((_, payload)) if !payload.is_empty() => payload,
        _ => text,
    }
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".into();
    }
    let (scaled, unit) = scale_binary(bytes as f64, FILE_SIZE_UNITS.len());
    format!("{} {}", trim_decimals(scaled), FILE_SIZE_UNITS[unit])
}

/// Divides by 1024 until the value drops below it or the last unit is reached.
pub(crate) fn scale_binary(mut value: f64, units: usize) -> (f64, usize) {
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < units {
        value /= 1024.0;
        unit += 1;
    }
    (value, unit)
}

/// Two decimals with trailing zeros dropped, matching `parseFloat(x.toFixed(2))`.
pub(crate) fn trim_decimals(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
