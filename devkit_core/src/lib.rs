use console_error_panic_hook::set_once as set_panic_hook;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod base64_tool;
pub mod codec;
pub mod disk;

use codec::{CodecError, CodecRequest, Endianness, ScalarType, TextRepresentation};
use disk::{ScanItem, SortOrder};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    set_panic_hook();
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub fn encode_typed(
    value: &str,
    kind: &str,
    order: &str,
    format: &str,
) -> Result<String, JsValue> {
    encode_typed_internal(value, kind, order, format)
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub fn decode_typed(
    text: &str,
    format: &str,
    kind: &str,
    order: &str,
) -> Result<String, JsValue> {
    decode_typed_internal(text, format, kind, order)
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

fn encode_typed_internal(
    value: &str,
    kind: &str,
    order: &str,
    format: &str,
) -> Result<String, CodecError> {
    let kind: ScalarType = kind.parse()?;
    let order = parse_order(order, kind)?;
    let format: TextRepresentation = format.parse()?;
    codec::encode(value, kind, order, format)
}

fn decode_typed_internal(
    text: &str,
    format: &str,
    kind: &str,
    order: &str,
) -> Result<String, CodecError> {
    let format: TextRepresentation = format.parse()?;
    let kind: ScalarType = kind.parse()?;
    let order = parse_order(order, kind)?;
    codec::decode(text, format, kind, order)
}

// The page may leave the byte-order select empty for types where it is inert.
fn parse_order(order: &str, kind: ScalarType) -> Result<Endianness, CodecError> {
    if order.trim().is_empty() && kind.is_byte_order_agnostic() {
        return Ok(Endianness::default());
    }
    order.parse()
}

/// Runs one `{direction, input, type, order, format}` request and returns
/// `{output, error, byteLength}` instead of throwing.
#[wasm_bindgen]
pub fn convert_typed(request: JsValue) -> Result<JsValue, JsValue> {
    let request: CodecRequest = serde_wasm_bindgen::from_value(request)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    to_js(&request.outcome())
}

#[wasm_bindgen]
pub fn scalar_type_tokens() -> Result<JsValue, JsValue> {
    to_js(&scalar_type_tokens_internal())
}

fn scalar_type_tokens_internal() -> Vec<&'static str> {
    ScalarType::ALL.iter().map(|kind| kind.token()).collect()
}

#[wasm_bindgen]
pub fn base64_encode_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&base64_tool::encode_text_report(text))
}

#[wasm_bindgen]
pub fn base64_decode_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&base64_tool::decode_text_report(text))
}

#[wasm_bindgen]
pub fn base64_encode_file(bytes: &[u8]) -> String {
    base64_tool::encode_file_bytes(bytes)
}

#[wasm_bindgen]
pub fn base64_decode_file(text: &str) -> Result<Vec<u8>, JsValue> {
    base64_tool::decode_file_base64(text).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub fn format_file_size_text(bytes: f64) -> String {
    base64_tool::format_file_size(bytes.max(0.0) as u64)
}

#[wasm_bindgen]
pub fn format_disk_size(bytes: f64) -> String {
    disk::format_size(bytes as i64)
}

#[wasm_bindgen]
pub fn sort_scan_items(items: JsValue, order: &str) -> Result<JsValue, JsValue> {
    let items: Vec<ScanItem> =
        serde_wasm_bindgen::from_value(items).map_err(|err| JsValue::from_str(&err.to_string()))?;
    let sorted = sort_scan_items_internal(&items, order).map_err(|err| JsValue::from_str(&err))?;
    to_js(&sorted)
}

fn sort_scan_items_internal(items: &[ScanItem], order: &str) -> Result<Vec<ScanItem>, String> {
    let order = match order.trim().to_ascii_lowercase().as_str() {
        "asc" => SortOrder::Asc,
        "desc" | "" => SortOrder::Desc,
        other => return Err(format!("unsupported sort order {other}")),
    };
    Ok(disk::sort_items(items, order))
}
