//! WASM bindings for dtxt-core.
//!
//! Exposes `canonicalize`, `format_pretty` and `to_json` as `#[wasm_bindgen]`
//! functions that can be called from JavaScript/TypeScript. Each takes DTXT
//! text and returns a string, or throws a JS error carrying the
//! `FormatError` message.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p dtxt-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/dtxt-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/dtxt_wasm.wasm
//! ```

use wasm_bindgen::prelude::*;

/// Rewrite DTXT text in compact canonical form (sorted keys, fixed spacing).
#[wasm_bindgen]
pub fn canonicalize(text: &str) -> std::result::Result<String, JsValue> {
    canonical_text(text).map_err(|e| JsValue::from_str(&e))
}

/// Rewrite DTXT text across multiple lines, one `indent` unit per level.
#[wasm_bindgen(js_name = formatPretty)]
pub fn format_pretty(text: &str, indent: &str) -> std::result::Result<String, JsValue> {
    pretty_text(text, indent).map_err(|e| JsValue::from_str(&e))
}

/// Convert DTXT text to compact JSON. Dates, big integers and binary values
/// become `"$date:..."`, `"$bigint:..."` and `"$binary:..."` strings.
#[wasm_bindgen(js_name = toJson)]
pub fn to_json(text: &str) -> std::result::Result<String, JsValue> {
    json_text(text).map_err(|e| JsValue::from_str(&e))
}

fn canonical_text(text: &str) -> Result<String, String> {
    let doc = dtxt_core::decode(text).map_err(|e| e.to_string())?;
    dtxt_core::encode(&doc).map_err(|e| e.to_string())
}

fn pretty_text(text: &str, indent: &str) -> Result<String, String> {
    let doc = dtxt_core::decode(text).map_err(|e| e.to_string())?;
    dtxt_core::encode_pretty(&doc, indent).map_err(|e| e.to_string())
}

fn json_text(text: &str) -> Result<String, String> {
    let doc = dtxt_core::decode(text).map_err(|e| e.to_string())?;
    serde_json::to_string(&dtxt_core::conformance::to_json(&doc)).map_err(|e| e.to_string())
}
