//! WASM bindings for the `obi` schema codec.
//!
//! Exposes the input/output codec pair to JavaScript as `Obi`:
//!
//! ```text
//! // const obi = new Obi("{symbols:[string],multiplier:u64}/{rates:[u64]}");
//! // const bytes = obi.encodeInput({ symbols: ["BTC"], multiplier: 100n });
//! // const req = obi.decodeInput(bytes);   // { symbols: ["BTC"], multiplier: 100n }
//! ```
//!
//! Integers may be passed as `BigInt`, safe numbers or strings, and bytes as
//! a `Uint8Array`/`Buffer` (see [convert]). Decoding returns `BigInt`s and
//! `Uint8Array`s. Errors are thrown as strings holding the `Display` form of
//! the underlying error.

pub mod convert;

use obi::{Codec, Value};
use wasm_bindgen::prelude::*;

/// Compiled `input/output` schema usable from JavaScript.
#[wasm_bindgen(js_name = Obi)]
pub struct WasmObi {
    obi: obi::Obi,
}

#[wasm_bindgen(js_class = Obi)]
impl WasmObi {
    /// Parses an `"<input>/<output>"` schema. Whitespace is ignored.
    #[wasm_bindgen(constructor)]
    pub fn new(schema: &str) -> Result<WasmObi, JsValue> {
        let obi = obi::Obi::new(schema).map_err(convert::error_to_js)?;
        Ok(WasmObi { obi })
    }

    /// Canonical schema text, e.g. `{a:u8}/bool`.
    #[wasm_bindgen(getter)]
    pub fn schema(&self) -> String {
        self.obi.to_string()
    }

    #[wasm_bindgen(js_name = encodeInput)]
    pub fn encode_input(&self, value: JsValue) -> Result<Vec<u8>, JsValue> {
        let value = from_js(self.obi.input(), &value)?;
        self.obi.encode_input(&value).map_err(convert::error_to_js)
    }

    #[wasm_bindgen(js_name = decodeInput)]
    pub fn decode_input(&self, data: &[u8]) -> Result<JsValue, JsValue> {
        let value = self.obi.decode_input(data).map_err(convert::error_to_js)?;
        to_js(&value)
    }

    #[wasm_bindgen(js_name = encodeOutput)]
    pub fn encode_output(&self, value: JsValue) -> Result<Vec<u8>, JsValue> {
        let value = from_js(self.obi.output(), &value)?;
        self.obi.encode_output(&value).map_err(convert::error_to_js)
    }

    #[wasm_bindgen(js_name = decodeOutput)]
    pub fn decode_output(&self, data: &[u8]) -> Result<JsValue, JsValue> {
        let value = self.obi.decode_output(data).map_err(convert::error_to_js)?;
        to_js(&value)
    }
}

fn from_js(codec: &Codec, value: &JsValue) -> Result<Value, JsValue> {
    convert::js_to_value(codec, value).map_err(convert::error_to_js)
}

fn to_js(value: &Value) -> Result<JsValue, JsValue> {
    convert::value_to_js(value)
}
