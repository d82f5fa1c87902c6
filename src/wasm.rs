//! WebAssembly bindings, mirroring this codec's real deployment context: a
//! browser-side challenge script calling into a compiled WASM module instead
//! of pure JS. Matches the teacher crate's own `#[wasm_bindgen]` surface.

use wasm_bindgen::prelude::*;

use crate::{ChallengeType, Decoder, Encoder};

fn parse_challenge_type(challenge_type: &str) -> Result<ChallengeType, JsValue> {
    challenge_type
        .parse()
        .map_err(|err: crate::CodecError| JsValue::from_str(&err.to_string()))
}

/// JS-facing encoder. `salt` is `None`/`undefined` to derive one from
/// `js_sys::Date::now()`; the effective salt is readable via
/// [`WasmEncoder::salt`] afterwards. `challenge_type` is `None`/`undefined`
/// to default to `"captcha"`, mirroring `Encoder::new`'s optional
/// `challenge_type`.
#[wasm_bindgen]
pub struct WasmEncoder {
    inner: Encoder,
}

#[wasm_bindgen]
impl WasmEncoder {
    #[wasm_bindgen(constructor)]
    pub fn new(
        hash: String,
        cid: String,
        salt: Option<i32>,
        challenge_type: Option<String>,
    ) -> Result<WasmEncoder, JsValue> {
        let challenge_type = challenge_type
            .map(|s| parse_challenge_type(&s))
            .transpose()?;
        Ok(WasmEncoder {
            inner: Encoder::new(hash, cid, salt, challenge_type),
        })
    }

    /// Adds an entry whose value is a JSON-serializable JS value.
    #[wasm_bindgen(js_name = add)]
    pub fn add(&mut self, key: String, value: JsValue) -> Result<(), JsValue> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(value)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.inner.add(key, value);
        Ok(())
    }

    #[wasm_bindgen(js_name = finish)]
    pub fn finish(&mut self) -> String {
        self.inner.finish()
    }

    #[wasm_bindgen(js_name = setChallengeType)]
    pub fn set_challenge_type(&mut self, challenge_type: String) -> Result<(), JsValue> {
        let challenge_type = parse_challenge_type(&challenge_type)?;
        self.inner.set_challenge_type(challenge_type);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn salt(&self) -> i32 {
        self.inner.salt
    }
}

/// JS-facing decoder.
#[wasm_bindgen]
pub struct WasmDecoder {
    inner: Decoder,
}

#[wasm_bindgen]
impl WasmDecoder {
    #[wasm_bindgen(constructor)]
    pub fn new(hash: String, cid: String, salt: i32, challenge_type: String) -> Result<WasmDecoder, JsValue> {
        let challenge_type = parse_challenge_type(&challenge_type)?;
        Ok(WasmDecoder {
            inner: Decoder::new(hash, cid, salt, challenge_type),
        })
    }

    /// Decodes `text` into a JS array of `[key, value]` pairs.
    pub fn decode(&self, text: &str) -> Result<JsValue, JsValue> {
        let entries = self.inner.decode(text);
        serde_wasm_bindgen::to_value(&entries).map_err(|err| JsValue::from_str(&err.to_string()))
    }
}
