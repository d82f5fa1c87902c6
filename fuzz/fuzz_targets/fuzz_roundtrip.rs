#![no_main]

use libfuzzer_sys::fuzz_target;
use signal_codec::{ChallengeType, Decoder, Encoder};

#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzEntry {
    key: String,
    value: FuzzValue,
}

#[derive(Debug, arbitrary::Arbitrary)]
enum FuzzValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl From<FuzzValue> for serde_json::Value {
    fn from(v: FuzzValue) -> Self {
        match v {
            FuzzValue::Str(s) => serde_json::Value::String(s),
            FuzzValue::Int(i) => serde_json::json!(i),
            FuzzValue::Float(f) if f.is_finite() => serde_json::json!(f),
            FuzzValue::Float(_) => serde_json::Value::Null,
            FuzzValue::Bool(b) => serde_json::Value::Bool(b),
            FuzzValue::Null => serde_json::Value::Null,
        }
    }
}

fuzz_target!(|data: (String, String, i32, bool, Vec<FuzzEntry>)| {
    let (hash, cid, salt, is_interstitial, entries) = data;
    let challenge_type = if is_interstitial {
        ChallengeType::Interstitial
    } else {
        ChallengeType::Captcha
    };

    let mut encoder = Encoder::new(hash.clone(), cid.clone(), Some(salt), Some(challenge_type));
    let mut expected = Vec::new();
    for entry in entries {
        let key = entry.key;
        let value: serde_json::Value = entry.value.into();
        let accepted = !key.is_empty() && key != "xt1";
        if accepted {
            expected.push((key.clone(), value.clone()));
        }
        encoder.add(key, value);
    }
    let payload = encoder.finish();

    let decoder = Decoder::new(hash, cid, salt, challenge_type);
    let decoded = decoder.decode(&payload);
    assert_eq!(decoded, expected, "round-trip mismatch for payload {payload:?}");
});
