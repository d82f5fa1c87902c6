//! A symmetric, reversible payload codec for obfuscating an ordered stream
//! of key/value telemetry signals exchanged with a browser-side anti-bot
//! challenge.
//!
//! The codec is an obfuscation layer, not a cipher: it has no authentication,
//! no confidentiality guarantee against a motivated reverse engineer, and no
//! streaming support over partial input. Its one hard requirement is that it
//! round-trips bit-exactly given a matching [`ChallengeType`], `hash`, `cid`,
//! and `salt` on both ends.
//!
//! ```
//! use signal_codec::{ChallengeType, Decoder, Encoder};
//!
//! let mut encoder = Encoder::new("H", "C", Some(0), Some(ChallengeType::Captcha));
//! encoder.add("a", "b");
//! let payload = encoder.finish();
//!
//! let decoder = Decoder::new("H", "C", 0, ChallengeType::Captcha);
//! assert_eq!(
//!     decoder.decode(&payload),
//!     vec![("a".to_string(), serde_json::json!("b"))]
//! );
//! ```

mod alphabet;
mod context;
mod entry;
mod envelope;
mod error;
mod hash;
mod salt;
mod stream;
mod word;

#[cfg(feature = "wasm")]
mod wasm;

pub use context::ChallengeType;
pub use error::CodecError;
pub use salt::derive_salt_from_clock;

use entry::{decode_entries, encode_entries};
use serde_json::Value as JsonValue;

/// Reads a millisecond timestamp from whichever clock this build's host
/// provides: `js_sys::Date::now()` under the `wasm` feature, `SystemTime`
/// otherwise. This is the one call site in the crate that touches real,
/// non-reproducible wall-clock state.
fn now_ms() -> i64 {
    #[cfg(feature = "wasm")]
    {
        js_sys::Date::now() as i64
    }
    #[cfg(not(feature = "wasm"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Builds an obfuscated payload from an ordered sequence of `(key, value)`
/// entries under a fixed session context.
///
/// An `Encoder` is single-use for its entry buffer: [`Encoder::finish`]
/// consumes what's been added so far, but [`Encoder::set_challenge_type`]
/// explicitly resets everything (buffered entries included) if the caller
/// needs to redo the session under a different challenge type.
pub struct Encoder {
    hash: String,
    cid: String,
    ctx: context::Context,
    entries: Vec<(String, JsonValue)>,
    /// The effective salt this session settled on — either the caller's, or
    /// one derived from the clock at construction time.
    pub salt: i32,
}

impl Encoder {
    /// Builds an encoder for `hash`/`cid` under `challenge_type`. When `salt`
    /// is `None`, one is derived from the host clock via
    /// [`derive_salt_from_clock`] and exposed afterwards on [`Encoder::salt`].
    /// When `challenge_type` is `None`, it defaults to
    /// [`ChallengeType::Captcha`].
    pub fn new(
        hash: impl Into<String>,
        cid: impl Into<String>,
        salt: Option<i32>,
        challenge_type: Option<ChallengeType>,
    ) -> Self {
        let hash = hash.into();
        let cid = cid.into();
        let salt = salt.unwrap_or_else(|| derive_salt_from_clock(now_ms()));
        let challenge_type = challenge_type.unwrap_or_default();
        let ctx = context::Context::new(&hash, &cid, salt, challenge_type);
        Encoder {
            hash,
            cid,
            ctx,
            entries: Vec::new(),
            salt,
        }
    }

    /// Queues `(key, value)` for the next [`Encoder::finish`] call. Per the
    /// codec's entry rules, this has no observable effect if `key` is empty
    /// or literally `"xt1"` — the filtering happens at encode time, so the
    /// queue itself never needs to special-case it.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Produces the obfuscated payload text for every entry queued so far.
    pub fn finish(&mut self) -> String {
        encode_entries(&self.ctx, &self.entries)
    }

    /// Re-derives both keystream seeds for `challenge_type` and discards any
    /// entries queued so far — a full session reset, not an in-place tweak.
    pub fn set_challenge_type(&mut self, challenge_type: ChallengeType) {
        self.ctx = context::Context::new(&self.hash, &self.cid, self.salt, challenge_type);
        self.entries.clear();
    }
}

/// Recovers an ordered sequence of `(key, value)` entries from a payload
/// produced by a matching [`Encoder`].
///
/// Decoding never panics and never returns an error: malformed wire
/// characters, truncated envelope groups, and unparsable nested JSON
/// fragments are all tolerated per the recovery semantics documented on
/// [`entry`] and [`envelope`] — a mismatched context just produces garbage
/// output, not a reported failure.
pub struct Decoder {
    ctx: context::Context,
}

impl Decoder {
    /// Builds a decoder for `hash`/`cid`/`salt`/`challenge_type`. All four
    /// must match the encoder's for a meaningful round-trip; there is no
    /// way to detect a mismatch from inside the decoder.
    pub fn new(hash: impl Into<String>, cid: impl Into<String>, salt: i32, challenge_type: ChallengeType) -> Self {
        let hash = hash.into();
        let cid = cid.into();
        Decoder {
            ctx: context::Context::new(&hash, &cid, salt, challenge_type),
        }
    }

    /// Parses `text` into its ordered `(key, value)` entries.
    pub fn decode(&self, text: &str) -> Vec<(String, JsonValue)> {
        decode_entries(&self.ctx, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoder_decoder_round_trip_scenario_one() {
        let mut encoder = Encoder::new("H", "C", Some(0), Some(ChallengeType::Captcha));
        encoder.add("a", "b");
        let payload = encoder.finish();

        let decoder = Decoder::new("H", "C", 0, ChallengeType::Captcha);
        assert_eq!(
            decoder.decode(&payload),
            vec![("a".to_string(), JsonValue::String("b".to_string()))]
        );
    }

    #[test]
    fn encoder_decoder_round_trip_scenario_two() {
        let mut encoder = Encoder::new(
            "14D062F60A4BDE8CE8647DFC720349",
            "client_identifier",
            Some(0),
            Some(ChallengeType::Captcha),
        );
        encoder.add("captchaResponse", "xyz123");
        let payload = encoder.finish();

        let decoder = Decoder::new("14D062F60A4BDE8CE8647DFC720349", "client_identifier", 0, ChallengeType::Captcha);
        assert_eq!(
            decoder.decode(&payload),
            vec![("captchaResponse".to_string(), JsonValue::String("xyz123".to_string()))]
        );
    }

    #[test]
    fn encoder_decoder_round_trip_scenario_three_interstitial() {
        let mut encoder = Encoder::new(
            "D9A52CB22EA3EBADB89B9212A5EB6",
            "tUL4RXkyLUJxd3N2UVY4X3NHfmJkZX5zYGBmZmZ8Y1VpY1U",
            Some(0),
            Some(ChallengeType::Interstitial),
        );
        encoder.add("screenWidth", 1920);
        encoder.add("screenHeight", 1080);
        encoder.add("userAgent", "Mozilla/5.0 (compatible)");
        let payload = encoder.finish();

        let decoder = Decoder::new(
            "D9A52CB22EA3EBADB89B9212A5EB6",
            "tUL4RXkyLUJxd3N2UVY4X3NHfmJkZX5zYGBmZmZ8Y1VpY1U",
            0,
            ChallengeType::Interstitial,
        );
        assert_eq!(
            decoder.decode(&payload),
            vec![
                ("screenWidth".to_string(), JsonValue::from(1920)),
                ("screenHeight".to_string(), JsonValue::from(1080)),
                ("userAgent".to_string(), JsonValue::String("Mozilla/5.0 (compatible)".to_string())),
            ]
        );
    }

    #[test]
    fn xt1_key_is_dropped_end_to_end() {
        let mut encoder = Encoder::new("H", "C", Some(0), Some(ChallengeType::Captcha));
        encoder.add("xt1", "dropped");
        encoder.add("k", "v");
        let payload = encoder.finish();

        let decoder = Decoder::new("H", "C", 0, ChallengeType::Captcha);
        assert_eq!(
            decoder.decode(&payload),
            vec![("k".to_string(), JsonValue::String("v".to_string()))]
        );
    }

    #[test]
    fn challenge_types_produce_different_payloads_for_the_same_entries() {
        let mut captcha = Encoder::new("H", "C", Some(0), Some(ChallengeType::Captcha));
        captcha.add("a", "b");
        let captcha_payload = captcha.finish();

        let mut interstitial = Encoder::new("H", "C", Some(0), Some(ChallengeType::Interstitial));
        interstitial.add("a", "b");
        let interstitial_payload = interstitial.finish();

        assert_ne!(captcha_payload, interstitial_payload);
    }

    #[test]
    fn set_challenge_type_resets_seeds_and_discards_entries() {
        let mut encoder = Encoder::new("H", "C", Some(0), Some(ChallengeType::Captcha));
        encoder.add("a", "b");
        encoder.set_challenge_type(ChallengeType::Interstitial);
        encoder.add("c", "d");
        let payload = encoder.finish();

        let decoder = Decoder::new("H", "C", 0, ChallengeType::Interstitial);
        assert_eq!(
            decoder.decode(&payload),
            vec![("c".to_string(), JsonValue::String("d".to_string()))]
        );
    }

    #[test]
    fn omitted_challenge_type_defaults_to_captcha() {
        let mut defaulted = Encoder::new("H", "C", Some(0), None);
        defaulted.add("a", "b");
        let defaulted_payload = defaulted.finish();

        let mut explicit = Encoder::new("H", "C", Some(0), Some(ChallengeType::Captcha));
        explicit.add("a", "b");
        let explicit_payload = explicit.finish();

        assert_eq!(defaulted_payload, explicit_payload);
    }

    #[test]
    fn auto_salt_is_exposed_and_deterministic_given_a_fixed_clock_reading() {
        // Exercise the real (non-deterministic-by-design) path just enough
        // to confirm the field is populated and self-consistent, without
        // asserting anything about wall-clock behaviour itself.
        let encoder = Encoder::new("H", "C", None, Some(ChallengeType::Captcha));
        let again = Encoder::new("H", "C", Some(encoder.salt), Some(ChallengeType::Captcha));
        assert_eq!(again.salt, encoder.salt);
    }

    #[test]
    fn wire_payload_uses_only_the_documented_alphabet() {
        let mut encoder = Encoder::new("hash", "cid", Some(1234), Some(ChallengeType::Captcha));
        encoder.add("key", "value");
        encoder.add("n", 42);
        let payload = encoder.finish();
        assert!(payload
            .bytes()
            .all(|b| b == b'-' || b == b'_' || b.is_ascii_alphanumeric()));
    }
}
