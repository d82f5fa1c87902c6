#![no_main]

use libfuzzer_sys::fuzz_target;
use signal_codec::{ChallengeType, Decoder};

fuzz_target!(|data: (String, String, i32, bool, String)| {
    let (hash, cid, salt, is_interstitial, text) = data;
    let challenge_type = if is_interstitial {
        ChallengeType::Interstitial
    } else {
        ChallengeType::Captcha
    };

    // Decoding arbitrary text under an arbitrary context must never panic,
    // regardless of how garbled the wire alphabet/envelope/framing is.
    let decoder = Decoder::new(hash, cid, salt, challenge_type);
    let _ = decoder.decode(&text);
});
