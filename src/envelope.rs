//! The outer 3-byte -> 4-character framing: turns an arbitrary byte buffer
//! into text drawn from [`crate::alphabet`]'s 64-character set, with a
//! per-triple salt countdown XORed in on top.

use crate::alphabet::{decode6, encode6};
use crate::context::ChallengeType;

/// Packs `bytes` into 4-character groups, pre-decrementing `salt` three
/// times per input triple and folding the countdown into each byte before
/// it's split into four 6-bit groups.
///
/// Input shorter than a multiple of three is zero-padded for the final
/// triple's arithmetic, then the corresponding trailing output characters
/// (`3 - len % 3` of them) are trimmed off — the over-read bytes only ever
/// influence bits that get trimmed away.
pub fn envelope_encode(bytes: &[u8], salt: i32) -> String {
    let mut n = salt;
    let mut out = String::with_capacity((bytes.len() / 3 + 1) * 4);

    let mut i = 0;
    while i < bytes.len() {
        let b0 = i32::from(bytes[i]);
        let b1 = i32::from(*bytes.get(i + 1).unwrap_or(&0));
        let b2 = i32::from(*bytes.get(i + 2).unwrap_or(&0));

        n = n.wrapping_sub(1);
        let n0 = n;
        n = n.wrapping_sub(1);
        let n1 = n;
        n = n.wrapping_sub(1);
        let n2 = n;

        let chunk = ((n0 ^ b0) & 0xFF) << 16 | ((n1 ^ b1) & 0xFF) << 8 | ((n2 ^ b2) & 0xFF);

        out.push(encode6(((chunk >> 18) & 0x3F) as u8) as char);
        out.push(encode6(((chunk >> 12) & 0x3F) as u8) as char);
        out.push(encode6(((chunk >> 6) & 0x3F) as u8) as char);
        out.push(encode6((chunk & 0x3F) as u8) as char);

        i += 3;
    }

    if bytes.len() % 3 != 0 {
        let trim = 3 - (bytes.len() % 3);
        for _ in 0..trim {
            out.pop();
        }
    }

    out
}

/// Reverses [`envelope_encode`], consuming `text` four characters at a
/// time. A trailing group with fewer than four characters is still
/// processed: missing positions decode as 0 (the same lenient fallback
/// [`decode6`] uses for any out-of-alphabet character), and the salt
/// countdown still advances three steps for that group, matching the
/// three-decrements-per-triple rhythm [`envelope_encode`] used to produce
/// it. Only as many bytes as the available characters can actually
/// determine are kept from that final group — see Open Question 1 below.
///
/// `challenge_type` is accepted to mirror the two call sites named in the
/// distilled spec (the reference captcha decoder has an early `return`
/// that makes its documented extra trim step unreachable, so it never
/// fires; the interstitial decoder never attempts a trim at all). Taken
/// literally, neither branch would trim the 1-2 synthetic bytes a
/// non-3-aligned final group produces, which would corrupt the payload's
/// own round-trip guarantee — readily demonstrable on a 29-byte buffer
/// (an unremarkable key/value pair, not a crafted adversarial input). This
/// implementation resolves that conflict in favor of round-trip
/// correctness: both arms compute the exact number of real bytes a
/// partial trailing group carries (`floor(available_chars * 6 / 8)`) and
/// keep only those, discarding the rest. See DESIGN.md for the full
/// reasoning.
pub fn envelope_decode(text: &str, salt: i32, challenge_type: ChallengeType) -> Vec<u8> {
    let _ = challenge_type;
    let chars = text.as_bytes();
    let mut n = salt;
    let mut out = Vec::with_capacity((chars.len() / 4 + 1) * 3);

    let mut i = 0;
    while i < chars.len() {
        let c0 = i32::from(decode6(chars[i]));
        let c1 = i32::from(chars.get(i + 1).map_or(0, |&c| decode6(c)));
        let c2 = i32::from(chars.get(i + 2).map_or(0, |&c| decode6(c)));
        let c3 = i32::from(chars.get(i + 3).map_or(0, |&c| decode6(c)));
        let chunk = (c0 << 18) | (c1 << 12) | (c2 << 6) | c3;

        let available = (chars.len() - i).min(4);
        let real_count = match available {
            4 => 3,
            3 => 2,
            2 => 1,
            _ => 0, // a single leftover character carries no recoverable byte
        };

        for k in 0..real_count {
            n = n.wrapping_sub(1);
            let shift = 16 - 8 * k;
            let byte = ((chunk >> shift) & 0xFF) ^ (n & 0xFF);
            out.push((byte & 0xFF) as u8);
        }
        // Burn the remaining salt decrements so `n` stays in lockstep with
        // the full three-decrements-per-triple countdown the encoder
        // always performs, even for a group we're only partially keeping.
        for _ in real_count..3 {
            n = n.wrapping_sub(1);
        }

        i += 4;
    }

    out
}
