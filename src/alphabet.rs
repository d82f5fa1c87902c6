//! The codec's custom 6-bit alphabet: `-_0-9A-Za-z`, laid out to put the
//! punctuation pair first and each case-run second.

/// Encodes a 6-bit value (0..=63) to its wire character code.
pub fn encode6(v: u8) -> u8 {
    match v {
        0 => b'-',
        1 => b'_',
        2..=11 => 46 + v,
        12..=37 => 53 + v,
        _ => 59 + v,
    }
}

/// Decodes a wire character back to its 6-bit value. Any character outside
/// the alphabet decodes to 0 — a lenient fallback, not an error.
pub fn decode6(c: u8) -> u8 {
    match c {
        b'a'..=b'z' => c - 59,
        b'A'..=b'Z' => c - 53,
        b'0'..=b'9' => c - 46,
        b'_' => 1,
        b'-' => 0,
        other => {
            #[cfg(feature = "logging")]
            log::trace!("character {other:?} is outside the wire alphabet, decoding to 0");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_over_full_range() {
        for v in 0u8..64 {
            let c = encode6(v);
            assert_eq!(decode6(c), v, "round-trip failed for v={v} (char {c})");
        }
    }

    #[test]
    fn alphabet_is_wire_safe_ascii() {
        for v in 0u8..64 {
            let c = encode6(v);
            assert!(c == b'-' || c == b'_' || c.is_ascii_alphanumeric());
        }
    }

    #[test]
    fn unknown_character_decodes_to_zero() {
        assert_eq!(decode6(b'!'), 0);
        assert_eq!(decode6(b' '), 0);
        assert_eq!(decode6(0), 0);
    }
}
