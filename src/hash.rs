//! Deterministic signed 32-bit string hash with a zero/empty sentinel.

/// Fallback value returned for an empty string, or whenever the computed
/// hash collapses to zero.
pub const SIGNHASH_FALLBACK: i32 = 1_789_537_805;

/// Hashes `s` by its UTF-16 code units (not code points — this mirrors a
/// host's `charCodeAt`, so surrogate halves of an astral character are
/// folded in separately rather than as one scalar value).
pub fn sign_hash(s: &str) -> i32 {
    if s.is_empty() {
        return SIGNHASH_FALLBACK;
    }

    let mut h: i32 = 0;
    for unit in s.encode_utf16() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit));
    }

    if h == 0 {
        SIGNHASH_FALLBACK
    } else {
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_fallback() {
        assert_eq!(sign_hash(""), SIGNHASH_FALLBACK);
    }

    #[test]
    fn single_char_is_its_code_unit() {
        assert_eq!(sign_hash("a"), 97);
    }

    #[test]
    fn matches_31_multiplier_fold() {
        let mut expect: i32 = 0;
        for unit in "hello".encode_utf16() {
            expect = expect.wrapping_mul(31).wrapping_add(i32::from(unit));
        }
        assert_eq!(sign_hash("hello"), expect);
    }

    #[test]
    fn deterministic_across_calls() {
        assert_eq!(sign_hash("client_identifier"), sign_hash("client_identifier"));
    }
}
