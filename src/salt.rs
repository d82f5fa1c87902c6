//! The auto-salt collaborator contract: deriving a salt from a monotonic
//! clock reading when the caller doesn't supply one explicitly.
//!
//! This is deliberately *not* part of the codec's core bit-exact surface —
//! the distilled spec calls it out as a collaborator contract, not a tested
//! behaviour, because its input (wall-clock time) isn't reproducible. Only
//! the pure fold from a millisecond reading to a salt is testable.

use crate::word::word_mixer;

/// `MAIN_CONST`'s true (un-truncated) value, used for the wide multiplication
/// this formula needs. See the design note on overflow: the host evaluates
/// this product in double precision before the outer `WordMixer` truncates
/// it back to 32 bits, so folding it through `i32` arithmetic a step early
/// would produce a different salt.
const MAIN_CONST_WIDE: i64 = 9_959_949_970;

/// XOR mask applied to the shifted clock reading before the inner mix.
const AUTO_SALT_XOR: i64 = 11_027_890_091;

/// Folds a millisecond clock reading into a salt via
/// `WordMixer(WordMixer((now_ms >> 3) XOR 11027890091) * MAIN_CONST)`.
///
/// The inner `XOR` and its `WordMixer` operate on the host's implicit 32-bit
/// truncation of `(now_ms >> 3) XOR 11027890091` (a wide intermediate), but
/// the multiplication by `MAIN_CONST` is carried out at i64 width — mirroring
/// the host's double-precision multiply — before the outer `WordMixer`
/// truncates the product back to 32 bits.
pub fn derive_salt_from_clock(now_ms: i64) -> i32 {
    let shifted = (now_ms >> 3) ^ AUTO_SALT_XOR;
    let inner = word_mixer(shifted as i32);
    // `inner` can reach +/-2^31 and `MAIN_CONST_WIDE` is ~2^33.2, so the
    // product can exceed i64's range (the host's double-precision multiply
    // has no such ceiling). Wrap rather than panic; only the low 32 bits
    // survive the outer `WordMixer` truncation regardless.
    let product = i64::from(inner).wrapping_mul(MAIN_CONST_WIDE);
    word_mixer(product as i32)
}
