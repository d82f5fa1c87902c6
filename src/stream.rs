//! Stateful pseudo-random byte generator driven by a seed, a per-byte salt
//! countdown, and a one-slot peek cache.

use crate::word::word_mixer;

/// A single keystream cursor over a 32-bit seed.
///
/// Modeled as an object with a `next` method rather than a captured closure:
/// lifetimes stay explicit and the cache/latch behaviour is directly
/// testable.
pub struct ByteStream {
    state: i32,
    round: i32,
    salt_state: i32,
    use_alt: bool,
    cache: Option<u8>,
}

impl ByteStream {
    fn new(seed: i32, salt: i32, use_alt: bool) -> Self {
        ByteStream {
            state: seed,
            round: -1,
            salt_state: salt,
            use_alt,
            cache: None,
        }
    }

    /// Produces the next byte. If `cache_next` is set, the byte is stashed
    /// so the *following* call returns it again without advancing state.
    pub fn next(&mut self, cache_next: bool) -> u8 {
        if let Some(b) = self.cache.take() {
            return b;
        }

        self.round += 1;
        if self.round > 2 {
            self.round = 0;
            self.state = word_mixer(self.state);
        }

        let shift = 16 - 8 * self.round;
        let mut result = self.state >> shift;

        if self.use_alt {
            self.salt_state = self.salt_state.wrapping_sub(1);
            result ^= self.salt_state;
        }

        let result = (result & 0xFF) as u8;
        if cache_next {
            self.cache = Some(result);
        }
        result
    }
}

/// Builds `ByteStream`s and carries the one-shot "use_alt" latch: the first
/// stream built with `use_alt = true` consumes the latch, and every stream
/// built afterwards on the same factory is forced to `use_alt = false`
/// regardless of what is requested. This is a faithful, closure-free model
/// of the original source's captured-variable trick.
#[derive(Default)]
pub struct ByteStreamFactory {
    latched: bool,
}

impl ByteStreamFactory {
    pub fn new() -> Self {
        ByteStreamFactory { latched: false }
    }

    pub fn build(&mut self, seed: i32, salt: i32, use_alt: bool) -> ByteStream {
        let effective = use_alt && !self.latched;
        if effective {
            self.latched = true;
        }
        ByteStream::new(seed, salt, effective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_returns_same_byte_twice_and_advances_once() {
        let mut a = ByteStream::new(0x1234_5678, 7, true);
        let mut b = ByteStream::new(0x1234_5678, 7, true);

        let cached = a.next(true);
        let repeated = a.next(false);
        assert_eq!(cached, repeated);

        // Two plain calls on an identical stream should match the single
        // advance the cached stream made.
        let first = b.next(false);
        assert_eq!(cached, first);
        let a_third = a.next(false);
        let b_second = b.next(false);
        assert_eq!(a_third, b_second);
    }

    #[test]
    fn cache_next_flag_is_ignored_while_cache_is_full() {
        let mut a = ByteStream::new(42, 3, false);
        let v1 = a.next(true);
        // cache_next=true here is ignored because a cached byte is served first.
        let v2 = a.next(true);
        assert_eq!(v1, v2);
    }

    #[test]
    fn rounds_cycle_through_three_bytes_then_remix_state() {
        let mut s = ByteStream::new(0x0102_0304, 0, false);
        let b0 = s.next(false);
        let b1 = s.next(false);
        let b2 = s.next(false);
        assert_eq!(b0, ((0x0102_0304i32 >> 16) & 0xFF) as u8);
        assert_eq!(b1, ((0x0102_0304i32 >> 8) & 0xFF) as u8);
        assert_eq!(b2, (0x0102_0304i32 & 0xFF) as u8);
    }

    #[test]
    fn alt_mode_xors_in_the_countdown() {
        let mut plain = ByteStream::new(99, 5, false);
        let mut alt = ByteStream::new(99, 5, true);
        assert_ne!(plain.next(false), alt.next(false));
    }

    #[test]
    fn factory_latches_use_alt_to_the_first_true_request() {
        let mut factory = ByteStreamFactory::new();
        let mut first = factory.build(1, 5, true);
        let mut second = factory.build(1, 5, true);

        // `second` was forced to use_alt=false, so it behaves like a plain
        // (non-alt) stream: requesting the same seed/salt without alt must
        // match it byte-for-byte.
        let mut control = ByteStream::new(1, 5, false);
        for _ in 0..6 {
            assert_eq!(second.next(false), control.next(false));
        }

        // `first` actually got the alt behaviour, so it must diverge from
        // the same non-alt control stream.
        let mut control2 = ByteStream::new(1, 5, false);
        assert_ne!(first.next(false), control2.next(false));
    }

    #[test]
    fn factory_does_not_latch_on_false_requests() {
        let mut factory = ByteStreamFactory::new();
        let _unused = factory.build(5, 5, false);
        let mut second = factory.build(5, 5, true);
        let mut control = ByteStream::new(5, 5, true);
        for _ in 0..4 {
            assert_eq!(second.next(false), control.next(false));
        }
    }
}
