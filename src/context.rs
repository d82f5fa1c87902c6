//! Session context: the hash/cid/salt/challenge-type tuple both sides of a
//! conversation must agree on, and the two keystream seeds derived from it.

use std::str::FromStr;

use crate::error::CodecError;
use crate::hash::sign_hash;

/// `MAIN_CONST` as the spec's literal, truncated to 32 bits at the XOR site —
/// the literal exceeds `i32::MAX`; the overflow on truncation is intentional,
/// not a bug, and must be preserved bit-for-bit.
pub const MAIN_CONST: i32 = 9_959_949_970i64 as i32;
pub const CID_CONST: i32 = 1_809_053_797;

/// Per-challenge-type constant XORed into the main seed.
const HASH_XOR_CAPTCHA: i32 = -1_748_112_727;
const HASH_XOR_INTERSTITIAL: i32 = -883_841_716;

/// Which flavor of challenge this session is obfuscating telemetry for.
///
/// The only observable differences between the two are the constant folded
/// into the main seed and the envelope's decode-trim rule (see
/// [`crate::envelope`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChallengeType {
    #[default]
    Captcha,
    Interstitial,
}

impl ChallengeType {
    fn hash_xor_const(self) -> i32 {
        match self {
            ChallengeType::Captcha => HASH_XOR_CAPTCHA,
            ChallengeType::Interstitial => HASH_XOR_INTERSTITIAL,
        }
    }
}

impl FromStr for ChallengeType {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("captcha") {
            Ok(ChallengeType::Captcha)
        } else if s.eq_ignore_ascii_case("interstitial") {
            Ok(ChallengeType::Interstitial)
        } else {
            Err(CodecError::UnknownChallengeType(s.to_owned()))
        }
    }
}

/// The immutable per-session context and its two derived keystream seeds.
#[derive(Debug, Clone)]
pub struct Context {
    pub hash: String,
    pub cid: String,
    pub salt: i32,
    pub challenge_type: ChallengeType,
    pub main_seed: i32,
    pub cid_seed: i32,
}

impl Context {
    pub fn new(hash: &str, cid: &str, salt: i32, challenge_type: ChallengeType) -> Self {
        let main_seed = MAIN_CONST ^ sign_hash(hash) ^ challenge_type.hash_xor_const();
        let cid_seed = CID_CONST ^ sign_hash(cid);
        Context {
            hash: hash.to_owned(),
            cid: cid.to_owned(),
            salt,
            challenge_type,
            main_seed,
            cid_seed,
        }
    }
}
