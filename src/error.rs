//! The codec's one real, reportable failure mode.
//!
//! Everything else in this crate is designed to never fail a call: malformed
//! wire characters, truncated envelope groups, dropped entries, and
//! unparsable nested JSON fragments are all tolerated per the recovery
//! semantics documented on [`crate::entry`] and [`crate::envelope`]. The only
//! thing that *can* go wrong at the API boundary is asking for a challenge
//! type this crate doesn't recognize.

use thiserror::Error;

/// Errors surfaced by the public `signal_codec` API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// [`crate::ChallengeType::from_str`] was given a string that matches
    /// neither `"captcha"` nor `"interstitial"` case-insensitively.
    #[error("unrecognized challenge type: {0:?}")]
    UnknownChallengeType(String),
}
