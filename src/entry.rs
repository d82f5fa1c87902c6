//! Framed key/value entry stream: the "{"k":v,"k2":v2,..." text both sides
//! XOR through the main and cid streams, minus its closing brace (a
//! terminator byte stands in for it).

use serde_json::Value as JsonValue;

use crate::context::Context;
use crate::envelope::{envelope_decode, envelope_encode};
use crate::stream::ByteStreamFactory;

const BRACE_OPEN: u8 = 0x7B; // '{' — first entry's separator
const COMMA: u8 = 0x2C; // ',' — every entry after the first
const COLON: u8 = 0x3A; // ':'
const BRACE_CLOSE: u8 = 0x7D; // '}' — folded into the terminator byte only

/// `key` is dropped (no separator/colon/value bytes are emitted for it) if
/// it's empty or the literal `"xt1"` — a historical quirk of the source
/// this codec matches, preserved rather than explained.
fn is_accepted_key(key: &str) -> bool {
    !key.is_empty() && key != "xt1"
}

/// Builds the framed, main-XORed, cid-XORed, envelope-packed payload text
/// for an ordered sequence of `(key, value)` entries.
pub fn encode_entries(ctx: &Context, entries: &[(String, JsonValue)]) -> String {
    let mut factory = ByteStreamFactory::new();
    let mut main = factory.build(ctx.main_seed, ctx.salt, true);
    let mut cid = factory.build(ctx.cid_seed, ctx.salt, false);

    let mut buffer: Vec<u8> = Vec::new();
    for (key, value) in entries {
        if !is_accepted_key(key) {
            #[cfg(feature = "logging")]
            log::trace!("dropping entry with rejected key {key:?}");
            continue;
        }

        let separator = if buffer.is_empty() { BRACE_OPEN } else { COMMA };
        buffer.push(separator ^ main.next(false));

        let key_json = serde_json::to_string(key).expect("string serialization is infallible");
        for b in key_json.into_bytes() {
            buffer.push(b ^ main.next(false));
        }

        buffer.push(COLON ^ main.next(false));

        let value_json = serde_json::to_string(value).expect("Value serialization is infallible");
        for b in value_json.into_bytes() {
            buffer.push(b ^ main.next(false));
        }
    }

    let main_cached = main.next(true);
    buffer.push(BRACE_CLOSE ^ main_cached);

    for b in buffer.iter_mut() {
        *b ^= cid.next(false);
    }

    envelope_encode(&buffer, ctx.salt)
}

/// Reverses [`encode_entries`]: unpacks the envelope, undoes the cid pass,
/// drops the terminator byte, undoes the main pass, and hands the
/// recovered (lossily UTF-8 decoded) text to [`scan_entries`].
pub fn decode_entries(ctx: &Context, text: &str) -> Vec<(String, JsonValue)> {
    let mut factory = ByteStreamFactory::new();
    let mut cid = factory.build(ctx.cid_seed, ctx.salt, false);
    let mut main = factory.build(ctx.main_seed, ctx.salt, true);

    let mut buffer = envelope_decode(text, ctx.salt, ctx.challenge_type);
    for b in buffer.iter_mut() {
        *b ^= cid.next(false);
    }
    buffer.pop(); // the terminator byte; its content is never inspected

    for b in buffer.iter_mut() {
        *b ^= main.next(false);
    }

    let recovered = String::from_utf8_lossy(&buffer);
    scan_entries(&recovered)
}

/// Scanner states, per the distilled spec's decoder state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekStart,
    Key,
    Colon,
    Value,
}

/// A lenient recovery parser over the reconstructed `{"k":v,"k2":v2,...`
/// text (note: no closing `}` — that position held the terminator byte,
/// already dropped). Never errors; characters that don't fit the expected
/// grammar at a given point are skipped one at a time and scanning
/// resumes from [`ScanState::SeekStart`], so a corrupted tail degrades
/// into missing trailing entries rather than aborting the whole decode.
fn scan_entries(text: &str) -> Vec<(String, JsonValue)> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = Vec::new();
    let mut i = 0usize;
    let mut state = ScanState::SeekStart;
    let mut pending_key: Option<String> = None;

    while i < chars.len() {
        match state {
            ScanState::SeekStart => {
                if chars[i] == '{' || chars[i] == ',' {
                    i += 1;
                    state = ScanState::Key;
                } else {
                    i += 1;
                }
            }
            ScanState::Key => {
                skip_whitespace(&chars, &mut i);
                if i < chars.len() && chars[i] == '"' {
                    let (key, next) = scan_json_string(&chars, i);
                    i = next;
                    pending_key = Some(key);
                    state = ScanState::Colon;
                } else {
                    state = ScanState::SeekStart;
                }
            }
            ScanState::Colon => {
                skip_whitespace(&chars, &mut i);
                if i < chars.len() && chars[i] == ':' {
                    i += 1;
                    state = ScanState::Value;
                } else {
                    pending_key.take();
                    state = ScanState::SeekStart;
                }
            }
            ScanState::Value => {
                skip_whitespace(&chars, &mut i);
                match scan_value(&chars, i) {
                    Some((value, next)) => {
                        if let Some(key) = pending_key.take() {
                            out.push((key, value));
                        }
                        i = next;
                        state = ScanState::SeekStart;
                    }
                    None => {
                        pending_key.take();
                        state = ScanState::SeekStart;
                    }
                }
            }
        }
    }

    out
}

fn skip_whitespace(chars: &[char], i: &mut usize) {
    while *i < chars.len() && chars[*i].is_whitespace() {
        *i += 1;
    }
}

/// Scans a JSON-quoted string starting at `chars[start] == '"'`. Tolerates
/// an unterminated string (runs to the end of input and synthesizes a
/// closing quote) and falls back to the raw, quote-stripped text if the
/// escape sequences inside don't form valid JSON.
fn scan_json_string(chars: &[char], start: usize) -> (String, usize) {
    let mut i = start + 1;
    let mut raw = String::new();
    raw.push('"');
    let mut closed = false;

    while i < chars.len() {
        let c = chars[i];
        raw.push(c);
        i += 1;
        if c == '\\' && i < chars.len() {
            raw.push(chars[i]);
            i += 1;
            continue;
        }
        if c == '"' {
            closed = true;
            break;
        }
    }
    if !closed {
        raw.push('"');
    }

    let value = serde_json::from_str::<String>(&raw)
        .unwrap_or_else(|_| raw.trim_matches('"').to_owned());
    (value, i)
}

/// Scans one value at `chars[start]`: a quoted string, a balanced nested
/// object/array (re-parsed with `serde_json`, falling back to the raw
/// substring on parse failure), a number, or `true`/`false`/`null`.
/// Returns `None` if nothing at `start` matches a recognized value shape.
fn scan_value(chars: &[char], start: usize) -> Option<(JsonValue, usize)> {
    if start >= chars.len() {
        return None;
    }

    match chars[start] {
        '"' => {
            let (s, next) = scan_json_string(chars, start);
            Some((JsonValue::String(s), next))
        }
        '{' => {
            let (raw, next) = scan_balanced(chars, start, '{', '}');
            let value = serde_json::from_str::<JsonValue>(&raw).unwrap_or_else(|_| {
                #[cfg(feature = "logging")]
                log::debug!("nested object fragment failed to parse, returning raw substring");
                JsonValue::String(raw)
            });
            Some((value, next))
        }
        '[' => {
            let (raw, next) = scan_balanced(chars, start, '[', ']');
            let value = serde_json::from_str::<JsonValue>(&raw).unwrap_or_else(|_| {
                #[cfg(feature = "logging")]
                log::debug!("nested array fragment failed to parse, returning raw substring");
                JsonValue::String(raw)
            });
            Some((value, next))
        }
        't' if matches_literal(chars, start, "true") => {
            Some((JsonValue::Bool(true), start + 4))
        }
        'f' if matches_literal(chars, start, "false") => {
            Some((JsonValue::Bool(false), start + 5))
        }
        'n' if matches_literal(chars, start, "null") => Some((JsonValue::Null, start + 4)),
        c if c == '-' || c.is_ascii_digit() => {
            let mut j = start;
            if chars[j] == '-' {
                j += 1;
            }
            while j < chars.len()
                && (chars[j].is_ascii_digit() || matches!(chars[j], '.' | 'e' | 'E' | '+' | '-'))
            {
                j += 1;
            }
            let raw: String = chars[start..j].iter().collect();
            serde_json::from_str::<JsonValue>(&raw)
                .ok()
                .map(|value| (value, j))
        }
        _ => None,
    }
}

fn matches_literal(chars: &[char], start: usize, literal: &str) -> bool {
    let literal_chars: Vec<char> = literal.chars().collect();
    if start + literal_chars.len() > chars.len() {
        return false;
    }
    chars[start..start + literal_chars.len()] == literal_chars[..]
}

/// Scans a balanced `open`/`close` span starting at `chars[start] == open`,
/// tracking string-literal context so braces/brackets inside quoted text
/// don't affect depth. An unbalanced span runs to the end of input.
fn scan_balanced(chars: &[char], start: usize, open: char, close: char) -> (String, usize) {
    let mut depth: i32 = 0;
    let mut i = start;
    let mut in_string = false;
    let mut buf = String::new();

    while i < chars.len() {
        let c = chars[i];
        buf.push(c);
        if in_string {
            if c == '\\' && i + 1 < chars.len() {
                i += 1;
                buf.push(chars[i]);
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                i += 1;
                return (buf, i);
            }
        }
        i += 1;
    }
    (buf, i)
}
