//! Typed constructor decoding: `D(...)`, `BN(...)` and `B(...)`.
//!
//! The dispatch table is closed. Any other constructor name is an error, and
//! every payload is validated; malformed dates fail rather than falling back
//! to a raw string.

use crate::error::{FormatError, Result};
use crate::value::{Timestamp, Value};
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use num_bigint::BigInt;

/// Decode a full constructor lexeme such as `BN(42)` found at `offset`.
pub(crate) fn decode_constructor(lexeme: &str, offset: usize) -> Result<Value> {
    let (name, payload) = split_constructor(lexeme).ok_or_else(|| {
        FormatError::UnexpectedToken {
            found: format!("malformed constructor `{lexeme}`"),
            offset,
        }
    })?;

    match name {
        "D" => decode_date(payload, offset),
        "BN" => decode_bigint(payload, offset),
        "B" => decode_binary(payload, offset),
        _ => Err(FormatError::UnknownConstructor {
            name: name.to_string(),
            offset,
        }),
    }
}

/// `Name(payload)` → `(Name, payload)`.
fn split_constructor(lexeme: &str) -> Option<(&str, &str)> {
    let open = lexeme.find('(')?;
    let inner = lexeme[open + 1..].strip_suffix(')')?;
    let name = &lexeme[..open];
    if name.is_empty() {
        return None;
    }
    Some((name, inner))
}

fn decode_date(payload: &str, offset: usize) -> Result<Value> {
    let invalid = || FormatError::InvalidPayload {
        constructor: "D",
        payload: payload.to_string(),
        offset,
    };
    if payload.contains('T') {
        parse_timestamp(payload)
            .map(Value::DateTime)
            .ok_or_else(invalid)
    } else {
        parse_date(payload).map(Value::Date).ok_or_else(invalid)
    }
}

/// Strict `YYYY-MM-DD`; chrono alone would also accept single-digit fields.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    let shaped = b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b
            .iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// `YYYY-MM-DDTHH:MM[:SS[.fff]]` followed by nothing, `Z`, or `±HH:MM`.
fn parse_timestamp(s: &str) -> Option<Timestamp> {
    let (date, rest) = s.split_once('T')?;
    let date = parse_date(date)?;

    if let Some(time) = rest.strip_suffix('Z') {
        return Some(Timestamp::utc(date.and_time(parse_time(time)?)));
    }
    if let Some(split) = rest.find(['+', '-']) {
        let (time, offset) = rest.split_at(split);
        let offset = parse_offset(offset)?;
        return Some(Timestamp::with_offset(
            date.and_time(parse_time(time)?),
            offset,
        ));
    }
    Some(Timestamp::floating(date.and_time(parse_time(rest)?)))
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let b = s.as_bytes();
    if b.len() < 5 || b[2] != b':' || !b[..2].iter().chain(&b[3..5]).all(u8::is_ascii_digit) {
        return None;
    }
    if b.len() == 5 {
        return NaiveTime::parse_from_str(s, "%H:%M").ok();
    }
    if b[5] != b':' || b.len() < 8 || !b[6..8].iter().all(u8::is_ascii_digit) {
        return None;
    }
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f").ok()
}

/// `+HH:MM`, `-HH:MM` or the compact `+HHMM`.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, digits) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    // Byte-index slicing below needs single-byte characters.
    if !digits.is_ascii() {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        5 if digits.as_bytes()[2] == b':' => (&digits[..2], &digits[3..]),
        4 => (&digits[..2], &digits[2..]),
        _ => return None,
    };
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn decode_bigint(payload: &str, offset: usize) -> Result<Value> {
    let digits = payload.strip_prefix('-').unwrap_or(payload);
    let valid = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
    let parsed = if valid {
        payload.parse::<BigInt>().ok()
    } else {
        None
    };
    parsed.map(Value::BigInt).ok_or_else(|| FormatError::InvalidPayload {
        constructor: "BN",
        payload: payload.to_string(),
        offset,
    })
}

fn decode_binary(payload: &str, offset: usize) -> Result<Value> {
    decode_hex(payload)
        .map(Value::Binary)
        .ok_or_else(|| FormatError::InvalidPayload {
            constructor: "B(hex)",
            payload: payload.to_string(),
            offset,
        })
}

/// Case-insensitive hex of even length; the empty string decodes to no bytes.
fn decode_hex(s: &str) -> Option<Vec<u8>> {
    let bytes = s.as_bytes();
    if bytes.len() % 2 != 0 {
        return None;
    }
    bytes
        .chunks_exact(2)
        .map(|pair| Some(hex_nibble(pair[0])? << 4 | hex_nibble(pair[1])?))
        .collect()
}

fn hex_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
