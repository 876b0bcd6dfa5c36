//! Canonical DTXT serializer: value tree to deterministic text.
//!
//! Output rules:
//!
//! - **Sorted keys**: object members are written in byte order of their keys,
//!   whatever the insertion order of the map.
//! - **Fixed punctuation**: `", "` between members/elements, `": "` after keys.
//! - **Scalars**: `T` / `F` / `N`, backtick strings, `D(...)`, `B(HEX)`; integers
//!   without a decimal point, floats always with a `.` or exponent so they decode
//!   back as floats.
//! - **Pretty mode**: one member per line, one indent unit per nesting level, and
//!   a trailing comma after every member or element.
//!
//! Values the text grammar cannot express (backticks inside strings, keys that
//! would not lex as a key, non-finite floats, years outside 0000–9999) are
//! reported as [`FormatError::Unsupported`] instead of producing text that
//! would decode differently.

use crate::error::{FormatError, Result};
use crate::lexer::is_bare_key;
use crate::options::EncodeOptions;
use crate::value::{Map, Number, Value};
use chrono::{Datelike, NaiveDate};

/// Encode a value in compact canonical form.
///
/// # Example
/// ```
/// use dtxt_core::{decode, encode};
///
/// let doc = decode("{b: 1, a: [T, N], c: `x`}").unwrap();
/// assert_eq!(encode(&doc).unwrap(), "{a: [T, N], b: 1, c: `x`}");
/// ```
pub fn encode(value: &Value) -> Result<String> {
    encode_with(value, &EncodeOptions::compact())
}

/// Encode a value across multiple lines using `indent_unit` per nesting level.
pub fn encode_pretty(value: &Value, indent_unit: &str) -> Result<String> {
    encode_with(value, &EncodeOptions::pretty(indent_unit))
}

/// Encode a value with explicit layout options.
///
/// A pretty-mode indent unit must be a non-empty run of spaces and tabs; any
/// other text would be read back as tokens or comments.
pub fn encode_with(value: &Value, options: &EncodeOptions) -> Result<String> {
    if let Some(unit) = options.indent.as_deref() {
        check_indent(unit)?;
    }
    let mut out = String::new();
    encode_value(value, options, 0, &mut out)?;
    Ok(out)
}

/// Recursive dispatch. `level` is the nesting depth of `value` itself.
fn encode_value(value: &Value, options: &EncodeOptions, level: usize, out: &mut String) -> Result<()> {
    match value {
        Value::Object(map) => encode_object(map, options, level, out),
        Value::Array(items) => encode_array(items, options, level, out),
        _ => encode_scalar(value, options, out),
    }
}

fn encode_object(map: &Map, options: &EncodeOptions, level: usize, out: &mut String) -> Result<()> {
    if map.is_empty() {
        out.push_str("{}");
        return Ok(());
    }
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    out.push('{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        open_item(i, options, level, out);
        encode_key(key, out)?;
        out.push_str(": ");
        encode_value(value, options, level + 1, out)?;
    }
    close_container(options, level, out);
    out.push('}');
    Ok(())
}

fn encode_array(items: &[Value], options: &EncodeOptions, level: usize, out: &mut String) -> Result<()> {
    if items.is_empty() {
        out.push_str("[]");
        return Ok(());
    }
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        open_item(i, options, level, out);
        encode_value(item, options, level + 1, out)?;
    }
    close_container(options, level, out);
    out.push(']');
    Ok(())
}

/// Separator and indentation before the `i`-th member of a container.
fn open_item(i: usize, options: &EncodeOptions, level: usize, out: &mut String) {
    match options.indent.as_deref() {
        Some(unit) => {
            out.push_str(if i == 0 { "\n" } else { ",\n" });
            push_indent(unit, level + 1, out);
        }
        None => {
            if i > 0 {
                out.push_str(", ");
            }
        }
    }
}

/// Pretty mode ends the last member with `,` and puts the closer on its own line.
fn close_container(options: &EncodeOptions, level: usize, out: &mut String) {
    if let Some(unit) = options.indent.as_deref() {
        out.push_str(",\n");
        push_indent(unit, level, out);
    }
}

fn check_indent(unit: &str) -> Result<()> {
    if !unit.is_empty() && unit.bytes().all(|b| b == b' ' || b == b'\t') {
        Ok(())
    } else {
        Err(FormatError::Unsupported(format!(
            "indent unit {unit:?} must be spaces or tabs"
        )))
    }
}

fn push_indent(unit: &str, level: usize, out: &mut String) {
    for _ in 0..level {
        out.push_str(unit);
    }
}

fn encode_key(key: &str, out: &mut String) -> Result<()> {
    if !is_bare_key(key) {
        return Err(FormatError::Unsupported(format!(
            "object key {key:?} is not a bare identifier"
        )));
    }
    out.push_str(key);
    Ok(())
}

fn encode_scalar(value: &Value, options: &EncodeOptions, out: &mut String) -> Result<()> {
    match value {
        Value::String(s) => {
            if s.contains('`') {
                return Err(FormatError::Unsupported(format!(
                    "string containing a backtick: {s:?}"
                )));
            }
            out.push('`');
            out.push_str(s);
            out.push('`');
        }
        Value::Number(Number::Int(n)) => out.push_str(&n.to_string()),
        Value::Number(Number::Float(f)) => out.push_str(&format_float(*f)?),
        Value::Bool(true) => out.push('T'),
        Value::Bool(false) => out.push('F'),
        Value::Null => out.push('N'),
        Value::Date(date) => {
            check_year(*date)?;
            out.push_str("D(");
            out.push_str(&date.format("%Y-%m-%d").to_string());
            out.push(')');
        }
        Value::DateTime(ts) => {
            check_year(ts.date())?;
            if let Some(offset) = ts.offset {
                if offset.local_minus_utc() % 60 != 0 {
                    return Err(FormatError::Unsupported(format!(
                        "UTC offset {offset} is not a whole number of minutes"
                    )));
                }
            }
            out.push_str("D(");
            out.push_str(&ts.to_string());
            out.push(')');
        }
        Value::BigInt(n) => {
            if options.bigint_constructor {
                out.push_str("BN(");
                out.push_str(&n.to_string());
                out.push(')');
            } else {
                out.push_str(&n.to_string());
            }
        }
        Value::Binary(bytes) => {
            out.push_str("B(");
            push_hex_upper(bytes, out);
            out.push(')');
        }
        Value::Object(_) | Value::Array(_) => {
            return Err(FormatError::Unsupported(format!(
                "{} in scalar position",
                value.type_name()
            )))
        }
    }
    Ok(())
}

/// Shortest round-trippable text, always marked as a float: a `.0` suffix for
/// whole values and an exponent for very large or very small magnitudes.
fn format_float(f: f64) -> Result<String> {
    if !f.is_finite() {
        return Err(FormatError::Unsupported(format!("non-finite float {f}")));
    }
    let abs = f.abs();
    let mut s = if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        format!("{f:e}")
    } else {
        format!("{f}")
    };
    if !s.contains(['.', 'e']) {
        s.push_str(".0");
    }
    Ok(s)
}

/// `D(...)` payloads are four-digit years only.
fn check_year(date: NaiveDate) -> Result<()> {
    if (0..=9999).contains(&date.year()) {
        Ok(())
    } else {
        Err(FormatError::Unsupported(format!(
            "date {date} outside years 0000-9999"
        )))
    }
}

pub(crate) fn push_hex_upper(bytes: &[u8], out: &mut String) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    out.reserve(bytes.len() * 2);
    for b in bytes {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0F) as usize] as char);
    }
}
