//! Conformance harness: runs JSON fixture cases against the decoder.
//!
//! A fixture file is a JSON array of cases:
//!
//! ```json
//! [
//!   {"name": "simple", "input": "{a: 1}", "expected": {"a": 1}},
//!   {"name": "dup", "input": "{a: 1, a: 2}", "error": "duplicate key"}
//! ]
//! ```
//!
//! Decoded trees are compared after [`normalize`], which maps the extended
//! scalar kinds onto tagged JSON strings: `"$date:YYYY-MM-DD"`,
//! `"$binary:HEX"` and `"$bigint:DECIMAL"`. The tagging is a harness
//! convention and not part of the text format.
//!
//! Matching is by value rather than by representation: an expected
//! `"$bigint:D"` accepts any integer whose decimal text is `D`, a plain
//! expected integer accepts the same value decoded through `BN(...)`, and
//! integers equal floats of the same value.

use crate::encoder::push_hex_upper;
use crate::parser::decode;
use crate::value::{Number, Value};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fmt;

/// One fixture case. `error` marks a case that must fail to decode; its text
/// is descriptive only and is not matched against the error message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub input: String,
    #[serde(default)]
    pub expected: Option<JsonValue>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Parse a fixture file.
pub fn load_cases(json: &str) -> serde_json::Result<Vec<TestCase>> {
    serde_json::from_str(json)
}

/// Comparison form of a value tree. Date-times are reduced to their date.
pub fn normalize(value: &Value) -> JsonValue {
    project(value, false)
}

/// JSON projection that keeps full date-time text
/// (`"$date:2026-01-15T10:30:00Z"`); otherwise identical to [`normalize`].
pub fn to_json(value: &Value) -> JsonValue {
    project(value, true)
}

fn project(value: &Value, full_datetimes: bool) -> JsonValue {
    match value {
        Value::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), project(v, full_datetimes)))
                .collect(),
        ),
        Value::Array(items) => {
            JsonValue::Array(items.iter().map(|v| project(v, full_datetimes)).collect())
        }
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Number(Number::Int(n)) => JsonValue::from(*n),
        Value::Number(Number::Float(f)) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Null => JsonValue::Null,
        Value::Date(date) => JsonValue::String(format!("$date:{}", date.format("%Y-%m-%d"))),
        Value::DateTime(ts) if full_datetimes => JsonValue::String(format!("$date:{ts}")),
        Value::DateTime(ts) => {
            JsonValue::String(format!("$date:{}", ts.date().format("%Y-%m-%d")))
        }
        Value::BigInt(n) => JsonValue::String(format!("$bigint:{n}")),
        Value::Binary(bytes) => {
            let mut tagged = String::from("$binary:");
            push_hex_upper(bytes, &mut tagged);
            JsonValue::String(tagged)
        }
    }
}

/// Result of running one case.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Decoded and matched `expected` (or decoded, when no `expected` was given).
    Pass,
    /// Failed to decode, as the case required.
    PassWithError(String),
    /// Decoded although the case expected an error.
    UnexpectedSuccess {
        expected_error: String,
        actual: JsonValue,
    },
    /// Failed to decode although the case expected a value.
    UnexpectedError(String),
    /// Decoded to a different tree.
    Mismatch {
        expected: JsonValue,
        actual: JsonValue,
    },
}

impl Outcome {
    pub fn passed(&self) -> bool {
        matches!(self, Outcome::Pass | Outcome::PassWithError(_))
    }
}

/// A named outcome, displayed as a `PASS:` / `FAIL:` report line.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseResult {
    pub name: String,
    pub outcome: Outcome,
}

impl fmt::Display for CaseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        match &self.outcome {
            Outcome::Pass => write!(f, "PASS: {name}"),
            Outcome::PassWithError(msg) => {
                write!(f, "PASS: {name} (Caught expected error: {msg})")
            }
            Outcome::UnexpectedSuccess {
                expected_error,
                actual,
            } => write!(
                f,
                "FAIL: {name} - Expected error {expected_error}, but it parsed successfully. Result: {actual}"
            ),
            Outcome::UnexpectedError(msg) => write!(f, "FAIL: {name} - Unexpected error: {msg}"),
            Outcome::Mismatch { expected, actual } => write!(
                f,
                "FAIL: {name} - Result mismatch.\n  Expected: {expected}\n  Got:      {actual}"
            ),
        }
    }
}

/// Results of a whole fixture run, in fixture order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub results: Vec<CaseResult>,
}

impl Report {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Conformance Test Results: {} passed, {} failed.",
            self.passed(),
            self.failed()
        )
    }
}

/// Decode one case's input and judge the result.
pub fn run_case(case: &TestCase) -> Outcome {
    match (decode(&case.input), &case.error) {
        (Err(err), Some(_)) => Outcome::PassWithError(err.to_string()),
        (Err(err), None) => Outcome::UnexpectedError(err.to_string()),
        (Ok(value), Some(expected_error)) => Outcome::UnexpectedSuccess {
            expected_error: expected_error.clone(),
            actual: normalize(&value),
        },
        (Ok(value), None) => {
            let actual = normalize(&value);
            match &case.expected {
                Some(expected) if !json_matches(expected, &actual) => Outcome::Mismatch {
                    expected: expected.clone(),
                    actual,
                },
                _ => Outcome::Pass,
            }
        }
    }
}

/// Structural comparison of an expected fixture tree against a normalized one.
pub fn json_matches(expected: &JsonValue, actual: &JsonValue) -> bool {
    match (expected, actual) {
        (JsonValue::String(e), _) if e.starts_with("$bigint:") => {
            integer_text(actual).is_some_and(|digits| digits == e["$bigint:".len()..])
        }
        (JsonValue::Number(e), JsonValue::String(_)) if e.is_i64() || e.is_u64() => {
            integer_text(actual).is_some_and(|digits| digits == e.to_string())
        }
        (JsonValue::Number(e), JsonValue::Number(a)) => {
            e == a || matches!((e.as_f64(), a.as_f64()), (Some(x), Some(y)) if x == y)
        }
        (JsonValue::Array(e), JsonValue::Array(a)) => {
            e.len() == a.len() && e.iter().zip(a).all(|(e, a)| json_matches(e, a))
        }
        (JsonValue::Object(e), JsonValue::Object(a)) => {
            e.len() == a.len()
                && e.iter()
                    .all(|(k, e)| a.get(k).is_some_and(|a| json_matches(e, a)))
        }
        _ => expected == actual,
    }
}

/// Decimal text of an integer, whether plain or tagged `"$bigint:..."`.
fn integer_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        JsonValue::String(s) => s.strip_prefix("$bigint:").map(str::to_string),
        _ => None,
    }
}

/// Run every case in order.
pub fn run_cases(cases: &[TestCase]) -> Report {
    Report {
        results: cases
            .iter()
            .map(|case| CaseResult {
                name: case.name.clone(),
                outcome: run_case(case),
            })
            .collect(),
    }
}
