/// DTXT format compliance tests
///
/// Grouped by feature: canonical form, constructors, syntax tolerance,
/// rejection rules and thread-safety. Each group checks the decoded tree and,
/// where the feature affects output, the exact canonical text.
use dtxt_core::{decode, encode, encode_pretty, FormatError, Value};
use num_bigint::BigInt;

/// Assert canonical encoding of a decoded document.
fn assert_canonical(text: &str, expected: &str) {
    let doc = decode(text).unwrap();
    let got = encode(&doc).unwrap();
    assert_eq!(
        got, expected,
        "Canonical mismatch:\n  input:    {text}\n  got:      {got}\n  expected: {expected}"
    );
}

/// Assert canonical-form invariants: single line, no trailing space, no
/// trailing comma before a closer.
fn assert_compact_invariants(text: &str) {
    assert!(!text.contains('\n') || text.contains('`'), "compact output spans lines: {text:?}");
    assert!(!text.ends_with(' '), "trailing space: {text:?}");
    assert!(!text.contains(",}") && !text.contains(",]"), "trailing comma: {text:?}");
}

const SAMPLE_DOCUMENT: &str = "
// DTXT example
{
  name: `Sample`,
  created: D(2026-01-15),
  updated: D(2026-01-15T10:30:00Z),
  active: T,
  count: 42,
  big: BN(9007199254740993),
  hash: B(A7B2319E44CE12BA),
  items: [1, 2, 3],
  meta: {
    retries: 3,
    enabled: F,
  },
}
";

// ============================================================================
// 1. SAMPLE DOCUMENT
// ============================================================================

mod sample_document {
    use super::*;

    #[test]
    fn decodes_every_kind() {
        let doc = decode(SAMPLE_DOCUMENT).unwrap();
        assert_eq!(doc.get("name").and_then(Value::as_str), Some("Sample"));
        assert_eq!(
            doc.get("created").and_then(Value::as_date).map(|d| d.to_string()),
            Some("2026-01-15".to_string())
        );
        assert!(doc.get("updated").and_then(Value::as_datetime).is_some_and(|t| t.is_utc()));
        assert_eq!(doc.get("active").and_then(Value::as_bool), Some(true));
        assert_eq!(doc.get("count").and_then(Value::as_i64), Some(42));
        assert_eq!(
            doc.get("big").and_then(Value::as_bigint),
            Some(&BigInt::from(9007199254740993i64))
        );
        assert_eq!(
            doc.get("hash").and_then(Value::as_bytes),
            Some(&[0xA7, 0xB2, 0x31, 0x9E, 0x44, 0xCE, 0x12, 0xBA][..])
        );
        let meta = doc.get("meta").unwrap();
        assert_eq!(meta.get("retries").and_then(Value::as_i64), Some(3));
        assert_eq!(meta.get("enabled").and_then(Value::as_bool), Some(false));
    }

    #[test]
    fn canonical_text() {
        assert_canonical(
            SAMPLE_DOCUMENT,
            "{active: T, big: 9007199254740993, count: 42, created: D(2026-01-15), \
             hash: B(A7B2319E44CE12BA), items: [1, 2, 3], meta: {enabled: F, retries: 3}, \
             name: `Sample`, updated: D(2026-01-15T10:30:00Z)}",
        );
    }

    #[test]
    fn roundtrip_through_canonical_and_pretty() {
        let doc = decode(SAMPLE_DOCUMENT).unwrap();
        let compact = encode(&doc).unwrap();
        assert_compact_invariants(&compact);
        assert_eq!(decode(&compact).unwrap(), doc);
        assert_eq!(decode(&encode_pretty(&doc, "  ").unwrap()).unwrap(), doc);
    }
}

// ============================================================================
// 2. CANONICAL FORM
// ============================================================================

mod canonical_form {
    use super::*;

    #[test]
    fn keys_sorted_regardless_of_insertion_order() {
        assert_canonical("{b: 1, a: 2}", "{a: 2, b: 1}");
    }

    #[test]
    fn sort_is_bytewise_not_case_folded() {
        assert_canonical("{b: 1, B: 2, a: 3, A: 4}", "{A: 4, B: 2, a: 3, b: 1}");
    }

    #[test]
    fn idempotent() {
        for text in [
            "{z: [1, 2.5, `s`], a: {y: N, x: T}}",
            "{d: D(1999-12-31T23:59:59.5+01:00), h: B(00)}",
            "{n: 18446744073709551616}",
        ] {
            let once = encode(&decode(text).unwrap()).unwrap();
            let twice = encode(&decode(&once).unwrap()).unwrap();
            assert_eq!(once, twice, "not idempotent for {text}");
        }
    }

    #[test]
    fn whitespace_and_comments_do_not_affect_output() {
        let a = encode(&decode("{a:1,b:[T,F]}").unwrap()).unwrap();
        let b = encode(&decode("{\n  a : 1 , // one\n  b : [ T , F , ] ,\n}").unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn utc_offset_prints_as_z() {
        assert_canonical("{t: D(2026-01-15T10:30:00+00:00)}", "{t: D(2026-01-15T10:30:00Z)}");
    }

    #[test]
    fn binary_hex_is_uppercased() {
        assert_canonical("{h: B(deadbeef)}", "{h: B(DEADBEEF)}");
    }

    #[test]
    fn pretty_uses_trailing_commas_and_own_line_closers() {
        let doc = decode("{a: [1], b: 2}").unwrap();
        assert_eq!(
            encode_pretty(&doc, "  ").unwrap(),
            "{\n  a: [\n    1,\n  ],\n  b: 2,\n}"
        );
    }
}

// ============================================================================
// 3. CONSTRUCTORS
// ============================================================================

mod constructors {
    use super::*;

    #[test]
    fn constructor_literals_reencode() {
        assert_canonical(
            "{d: D(2026-01-15), n: BN(9007199254740993), h: B(A7B2319E)}",
            "{d: D(2026-01-15), h: B(A7B2319E), n: 9007199254740993}",
        );
        let doc = decode("{h: B(A7B2319E)}").unwrap();
        assert_eq!(doc.get("h").and_then(Value::as_bytes).map(<[u8]>::len), Some(4));
    }

    #[test]
    fn date_without_time_has_no_time_part() {
        let doc = decode("{d: D(2026-01-15)}").unwrap();
        assert!(matches!(doc.get("d"), Some(Value::Date(_))));
    }

    #[test]
    fn datetime_minute_precision() {
        assert_canonical("{t: D(2026-01-15T10:30Z)}", "{t: D(2026-01-15T10:30:00Z)}");
    }

    #[test]
    fn malformed_date_payloads_fail() {
        for payload in [
            "2026-1-15",
            "2026-13-01",
            "15-01-2026",
            "2026-01-15T25:00:00",
            "yesterday",
            "",
            "2026-01-15T10:30+1\u{e9}0",
            "2026-01-15T10:30+\u{e9}:00",
            "2026-01-15T1\u{e9}:30",
            "2\u{e9}26-01-15",
        ] {
            let text = format!("{{d: D({payload})}}");
            assert!(
                matches!(decode(&text), Err(FormatError::InvalidPayload { constructor: "D", .. })),
                "D({payload}) should fail"
            );
        }
    }

    #[test]
    fn bigint_payload_rules() {
        assert!(decode("{n: BN(007)}").is_ok());
        for payload in ["", "+5", "1.5", "1e3", "0x10", "--1"] {
            let text = format!("{{n: BN({payload})}}");
            assert!(decode(&text).is_err(), "BN({payload}) should fail");
        }
    }

    #[test]
    fn hex_payload_rules() {
        assert!(decode("{h: B(aBcD)}").is_ok());
        for payload in ["A", "ABC", "GG", "0x00", "12-4"] {
            let text = format!("{{h: B({payload})}}");
            assert!(decode(&text).is_err(), "B({payload}) should fail");
        }
    }

    #[test]
    fn constructor_table_is_closed() {
        for name in ["Date", "d", "BIN", "X"] {
            let text = format!("{{v: {name}(1)}}");
            assert!(
                matches!(decode(&text), Err(FormatError::UnknownConstructor { .. })),
                "{name}(1) should be unknown"
            );
        }
    }

    #[test]
    fn payload_with_whitespace_or_parens_is_not_a_constructor() {
        assert!(decode("{d: D(2026-01-15 10:30)}").is_err());
        assert!(decode("{d: D((1))}").is_err());
    }
}

// ============================================================================
// 4. SYNTAX TOLERANCE
// ============================================================================

mod syntax_tolerance {
    use super::*;

    #[test]
    fn trailing_comma_in_array() {
        assert_eq!(
            decode("{a: [1, 2, 3,]}").unwrap(),
            decode("{a: [1, 2, 3]}").unwrap()
        );
    }

    #[test]
    fn trailing_comma_in_object() {
        assert_eq!(decode("{a: 1, b: 2,}").unwrap(), decode("{a: 1, b: 2}").unwrap());
    }

    #[test]
    fn reserved_word_keys() {
        let doc = decode("{T: 1, F: 2, N: 3}").unwrap();
        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["T", "F", "N"]);
    }

    #[test]
    fn digit_leading_keys() {
        let doc = decode("{ 123key: T, _key: F, Key9: N }").unwrap();
        assert_eq!(doc.get("123key"), Some(&Value::Bool(true)));
        assert_eq!(doc.get("_key"), Some(&Value::Bool(false)));
        assert_eq!(doc.get("Key9"), Some(&Value::Null));
    }

    #[test]
    fn comment_at_end_of_input_without_newline() {
        assert!(decode("{a: 1} // done").is_ok());
    }

    #[test]
    fn crlf_line_endings() {
        assert!(decode("{\r\n  a: 1,\r\n  b: 2\r\n}\r\n").is_ok());
    }
}

// ============================================================================
// 5. REJECTION RULES
// ============================================================================

mod rejection {
    use super::*;

    #[test]
    fn root_must_be_object() {
        assert!(decode("[1,2,3]").is_err());
        assert!(decode("`text`").is_err());
        assert!(decode("T").is_err());
        assert!(decode("D(2026-01-15)").is_err());
    }

    #[test]
    fn duplicate_key_message_names_the_key() {
        let err = decode("{a: 1, a: 2}").unwrap_err();
        assert!(err.to_string().contains("Duplicate key: a"), "{err}");
    }

    #[test]
    fn reserved_key_duplicates_are_detected() {
        assert!(matches!(
            decode("{T: 1, T: 2}"),
            Err(FormatError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn trailing_data() {
        assert!(decode("{a: 1} garbage").is_err());
        assert!(decode("{a: 1} }").is_err());
        assert!(decode("{a: 1},").is_err());
    }

    #[test]
    fn block_comments_are_not_supported() {
        let err = decode("{ // comment\n  a: 1, \n /* not supported */ \n b: 2 }").unwrap_err();
        assert!(err.to_string().contains("Unexpected character"), "{err}");
    }

    #[test]
    fn json_spellings_are_not_literals() {
        assert!(decode("{a: true}").is_err());
        assert!(decode("{a: null}").is_err());
        assert!(decode("{a: \"quoted\"}").is_err());
        assert!(decode("{\"a\": 1}").is_err());
    }

    #[test]
    fn every_error_carries_an_offset() {
        for text in ["{a: @}", "{a: 1,, b: 2}", "{a 1}", "{a: 1} x", "{a: B(1)}", "{a: Q(1)}"] {
            let err = decode(text).unwrap_err();
            assert!(err.offset().is_some(), "no offset for {text}: {err}");
        }
    }
}

// ============================================================================
// 6. THREAD SAFETY
// ============================================================================

mod parallel {
    use super::*;
    use std::thread;

    #[test]
    fn independent_documents_decode_in_parallel() {
        let docs: Vec<String> = (0..16)
            .map(|i| format!("{{id: {i}, tags: [`t{i}`, D(2026-01-{:02})], blob: B({i:02X})}}", i + 1))
            .collect();

        let results: Vec<String> = thread::scope(|s| {
            let handles: Vec<_> = docs
                .iter()
                .map(|doc| s.spawn(move || encode(&decode(doc).unwrap()).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (doc, canonical) in docs.iter().zip(&results) {
            assert_eq!(canonical, &encode(&decode(doc).unwrap()).unwrap());
        }
    }

    #[test]
    fn values_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Value>();
        assert_send_sync::<FormatError>();
    }
}
