use dtxt_core::conformance::{load_cases, run_case, run_cases, CaseResult, Outcome};

const FIXTURE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/conformance.json"
));

#[test]
fn fixture_parses() {
    let cases = load_cases(FIXTURE).unwrap();
    assert!(cases.len() >= 30);
    for case in &cases {
        assert!(
            case.expected.is_some() ^ case.error.is_some(),
            "case {} must have exactly one of expected/error",
            case.name
        );
    }
}

#[test]
fn every_fixture_case_passes() {
    let cases = load_cases(FIXTURE).unwrap();
    let report = run_cases(&cases);
    let failures: Vec<String> = report
        .results
        .iter()
        .filter(|r| !r.outcome.passed())
        .map(CaseResult::to_string)
        .collect();
    assert!(failures.is_empty(), "{}\n{report}", failures.join("\n"));
    assert_eq!(report.passed(), cases.len());
}

#[test]
fn invalid_date_payload_is_a_hard_error() {
    let cases = load_cases(FIXTURE).unwrap();
    let case = cases
        .iter()
        .find(|c| c.name == "date_invalid_payload")
        .expect("fixture must cover malformed D payloads");
    match run_case(case) {
        Outcome::PassWithError(msg) => assert!(msg.contains("Invalid D payload"), "{msg}"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn report_lines() {
    let cases = load_cases(
        r#"[
            {"name": "ok", "input": "{a: 1}", "expected": {"a": 1}},
            {"name": "caught", "input": "{a: 1, a: 2}", "error": "duplicate key"},
            {"name": "surprise", "input": "{a: 1}", "error": "something"},
            {"name": "broken", "input": "{a: }", "expected": {"a": 1}},
            {"name": "differs", "input": "{a: B(FF)}", "expected": {"a": "$binary:00"}}
        ]"#,
    )
    .unwrap();
    let report = run_cases(&cases);
    let lines: Vec<String> = report.results.iter().map(ToString::to_string).collect();

    assert_eq!(lines[0], "PASS: ok");
    assert!(lines[1].starts_with("PASS: caught (Caught expected error: Duplicate key: a"));
    assert_eq!(
        lines[2],
        "FAIL: surprise - Expected error something, but it parsed successfully. Result: {\"a\":1}"
    );
    assert!(lines[3].starts_with("FAIL: broken - Unexpected error: "));
    assert_eq!(
        lines[4],
        "FAIL: differs - Result mismatch.\n  Expected: {\"a\":\"$binary:00\"}\n  Got:      {\"a\":\"$binary:FF\"}"
    );
    assert_eq!(
        report.to_string(),
        "Conformance Test Results: 2 passed, 3 failed."
    );
}
