use super::*;

#[yare::parameterized(
    error_with_location = { "src/main.rs:10:5: error: unused variable", Some(Severity::Error) },
    warning_with_location = { "src/main.rs:1:1: warning: deprecated", Some(Severity::Warning) },
    unrelated_line = { "Running tests...", None },
    bare_word_no_colons = { "error", None },
)]
fn severity_prefixed_classifies(line: &str, expected: Option<Severity>) {
    let diags = SeverityPrefixedParser.parse_line(line);
    assert_eq!(diags.map(|d| d[0].severity), expected);
}

#[test]
fn severity_prefixed_captures_location_and_message() {
    let diags = SeverityPrefixedParser
        .parse_line("src/main.rs:10:5: error: unused variable")
        .unwrap();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].file.as_deref(), Some("src/main.rs"));
    assert_eq!(diags[0].line, Some(10));
    assert_eq!(diags[0].column, Some(5));
    assert_eq!(diags[0].message, "unused variable");
}

#[test]
fn json_parser_reads_minimal_object() {
    let diags = JsonDiagnosticParser
        .parse_line(r#"{"message":"something broke"}"#)
        .unwrap();
    assert_eq!(diags[0].message, "something broke");
    assert_eq!(diags[0].severity, Severity::Error);
}

#[test]
fn json_parser_reads_full_object() {
    let line = r#"{"file":"a.go","line":12,"column":3,"severity":"warning","category":"go-vet","ruleId":"unused","message":"x declared and not used"}"#;
    let diags = JsonDiagnosticParser.parse_line(line).unwrap();
    let diag = &diags[0];
    assert_eq!(diag.severity, Severity::Warning);
    assert_eq!(diag.category, "go-vet");
    assert_eq!(diag.file.as_deref(), Some("a.go"));
    assert_eq!(diag.line, Some(12));
    assert_eq!(diag.column, Some(3));
    assert_eq!(diag.rule_id.as_deref(), Some("unused"));
}

#[test]
fn json_parser_rejects_non_json_and_missing_message() {
    assert!(JsonDiagnosticParser.parse_line("not json at all").is_none());
    assert!(JsonDiagnosticParser.parse_line(r#"{"file":"a.go"}"#).is_none());
}

#[test]
fn generic_parser_defaults_to_error_severity() {
    let diags = GenericPathLineColParser
        .parse_line("a.txt:4:2: something looks off")
        .unwrap();
    assert_eq!(diags[0].severity, Severity::Error);
    assert_eq!(diags[0].category, "generic");
}

#[test]
fn exit_code_sentinel_matches_nonzero_codes() {
    let diags = ExitCodeSentinelParser
        .parse_line("Process completed with exit code 1.")
        .unwrap();
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains('1'));
}

#[test]
fn exit_code_sentinel_is_empty_match_for_zero() {
    let diags = ExitCodeSentinelParser
        .parse_line("Process completed with exit code 0.")
        .unwrap();
    assert!(diags.is_empty());
}

#[test]
fn exit_code_sentinel_ignores_unrelated_lines() {
    assert!(ExitCodeSentinelParser.parse_line("hello world").is_none());
}
