use super::*;
use crate::severity::SeverityRule;
use detent_core::Severity;
use std::io::Write;

fn checkout_with(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, contents) in files {
        let mut f = std::fs::File::create(dir.path().join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }
    dir
}

#[test]
fn end_to_end_pipeline_over_mixed_output() {
    let dir = checkout_with(&[("src/main.rs", "fn main() {\n    let x = 1;\n}\n")]);
    let lines = vec![
        "Compiling foo v0.1.0",
        "src/main.rs:2:9: warning: unused variable: `x`",
        "src/main.rs:2:9: warning: unused variable: `x`",
        "random chatter",
        "Process completed with exit code 1.",
    ];

    let extractor = Extractor::new();
    let result = extractor.extract(lines, dir.path());

    assert_eq!(result.diagnostics.len(), 2);
    assert_eq!(result.unmatched.other, 2);
    assert_eq!(result.snippet_stats.attached, 1);
    assert!(result.by_file.contains_key("src/main.rs"));
    assert!(result.by_category.contains_key("compiler"));
    assert!(result.by_category.contains_key("exit-code"));
}

#[test]
fn unmatched_error_like_lines_become_unknown_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let lines = vec!["some tool: error occurred deep inside"];
    let extractor = Extractor::new();
    let result = extractor.extract(lines, dir.path());

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].category, "unknown");
    assert_eq!(result.unmatched.error_like, 1);
}

#[test]
fn severity_rules_apply_before_dedup_and_grouping() {
    let dir = tempfile::tempdir().unwrap();
    let lines = vec![r#"{"category":"eslint","message":"no-console used"}"#];
    let extractor =
        Extractor::new().with_severity_rules(vec![SeverityRule::for_category(
            "eslint",
            Severity::Info,
        )]);
    let result = extractor.extract(lines, dir.path());
    assert_eq!(result.diagnostics[0].severity, Severity::Info);
    assert_eq!(result.by_category["eslint"][0].severity, Severity::Info);
}

#[test]
fn empty_input_produces_empty_result() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = Extractor::new();
    let result = extractor.extract(Vec::new(), dir.path());
    assert!(result.diagnostics.is_empty());
    assert!(result.by_file.is_empty());
    assert!(result.by_category.is_empty());
}
