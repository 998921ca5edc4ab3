use super::*;
use std::path::Path;

const SIMPLE: &str = r#"
name: CI
on: push
jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - name: Checkout
        uses: actions/checkout@v4
      - name: Test
        run: cargo test
  lint:
    needs: build
    runs-on: ubuntu-latest
    steps:
      - run: cargo clippy
"#;

#[test]
fn parses_jobs_and_steps() {
    let doc = WorkflowDocument::parse(Path::new("wf.yml"), SIMPLE).unwrap();
    assert_eq!(doc.jobs.len(), 2);
    let build = &doc.jobs["build"];
    assert_eq!(build.steps.len(), 2);
    assert_eq!(build.steps[0].uses.as_deref(), Some("actions/checkout@v4"));
    assert_eq!(build.steps[1].run.as_deref(), Some("cargo test"));

    let lint = &doc.jobs["lint"];
    assert_eq!(lint.needs, Some(Needs::One("build".to_string())));
}

#[test]
fn preserves_unknown_top_level_and_job_keys() {
    let src = r#"
name: CI
on:
  push:
    branches: [main]
permissions:
  contents: read
jobs:
  build:
    runs-on: ubuntu-latest
    env:
      FOO: bar
    steps:
      - run: echo hi
"#;
    let doc = WorkflowDocument::parse(Path::new("wf.yml"), src).unwrap();
    let out = doc.serialize().unwrap();
    assert!(out.contains("permissions"));
    assert!(out.contains("FOO: bar"));
    assert!(out.contains("branches"));
}

#[test]
fn round_trip_preserves_step_count_and_values() {
    let doc = WorkflowDocument::parse(Path::new("wf.yml"), SIMPLE).unwrap();
    let serialized = doc.serialize().unwrap();
    let reparsed = WorkflowDocument::parse(Path::new("wf.yml"), &serialized).unwrap();

    assert_eq!(doc.jobs.len(), reparsed.jobs.len());
    for (id, job) in &doc.jobs {
        let other = &reparsed.jobs[id];
        assert_eq!(job.steps.len(), other.steps.len());
        assert_eq!(job.needs, other.needs);
        for (a, b) in job.steps.iter().zip(other.steps.iter()) {
            assert_eq!(a.run, b.run);
            assert_eq!(a.uses, b.uses);
            assert_eq!(a.name, b.name);
        }
    }
}

#[test]
fn needs_sequence_form_round_trips() {
    let src = r#"
jobs:
  a:
    runs-on: ubuntu-latest
    steps: []
  b:
    needs: [a]
    runs-on: ubuntu-latest
    steps: []
  c:
    needs:
      - a
      - b
    runs-on: ubuntu-latest
    steps: []
"#;
    let doc = WorkflowDocument::parse(Path::new("wf.yml"), src).unwrap();
    assert_eq!(doc.jobs["b"].needs, Some(Needs::Many(vec!["a".to_string()])));
    assert_eq!(
        doc.jobs["c"].needs,
        Some(Needs::Many(vec!["a".to_string(), "b".to_string()]))
    );
}

#[test]
fn reusable_job_uses_has_no_steps() {
    let src = r#"
jobs:
  call-reusable:
    uses: ./.github/workflows/shared.yml
"#;
    let doc = WorkflowDocument::parse(Path::new("wf.yml"), src).unwrap();
    let job = &doc.jobs["call-reusable"];
    assert_eq!(job.uses.as_deref(), Some("./.github/workflows/shared.yml"));
    assert!(job.steps.is_empty());
}

#[test]
fn expression_valued_continue_on_error_round_trips_instead_of_being_dropped() {
    let src = "\
jobs:
  build:
    runs-on: ubuntu-latest
    continue-on-error: ${{ github.event_name == 'push' }}
    steps:
      - run: echo hi
";
    let doc = WorkflowDocument::parse(Path::new("wf.yml"), src).unwrap();
    let job = &doc.jobs["build"];
    assert_eq!(job.continue_on_error, None);

    let out = doc.serialize().unwrap();
    let reparsed = WorkflowDocument::parse(Path::new("wf.yml"), &out).unwrap();
    let raw = reparsed.jobs["build"]
        .extra
        .get(&serde_yaml::Value::String("continue-on-error".to_string()))
        .unwrap();
    assert_eq!(raw.as_str(), Some("${{ github.event_name == 'push' }}"));
}

#[test]
fn expression_valued_timeout_minutes_round_trips_instead_of_being_dropped() {
    let src = "\
jobs:
  build:
    runs-on: ubuntu-latest
    timeout-minutes: ${{ fromJSON(vars.TIMEOUT) }}
    steps:
      - name: s
        run: echo hi
        timeout-minutes: ${{ fromJSON(vars.STEP_TIMEOUT) }}
";
    let doc = WorkflowDocument::parse(Path::new("wf.yml"), src).unwrap();
    let job = &doc.jobs["build"];
    assert_eq!(job.timeout_minutes, None);
    assert!(job.has_raw_timeout_minutes());
    assert!(job.steps[0].has_raw_timeout_minutes());

    let out = doc.serialize().unwrap();
    let reparsed = WorkflowDocument::parse(Path::new("wf.yml"), &out).unwrap();
    let build = &reparsed.jobs["build"];
    let timeout_key = serde_yaml::Value::String("timeout-minutes".to_string());
    assert_eq!(
        build.extra.get(&timeout_key).and_then(|v| v.as_str()),
        Some("${{ fromJSON(vars.TIMEOUT) }}")
    );
    assert_eq!(
        build.steps[0].extra.get(&timeout_key).and_then(|v| v.as_str()),
        Some("${{ fromJSON(vars.STEP_TIMEOUT) }}")
    );
}
