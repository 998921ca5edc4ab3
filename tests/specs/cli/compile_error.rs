//! S2 (spec.md §8): a compile-error line in runner output is extracted into
//! a diagnostic and the CLI exits non-zero.

use crate::prelude::*;

const SIMPLE_WORKFLOW: &str = "\
on: push
jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - name: build
        run: go build ./...
";

#[test]
fn compile_error_line_yields_one_diagnostic_and_a_nonzero_exit() {
    let project = Project::new(SIMPLE_WORKFLOW);
    let output = project
        .detent("echo 'main.go:10:5: undefined: x'\nexit 1")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));

    let record = project.run_record(&project.run_id());
    assert_eq!(record.exit_code, 1);
    assert_eq!(record.diagnostic_hashes.len(), 1);
}
