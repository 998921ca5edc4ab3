//! S1 (spec.md §8): a clean run persists an empty-diagnostic record and
//! exits 0.

use crate::prelude::*;

const SIMPLE_WORKFLOW: &str = "\
on: push
jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - name: step one
        run: echo one
      - name: step two
        run: echo two
";

#[test]
fn clean_runner_exit_persists_an_empty_diagnostic_record() {
    let project = Project::new(SIMPLE_WORKFLOW);
    let output = project
        .detent(
            "echo '::detent::job-start::build'\n\
             echo '::detent::job-end::build::success'\n\
             exit 0",
        )
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let record = project.run_record(&project.run_id());
    assert_eq!(record.exit_code, 0);
    assert!(!record.cancelled);
    assert!(record.diagnostic_hashes.is_empty());
}
