use super::*;
use detent_core::{Diagnostic, RunId, RunIdentity, Severity};

fn identity(id: &str) -> RunIdentity {
    RunIdentity::new(RunId::new(id), "c".repeat(40), "t".repeat(40), false)
}

#[test]
fn dry_run_reports_without_deleting() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    let diag = Diagnostic::new(Severity::Error, "x", "boom");
    let record = RunRecord::new(identity("0123456789abcdef"), "all", 0, 0, 1, false, &[diag.clone()], 0);
    store.append_run(&record, &[diag.clone()]).unwrap();

    let report = gc(&store, 1_000_000, 1, true).unwrap();
    assert_eq!(report.runs_deleted, 1);
    assert_eq!(report.diagnostics_deleted, 1);

    assert!(store.get_run("0123456789abcdef").is_ok());
}

#[test]
fn expired_run_and_its_only_diagnostic_are_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    let diag = Diagnostic::new(Severity::Error, "x", "boom");
    let record = RunRecord::new(identity("0123456789abcdef"), "all", 0, 0, 1, false, &[diag.clone()], 0);
    store.append_run(&record, &[diag.clone()]).unwrap();

    let report = gc(&store, 1_000_000, 1, false).unwrap();
    assert_eq!(report.runs_deleted, 1);
    assert_eq!(report.diagnostics_deleted, 1);

    assert!(store.get_run("0123456789abcdef").is_err());
    assert!(store.list_open_errors().unwrap().is_empty());
}

#[test]
fn diagnostic_still_referenced_by_a_surviving_run_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    let diag = Diagnostic::new(Severity::Error, "x", "boom");
    let expired = RunRecord::new(identity("aaaaaaaaaaaaaaaa"), "all", 0, 0, 1, false, &[diag.clone()], 0);
    let fresh = RunRecord::new(identity("bbbbbbbbbbbbbbbb"), "all", 1_000_000, 1_000_000, 1, false, &[diag.clone()], 0);
    store.append_run(&expired, &[diag.clone()]).unwrap();
    store.append_run(&fresh, &[diag.clone()]).unwrap();

    let report = gc(&store, 1_000_000, 1, false).unwrap();
    assert_eq!(report.runs_deleted, 1);
    assert_eq!(report.diagnostics_deleted, 0);

    assert!(store.get_run("bbbbbbbbbbbbbbbb").is_ok());
    let errors = store.list_errors_by_run("bbbbbbbbbbbbbbbb").unwrap();
    assert_eq!(errors.len(), 1);
}

#[test]
fn open_diagnostic_survives_even_with_no_referencing_runs() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    let diag = Diagnostic::new(Severity::Error, "x", "boom");
    let record = RunRecord::new(identity("0123456789abcdef"), "all", 0, 0, 1, false, &[diag.clone()], 0);
    store.append_run(&record, &[diag.clone()]).unwrap();
    // Left unacknowledged: the diagnostic is "open" and must survive GC
    // even after its only referencing run expires.

    let report = gc(&store, 1_000_000, 1, false).unwrap();
    assert_eq!(report.runs_deleted, 1);
    assert_eq!(report.diagnostics_deleted, 0);

    let open = store.list_open_errors().unwrap();
    assert_eq!(open.len(), 1);
}

#[test]
fn nothing_expired_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    let diag = Diagnostic::new(Severity::Error, "x", "boom");
    let record = RunRecord::new(identity("0123456789abcdef"), "all", 1_000_000, 1_000_000, 1, false, &[diag.clone()], 0);
    store.append_run(&record, &[diag.clone()]).unwrap();

    let report = gc(&store, 1_000_000, 30, false).unwrap();
    assert_eq!(report, GcReport::default());
    assert!(store.get_run("0123456789abcdef").is_ok());
}
