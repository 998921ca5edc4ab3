use super::*;
use detent_core::{Diagnostic, RunId, RunIdentity, Severity};

fn identity(id: &str) -> RunIdentity {
    RunIdentity::new(RunId::new(id), "c".repeat(40), "t".repeat(40), false)
}

#[test]
fn append_and_read_back_a_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    let diags = vec![Diagnostic::new(Severity::Error, "x", "boom")];
    let record = RunRecord::new(identity("0123456789abcdef"), "all", 100, 110, 1, false, &diags, 0);
    store.append_run(&record, &diags).unwrap();

    let fetched = store.get_run("0123456789abcdef").unwrap();
    assert_eq!(fetched.exit_code, 1);
    assert_eq!(fetched.diagnostic_hashes, record.diagnostic_hashes);

    let errors = store.list_errors_by_run("0123456789abcdef").unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "boom");
}

#[test]
fn unknown_run_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    assert!(matches!(
        store.get_run("deadbeefdeadbeef"),
        Err(StorageError::RunNotFound(_))
    ));
}

#[test]
fn diagnostics_shared_across_runs_accumulate_references() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    let diag = Diagnostic::new(Severity::Error, "x", "boom");
    let record_a = RunRecord::new(identity("aaaaaaaaaaaaaaaa"), "all", 1, 2, 1, false, &[diag.clone()], 0);
    let record_b = RunRecord::new(identity("bbbbbbbbbbbbbbbb"), "all", 3, 4, 1, false, &[diag.clone()], 0);
    store.append_run(&record_a, &[diag.clone()]).unwrap();
    store.append_run(&record_b, &[diag.clone()]).unwrap();

    let record: DiagnosticRecord = read_json(&store.diagnostic_path(&diag.content_hash)).unwrap();
    assert_eq!(record.referencing_runs.len(), 2);
}

#[test]
fn list_open_errors_excludes_acknowledged() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    let a = Diagnostic::new(Severity::Error, "x", "a");
    let b = Diagnostic::new(Severity::Error, "x", "b");
    let record = RunRecord::new(identity("0123456789abcdef"), "all", 1, 2, 1, false, &[a.clone(), b.clone()], 0);
    store.append_run(&record, &[a.clone(), b.clone()]).unwrap();

    assert!(store.mark_acknowledged(&a.content_hash).unwrap());
    let open = store.list_open_errors().unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].message, "b");
}

#[test]
fn mark_acknowledged_on_unknown_hash_returns_false() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    assert!(!store.mark_acknowledged("not-a-real-hash").unwrap());
}

#[test]
fn second_open_on_same_root_is_locked() {
    let dir = tempfile::tempdir().unwrap();
    let _store = Store::open(dir.path()).unwrap();
    assert!(matches!(Store::open(dir.path()), Err(StorageError::Locked(_))));
}
