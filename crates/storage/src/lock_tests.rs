use super::*;

#[test]
fn second_acquire_is_locked() {
    let dir = tempfile::tempdir().unwrap();
    let first = AdvisoryLock::acquire(dir.path()).unwrap();

    let second = AdvisoryLock::acquire(dir.path());
    assert!(matches!(second, Err(StorageError::Locked(_))));

    drop(first);
    assert!(AdvisoryLock::acquire(dir.path()).is_ok());
}

#[test]
fn lock_file_is_removed_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let lock_path = dir.path().join("LOCK");
    let lock = AdvisoryLock::acquire(dir.path()).unwrap();
    assert!(lock_path.exists());
    drop(lock);
    assert!(!lock_path.exists());
}
