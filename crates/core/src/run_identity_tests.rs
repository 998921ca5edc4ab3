use super::*;

#[test]
fn carries_fields_through_unchanged() {
    let identity = RunIdentity::new(
        RunId::new("0123456789abcdef"),
        "deadbeef".to_string(),
        "cafef00d".to_string(),
        true,
    );
    assert_eq!(identity.id.as_str(), "0123456789abcdef");
    assert_eq!(identity.commit, "deadbeef");
    assert!(identity.dirty);
}

#[test]
fn serde_roundtrip_preserves_dirty_flag() {
    let identity = RunIdentity::new(RunId::new("0000000000000000"), "a".into(), "b".into(), false);
    let json = serde_json::to_string(&identity).expect("serialize");
    let back: RunIdentity = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, identity);
}
