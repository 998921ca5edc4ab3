use super::*;

fn job(id: &str) -> ManifestJob {
    ManifestJob {
        id: id.to_string(),
        name: id.to_string(),
        uses: None,
        sensitive: false,
        steps: vec!["step-1".to_string()],
        needs: None,
    }
}

#[test]
fn jobs_are_sorted_byte_wise_by_id() {
    let m = Manifest::new(vec![job("zeta"), job("alpha"), job("Beta")]);
    let ids: Vec<&str> = m.jobs.iter().map(|j| j.id.as_str()).collect();
    let mut expected = ids.clone();
    expected.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
    assert_eq!(ids, expected);
}

#[test]
fn base64_round_trip() {
    let m = Manifest::new(vec![job("build")]);
    let encoded = m.to_base64().unwrap();
    let decoded = Manifest::from_base64(&encoded).unwrap();
    assert_eq!(decoded.stable_key().1, m.stable_key().1);
}

#[test]
fn garbage_base64_is_discarded_not_fatal() {
    assert!(Manifest::from_base64("not valid base64!!").is_none());
    assert!(Manifest::from_base64("dGhpcyBpcyBub3QganNvbg==").is_none());
}

#[test]
fn wrong_version_is_discarded() {
    let json = r#"{"v":1,"jobs":[]}"#;
    let encoded = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, json);
    assert!(Manifest::from_base64(&encoded).is_none());
}

#[test]
fn generated_at_excluded_from_stable_key() {
    let a = Manifest::new(vec![job("build")]).with_generated_at(1000);
    let b = Manifest::new(vec![job("build")]).with_generated_at(2000);
    assert_eq!(a.stable_key(), b.stable_key());
}
