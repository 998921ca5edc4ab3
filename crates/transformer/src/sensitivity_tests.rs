use super::*;
use crate::model::{Step, WorkflowDocument};
use std::path::Path;

fn plain_job() -> Job {
    let doc = WorkflowDocument::parse(
        Path::new("wf.yml"),
        "jobs:\n  x:\n    runs-on: ubuntu-latest\n    steps:\n      - run: echo hi\n",
    )
    .unwrap();
    doc.jobs.into_iter().next().unwrap().1
}

fn job_with_step_uses(uses: &str) -> Job {
    let mut j = plain_job();
    j.steps = vec![Step {
        name: None,
        id: None,
        run: None,
        uses: Some(uses.to_string()),
        timeout_minutes: None,
        if_expr: None,
        extra: serde_yaml::Mapping::new(),
    }];
    j
}

#[test]
fn plain_job_is_not_sensitive() {
    let cfg = Config::default();
    let j = plain_job();
    assert!(!is_sensitive(&cfg, "abc", "ci", "build", &j, &["build"]));
}

#[test]
fn file_name_match_marks_sensitive() {
    let cfg = Config::default();
    let j = plain_job();
    assert!(is_sensitive(&cfg, "abc", "release", "publish", &j, &["publish"]));
}

#[test]
fn dangerous_action_marks_sensitive() {
    let cfg = Config::default();
    let j = job_with_step_uses("softprops/action-gh-release@v2");
    assert!(is_sensitive(&cfg, "abc", "ci", "build", &j, &["build"]));
}

#[test]
fn allow_listed_job_is_never_sensitive() {
    let mut cfg = Config::default();
    cfg.allowed_sensitive_jobs
        .entry("abc".to_string())
        .or_default()
        .insert("publish".to_string());
    let j = job_with_step_uses("softprops/action-gh-release@v2");
    assert!(!is_sensitive(&cfg, "abc", "release", "publish", &j, &["publish"]));
}

#[test]
fn allow_list_is_scoped_to_repository_commit() {
    let mut cfg = Config::default();
    cfg.allowed_sensitive_jobs
        .entry("abc".to_string())
        .or_default()
        .insert("publish".to_string());
    let j = job_with_step_uses("softprops/action-gh-release@v2");
    assert!(is_sensitive(&cfg, "different-commit", "release", "publish", &j, &["publish"]));
}
