use super::*;

#[test]
fn manifest_pattern_captures_base64() {
    let caps = manifest_pattern()
        .captures("::detent::manifest::v2::b64::YWJj")
        .unwrap();
    assert_eq!(&caps["b64"], "YWJj");
}

#[test]
fn job_start_pattern_captures_job_id() {
    let caps = job_start_pattern()
        .captures("::detent::job-start::build")
        .unwrap();
    assert_eq!(&caps["job_id"], "build");
}

#[test]
fn job_end_pattern_captures_job_id_and_status() {
    let caps = job_end_pattern()
        .captures("::detent::job-end::build::success")
        .unwrap();
    assert_eq!(&caps["job_id"], "build");
    assert_eq!(&caps["status"], "success");
}

#[test]
fn job_end_pattern_rejects_unknown_status() {
    assert!(job_end_pattern()
        .captures("::detent::job-end::build::exploded")
        .is_none());
}

#[test]
fn step_start_pattern_captures_all_fields() {
    let caps = step_start_pattern()
        .captures("::detent::step-start::build::3::Run tests")
        .unwrap();
    assert_eq!(&caps["job_id"], "build");
    assert_eq!(&caps["idx"], "3");
    assert_eq!(&caps["name"], "Run tests");
}

#[test]
fn step_start_pattern_allows_empty_name() {
    let caps = step_start_pattern()
        .captures("::detent::step-start::build::0::")
        .unwrap();
    assert_eq!(&caps["name"], "");
}
