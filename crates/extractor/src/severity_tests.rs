use super::*;
use detent_core::Diagnostic;

#[test]
fn demotes_matching_category() {
    let mut diags = vec![Diagnostic::new(Severity::Error, "eslint", "no-unused-vars")];
    let rules = vec![SeverityRule::for_category("eslint", Severity::Warning)];
    apply_severity_rules(&mut diags, &rules);
    assert_eq!(diags[0].severity, Severity::Warning);
}

#[test]
fn rule_id_scoped_rule_only_affects_matching_rule() {
    let mut diags = vec![
        Diagnostic::new(Severity::Error, "eslint", "a").with_rule_id("no-console"),
        Diagnostic::new(Severity::Error, "eslint", "b").with_rule_id("no-unused-vars"),
    ];
    let rules = vec![SeverityRule::for_rule(
        "eslint",
        "no-console",
        Severity::Info,
    )];
    apply_severity_rules(&mut diags, &rules);
    assert_eq!(diags[0].severity, Severity::Info);
    assert_eq!(diags[1].severity, Severity::Error);
}

#[test]
fn unrelated_category_is_untouched() {
    let mut diags = vec![Diagnostic::new(Severity::Error, "go-vet", "x")];
    let rules = vec![SeverityRule::for_category("eslint", Severity::Warning)];
    apply_severity_rules(&mut diags, &rules);
    assert_eq!(diags[0].severity, Severity::Error);
}

#[test]
fn later_rule_wins_over_earlier_one() {
    let mut diags = vec![Diagnostic::new(Severity::Error, "eslint", "a")];
    let rules = vec![
        SeverityRule::for_category("eslint", Severity::Warning),
        SeverityRule::for_category("eslint", Severity::Info),
    ];
    apply_severity_rules(&mut diags, &rules);
    assert_eq!(diags[0].severity, Severity::Info);
}
