use super::*;

#[test]
fn first_match_wins() {
    let registry = ParserRegistry::with_defaults();
    // Valid JSON wins over the generic path:line:col parser, which would
    // otherwise also be willing to take a stab at the raw text.
    let diags = registry
        .parse_line(r#"{"message":"structured failure"}"#)
        .unwrap();
    assert_eq!(diags[0].message, "structured failure");
}

#[test]
fn falls_through_to_generic_parser() {
    let registry = ParserRegistry::with_defaults();
    let diags = registry.parse_line("a.rs:1:1: boom").unwrap();
    assert_eq!(diags[0].category, "generic");
}

#[test]
fn unmatched_lines_return_none() {
    let registry = ParserRegistry::with_defaults();
    assert!(registry.parse_line("just some ordinary log output").is_none());
}

#[test]
fn custom_parser_can_be_registered() {
    struct AlwaysMatch;
    impl crate::parsers::LineParser for AlwaysMatch {
        fn name(&self) -> &'static str {
            "always-match"
        }
        fn parse_line(&self, _line: &str) -> Option<Vec<detent_core::Diagnostic>> {
            Some(vec![detent_core::Diagnostic::new(
                detent_core::Severity::Info,
                "custom",
                "caught everything",
            )])
        }
    }

    let mut registry = ParserRegistry::new();
    registry.register(Box::new(AlwaysMatch));
    let diags = registry.parse_line("literally anything").unwrap();
    assert_eq!(diags[0].category, "custom");
}
