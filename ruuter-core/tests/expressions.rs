use ruuter_core::expressions::{parse_path, parse_template, PathSegment, Segment, TemplateError};
use serde_json::json;

#[test]
fn path_with_indexes_parses() {
    let p = parse_path("created.response.items[0][2].id").unwrap();
    assert_eq!(p.root(), "created");
    assert_eq!(
        p.segments(),
        &[
            PathSegment::Key("created".into()),
            PathSegment::Key("response".into()),
            PathSegment::Key("items".into()),
            PathSegment::Index(0),
            PathSegment::Index(2),
            PathSegment::Key("id".into()),
        ]
    );
}

#[test]
fn path_rejects_empty_segments_and_bad_indexes() {
    assert!(parse_path("").is_err());
    assert!(parse_path("a..b").is_err());
    assert!(parse_path("a[x]").is_err());
    assert!(parse_path("a[1").is_err());
    assert!(parse_path("a b").is_err());
}

#[test]
fn path_lookup_walks_objects_and_arrays() {
    let root = json!({"a": {"list": [{"id": 7}]}});
    let p = parse_path("a.list[0].id").unwrap();
    assert_eq!(p.lookup(&root), Some(&json!(7)));
    let missing = parse_path("a.list[3].id").unwrap();
    assert_eq!(missing.lookup(&root), None);
}

#[test]
fn single_expression_template() {
    let t = parse_template("${incoming.body.name}").unwrap();
    assert_eq!(t.as_single_expr().unwrap().as_str(), "incoming.body.name");
}

#[test]
fn embedded_expressions_split_into_segments() {
    let t = parse_template("Hello ${user.name}, you are ${user.age}!").unwrap();
    assert_eq!(t.segments.len(), 5);
    assert!(matches!(&t.segments[0], Segment::Literal(s) if s == "Hello "));
    assert!(t.as_single_expr().is_none());
    assert!(!t.is_literal());
}

#[test]
fn literal_template_and_plain_braces() {
    let t = parse_template("{\"json\": true} costs $5").unwrap();
    assert!(t.is_literal());
}

#[test]
fn unclosed_expression_is_an_error() {
    assert_eq!(
        parse_template("${a.b").unwrap_err(),
        TemplateError::UnclosedExpression
    );
}
