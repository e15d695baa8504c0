//! Integration tests for rich path parsing.

use richpath::tree::node::TreeNode;
use richpath::ypath::{Range, RangeLimit, RichPath, RichPathError, Segment, MAX_NESTING_DEPTH};

/// Attributes, columns and a key range in one expression.
#[test]
fn test_parse_full_rich_path() {
    assert_eq!(
        richpath::parse("<a=b>//home/ignat{a,b}[100:200]").unwrap(),
        RichPath::simple("//home/ignat")
            .with_range(RangeLimit::key([100i64]), RangeLimit::key([200i64]))
            .with_columns(["a", "b"])
            .with_attribute("a", TreeNode::string("b"))
    );
}

#[test]
fn test_parse_attributes_only() {
    assert_eq!(
        richpath::parse("<a=b>//home").unwrap(),
        RichPath::simple("//home").with_attribute("a", TreeNode::string("b"))
    );
}

#[test]
fn test_parse_plain_path_has_no_clauses() {
    let path = richpath::parse("//home").unwrap();
    assert_eq!(path, RichPath::simple("//home"));
    assert!(path.columns().is_none());
    assert!(path.ranges().is_none());
}

/// `[:]` is one range open on both sides, not zero ranges.
#[test]
fn test_parse_fully_unbounded_range() {
    let path = richpath::parse("//home[:]").unwrap();
    assert_eq!(path, RichPath::simple("//home").plus_range(Range::default()));
    assert_eq!(path.ranges().map(|r| r.len()), Some(1));
}

#[test]
fn test_parse_composite_keys() {
    assert_eq!(
        richpath::parse("//home[(x, y):(a, b)]").unwrap(),
        RichPath::simple("//home").with_range(RangeLimit::key(["x", "y"]), RangeLimit::key(["a", "b"]))
    );
}

#[test]
fn test_parse_row_ranges_then_key_ranges() {
    assert_eq!(
        richpath::parse("//home[#1:#2,x:y]").unwrap(),
        RichPath::simple("//home")
            .with_range(RangeLimit::row(1), RangeLimit::row(2))
            .with_range(RangeLimit::key(["x"]), RangeLimit::key(["y"]))
    );
}

#[test]
fn test_parse_mixed_key_and_row_limits() {
    assert_eq!(
        richpath::parse("//home[x:#1000]").unwrap(),
        RichPath::simple("//home").with_range(RangeLimit::key(["x"]), RangeLimit::row(1000))
    );
}

#[test]
fn test_outer_whitespace_is_ignored() {
    assert_eq!(
        richpath::parse(" <a=b> //home").unwrap(),
        RichPath::simple("//home").with_attribute("a", TreeNode::string("b"))
    );
    assert_eq!(richpath::parse(" <a=b> //home").unwrap(), richpath::parse("<a=b>//home").unwrap());
}

#[test]
fn test_empty_clauses_are_present() {
    let columns = richpath::parse("//home{}").unwrap();
    assert_eq!(columns.columns(), Some(&[][..]));
    assert_ne!(columns, richpath::parse("//home").unwrap());

    let ranges = richpath::parse("//home[]").unwrap();
    assert_eq!(ranges.ranges(), Some(&[][..]));
    assert_ne!(ranges, richpath::parse("//home").unwrap());
}

#[test]
fn test_nested_attribute_values() {
    let path = richpath::parse("<opts={depth=3;tags=[a;\"b c\"]};flag=%true>//home").unwrap();
    let expected_opts: TreeNode = "{depth=3;tags=[a;\"b c\"]}".parse().unwrap();
    assert_eq!(path.attributes()["opts"], expected_opts);
    assert_eq!(path.attributes()["flag"], TreeNode::boolean(true));
}

#[test]
fn test_from_str() {
    let path: RichPath = "//home{a}".parse().unwrap();
    assert_eq!(path, RichPath::simple("//home").with_columns(["a"]));
}

#[test]
fn test_unclosed_delimiters_are_unterminated() {
    for input in [
        "<a=b//home",
        "//home{a",
        "//home[a:b",
        "//home[(a:b]",
        "<a=b",
        "//home{",
        "<a=<b=c>//t",
        "//t[(a,b:(c,d)]",
        r#"//t{a,b["}"]"#,
        r#"<a="b>//home"#,
    ] {
        assert!(
            matches!(richpath::parse(input), Err(RichPathError::UnterminatedSegment { .. })),
            "{} should be unterminated",
            input
        );
    }
}

#[test]
fn test_error_positions_point_into_original_input() {
    assert_eq!(
        richpath::parse("   //home{a"),
        Err(RichPathError::UnterminatedSegment {
            segment: Segment::Columns,
            position: 9
        })
    );
    assert_eq!(richpath::parse("  <a=b>  "), Err(RichPathError::EmptyPath { position: 7 }));
}

#[test]
fn test_second_column_clause_is_misplaced() {
    assert_eq!(
        richpath::parse("//home{a} {b}"),
        Err(RichPathError::MisplacedSegment {
            segment: Segment::Columns,
            position: 10
        })
    );
}

#[test]
fn test_row_index_mixed_with_tuple() {
    assert!(matches!(
        richpath::parse("//home[#(1,2)]"),
        Err(RichPathError::MalformedRangeSpecifier { .. })
    ));
    assert!(matches!(
        richpath::parse("//home[#1x]"),
        Err(RichPathError::MalformedRangeSpecifier { .. })
    ));
}

/// Parsing its own canonical text gives back the same value.
#[test]
fn test_canonical_text_is_stable() {
    let inputs = [
        "<a=b>//home/ignat{a,b}[100:200]",
        "//home[(x, y):(a, b)]",
        "//home[#1:#2,x:y]",
        " <a=b> //home",
        "<x=[1;{y=%false}]>//t{\"a b\"}[:,#-1:,(1u,2.5):#7,z]",
    ];
    for input in inputs {
        let path = richpath::parse(input).unwrap();
        let canonical = path.to_string();
        let reparsed = richpath::parse(&canonical).unwrap();
        assert_eq!(reparsed, path, "input: {}", input);
        assert_eq!(reparsed.to_string(), canonical, "input: {}", input);
    }
}

/// Deeply nested attribute values fail cleanly instead of exhausting the stack.
#[test]
fn test_deep_attribute_nesting_is_rejected() {
    let nested = |n: usize| format!("<a={}1{}>//t", "[".repeat(n), "]".repeat(n));

    assert!(richpath::parse(&nested(MAX_NESTING_DEPTH / 2)).is_ok());
    for n in [1_000, 20_000] {
        assert!(
            matches!(richpath::parse(&nested(n)), Err(RichPathError::InvalidLiteral { .. })),
            "depth {} should be rejected",
            n
        );
    }
}

#[test]
fn test_nan_key_equals_itself() {
    assert_eq!(richpath::parse("//t[%nan]").unwrap(), richpath::parse("//t[%nan]").unwrap());
}

#[test]
fn test_hex_escapes_in_attribute_values() {
    let path = richpath::parse(r#"<name="caf\xc3\xa9">//t"#).unwrap();
    assert_eq!(path.attributes()["name"], TreeNode::string("café"));
}
