use csspath_selector::{Pseudo, Relation, SelectorError, SelectorParser, get_segments};
use rstest::rstest;

#[rstest]
fn full_segment_is_decomposed() {
    let seg = get_segments("a#home.nav.active[href][rel=nofollow]:nth-child(2n+1) > span").unwrap();
    assert_eq!(seg.tag, "a");
    assert_eq!(seg.id.as_deref(), Some("home"));
    assert_eq!(seg.classes, Some(vec!["nav".to_string(), "active".to_string()]));
    let attrs = seg.attributes.as_ref().expect("attributes");
    assert_eq!(attrs.iter().collect::<Vec<_>>(), vec![("href", None), ("rel", Some("nofollow"))]);
    assert_eq!(seg.pseudo, Some(Pseudo { name: "nth-child".into(), expr: Some("2n+1".into()) }));
    assert_eq!(seg.relation, Relation::Child);
    assert_eq!(seg.matched_text, "a#home.nav.active[href][rel=nofollow]:nth-child(2n+1) >");
}

#[rstest]
fn presence_only_attribute_has_no_value() {
    let seg = get_segments("a[href]").unwrap();
    let attrs = seg.attributes.expect("attributes");
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs.get("href"), Some(None));
    assert_eq!(attrs.get("title"), None);
}

#[rstest]
fn quoted_attribute_values_are_unquoted() {
    let seg = get_segments("a[title='Read more']").unwrap();
    assert_eq!(seg.attributes.unwrap().get("title"), Some(Some("Read more")));
}

#[rstest]
fn matched_text_is_a_prefix_of_the_trimmed_input() {
    let seg = get_segments("  div.a   p  ").unwrap();
    assert_eq!(seg.matched_text, "div.a");
    assert_eq!(seg.span, 2..7);
    assert_eq!(seg.relation, Relation::Descendant);
}

#[rstest]
fn cursor_continues_after_previous_segment() {
    let selector = "ul > li.item a";
    let first = SelectorParser::get_segments_at(selector, 0).unwrap();
    let second = SelectorParser::get_segments_at(selector, first.span.end).unwrap();
    let third = SelectorParser::get_segments_at(selector, second.span.end).unwrap();
    assert_eq!((first.tag.as_str(), first.relation), ("ul", Relation::Child));
    assert_eq!(second.tag, "li");
    assert_eq!(second.span, 5..12);
    assert_eq!(third.tag, "a");
    assert_eq!(third.span, 13..14);
}

#[rstest]
fn unknown_pseudo_is_captured_not_rejected() {
    let seg = get_segments("a:hover").unwrap();
    assert_eq!(seg.pseudo.map(|p| p.name), Some("hover".to_string()));
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("~ p")]
#[case("+p")]
fn unmatchable_input_is_invalid(#[case] input: &str) {
    assert!(matches!(get_segments(input), Err(SelectorError::InvalidSelector { .. })));
}

#[rstest]
fn segments_serialize_attributes_as_a_map() {
    let seg = get_segments("a[href][rel=next]").unwrap();
    let json = serde_json::to_value(&seg).unwrap();
    assert_eq!(json["attributes"]["href"], serde_json::Value::Null);
    assert_eq!(json["attributes"]["rel"], "next");
    assert_eq!(json["classes"], serde_json::Value::Null);
    assert_eq!(json["relation"], "descendant");
}
