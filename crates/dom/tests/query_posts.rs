use csspath_dom::simple_node::{SimpleNodeBuilder, doc, elem};
use csspath_dom::xpath::Tree;
use csspath_dom::{Document, DocumentError, ExpressionType, SelectorError, SimpleNode};
use rstest::{fixture, rstest};

type Doc = Document<Tree<SimpleNode>>;

fn post(n: usize) -> SimpleNodeBuilder {
    elem("div")
        .attr("class", "post")
        .attr("id", format!("post-{n}"))
        .child(elem("h2").text(format!("Heading {n}")))
        .child(elem("p").text(format!("Body {n}")))
}

#[fixture]
fn blog() -> Doc {
    let root = doc()
        .child(
            elem("html").child(
                elem("body")
                    .child(elem("h1").text("Blog"))
                    .children((1..=3).map(post))
                    .child(elem("p").attr("class", "footer").text("Footer")),
            ),
        )
        .build();
    Document::new(Tree::new(root))
}

#[rstest]
fn selector_list_yields_distinct_nodes_in_document_order(blog: Doc) {
    let hits = blog.find(".post h2, .post p", ExpressionType::Css).unwrap();
    let texts: Vec<String> = hits.iter().map(|e| e.text()).collect();
    assert_eq!(
        texts,
        vec!["Heading 1", "Body 1", "Heading 2", "Body 2", "Heading 3", "Body 3"]
    );
}

#[rstest]
fn overlapping_branches_are_not_duplicated(blog: Doc) {
    assert_eq!(blog.count("div p, .post p", ExpressionType::Css).unwrap(), 3);
}

#[rstest]
#[case("body > div:nth-child(2)", 1)]
#[case("body > *:first-child", 1)]
#[case("div:last-child", 1)]
#[case("p:last-child", 4)]
#[case("div:nth-child(odd)", 2)]
fn structural_pseudo_classes(blog: Doc, #[case] selector: &str, #[case] expected: usize) {
    assert_eq!(blog.count(selector, ExpressionType::Css).unwrap(), expected, "{selector}");
}

#[rstest]
fn sibling_combinators_are_rejected(blog: Doc) {
    let err = blog.count("div#post-2 ~ p", ExpressionType::Css).unwrap_err();
    assert!(matches!(err, DocumentError::Selector(SelectorError::InvalidSelector { .. })));
}

#[rstest]
fn positions_are_per_parent(blog: Doc) {
    let first_children = blog.find("h2:first-child", ExpressionType::Css).unwrap();
    assert_eq!(first_children.len(), 3);
}

#[rstest]
fn attribute_predicates(blog: Doc) {
    assert_eq!(blog.count("[id]", ExpressionType::Css).unwrap(), 3);
    assert_eq!(blog.count("div[id=post-3]", ExpressionType::Css).unwrap(), 1);
    assert_eq!(blog.count("div[id='post-4']", ExpressionType::Css).unwrap(), 0);
}

#[rstest]
fn unknown_pseudo_surfaces_as_selector_error(blog: Doc) {
    let err = blog.find("a:hover", ExpressionType::Css).unwrap_err();
    assert!(matches!(err, DocumentError::Selector(SelectorError::UnknownPseudoClass { .. })));
}

#[rstest]
fn broken_xpath_surfaces_as_query_error(blog: Doc) {
    let err = blog.find("//div[", ExpressionType::XPath).unwrap_err();
    assert!(matches!(err, DocumentError::Query(_)));
}

#[rstest]
fn replaced_cache_changes_results(blog: Doc) {
    assert_eq!(blog.count("h1", ExpressionType::Css).unwrap(), 1);
    blog.set_compiled_cache([("h1".to_string(), "//h2".to_string())].into());
    assert_eq!(blog.count("h1", ExpressionType::Css).unwrap(), 3);
}
