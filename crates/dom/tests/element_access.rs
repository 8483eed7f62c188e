use csspath_dom::simple_node::{comment, doc, elem};
use csspath_dom::xpath::Tree;
use csspath_dom::{Document, ExpressionType, SimpleNode};
use rstest::{fixture, rstest};

type Doc = Document<Tree<SimpleNode>>;

#[fixture]
fn page() -> Doc {
    let root = doc()
        .child(
            elem("main")
                .attr("id", "content")
                .child(
                    elem("section")
                        .attr("class", "card featured card")
                        .attr("style", "Display: block; color: red; color: green")
                        .attr("data-kind", "news")
                        .child(comment("teaser"))
                        .child(elem("h2").text("Hello "))
                        .text("loose text")
                        .child(elem("a").attr("href", "/more").text("more")),
                )
                .child(elem("section").attr("class", "card").child(elem("a").attr("href", "/other"))),
        )
        .build();
    Document::new(Tree::new(root))
}

#[rstest]
fn accessors_read_the_node(page: Doc) {
    let card = page.first("section.featured", ExpressionType::Css).unwrap().unwrap();
    assert_eq!(card.tag_name(), "section");
    assert_eq!(card.id(), None);
    assert!(card.has_attr("data-kind"));
    assert_eq!(card.attr("data-kind").as_deref(), Some("news"));
    assert_eq!(
        card.attributes().iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
        vec!["class", "style", "data-kind"]
    );
    assert_eq!(card.text(), "Hello loose textmore");
}

#[rstest]
fn class_list_and_style_helpers(page: Doc) {
    let card = page.first("section.featured", ExpressionType::Css).unwrap().unwrap();
    let classes = card.class_list();
    assert_eq!(classes.iter().collect::<Vec<_>>(), vec!["card", "featured"]);
    let style = card.style();
    assert_eq!(style.get("display"), Some("block"));
    assert_eq!(style.to_string(), "display: block; color: green");
}

#[rstest]
fn navigation_skips_non_elements(page: Doc) {
    let card = page.first("section.featured", ExpressionType::Css).unwrap().unwrap();
    let tags: Vec<String> = card.children().iter().map(|c| c.tag_name()).collect();
    assert_eq!(tags, vec!["h2", "a"]);
    let main = card.parent().unwrap();
    assert_eq!(main.id().as_deref(), Some("content"));
    assert!(main.parent().is_none());
}

#[rstest]
fn scoped_queries_stay_inside_the_element(page: Doc) {
    let card = page.first("section.featured", ExpressionType::Css).unwrap().unwrap();
    assert_eq!(page.count("a[href]", ExpressionType::Css).unwrap(), 2);
    assert_eq!(card.count("a[href]", ExpressionType::Css).unwrap(), 1);
    assert_eq!(card.first("a", ExpressionType::Css).unwrap().unwrap().attr("href").as_deref(), Some("/more"));
    assert!(!card.has("section", ExpressionType::Css).unwrap());
    assert_eq!(card.count("a | h2", ExpressionType::XPath).unwrap(), 2);
}

#[rstest]
fn matches_checks_document_wide_membership(page: Doc) {
    let card = page.first("section.featured", ExpressionType::Css).unwrap().unwrap();
    assert!(card.matches("main > section").unwrap());
    assert!(card.matches("h1, .card").unwrap());
    assert!(!card.matches("section:last-child").unwrap());
}

#[rstest]
fn scoped_compilation_shares_the_document_cache(page: Doc) {
    let card = page.first("section", ExpressionType::Css).unwrap().unwrap();
    card.find("a", ExpressionType::Css).unwrap();
    assert_eq!(page.compiled_cache().get("a").map(String::as_str), Some("//a"));
}
