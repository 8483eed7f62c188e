use csspath_dom::simple_node::{comment, doc, elem};
use csspath_dom::xpath::Tree;
use csspath_dom::{DomNode, QueryError, QueryItem, SimpleNode, TreeQuery};
use rstest::{fixture, rstest};

#[fixture]
fn tree() -> Tree<SimpleNode> {
    Tree::new(
        doc()
            .child(
                elem("library")
                    .child(
                        elem("book")
                            .attr("id", "b1")
                            .attr("year", "1999")
                            .child(elem("title").text("  Rust   in Action "))
                            .child(comment("note")),
                    )
                    .child(elem("book").attr("id", "b2").attr("year", "2015").child(elem("title").text("Parsing")))
                    .child(elem("book").attr("id", "b3").attr("year", "2021").child(elem("title").text("Trees"))),
            )
            .build(),
    )
}

fn names(tree: &Tree<SimpleNode>, xpath: &str) -> Vec<String> {
    tree.evaluate(xpath, None)
        .unwrap()
        .into_iter()
        .filter_map(QueryItem::into_node)
        .map(|n| n.attribute("id").or_else(|| n.name()).unwrap_or_default())
        .collect()
}

fn scalar(tree: &Tree<SimpleNode>, xpath: &str) -> QueryItem<SimpleNode> {
    let mut items = tree.evaluate(xpath, None).unwrap();
    assert_eq!(items.len(), 1, "{xpath}");
    items.remove(0)
}

#[rstest]
#[case("//book[@year > 2000]", &["b2", "b3"])]
#[case("//book[2]", &["b2"])]
#[case("//book[last()]", &["b3"])]
#[case("//book[position() != 2]", &["b1", "b3"])]
#[case("//book[title = 'Trees']", &["b3"])]
#[case("//book[@id='b2']/following-sibling::book", &["b3"])]
#[case("//book[@id='b3']/preceding-sibling::book[1]", &["b2"])]
#[case("//title[. = 'Parsing']/..", &["b2"])]
#[case("//title/ancestor::library", &["library"])]
#[case("//book[@id='b3'] | //book[@id='b1']", &["b1", "b3"])]
#[case("(//book)[1]", &["b1"])]
#[case("//book[not(@year = 1999) and starts-with(title, 'P')]", &["b2"])]
#[case("/library/book[@id='b1']/self::book", &["b1"])]
#[case("//library/descendant::title/parent::*[@id != 'b1']", &["b2", "b3"])]
fn node_selections(tree: Tree<SimpleNode>, #[case] xpath: &str, #[case] expected: &[&str]) {
    assert_eq!(names(&tree, xpath), expected, "{xpath}");
}

#[rstest]
#[case("count(//book)", QueryItem::Number(3.0))]
#[case("count(//book/@*)", QueryItem::Number(6.0))]
#[case("count(//comment())", QueryItem::Number(1.0))]
#[case("normalize-space(//book[1]/title)", QueryItem::String("Rust in Action".into()))]
#[case("concat(//book[2]/@id, '-', //book[3]/@id)", QueryItem::String("b2-b3".into()))]
#[case("string-length('abc')", QueryItem::Number(3.0))]
#[case("10 div 4", QueryItem::Number(2.5))]
#[case("7 mod 3 + -1", QueryItem::Number(0.0))]
#[case("number(//book[3]/@year) - 2000", QueryItem::Number(21.0))]
#[case("contains(//book[2]/title, 'rs')", QueryItem::Boolean(true))]
#[case("name(//book[1]/@year)", QueryItem::String("year".into()))]
#[case("local-name(/*)", QueryItem::String("library".into()))]
#[case("true() or false()", QueryItem::Boolean(true))]
#[case("//book/@year = 2015", QueryItem::Boolean(true))]
#[case("string(//missing)", QueryItem::String(String::new()))]
fn scalar_results(tree: Tree<SimpleNode>, #[case] xpath: &str, #[case] expected: QueryItem<SimpleNode>) {
    assert_eq!(scalar(&tree, xpath), expected, "{xpath}");
}

#[rstest]
fn text_nodes_are_returned_as_nodes(tree: Tree<SimpleNode>) {
    let items = tree.evaluate("//book[2]/title/text()", None).unwrap();
    let texts: Vec<String> = items.iter().filter_map(QueryItem::as_node).map(DomNode::string_value).collect();
    assert_eq!(texts, vec!["Parsing"]);
}

#[rstest]
fn context_node_anchors_relative_paths(tree: Tree<SimpleNode>) {
    let second = tree.evaluate("//book[2]", None).unwrap().remove(0).into_node().unwrap();
    let titles = tree.evaluate(".//title", Some(&second)).unwrap();
    assert_eq!(titles.len(), 1);
    assert_eq!(tree.count("/library/book", Some(&second)).unwrap(), 3);
}

#[rstest]
fn unknown_function_is_reported(tree: Tree<SimpleNode>) {
    assert_eq!(tree.evaluate("upper-case('a')", None), Err(QueryError::UnknownFunction("upper-case".into())));
}

#[rstest]
#[case("count('x')")]
#[case("position(1)")]
#[case("'a' | //book")]
fn misuse_is_an_evaluation_error(tree: Tree<SimpleNode>, #[case] xpath: &str) {
    assert!(matches!(tree.evaluate(xpath, None), Err(QueryError::Evaluation(_))));
}
