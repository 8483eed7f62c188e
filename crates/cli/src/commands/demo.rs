use crate::OutputFormat;
use crate::util::{CliResult, colorize_label, colorize_xpath, dimmed};
use clap::Args;
use csspath_dom::simple_node::{SimpleNodeBuilder, doc, elem};
use csspath_dom::xpath::Tree;
use csspath_dom::{Document, Element, SimpleNode};
use csspath_selector::{ExpressionType, XPathCompiler};
use serde::Serialize;
use std::fmt::Write;

#[derive(Args, Debug, Clone)]
pub struct DemoArgs {
    #[arg(value_name = "EXPR")]
    pub expression: String,
    #[arg(long = "type", value_name = "css|xpath", default_value = "css")]
    pub ty: ExpressionType,
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub text: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DemoReport {
    pub xpath: String,
    pub matches: Vec<MatchSummary>,
}

fn post(n: usize, title: &str, tags: &[&str]) -> SimpleNodeBuilder {
    elem("article")
        .attr("class", if n == 1 { "post featured" } else { "post" })
        .attr("id", format!("post-{n}"))
        .child(elem("h2").text(title))
        .child(elem("p").attr("class", "summary").text(format!("Summary of post {n}.")))
        .child(
            elem("ul")
                .attr("class", "tags")
                .children(tags.iter().map(|t| elem("li").attr("class", "tag").text(*t))),
        )
}

/// Small blog page used by `csspath demo`.
pub fn sample_document() -> Document<Tree<SimpleNode>> {
    let root = doc()
        .child(
            elem("html").child(
                elem("body")
                    .child(
                        elem("header").child(elem("h1").text("csspath demo")).child(
                            elem("nav").attr("id", "nav").child(
                                elem("ul")
                                    .child(elem("li").child(elem("a").attr("href", "/").text("Home")))
                                    .child(elem("li").child(elem("a").attr("href", "/about").attr("rel", "author").text("About"))),
                            ),
                        ),
                    )
                    .child(
                        elem("main")
                            .child(post(1, "Parsing selectors", &["css", "parsing"]))
                            .child(post(2, "Walking trees", &["xpath"]))
                            .child(post(3, "Caching results", &["cache", "perf", "rust"])),
                    )
                    .child(elem("footer").child(elem("p").attr("style", "color: gray").text("Footer"))),
            ),
        )
        .build();
    Document::new(Tree::new(root))
}

pub fn run(args: &DemoArgs) -> CliResult<String> {
    let report = query_sample(&args.expression, args.ty)?;
    let output = match args.format {
        OutputFormat::Text => render_text(&report),
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
    };
    Ok(output)
}

pub(crate) fn query_sample(expression: &str, ty: ExpressionType) -> CliResult<DemoReport> {
    let xpath = XPathCompiler::new().compile(expression, ty)?;
    let document = sample_document();
    let matches = document.find(expression, ty)?.iter().map(summarize).collect();
    Ok(DemoReport { xpath, matches })
}

fn summarize(element: &Element<Tree<SimpleNode>>) -> MatchSummary {
    MatchSummary {
        tag: element.tag_name(),
        id: element.id(),
        classes: element.class_list().iter().map(str::to_string).collect(),
        text: element.text(),
    }
}

fn render_text(report: &DemoReport) -> String {
    let mut output = String::new();
    let _ = writeln!(&mut output, "{} {}", dimmed("xpath:"), colorize_xpath(&report.xpath));
    let _ = writeln!(&mut output, "{}", dimmed(&format!("{} match(es)", report.matches.len())));
    for item in &report.matches {
        let mut label = item.tag.clone();
        if let Some(id) = &item.id {
            let _ = write!(&mut label, "#{id}");
        }
        for class in &item.classes {
            let _ = write!(&mut label, ".{class}");
        }
        let _ = writeln!(&mut output, "{} {:?}", colorize_label(&label), item.text);
    }
    output.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::strip_ansi;
    use rstest::rstest;

    #[rstest]
    fn post_headings_and_summaries_interleave() {
        let report = query_sample(".post h2, .post p", ExpressionType::Css).expect("demo");
        let tags: Vec<&str> = report.matches.iter().map(|m| m.tag.as_str()).collect();
        assert_eq!(tags, vec!["h2", "p", "h2", "p", "h2", "p"]);
        assert_eq!(report.matches[0].text, "Parsing selectors");
    }

    #[rstest]
    #[case("li.tag", ExpressionType::Css, 6)]
    #[case("ul.tags > li:first-child", ExpressionType::Css, 3)]
    #[case("a[rel=author]", ExpressionType::Css, 1)]
    #[case("//article[count(.//li) > 1]", ExpressionType::XPath, 2)]
    fn sample_counts(#[case] expression: &str, #[case] ty: ExpressionType, #[case] expected: usize) {
        assert_eq!(query_sample(expression, ty).expect("demo").matches.len(), expected);
    }

    #[rstest]
    fn text_output_shows_xpath_and_labels() {
        let args = DemoArgs { expression: "article.featured".into(), ty: ExpressionType::Css, format: OutputFormat::Text };
        let plain = strip_ansi(&run(&args).expect("demo"));
        let lines: Vec<&str> = plain.lines().collect();
        assert!(lines[0].starts_with("xpath: //article[contains("));
        assert_eq!(lines[1], "1 match(es)");
        assert!(lines[2].starts_with("article#post-1.post.featured \"Parsing selectors"));
    }

    #[rstest]
    fn json_output_lists_matches() {
        let args = DemoArgs { expression: "#nav a".into(), ty: ExpressionType::Css, format: OutputFormat::Json };
        let json: serde_json::Value = serde_json::from_str(&run(&args).expect("demo")).expect("json");
        assert_eq!(json["xpath"], "//*[@id='nav']//a");
        assert_eq!(json["matches"][1]["text"], "About");
        assert_eq!(json["matches"][0]["classes"], serde_json::json!([]));
    }
}
