use crate::OutputFormat;
use crate::util::{CliResult, colorize_label, dimmed};
use clap::Args;
use csspath_selector::{Relation, SelectorParser, SelectorSegment};
use std::fmt::Write;

#[derive(Args, Debug, Clone)]
pub struct SegmentsArgs {
    #[arg(value_name = "SELECTOR")]
    pub selector: String,
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn run(args: &SegmentsArgs) -> CliResult<String> {
    let segments = segment_chain(&args.selector)?;
    let output = match args.format {
        OutputFormat::Text => render_text(&segments),
        OutputFormat::Json => serde_json::to_string_pretty(&segments)?,
    };
    Ok(output)
}

/// Decompose a single compound selector into its segments, left to right.
pub(crate) fn segment_chain(selector: &str) -> CliResult<Vec<SelectorSegment>> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    loop {
        let segment = SelectorParser::get_segments_at(selector, cursor)?;
        cursor = segment.span.end;
        segments.push(segment);
        if selector[cursor..].trim().is_empty() {
            return Ok(segments);
        }
    }
}

fn render_text(segments: &[SelectorSegment]) -> String {
    let mut output = String::new();
    for segment in segments {
        let _ = writeln!(&mut output, "{}", colorize_label(&segment.matched_text));
        let _ = writeln!(&mut output, "    tag = {}", segment.tag);
        if let Some(id) = &segment.id {
            let _ = writeln!(&mut output, "    id = {id}");
        }
        if let Some(classes) = &segment.classes {
            let _ = writeln!(&mut output, "    classes = {}", classes.join(", "));
        }
        if let Some(attributes) = &segment.attributes {
            for (name, value) in attributes.iter() {
                match value {
                    Some(value) => {
                        let _ = writeln!(&mut output, "    [{name}] = {value:?}");
                    }
                    None => {
                        let _ = writeln!(&mut output, "    [{name}]");
                    }
                }
            }
        }
        if let Some(pseudo) = &segment.pseudo {
            match &pseudo.expr {
                Some(expr) => {
                    let _ = writeln!(&mut output, "    :{}({expr})", pseudo.name);
                }
                None => {
                    let _ = writeln!(&mut output, "    :{}", pseudo.name);
                }
            }
        }
        let relation = match segment.relation {
            Relation::Child => "child (>)",
            Relation::Descendant => "descendant",
        };
        let _ = writeln!(&mut output, "    {}", dimmed(&format!("next: {relation}")));
    }
    output.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::strip_ansi;
    use rstest::rstest;

    #[rstest]
    fn chain_walks_every_segment() {
        let segments = segment_chain("nav > ul.menu li:nth-child(2n+1)").expect("segments");
        let tags: Vec<&str> = segments.iter().map(|s| s.tag.as_str()).collect();
        assert_eq!(tags, vec!["nav", "ul", "li"]);
        assert_eq!(segments[0].relation, Relation::Child);
        assert_eq!(segments[1].relation, Relation::Descendant);
    }

    #[rstest]
    fn text_lists_parts() {
        let args = SegmentsArgs { selector: "a#top.x[href]:first-child".into(), format: OutputFormat::Text };
        let plain = strip_ansi(&run(&args).expect("segments"));
        assert!(plain.starts_with("a#top.x[href]:first-child"));
        assert!(plain.contains("    id = top"));
        assert!(plain.contains("    classes = x"));
        assert!(plain.contains("    [href]"));
        assert!(plain.contains("    :first-child"));
    }

    #[rstest]
    fn json_is_an_array_of_segments() {
        let args = SegmentsArgs { selector: "div p".into(), format: OutputFormat::Json };
        let json: serde_json::Value = serde_json::from_str(&run(&args).expect("segments")).expect("json");
        assert_eq!(json.as_array().map(Vec::len), Some(2));
        assert_eq!(json[1]["tag"], "p");
    }

    #[rstest]
    fn unparsable_segment_is_an_error() {
        let args = SegmentsArgs { selector: "div + p".into(), format: OutputFormat::Text };
        assert!(run(&args).is_err());
    }
}
