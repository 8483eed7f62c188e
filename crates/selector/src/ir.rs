//! Structured XPath produced from selectors.
//!
//! The compiler builds these values first and renders them to text in a final
//! pass through `Display`, so predicate construction can be tested without
//! going through string concatenation.
use std::fmt::{self, Write};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Axis {
    /// `//` from the document root (or from the previous step).
    Descendant,
    /// `/`: direct child of the previous step.
    Child,
    /// `.//`: any descendant of the context node.
    DescendantFromContext,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Descendant => "//",
            Axis::Child => "/",
            Axis::DescendantFromContext => ".//",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PositionExpr {
    First,
    Last,
    Odd,
    Even,
    /// Digits are kept as text, so arbitrarily long indices render unchanged.
    Index { n: String },
    Cycle { mul: String, offset: String },
    /// Caller-supplied XPath, emitted verbatim.
    Raw { xpath: String },
}

impl fmt::Display for PositionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionExpr::First => f.write_str("1"),
            PositionExpr::Last => f.write_str("last()"),
            PositionExpr::Odd => f.write_str("(position()-1) mod 2 = 0 and position() >= 1"),
            // `position() >= 0` always holds; kept so the emitted text stays stable.
            PositionExpr::Even => f.write_str("position() mod 2 = 0 and position() >= 0"),
            PositionExpr::Index { n } => write!(f, "position() = {n}"),
            PositionExpr::Cycle { mul, offset } => {
                write!(f, "(position()-{offset}) mod {mul} = 0 and position() >= {offset}")
            }
            PositionExpr::Raw { xpath } => f.write_str(xpath),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Predicate {
    Id { id: String },
    Attribute { name: String, value: Option<String> },
    Class { class: String },
    Position { expr: PositionExpr },
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Id { id } => write!(f, "@id={}", Literal(id)),
            Predicate::Attribute { name, value: None } => write!(f, "@{name}"),
            Predicate::Attribute { name, value: Some(value) } => write!(f, "@{name}={}", Literal(value)),
            Predicate::Class { class } => {
                write!(f, "contains(concat(' ', normalize-space(@class), ' '), ' {class} ')")
            }
            Predicate::Position { expr } => fmt::Display::fmt(expr, f),
        }
    }
}

/// One location step: axis, element name test and its predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub axis: Axis,
    pub tag: String,
    pub predicates: Vec<Predicate>,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.axis.as_str())?;
        f.write_str(&self.tag)?;
        match self.predicates.as_slice() {
            [] => Ok(()),
            [single] => write!(f, "[{single}]"),
            many => {
                f.write_char('[')?;
                for (i, p) in many.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" and ")?;
                    }
                    write!(f, "({p})")?;
                }
                f.write_char(']')
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationPath {
    pub steps: Vec<Step>,
}

impl fmt::Display for LocationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            fmt::Display::fmt(step, f)?;
        }
        Ok(())
    }
}

/// Renders a string as an XPath 1.0 literal.
///
/// Single quotes are preferred; values containing both quote kinds fall back
/// to `concat()`.
pub struct Literal<'a>(pub &'a str);

impl fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        if !s.contains('\'') {
            return write!(f, "'{s}'");
        }
        if !s.contains('"') {
            return write!(f, "\"{s}\"");
        }
        f.write_str("concat(")?;
        for (i, part) in s.split('\'').enumerate() {
            if i > 0 {
                f.write_str(", \"'\", ")?;
            }
            write!(f, "'{part}'")?;
        }
        f.write_char(')')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn step(axis: Axis, tag: &str, predicates: Vec<Predicate>) -> Step {
        Step { axis, tag: tag.into(), predicates }
    }

    #[rstest]
    fn bare_step_has_no_brackets() {
        assert_eq!(step(Axis::Descendant, "div", vec![]).to_string(), "//div");
        assert_eq!(step(Axis::Child, "*", vec![]).to_string(), "/*");
        assert_eq!(step(Axis::DescendantFromContext, "a", vec![]).to_string(), ".//a");
    }

    #[rstest]
    fn single_predicate_is_not_parenthesized() {
        let s = step(Axis::Descendant, "a", vec![Predicate::Attribute { name: "href".into(), value: None }]);
        assert_eq!(s.to_string(), "//a[@href]");
    }

    #[rstest]
    fn multiple_predicates_are_parenthesized_and_joined() {
        let s = step(
            Axis::Descendant,
            "li",
            vec![
                Predicate::Id { id: "x".into() },
                Predicate::Position { expr: PositionExpr::Last },
            ],
        );
        assert_eq!(s.to_string(), "//li[(@id='x') and (last())]");
    }

    #[rstest]
    #[case("plain", "'plain'")]
    #[case("it's", "\"it's\"")]
    #[case("a'b\"c", "concat('a', \"'\", 'b\"c')")]
    fn literals_pick_a_quote_style(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Literal(input).to_string(), expected);
    }

    #[rstest]
    #[case(PositionExpr::Index { n: "4".into() }, "position() = 4")]
    #[case(PositionExpr::Cycle { mul: "3".into(), offset: "2".into() }, "(position()-2) mod 3 = 0 and position() >= 2")]
    #[case(PositionExpr::Raw { xpath: "position() > 2".into() }, "position() > 2")]
    fn position_rendering(#[case] expr: PositionExpr, #[case] expected: &str) {
        assert_eq!(expr.to_string(), expected);
    }
}
