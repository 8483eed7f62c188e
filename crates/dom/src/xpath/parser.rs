use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::{Pair, Pairs};

use super::ast::{Axis, BinaryOp, Expr, LocationPath, NodeTest, PathStart, Step};
use crate::query::QueryError;

#[derive(pest_derive::Parser)]
#[grammar = "xpath/xpath.pest"]
pub struct XPathParser;

impl XPathParser {
    /// Parse an XPath expression into the evaluator's AST.
    pub fn parse_to_ast(input: &str) -> Result<Expr, QueryError> {
        let mut pairs = Self::parse(Rule::xpath, input).map_err(parse_error)?;
        let root = next_pair(&mut pairs, "xpath")?;
        debug_assert_eq!(root.as_rule(), Rule::xpath);
        let expr = next_pair(&mut root.into_inner(), "expression")?;
        build_expr(expr)
    }
}

fn parse_error(err: pest::error::Error<Rule>) -> QueryError {
    let offset = match err.location {
        InputLocation::Pos(p) | InputLocation::Span((p, _)) => p,
    };
    QueryError::Parse(format!("{} at byte {offset}", err.variant.message()))
}

fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, what: &str) -> Result<Pair<'i, Rule>, QueryError> {
    pairs.next().ok_or_else(|| QueryError::Parse(format!("missing {what}")))
}

fn build_expr(pair: Pair<Rule>) -> Result<Expr, QueryError> {
    match pair.as_rule() {
        Rule::expr | Rule::primary_expr | Rule::path_expr => {
            let inner = next_pair(&mut pair.into_inner(), "operand")?;
            build_expr(inner)
        }
        Rule::or_expr
        | Rule::and_expr
        | Rule::equality_expr
        | Rule::relational_expr
        | Rule::additive_expr
        | Rule::multiplicative_expr => build_chain(pair),
        Rule::unary_expr => build_unary(pair),
        Rule::union_expr => {
            let mut branches = pair.into_inner().map(build_expr).collect::<Result<Vec<_>, _>>()?;
            if branches.len() == 1 {
                return next_pair_expr(&mut branches);
            }
            Ok(Expr::Union(branches))
        }
        Rule::filter_path => build_filter_path(pair),
        Rule::filter_expr => build_filter(pair),
        Rule::location_path => {
            let inner = next_pair(&mut pair.into_inner(), "location path")?;
            match inner.as_rule() {
                Rule::absolute_path => build_absolute(inner),
                _ => Ok(Expr::Path(LocationPath { start: PathStart::Context, steps: build_relative(inner)? })),
            }
        }
        Rule::literal => {
            let content = pair.into_inner().next().map(|p| p.as_str().to_string()).unwrap_or_default();
            Ok(Expr::Literal(content))
        }
        Rule::number => pair
            .as_str()
            .parse::<f64>()
            .map(Expr::Number)
            .map_err(|e| QueryError::Parse(format!("invalid number {:?}: {e}", pair.as_str()))),
        Rule::function_call => {
            let mut inner = pair.into_inner();
            let name = next_pair(&mut inner, "function name")?.as_str().to_string();
            let args = inner.map(build_expr).collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::FunctionCall { name, args })
        }
        other => Err(QueryError::Parse(format!("unexpected {other:?} in expression"))),
    }
}

fn next_pair_expr(exprs: &mut Vec<Expr>) -> Result<Expr, QueryError> {
    exprs.pop().ok_or_else(|| QueryError::Parse("empty union".into()))
}

/// Left-associative operator chain: operand (op operand)*.
fn build_chain(pair: Pair<Rule>) -> Result<Expr, QueryError> {
    let mut inner = pair.into_inner();
    let mut left = build_expr(next_pair(&mut inner, "operand")?)?;
    while let Some(op) = inner.next() {
        let op = BinaryOp::from_token(op.as_str())
            .ok_or_else(|| QueryError::Parse(format!("unknown operator {:?}", op.as_str())))?;
        let right = build_expr(next_pair(&mut inner, "right operand")?)?;
        left = Expr::Binary { op, left: Box::new(left), right: Box::new(right) };
    }
    Ok(left)
}

fn build_unary(pair: Pair<Rule>) -> Result<Expr, QueryError> {
    let mut negations = 0usize;
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::neg {
            negations += 1;
            continue;
        }
        let mut expr = build_expr(inner)?;
        for _ in 0..negations {
            expr = Expr::Negate(Box::new(expr));
        }
        return Ok(expr);
    }
    Err(QueryError::Parse("missing operand after '-'".into()))
}

fn build_filter(pair: Pair<Rule>) -> Result<Expr, QueryError> {
    let mut inner = pair.into_inner();
    let primary = build_expr(next_pair(&mut inner, "primary expression")?)?;
    let predicates = inner.map(build_predicate).collect::<Result<Vec<_>, _>>()?;
    if predicates.is_empty() {
        return Ok(primary);
    }
    Ok(Expr::Filter { primary: Box::new(primary), predicates })
}

fn build_filter_path(pair: Pair<Rule>) -> Result<Expr, QueryError> {
    let mut inner = pair.into_inner();
    let base = build_filter(next_pair(&mut inner, "filter expression")?)?;
    let Some(sep) = inner.next() else {
        return Ok(base);
    };
    let mut steps = Vec::new();
    if sep.as_str() == "//" {
        steps.push(Step::descendant_or_self());
    }
    steps.extend(build_relative(next_pair(&mut inner, "relative path")?)?);
    Ok(Expr::Path(LocationPath { start: PathStart::Expr(Box::new(base)), steps }))
}

fn build_absolute(pair: Pair<Rule>) -> Result<Expr, QueryError> {
    let mut inner = pair.into_inner();
    let anchor = next_pair(&mut inner, "path anchor")?;
    let mut steps = Vec::new();
    if anchor.as_rule() == Rule::descendant_root {
        steps.push(Step::descendant_or_self());
    }
    if let Some(rest) = inner.next() {
        steps.extend(build_relative(rest)?);
    }
    Ok(Expr::Path(LocationPath { start: PathStart::Root, steps }))
}

fn build_relative(pair: Pair<Rule>) -> Result<Vec<Step>, QueryError> {
    let mut steps = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::path_sep => {
                if inner.as_str() == "//" {
                    steps.push(Step::descendant_or_self());
                }
            }
            Rule::step => steps.push(build_step(inner)?),
            other => return Err(QueryError::Parse(format!("unexpected {other:?} in path"))),
        }
    }
    Ok(steps)
}

fn build_step(pair: Pair<Rule>) -> Result<Step, QueryError> {
    let inner = next_pair(&mut pair.into_inner(), "step")?;
    match inner.as_rule() {
        Rule::abbrev_parent => Ok(Step::new(Axis::Parent, NodeTest::Node)),
        Rule::abbrev_self => Ok(Step::new(Axis::SelfAxis, NodeTest::Node)),
        Rule::axis_step => {
            let mut axis = Axis::Child;
            let mut test = None;
            let mut predicates = Vec::new();
            for part in inner.into_inner() {
                match part.as_rule() {
                    Rule::axis_specifier => axis = build_axis(part)?,
                    Rule::node_test => test = Some(build_node_test(part)?),
                    Rule::predicate => predicates.push(build_predicate(part)?),
                    other => return Err(QueryError::Parse(format!("unexpected {other:?} in step"))),
                }
            }
            let test = test.ok_or_else(|| QueryError::Parse("step without node test".into()))?;
            Ok(Step { axis, test, predicates })
        }
        other => Err(QueryError::Parse(format!("unexpected {other:?} in step"))),
    }
}

fn build_axis(pair: Pair<Rule>) -> Result<Axis, QueryError> {
    let inner = next_pair(&mut pair.into_inner(), "axis")?;
    match inner.as_rule() {
        Rule::abbrev_attr => Ok(Axis::Attribute),
        _ => Axis::from_name(inner.as_str()).ok_or_else(|| QueryError::Parse(format!("unknown axis {:?}", inner.as_str()))),
    }
}

fn build_node_test(pair: Pair<Rule>) -> Result<NodeTest, QueryError> {
    let inner = next_pair(&mut pair.into_inner(), "node test")?;
    match inner.as_rule() {
        Rule::kind_test => {
            let kind = next_pair(&mut inner.into_inner(), "node type")?;
            match kind.as_str() {
                "node" => Ok(NodeTest::Node),
                "text" => Ok(NodeTest::Text),
                "comment" => Ok(NodeTest::Comment),
                other => Err(QueryError::Parse(format!("unknown node type {other:?}"))),
            }
        }
        _ => match inner.as_str() {
            "*" => Ok(NodeTest::Any),
            name => Ok(NodeTest::Name(name.to_string())),
        },
    }
}

fn build_predicate(pair: Pair<Rule>) -> Result<Expr, QueryError> {
    let inner = next_pair(&mut pair.into_inner(), "predicate expression")?;
    build_expr(inner)
}
