use core::cmp::Ordering;

use super::ast::{Axis, BinaryOp, Expr, LocationPath, NodeTest, PathStart, Step};
use crate::model::{DomNode, NodeKind};
use crate::query::{QueryError, QueryItem};

/// Intermediate value of an XPath 1.0 expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<N> {
    Nodes(Vec<N>),
    Number(f64),
    String(String),
    Boolean(bool),
}

impl<N: DomNode> Value<N> {
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Nodes(nodes) => !nodes.is_empty(),
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Boolean(b) => *b,
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Value::Nodes(_) => string_to_number(&self.to_xpath_string()),
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Boolean(b) => f64::from(u8::from(*b)),
        }
    }

    /// String value; a node-set yields the string value of its first node.
    pub fn to_xpath_string(&self) -> String {
        match self {
            Value::Nodes(nodes) => nodes.first().map(DomNode::string_value).unwrap_or_default(),
            Value::Number(n) => number_to_string(*n),
            Value::String(s) => s.clone(),
            Value::Boolean(b) => b.to_string(),
        }
    }

    pub fn into_items(self) -> Vec<QueryItem<N>> {
        match self {
            Value::Nodes(nodes) => nodes.into_iter().map(QueryItem::Node).collect(),
            Value::Number(n) => vec![QueryItem::Number(n)],
            Value::String(s) => vec![QueryItem::String(s)],
            Value::Boolean(b) => vec![QueryItem::Boolean(b)],
        }
    }
}

pub(crate) fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if digits.is_empty() || digits == "." || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub(crate) fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

#[derive(Debug, Clone)]
struct Focus<N> {
    node: N,
    position: usize,
    size: usize,
}

/// Evaluate a parsed expression with `context` as the context node.
pub fn evaluate<N: DomNode>(expr: &Expr, context: &N) -> Result<Value<N>, QueryError> {
    let focus = Focus { node: context.clone(), position: 1, size: 1 };
    eval(expr, &focus)
}

fn eval<N: DomNode>(expr: &Expr, focus: &Focus<N>) -> Result<Value<N>, QueryError> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Literal(s) => Ok(Value::String(s.clone())),
        Expr::Path(path) => eval_path(path, focus).map(Value::Nodes),
        Expr::Filter { primary, predicates } => {
            let nodes = expect_nodes(eval(primary, focus)?, "filter predicate")?;
            apply_predicates(document_order(nodes), predicates).map(Value::Nodes)
        }
        Expr::FunctionCall { name, args } => call_function(name, args, focus),
        Expr::Binary { op, left, right } => eval_binary(*op, left, right, focus),
        Expr::Negate(inner) => Ok(Value::Number(-eval(inner, focus)?.to_number())),
        Expr::Union(branches) => {
            let mut nodes = Vec::new();
            for branch in branches {
                nodes.extend(expect_nodes(eval(branch, focus)?, "union operand")?);
            }
            Ok(Value::Nodes(document_order(nodes)))
        }
    }
}

fn expect_nodes<N>(value: Value<N>, what: &str) -> Result<Vec<N>, QueryError> {
    match value {
        Value::Nodes(nodes) => Ok(nodes),
        _ => Err(QueryError::Evaluation(format!("{what} requires a node-set"))),
    }
}

/// Sort into document order and drop duplicates.
pub(crate) fn document_order<N: DomNode>(mut nodes: Vec<N>) -> Vec<N> {
    nodes.sort_by(|a, b| a.compare_document_order(b).unwrap_or(Ordering::Equal));
    nodes.dedup();
    nodes
}

fn eval_path<N: DomNode>(path: &LocationPath, focus: &Focus<N>) -> Result<Vec<N>, QueryError> {
    let mut current = match &path.start {
        PathStart::Root => vec![focus.node.root()],
        PathStart::Context => vec![focus.node.clone()],
        PathStart::Expr(base) => document_order(expect_nodes(eval(base, focus)?, "path")?),
    };
    for step in &path.steps {
        let mut next = Vec::new();
        for node in &current {
            next.extend(eval_step(step, node)?);
        }
        current = document_order(next);
    }
    Ok(current)
}

fn eval_step<N: DomNode>(step: &Step, node: &N) -> Result<Vec<N>, QueryError> {
    let candidates: Vec<N> =
        axis_nodes(step.axis, node).into_iter().filter(|n| matches_test(step.axis, &step.test, n)).collect();
    apply_predicates(candidates, &step.predicates)
}

#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
fn apply_predicates<N: DomNode>(mut nodes: Vec<N>, predicates: &[Expr]) -> Result<Vec<N>, QueryError> {
    for predicate in predicates {
        let size = nodes.len();
        let mut kept = Vec::with_capacity(size);
        for (index, node) in nodes.into_iter().enumerate() {
            let focus = Focus { node, position: index + 1, size };
            let keep = match eval(predicate, &focus)? {
                Value::Number(n) => n == focus.position as f64,
                other => other.to_boolean(),
            };
            if keep {
                kept.push(focus.node);
            }
        }
        nodes = kept;
    }
    Ok(nodes)
}

/// Nodes along `axis` in axis order: nearest first for reverse axes.
fn axis_nodes<N: DomNode>(axis: Axis, node: &N) -> Vec<N> {
    match axis {
        Axis::Child => node.children(),
        Axis::Descendant => {
            let mut out = Vec::new();
            collect_descendants(node, &mut out);
            out
        }
        Axis::DescendantOrSelf => {
            let mut out = vec![node.clone()];
            collect_descendants(node, &mut out);
            out
        }
        Axis::SelfAxis => vec![node.clone()],
        Axis::Parent => node.parent().into_iter().collect(),
        Axis::Attribute => node.attributes(),
        Axis::Ancestor => ancestors(node),
        Axis::AncestorOrSelf => {
            let mut out = vec![node.clone()];
            out.extend(ancestors(node));
            out
        }
        Axis::FollowingSibling => {
            let siblings = siblings(node);
            match siblings.iter().position(|s| s == node) {
                Some(i) => siblings[i + 1..].to_vec(),
                None => Vec::new(),
            }
        }
        Axis::PrecedingSibling => {
            let siblings = siblings(node);
            match siblings.iter().position(|s| s == node) {
                Some(i) => siblings[..i].iter().rev().cloned().collect(),
                None => Vec::new(),
            }
        }
    }
}

fn collect_descendants<N: DomNode>(node: &N, out: &mut Vec<N>) {
    for child in node.children() {
        out.push(child.clone());
        collect_descendants(&child, out);
    }
}

fn ancestors<N: DomNode>(node: &N) -> Vec<N> {
    let mut out = Vec::new();
    let mut current = node.parent();
    while let Some(parent) = current {
        current = parent.parent();
        out.push(parent);
    }
    out
}

/// Attributes have no siblings.
fn siblings<N: DomNode>(node: &N) -> Vec<N> {
    if node.kind() == NodeKind::Attribute {
        return Vec::new();
    }
    node.parent().map(|p| p.children()).unwrap_or_default()
}

fn matches_test<N: DomNode>(axis: Axis, test: &NodeTest, node: &N) -> bool {
    let principal = if axis == Axis::Attribute { NodeKind::Attribute } else { NodeKind::Element };
    match test {
        NodeTest::Node => true,
        NodeTest::Text => node.kind() == NodeKind::Text,
        NodeTest::Comment => node.kind() == NodeKind::Comment,
        NodeTest::Any => node.kind() == principal,
        NodeTest::Name(name) => node.kind() == principal && node.name().as_deref() == Some(name.as_str()),
    }
}

fn eval_binary<N: DomNode>(op: BinaryOp, left: &Expr, right: &Expr, focus: &Focus<N>) -> Result<Value<N>, QueryError> {
    match op {
        BinaryOp::Or => Ok(Value::Boolean(eval(left, focus)?.to_boolean() || eval(right, focus)?.to_boolean())),
        BinaryOp::And => Ok(Value::Boolean(eval(left, focus)?.to_boolean() && eval(right, focus)?.to_boolean())),
        _ if op.is_comparison() => {
            let l = eval(left, focus)?;
            let r = eval(right, focus)?;
            Ok(Value::Boolean(compare(op, &l, &r)))
        }
        _ => {
            let l = eval(left, focus)?.to_number();
            let r = eval(right, focus)?.to_number();
            let n = match op {
                BinaryOp::Add => l + r,
                BinaryOp::Sub => l - r,
                BinaryOp::Div => l / r,
                _ => l % r,
            };
            Ok(Value::Number(n))
        }
    }
}

#[derive(Debug, Clone)]
enum Atom {
    Number(f64),
    String(String),
    Boolean(bool),
}

impl Atom {
    fn of<N: DomNode>(value: &Value<N>) -> Self {
        match value {
            Value::Number(n) => Atom::Number(*n),
            Value::String(s) => Atom::String(s.clone()),
            Value::Boolean(b) => Atom::Boolean(*b),
            Value::Nodes(_) => Atom::String(value.to_xpath_string()),
        }
    }

    fn number(&self) -> f64 {
        match self {
            Atom::Number(n) => *n,
            Atom::String(s) => string_to_number(s),
            Atom::Boolean(b) => f64::from(u8::from(*b)),
        }
    }

    fn boolean(&self) -> bool {
        match self {
            Atom::Number(n) => *n != 0.0 && !n.is_nan(),
            Atom::String(s) => !s.is_empty(),
            Atom::Boolean(b) => *b,
        }
    }

    fn string(&self) -> String {
        match self {
            Atom::Number(n) => number_to_string(*n),
            Atom::String(s) => s.clone(),
            Atom::Boolean(b) => b.to_string(),
        }
    }
}

/// XPath 1.0 comparison; node-sets compare existentially over their members.
fn compare<N: DomNode>(op: BinaryOp, left: &Value<N>, right: &Value<N>) -> bool {
    match (left, right) {
        (Value::Nodes(a), Value::Nodes(b)) => a.iter().any(|x| {
            let x = Atom::String(x.string_value());
            b.iter().any(|y| compare_atoms(op, &x, &Atom::String(y.string_value())))
        }),
        (Value::Nodes(a), Value::Boolean(b)) => compare_atoms(op, &Atom::Boolean(!a.is_empty()), &Atom::Boolean(*b)),
        (Value::Boolean(b), Value::Nodes(a)) => compare_atoms(op, &Atom::Boolean(*b), &Atom::Boolean(!a.is_empty())),
        (Value::Nodes(a), other) => {
            let other = Atom::of(other);
            a.iter().any(|x| compare_atoms(op, &node_atom(x, &other), &other))
        }
        (other, Value::Nodes(b)) => {
            let other = Atom::of(other);
            b.iter().any(|y| compare_atoms(op, &other, &node_atom(y, &other)))
        }
        (l, r) => compare_atoms(op, &Atom::of(l), &Atom::of(r)),
    }
}

/// A node compared against a number is converted to a number first.
fn node_atom<N: DomNode>(node: &N, against: &Atom) -> Atom {
    match against {
        Atom::Number(_) => Atom::Number(string_to_number(&node.string_value())),
        _ => Atom::String(node.string_value()),
    }
}

#[allow(clippy::float_cmp)]
fn compare_atoms(op: BinaryOp, l: &Atom, r: &Atom) -> bool {
    match op {
        BinaryOp::Eq | BinaryOp::Ne => {
            let equal = match (l, r) {
                (Atom::Boolean(_), _) | (_, Atom::Boolean(_)) => l.boolean() == r.boolean(),
                (Atom::Number(_), _) | (_, Atom::Number(_)) => l.number() == r.number(),
                _ => l.string() == r.string(),
            };
            if op == BinaryOp::Eq { equal } else { !equal }
        }
        BinaryOp::Lt => l.number() < r.number(),
        BinaryOp::Le => l.number() <= r.number(),
        BinaryOp::Gt => l.number() > r.number(),
        BinaryOp::Ge => l.number() >= r.number(),
        _ => false,
    }
}

fn arity(name: &str, args: &[Expr], min: usize, max: usize) -> Result<(), QueryError> {
    if args.len() < min || args.len() > max {
        return Err(QueryError::Evaluation(format!("{name}() called with {} argument(s)", args.len())));
    }
    Ok(())
}

/// First argument as a string, or the context node's string value.
fn string_arg<N: DomNode>(args: &[Expr], focus: &Focus<N>) -> Result<String, QueryError> {
    match args.first() {
        Some(arg) => Ok(eval(arg, focus)?.to_xpath_string()),
        None => Ok(focus.node.string_value()),
    }
}

fn node_name_arg<N: DomNode>(args: &[Expr], focus: &Focus<N>) -> Result<Option<String>, QueryError> {
    match args.first() {
        Some(arg) => Ok(expect_nodes(eval(arg, focus)?, "name()")?.first().and_then(DomNode::name)),
        None => Ok(focus.node.name()),
    }
}

#[allow(clippy::cast_precision_loss)]
fn call_function<N: DomNode>(name: &str, args: &[Expr], focus: &Focus<N>) -> Result<Value<N>, QueryError> {
    match name {
        "position" => {
            arity(name, args, 0, 0)?;
            Ok(Value::Number(focus.position as f64))
        }
        "last" => {
            arity(name, args, 0, 0)?;
            Ok(Value::Number(focus.size as f64))
        }
        "count" => {
            arity(name, args, 1, 1)?;
            let nodes = expect_nodes(eval(&args[0], focus)?, "count()")?;
            Ok(Value::Number(nodes.len() as f64))
        }
        "contains" | "starts-with" => {
            arity(name, args, 2, 2)?;
            let haystack = eval(&args[0], focus)?.to_xpath_string();
            let needle = eval(&args[1], focus)?.to_xpath_string();
            let found =
                if name == "contains" { haystack.contains(&needle) } else { haystack.starts_with(&needle) };
            Ok(Value::Boolean(found))
        }
        "concat" => {
            arity(name, args, 2, usize::MAX)?;
            let mut out = String::new();
            for arg in args {
                out.push_str(&eval(arg, focus)?.to_xpath_string());
            }
            Ok(Value::String(out))
        }
        "normalize-space" => {
            arity(name, args, 0, 1)?;
            let s = string_arg(args, focus)?;
            Ok(Value::String(s.split_whitespace().collect::<Vec<_>>().join(" ")))
        }
        "string" => {
            arity(name, args, 0, 1)?;
            string_arg(args, focus).map(Value::String)
        }
        "string-length" => {
            arity(name, args, 0, 1)?;
            Ok(Value::Number(string_arg(args, focus)?.chars().count() as f64))
        }
        "number" => {
            arity(name, args, 0, 1)?;
            match args.first() {
                Some(arg) => Ok(Value::Number(eval(arg, focus)?.to_number())),
                None => Ok(Value::Number(string_to_number(&focus.node.string_value()))),
            }
        }
        "not" => {
            arity(name, args, 1, 1)?;
            Ok(Value::Boolean(!eval(&args[0], focus)?.to_boolean()))
        }
        "true" | "false" => {
            arity(name, args, 0, 0)?;
            Ok(Value::Boolean(name == "true"))
        }
        "name" => {
            arity(name, args, 0, 1)?;
            Ok(Value::String(node_name_arg(args, focus)?.unwrap_or_default()))
        }
        "local-name" => {
            arity(name, args, 0, 1)?;
            let full = node_name_arg(args, focus)?.unwrap_or_default();
            let local = full.rsplit_once(':').map_or(full.as_str(), |(_, local)| local);
            Ok(Value::String(local.to_string()))
        }
        _ => Err(QueryError::UnknownFunction(name.to_string())),
    }
}
