//! XPath 1.0 subset evaluator over any [`DomNode`] tree.
//!
//! ```
//! use csspath_dom::simple_node::{doc, elem};
//! use csspath_dom::xpath::Tree;
//! use csspath_dom::{QueryItem, TreeQuery};
//!
//! let tree = Tree::new(
//!     doc().child(elem("ul").child(elem("li").text("a")).child(elem("li").text("b"))).build(),
//! );
//! assert_eq!(tree.count("//li", None).unwrap(), 2);
//! assert_eq!(
//!     tree.evaluate("string(//li[last()])", None).unwrap(),
//!     vec![QueryItem::String("b".into())]
//! );
//! ```
use crate::model::DomNode;
use crate::query::{QueryError, QueryItem, TreeQuery};

pub mod ast;
pub mod eval;
pub mod parser;

pub use eval::Value;
pub use parser::XPathParser;

/// Parse and evaluate `xpath` against `context`.
pub fn evaluate<N: DomNode>(xpath: &str, context: &N) -> Result<Value<N>, QueryError> {
    let expr = XPathParser::parse_to_ast(xpath)?;
    eval::evaluate(&expr, context)
}

/// A node tree paired with the built-in evaluator.
#[derive(Debug, Clone)]
pub struct Tree<N> {
    root: N,
}

impl<N: DomNode> Tree<N> {
    pub fn new(root: N) -> Self {
        Self { root }
    }
}

impl<N: DomNode> TreeQuery for Tree<N> {
    type Node = N;

    fn root(&self) -> N {
        self.root.clone()
    }

    fn evaluate(&self, xpath: &str, context: Option<&N>) -> Result<Vec<QueryItem<N>>, QueryError> {
        let context = context.unwrap_or(&self.root);
        tracing::trace!(xpath, "evaluating xpath");
        Ok(evaluate(xpath, context)?.into_items())
    }
}
