use thiserror::Error;

use crate::model::DomNode;

/// One item of an XPath result.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryItem<N> {
    Node(N),
    Number(f64),
    String(String),
    Boolean(bool),
}

impl<N> QueryItem<N> {
    pub fn as_node(&self) -> Option<&N> {
        match self {
            QueryItem::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn into_node(self) -> Option<N> {
        match self {
            QueryItem::Node(n) => Some(n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("xpath parse error: {0}")]
    Parse(String),
    #[error("xpath evaluation error: {0}")]
    Evaluation(String),
    #[error("unknown function '{0}()'")]
    UnknownFunction(String),
}

/// Backend that evaluates XPath 1.0 expressions against a node tree.
///
/// `context` of `None` means the tree's root. Node results come back in
/// document order without duplicates.
pub trait TreeQuery {
    type Node: DomNode;

    fn root(&self) -> Self::Node;

    fn evaluate(&self, xpath: &str, context: Option<&Self::Node>) -> Result<Vec<QueryItem<Self::Node>>, QueryError>;

    fn count(&self, xpath: &str, context: Option<&Self::Node>) -> Result<usize, QueryError> {
        Ok(self.evaluate(xpath, context)?.into_iter().filter(|item| matches!(item, QueryItem::Node(_))).count())
    }
}
