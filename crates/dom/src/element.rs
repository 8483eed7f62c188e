use std::fmt;
use std::sync::Arc;

use csspath_selector::ExpressionType;

use crate::class_list::ClassList;
use crate::document::Shared;
use crate::error::DocumentResult;
use crate::model::{DomNode, NodeKind};
use crate::query::TreeQuery;
use crate::style::InlineStyle;

/// An element node bound to the document it was found in.
pub struct Element<T: TreeQuery> {
    node: T::Node,
    shared: Arc<Shared<T>>,
}

impl<T: TreeQuery> Clone for Element<T> {
    fn clone(&self) -> Self {
        Self { node: self.node.clone(), shared: Arc::clone(&self.shared) }
    }
}

impl<T: TreeQuery> PartialEq for Element<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<T: TreeQuery> Eq for Element<T> {}

impl<T: TreeQuery> fmt::Debug for Element<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Element").field(&self.node).finish()
    }
}

impl<T: TreeQuery> Element<T> {
    pub(crate) fn new(node: T::Node, shared: Arc<Shared<T>>) -> Self {
        Self { node, shared }
    }

    fn wrap(&self, node: T::Node) -> Self {
        Self::new(node, Arc::clone(&self.shared))
    }

    pub fn node(&self) -> &T::Node {
        &self.node
    }

    pub fn tag_name(&self) -> String {
        self.node.name().unwrap_or_default()
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.node.attribute(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Attributes as `(name, value)` pairs in document order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.node
            .attributes()
            .into_iter()
            .filter_map(|a| a.name().map(|name| (name, a.string_value())))
            .collect()
    }

    /// Concatenated descendant text.
    pub fn text(&self) -> String {
        self.node.string_value()
    }

    pub fn id(&self) -> Option<String> {
        self.attr("id")
    }

    pub fn class_list(&self) -> ClassList {
        self.attr("class").map(|v| ClassList::parse(&v)).unwrap_or_default()
    }

    pub fn style(&self) -> InlineStyle {
        self.attr("style").map(|v| InlineStyle::parse(&v)).unwrap_or_default()
    }

    /// Parent element; `None` at the top element or below a document node.
    pub fn parent(&self) -> Option<Self> {
        self.node.parent().filter(|p| p.kind() == NodeKind::Element).map(|p| self.wrap(p))
    }

    pub fn children(&self) -> Vec<Self> {
        self.node.children().into_iter().filter(|c| c.kind() == NodeKind::Element).map(|c| self.wrap(c)).collect()
    }

    /// Descendants matching `expression`. CSS is anchored at this element;
    /// XPath is evaluated with this element as the context node.
    pub fn find(&self, expression: &str, ty: ExpressionType) -> DocumentResult<Vec<Self>> {
        let xpath = self.shared.compile(expression, ty, true)?;
        let nodes = self.shared.select(&xpath, Some(&self.node))?;
        Ok(nodes.into_iter().map(|n| self.wrap(n)).collect())
    }

    pub fn first(&self, expression: &str, ty: ExpressionType) -> DocumentResult<Option<Self>> {
        Ok(self.find(expression, ty)?.into_iter().next())
    }

    pub fn has(&self, expression: &str, ty: ExpressionType) -> DocumentResult<bool> {
        Ok(!self.find(expression, ty)?.is_empty())
    }

    pub fn count(&self, expression: &str, ty: ExpressionType) -> DocumentResult<usize> {
        Ok(self.find(expression, ty)?.len())
    }

    /// Whether this element is selected by the CSS `selector` document-wide.
    pub fn matches(&self, selector: &str) -> DocumentResult<bool> {
        let xpath = self.shared.compile(selector, ExpressionType::Css, false)?;
        Ok(self.shared.select(&xpath, None)?.contains(&self.node))
    }
}
