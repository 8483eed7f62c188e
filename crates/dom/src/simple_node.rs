//! Immutable in-memory tree implementing [`DomNode`].
//!
//! Trees are assembled with a builder and never change afterwards, so node
//! handles are plain `Arc`s that can be shared across threads.
//!
//! ```
//! use csspath_dom::simple_node::{doc, elem};
//! use csspath_dom::DomNode;
//!
//! // <html><body><p class="lead">Hello</p><p>World</p></body></html>
//! let document = doc()
//!     .child(
//!         elem("html").child(
//!             elem("body")
//!                 .child(elem("p").attr("class", "lead").text("Hello"))
//!                 .child(elem("p").text("World")),
//!         ),
//!     )
//!     .build();
//!
//! let html = document.children()[0].clone();
//! assert_eq!(html.name().as_deref(), Some("html"));
//! assert_eq!(html.string_value(), "HelloWorld");
//! ```
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use crate::model::{DomNode, NodeKind};

struct Inner {
    kind: NodeKind,
    name: Option<String>,
    value: Option<String>,
    parent: Option<Weak<Inner>>,
    attributes: Vec<SimpleNode>,
    children: Vec<SimpleNode>,
}

/// Handle to a node of an in-memory tree. Equality is node identity.
#[derive(Clone)]
pub struct SimpleNode(Arc<Inner>);

impl PartialEq for SimpleNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for SimpleNode {}

impl Hash for SimpleNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for SimpleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleNode")
            .field("kind", &self.0.kind)
            .field("name", &self.0.name)
            .field("value", &self.0.value)
            .finish_non_exhaustive()
    }
}

impl SimpleNode {
    fn collect_text(&self, out: &mut String) {
        match self.0.kind {
            NodeKind::Text => out.push_str(self.0.value.as_deref().unwrap_or_default()),
            NodeKind::Element | NodeKind::Document => {
                for child in &self.0.children {
                    child.collect_text(out);
                }
            }
            NodeKind::Attribute | NodeKind::Comment => {}
        }
    }
}

impl DomNode for SimpleNode {
    fn kind(&self) -> NodeKind {
        self.0.kind
    }

    fn name(&self) -> Option<String> {
        self.0.name.clone()
    }

    fn string_value(&self) -> String {
        match self.0.kind {
            NodeKind::Element | NodeKind::Document => {
                let mut out = String::new();
                self.collect_text(&mut out);
                out
            }
            _ => self.0.value.clone().unwrap_or_default(),
        }
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent.as_ref().and_then(Weak::upgrade).map(SimpleNode)
    }

    fn children(&self) -> Vec<Self> {
        self.0.children.clone()
    }

    fn attributes(&self) -> Vec<Self> {
        self.0.attributes.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0
            .attributes
            .iter()
            .find(|a| a.0.name.as_deref() == Some(name))
            .and_then(|a| a.0.value.clone())
    }
}

/// Builder for [`SimpleNode`] trees.
#[derive(Debug, Clone)]
pub struct SimpleNodeBuilder {
    kind: NodeKind,
    name: Option<String>,
    value: Option<String>,
    attributes: Vec<(String, String)>,
    children: Vec<SimpleNodeBuilder>,
}

impl SimpleNodeBuilder {
    fn new(kind: NodeKind, name: Option<String>, value: Option<String>) -> Self {
        Self { kind, name, value, attributes: Vec::new(), children: Vec::new() }
    }

    /// Set an attribute; setting the same name twice keeps the last value.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    pub fn child(mut self, child: SimpleNodeBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = SimpleNodeBuilder>) -> Self {
        self.children.extend(children);
        self
    }

    /// Append a text node.
    pub fn text(self, value: impl Into<String>) -> Self {
        self.child(text(value))
    }

    pub fn build(self) -> SimpleNode {
        self.build_with_parent(None)
    }

    fn build_with_parent(self, parent: Option<Weak<Inner>>) -> SimpleNode {
        let SimpleNodeBuilder { kind, name, value, attributes, children } = self;
        SimpleNode(Arc::new_cyclic(|me: &Weak<Inner>| {
            let attributes = attributes
                .into_iter()
                .map(|(name, value)| {
                    SimpleNode(Arc::new(Inner {
                        kind: NodeKind::Attribute,
                        name: Some(name),
                        value: Some(value),
                        parent: Some(me.clone()),
                        attributes: Vec::new(),
                        children: Vec::new(),
                    }))
                })
                .collect();
            let children = children.into_iter().map(|c| c.build_with_parent(Some(me.clone()))).collect();
            Inner { kind, name, value, parent, attributes, children }
        }))
    }
}

pub fn doc() -> SimpleNodeBuilder {
    SimpleNodeBuilder::new(NodeKind::Document, None, None)
}

pub fn elem(name: impl Into<String>) -> SimpleNodeBuilder {
    SimpleNodeBuilder::new(NodeKind::Element, Some(name.into()), None)
}

pub fn text(value: impl Into<String>) -> SimpleNodeBuilder {
    SimpleNodeBuilder::new(NodeKind::Text, None, Some(value.into()))
}

pub fn comment(value: impl Into<String>) -> SimpleNodeBuilder {
    SimpleNodeBuilder::new(NodeKind::Comment, None, Some(value.into()))
}
