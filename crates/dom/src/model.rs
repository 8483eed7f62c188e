use core::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Element,
    Attribute,
    Text,
    Comment,
}

/// Compare two nodes by ancestry and stable sibling order.
///
/// - An ancestor precedes its descendants.
/// - Among siblings, attributes come before child nodes; within each group the
///   order reported by the node is kept.
/// - Nodes from different roots compare by nothing meaningful and yield `None`.
pub fn compare_by_ancestry<N: DomNode>(a: &N, b: &N) -> Option<Ordering> {
    if a == b {
        return Some(Ordering::Equal);
    }
    fn path_to_root<N: DomNode>(mut n: N) -> Vec<N> {
        let mut p = vec![n.clone()];
        while let Some(parent) = n.parent() {
            p.push(parent.clone());
            n = parent;
        }
        p.reverse();
        p
    }
    let pa = path_to_root(a.clone());
    let pb = path_to_root(b.clone());
    let len = pa.len().min(pb.len());
    let mut i = 0usize;
    while i < len && pa[i] == pb[i] {
        i += 1;
    }
    if i == len {
        return Some(pa.len().cmp(&pb.len()));
    }
    if i == 0 {
        return None;
    }
    let parent = &pa[i - 1];
    let mut siblings = parent.attributes();
    siblings.extend(parent.children());
    let pos_a = siblings.iter().position(|n| *n == pa[i])?;
    let pos_b = siblings.iter().position(|n| *n == pb[i])?;
    Some(pos_a.cmp(&pos_b))
}

/// Read access to a node of a document tree.
///
/// Implementations are cheap handles; equality is node identity.
pub trait DomNode: Clone + Eq + core::fmt::Debug {
    fn kind(&self) -> NodeKind;
    /// Element or attribute name, `None` for other kinds.
    fn name(&self) -> Option<String>;
    /// Text of a text/comment/attribute node, concatenated descendant text for
    /// elements and documents.
    fn string_value(&self) -> String;
    fn parent(&self) -> Option<Self>;
    fn children(&self) -> Vec<Self>;
    fn attributes(&self) -> Vec<Self>;

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes().into_iter().find(|a| a.name().as_deref() == Some(name)).map(|a| a.string_value())
    }

    fn root(&self) -> Self {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    fn compare_document_order(&self, other: &Self) -> Option<Ordering> {
        compare_by_ancestry(self, other)
    }
}
