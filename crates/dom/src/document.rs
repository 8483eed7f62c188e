use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use csspath_selector::{CacheStats, ExpressionType, XPathCompiler};

use crate::element::Element;
use crate::error::DocumentResult;
use crate::model::{DomNode, NodeKind};
use crate::options::QueryOptions;
use crate::query::{QueryItem, TreeQuery};

/// State shared between a document and the elements it hands out.
pub(crate) struct Shared<T> {
    tree: T,
    compiler: Mutex<XPathCompiler>,
    default_type: ExpressionType,
}

impl<T: TreeQuery> Shared<T> {
    fn compiler(&self) -> MutexGuard<'_, XPathCompiler> {
        match self.compiler.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("selector compiler lock was poisoned; continuing with its last state");
                poisoned.into_inner()
            }
        }
    }

    pub(crate) fn compile(&self, expression: &str, ty: ExpressionType, scoped: bool) -> DocumentResult<String> {
        let mut compiler = self.compiler();
        let xpath =
            if scoped { compiler.compile_relative(expression, ty)? } else { compiler.compile(expression, ty)? };
        Ok(xpath)
    }

    /// Element nodes selected by `xpath`; other items are dropped.
    pub(crate) fn select(&self, xpath: &str, context: Option<&T::Node>) -> DocumentResult<Vec<T::Node>> {
        let items = self.tree.evaluate(xpath, context)?;
        Ok(items
            .into_iter()
            .filter_map(QueryItem::into_node)
            .filter(|node| node.kind() == NodeKind::Element)
            .collect())
    }

    pub(crate) fn tree(&self) -> &T {
        &self.tree
    }
}

/// Entry point for querying a tree with CSS selectors or XPath.
///
/// Compiled selectors are cached per document; elements returned from a
/// document share its cache.
pub struct Document<T: TreeQuery> {
    shared: Arc<Shared<T>>,
}

impl<T: TreeQuery> Clone for Document<T> {
    fn clone(&self) -> Self {
        Self { shared: Arc::clone(&self.shared) }
    }
}

impl<T: TreeQuery> fmt::Debug for Document<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("root", &self.shared.tree.root())
            .field("default_type", &self.shared.default_type)
            .finish_non_exhaustive()
    }
}

impl<T: TreeQuery> Document<T> {
    pub fn new(tree: T) -> Self {
        Self::with_options(tree, QueryOptions::default())
    }

    pub fn with_options(tree: T, mut options: QueryOptions) -> Self {
        let compiler = XPathCompiler::with_cache(options.take_cache());
        Self {
            shared: Arc::new(Shared {
                tree,
                compiler: Mutex::new(compiler),
                default_type: options.default_type(),
            }),
        }
    }

    pub fn root(&self) -> T::Node {
        self.shared.tree.root()
    }

    /// All elements matching `expression`, in document order.
    pub fn find(&self, expression: &str, ty: ExpressionType) -> DocumentResult<Vec<Element<T>>> {
        let xpath = self.shared.compile(expression, ty, false)?;
        let nodes = self.shared.select(&xpath, None)?;
        Ok(nodes.into_iter().map(|node| Element::new(node, Arc::clone(&self.shared))).collect())
    }

    /// [`find`](Self::find) with the document's default expression type.
    pub fn select(&self, expression: &str) -> DocumentResult<Vec<Element<T>>> {
        self.find(expression, self.shared.default_type)
    }

    pub fn first(&self, expression: &str, ty: ExpressionType) -> DocumentResult<Option<Element<T>>> {
        Ok(self.find(expression, ty)?.into_iter().next())
    }

    pub fn has(&self, expression: &str, ty: ExpressionType) -> DocumentResult<bool> {
        Ok(self.count(expression, ty)? > 0)
    }

    pub fn count(&self, expression: &str, ty: ExpressionType) -> DocumentResult<usize> {
        let xpath = self.shared.compile(expression, ty, false)?;
        Ok(self.shared.select(&xpath, None)?.len())
    }

    /// Evaluate raw XPath and return every item, including non-node values.
    pub fn xpath(&self, expression: &str) -> DocumentResult<Vec<QueryItem<T::Node>>> {
        Ok(self.shared.tree().evaluate(expression, None)?)
    }

    /// Snapshot of the selector to XPath cache.
    pub fn compiled_cache(&self) -> HashMap<String, String> {
        self.shared.compiler().compiled_cache().clone()
    }

    /// Replace the selector cache. Entries are used verbatim on later lookups.
    pub fn set_compiled_cache(&self, entries: HashMap<String, String>) {
        self.shared.compiler().set_compiled_cache(entries);
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.shared.compiler().cache().stats()
    }
}
