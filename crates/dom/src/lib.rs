//! Resolve CSS selectors and XPath against node trees.
//!
//! ```
//! use csspath_dom::simple_node::{doc, elem};
//! use csspath_dom::xpath::Tree;
//! use csspath_dom::{Document, ExpressionType};
//!
//! let root = doc()
//!     .child(
//!         elem("article")
//!             .attr("class", "post")
//!             .child(elem("h2").text("Title"))
//!             .child(elem("p").attr("style", "color: red").text("Body")),
//!     )
//!     .build();
//! let document = Document::new(Tree::new(root));
//!
//! let p = document.first(".post p", ExpressionType::Css).unwrap().unwrap();
//! assert_eq!(p.text(), "Body");
//! assert_eq!(p.style().get("color"), Some("red"));
//! ```
pub mod class_list;
pub mod document;
pub mod element;
pub mod error;
pub mod model;
pub mod options;
pub mod query;
pub mod simple_node;
pub mod style;
pub mod xpath;

pub use class_list::ClassList;
pub use csspath_selector::{ExpressionType, SelectorError};
pub use document::Document;
pub use element::Element;
pub use error::{DocumentError, DocumentResult};
pub use model::{DomNode, NodeKind};
pub use options::QueryOptions;
pub use query::{QueryError, QueryItem, TreeQuery};
pub use simple_node::SimpleNode;
pub use style::InlineStyle;
