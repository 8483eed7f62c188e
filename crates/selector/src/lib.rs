//! CSS selector to XPath compilation.
//!
//! ```
//! use csspath_selector::{ExpressionType, XPathCompiler};
//!
//! let mut compiler = XPathCompiler::new();
//! let xpath = compiler.compile("ul#nav > li:first-child, a[href]", ExpressionType::Css).unwrap();
//! assert_eq!(xpath, "//ul[@id='nav']/li[1]|//a[@href]");
//! ```
pub mod cache;
pub mod compiler;
pub mod error;
pub mod ir;
pub mod segment;

pub use cache::{CacheStats, CompilationCache};
pub use compiler::{
    ExpressionType, PseudoClass, XPathCompiler, build_path, convert_pseudo, css_to_xpath, pseudo_position,
    split_selector_list,
};
pub use error::{SelectorError, SelectorResult};
pub use segment::{AttributeMap, Pseudo, Relation, SelectorParser, SelectorSegment, get_segments};
