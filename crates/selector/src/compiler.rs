//! CSS selector → XPath compilation.
//!
//! A selector list is split into branches on top-level commas. Each branch is
//! walked segment by segment with a byte cursor; every segment becomes one
//! [`Step`] whose axis comes from the relation of the segment before it. The
//! resulting [`LocationPath`] is rendered and memoized per branch.
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use fancy_regex::Regex;

use crate::cache::CompilationCache;
use crate::error::{SelectorError, SelectorResult};
use crate::ir::{Axis, LocationPath, PositionExpr, Predicate, Step};
use crate::segment::{Relation, SelectorParser, SelectorSegment};

/// What kind of expression a caller hands to [`XPathCompiler::compile`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpressionType {
    #[default]
    Css,
    XPath,
}

impl FromStr for ExpressionType {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "css" => Ok(ExpressionType::Css),
            "xpath" => Ok(ExpressionType::XPath),
            other => Err(SelectorError::invalid_argument(format!("unknown expression type {other:?}"))),
        }
    }
}

impl fmt::Display for ExpressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExpressionType::Css => "css",
            ExpressionType::XPath => "xpath",
        })
    }
}

/// Supported pseudo-classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoClass {
    FirstChild,
    LastChild,
    NthChild,
}

impl FromStr for PseudoClass {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-child" => Ok(PseudoClass::FirstChild),
            "last-child" => Ok(PseudoClass::LastChild),
            "nth-child" => Ok(PseudoClass::NthChild),
            other => Err(SelectorError::unknown_pseudo(other)),
        }
    }
}

static CYCLE_RE: OnceLock<Regex> = OnceLock::new();

fn cycle_re() -> &'static Regex {
    CYCLE_RE.get_or_init(|| {
        Regex::new(r"^(?P<mul>\d+)n\s*\+\s*(?P<pos>\d+)$").expect("nth-child cycle pattern is valid")
    })
}

/// Translate a pseudo-class into its structured position predicate.
///
/// `expr` is only read for `nth-child`; the other pseudo-classes ignore it.
pub fn pseudo_position(name: &str, expr: Option<&str>) -> SelectorResult<PositionExpr> {
    match name.parse::<PseudoClass>()? {
        PseudoClass::FirstChild => Ok(PositionExpr::First),
        PseudoClass::LastChild => Ok(PositionExpr::Last),
        PseudoClass::NthChild => {
            let arg = expr.map(str::trim).unwrap_or_default();
            if arg.is_empty() {
                return Err(SelectorError::invalid(format!(":{name}"), 0, "nth-child requires an argument"));
            }
            nth_child_position(arg)
        }
    }
}

fn nth_child_position(arg: &str) -> SelectorResult<PositionExpr> {
    if arg.eq_ignore_ascii_case("odd") {
        return Ok(PositionExpr::Odd);
    }
    if arg.eq_ignore_ascii_case("even") {
        return Ok(PositionExpr::Even);
    }
    if arg.chars().all(|c| c.is_ascii_digit()) {
        return Ok(PositionExpr::Index { n: canonical_digits(arg) });
    }
    let caps = cycle_re()
        .captures(arg)
        .map_err(|e| SelectorError::invalid(arg, 0, format!("pattern failure: {e}")))?;
    if let Some(caps) = caps
        && let (Some(mul), Some(pos)) = (caps.name("mul"), caps.name("pos"))
    {
        return Ok(PositionExpr::Cycle {
            mul: canonical_digits(mul.as_str()),
            offset: canonical_digits(pos.as_str()),
        });
    }
    Ok(PositionExpr::Raw { xpath: arg.to_string() })
}

/// Digits without leading zeros; the text is kept so any length compiles.
fn canonical_digits(digits: &str) -> String {
    match digits.trim_start_matches('0') {
        "" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Translate a pseudo-class into the text of an XPath predicate.
///
/// ```
/// use csspath_selector::convert_pseudo;
///
/// assert_eq!(convert_pseudo("nth-child", Some("3")).unwrap(), "position() = 3");
/// assert_eq!(convert_pseudo("last-child", None).unwrap(), "last()");
/// ```
pub fn convert_pseudo(name: &str, expr: Option<&str>) -> SelectorResult<String> {
    pseudo_position(name, expr).map(|p| p.to_string())
}

/// Build the structured path for one selector branch (no commas).
pub fn build_path(selector: &str, prefix: Axis) -> SelectorResult<LocationPath> {
    let mut steps = Vec::new();
    let mut axis = prefix;
    let mut cursor = 0;
    loop {
        let segment = SelectorParser::get_segments_at(selector, cursor)?;
        steps.push(Step { axis, tag: segment.tag.clone(), predicates: predicates(selector, &segment)? });
        cursor = segment.span.end;
        if selector[cursor..].trim().is_empty() {
            if segment.relation == Relation::Child {
                return Err(SelectorError::invalid(selector, cursor, "'>' must be followed by a selector"));
            }
            break;
        }
        axis = match segment.relation {
            Relation::Child => Axis::Child,
            Relation::Descendant => Axis::Descendant,
        };
    }
    Ok(LocationPath { steps })
}

/// Compile one selector branch, starting with `prefix` (`//` or `/` for CSS).
///
/// ```
/// use csspath_selector::{css_to_xpath, ir::Axis};
///
/// assert_eq!(css_to_xpath("div > span", Axis::Descendant).unwrap(), "//div/span");
/// assert_eq!(css_to_xpath("div span", Axis::Descendant).unwrap(), "//div//span");
/// ```
pub fn css_to_xpath(selector: &str, prefix: Axis) -> SelectorResult<String> {
    build_path(selector, prefix).map(|path| path.to_string())
}

fn predicates(selector: &str, segment: &SelectorSegment) -> SelectorResult<Vec<Predicate>> {
    let mut out = Vec::new();
    if let Some(id) = &segment.id {
        out.push(Predicate::Id { id: id.clone() });
    }
    if let Some(attributes) = &segment.attributes {
        out.extend(attributes.iter().map(|(name, value)| Predicate::Attribute {
            name: name.to_string(),
            value: value.map(str::to_string),
        }));
    }
    if let Some(classes) = &segment.classes {
        out.extend(classes.iter().map(|class| Predicate::Class { class: class.clone() }));
    }
    if let Some(pseudo) = &segment.pseudo {
        let expr = pseudo_position(&pseudo.name, pseudo.expr.as_deref()).map_err(|e| match e {
            SelectorError::InvalidSelector { reason, .. } => {
                SelectorError::invalid(selector, segment.span.start, reason)
            }
            other => other,
        })?;
        out.push(Predicate::Position { expr });
    }
    Ok(out)
}

/// Split a selector list on commas that are not nested in `[]`, `()` or quotes.
///
/// Each branch is returned trimmed together with its byte offset.
pub fn split_selector_list(expression: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in expression.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                out.push(trimmed_branch(expression, start, i));
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(trimmed_branch(expression, start, expression.len()));
    out
}

fn trimmed_branch(expression: &str, start: usize, end: usize) -> (usize, &str) {
    let raw = &expression[start..end];
    let lead = raw.len() - raw.trim_start().len();
    (start + lead, raw.trim())
}

/// Compiles selectors and keeps the per-branch results in an owned cache.
#[derive(Debug, Clone, Default)]
pub struct XPathCompiler {
    cache: CompilationCache,
}

impl XPathCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: CompilationCache) -> Self {
        Self { cache }
    }

    /// Compile `expression` into one XPath string.
    ///
    /// XPath input is returned unchanged. CSS selector lists are compiled per
    /// branch and joined with the union operator `|`, preserving branch order.
    pub fn compile(&mut self, expression: &str, ty: ExpressionType) -> SelectorResult<String> {
        match ty {
            ExpressionType::XPath => Ok(expression.to_string()),
            ExpressionType::Css => {
                let branches = self.compile_branches(expression)?;
                Ok(branches.join("|"))
            }
        }
    }

    /// Like [`compile`](Self::compile), but CSS branches are anchored at the
    /// context node (`.//…`) instead of the document root.
    pub fn compile_relative(&mut self, expression: &str, ty: ExpressionType) -> SelectorResult<String> {
        match ty {
            ExpressionType::XPath => Ok(expression.to_string()),
            ExpressionType::Css => {
                let branches = self.compile_branches(expression)?;
                Ok(branches.iter().map(|b| format!(".{b}")).collect::<Vec<_>>().join("|"))
            }
        }
    }

    fn compile_branches(&mut self, expression: &str) -> SelectorResult<Vec<String>> {
        split_selector_list(expression)
            .into_iter()
            .map(|(offset, branch)| {
                self.compile_branch(branch).map_err(|e| rebase(e, expression, offset))
            })
            .collect()
    }

    fn compile_branch(&mut self, branch: &str) -> SelectorResult<String> {
        if let Some(xpath) = self.cache.lookup(branch) {
            tracing::trace!(branch, xpath, "compiled selector cache hit");
            return Ok(xpath.to_string());
        }
        let xpath = css_to_xpath(branch, Axis::Descendant)?;
        tracing::debug!(branch, xpath = %xpath, "compiled selector");
        self.cache.insert(branch, xpath.clone());
        Ok(xpath)
    }

    pub fn cache(&self) -> &CompilationCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut CompilationCache {
        &mut self.cache
    }

    /// Current branch → XPath mapping.
    pub fn compiled_cache(&self) -> &HashMap<String, String> {
        self.cache.entries()
    }

    /// Replace the whole mapping, e.g. to reset state between tests.
    pub fn set_compiled_cache(&mut self, entries: HashMap<String, String>) {
        self.cache.replace(entries);
    }

    /// Replace the mapping from persisted JSON; see [`CompilationCache::from_json`].
    pub fn set_compiled_cache_json(&mut self, value: &serde_json::Value) -> SelectorResult<()> {
        self.cache = CompilationCache::from_json(value)?;
        Ok(())
    }
}

fn rebase(error: SelectorError, expression: &str, shift: usize) -> SelectorError {
    match error {
        SelectorError::InvalidSelector { offset, reason, .. } => {
            SelectorError::invalid(expression, offset + shift, reason)
        }
        other => other,
    }
}
