//! Decomposition of a single CSS selector segment.
//!
//! A segment is everything that describes one element: `tag#id.class[attr]:pseudo`
//! plus an optional trailing `>` that makes the *next* segment a direct child.
//! The whole segment is recognised with one composite pattern anchored at the
//! current cursor position; whatever follows the match is left to the caller.
//!
//! ```
//! use csspath_selector::segment::{Relation, SelectorParser};
//!
//! let seg = SelectorParser::get_segments("ul.menu > li").unwrap();
//! assert_eq!(seg.tag, "ul");
//! assert_eq!(seg.classes.as_deref(), Some(&["menu".to_string()][..]));
//! assert_eq!(seg.relation, Relation::Child);
//! assert_eq!(seg.matched_text, "ul.menu >");
//! ```
use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

use fancy_regex::Regex;
use serde::ser::{Serialize, Serializer};

use crate::error::{SelectorError, SelectorResult};

const SEGMENT_PATTERN: &str = concat!(
    r"^(?P<tag>[\w\-*]+)?",
    r"(?P<id>#[\w\-]+)?",
    r"(?P<classes>(?:\.[\w\-.]+)*)",
    r"(?P<attrs>(?:\[[^\]]*\])*)",
    r"(?::(?P<pseudo>[\w\-]+)(?:\((?P<expr>(?:[^()]|\([^()]*\))*)\))?)?",
    r"(?P<rel>\s*>)?",
);

static SEGMENT_RE: OnceLock<Regex> = OnceLock::new();

fn segment_re() -> &'static Regex {
    SEGMENT_RE.get_or_init(|| Regex::new(SEGMENT_PATTERN).expect("segment pattern is valid"))
}

/// How a segment relates to the one before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    #[default]
    Descendant,
    Child,
}

impl Relation {
    /// Path separator used in front of the step that follows this relation.
    pub fn separator(self) -> &'static str {
        match self {
            Relation::Descendant => "//",
            Relation::Child => "/",
        }
    }
}

/// A pseudo-class exactly as written (`:nth-child(2n+1)` → name `nth-child`, expr `2n+1`).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Pseudo {
    pub name: String,
    pub expr: Option<String>,
}

/// Attribute predicates in source order. A `None` value means "present with any value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap(Vec<(String, Option<String>)>);

impl AttributeMap {
    /// Inserts or replaces; a replaced entry keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// `None` if the attribute is not mentioned, `Some(None)` for presence-only.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Option<String>)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (N, Option<String>)>>(iter: I) -> Self {
        let mut map = AttributeMap::default();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl Serialize for AttributeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(n, v)| (n, v)))
    }
}

/// Parsed form of one selector segment.
///
/// `classes` and `attributes` are `None` when the selector does not mention
/// them at all, so callers must distinguish "absent" from "empty".
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SelectorSegment {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Option<Vec<String>>,
    pub attributes: Option<AttributeMap>,
    pub pseudo: Option<Pseudo>,
    pub relation: Relation,
    /// Source text consumed by this segment, including a trailing `>`.
    pub matched_text: String,
    /// Byte range of `matched_text` in the string handed to the parser.
    pub span: Range<usize>,
}

impl fmt::Display for SelectorSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.matched_text)
    }
}

pub struct SelectorParser;

impl SelectorParser {
    /// Parse the leading segment of `selector` (leading and trailing whitespace ignored).
    pub fn get_segments(selector: &str) -> SelectorResult<SelectorSegment> {
        Self::get_segments_at(selector, 0)
    }

    /// Parse the segment that starts at byte `offset` of `selector`.
    ///
    /// Whitespace at the cursor is skipped. The returned span is relative to the
    /// whole `selector`, so a caller can continue from `span.end`.
    pub fn get_segments_at(selector: &str, offset: usize) -> SelectorResult<SelectorSegment> {
        let Some(rest) = selector.get(offset..) else {
            return Err(SelectorError::invalid(selector, offset, "cursor is outside the selector"));
        };
        let start = offset + (rest.len() - rest.trim_start().len());
        let input = rest.trim();
        if input.is_empty() {
            return Err(SelectorError::invalid(selector, start, "empty selector"));
        }

        let caps = segment_re()
            .captures(input)
            .map_err(|e| SelectorError::invalid(selector, start, format!("pattern failure: {e}")))?;
        let Some(caps) = caps.filter(|c| c.get(0).is_some_and(|m| m.end() > 0)) else {
            let near = input.chars().next().unwrap_or_default();
            return Err(SelectorError::invalid(selector, start, format!("unexpected {near:?}")));
        };
        let described = ["tag", "id", "classes", "attrs", "pseudo"]
            .iter()
            .any(|group| caps.name(group).is_some_and(|m| !m.as_str().is_empty()));
        if !described {
            return Err(SelectorError::invalid(selector, start, "'>' must follow a selector"));
        }
        let whole = caps.get(0).map_or(0..0, |m| m.start()..m.end());

        let tag = caps.name("tag").map_or_else(|| "*".to_string(), |m| m.as_str().to_string());
        let id = caps.name("id").map(|m| m.as_str().trim_start_matches('#').to_string());

        let classes = caps
            .name("classes")
            .map(|m| {
                m.as_str().split('.').filter(|c| !c.is_empty()).map(str::to_string).collect::<Vec<_>>()
            })
            .filter(|list| !list.is_empty());

        let attributes = match caps.name("attrs").filter(|m| !m.as_str().is_empty()) {
            Some(m) => Some(parse_attributes(selector, m.as_str(), start + m.start())?),
            None => None,
        };

        let pseudo = caps.name("pseudo").map(|m| Pseudo {
            name: m.as_str().to_ascii_lowercase(),
            expr: caps.name("expr").map(|e| e.as_str().trim().to_string()),
        });

        let relation = if caps.name("rel").is_some() { Relation::Child } else { Relation::Descendant };

        let segment = SelectorSegment {
            tag,
            id,
            classes,
            attributes,
            pseudo,
            relation,
            matched_text: input[whole.clone()].to_string(),
            span: (start + whole.start)..(start + whole.end),
        };
        tracing::trace!(selector, offset = start, segment = %segment, "parsed selector segment");
        Ok(segment)
    }
}

/// Convenience wrapper around [`SelectorParser::get_segments`].
pub fn get_segments(selector: &str) -> SelectorResult<SelectorSegment> {
    SelectorParser::get_segments(selector)
}

fn parse_attributes(selector: &str, raw: &str, offset: usize) -> SelectorResult<AttributeMap> {
    let inner = raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')).unwrap_or(raw);
    let mut map = AttributeMap::default();
    for part in inner.split("][") {
        let (name, value) = match part.split_once('=') {
            Some((name, value)) => (name.trim(), Some(unquote(value.trim()).to_string())),
            None => (part.trim(), None),
        };
        if !is_attribute_name(name) {
            return Err(SelectorError::invalid(
                selector,
                offset,
                format!("unsupported attribute expression [{part}]"),
            ));
        }
        map.insert(name, value);
    }
    Ok(map)
}

fn is_attribute_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ':'))
}

fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
