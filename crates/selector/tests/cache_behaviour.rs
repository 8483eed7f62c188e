use std::collections::HashMap;

use csspath_selector::{CompilationCache, ExpressionType, SelectorError, XPathCompiler};
use rstest::rstest;
use serde_json::json;

#[rstest]
fn repeated_compilation_is_served_from_cache() {
    let mut compiler = XPathCompiler::new();
    let first = compiler.compile(".post h2", ExpressionType::Css).unwrap();
    let second = compiler.compile(".post h2", ExpressionType::Css).unwrap();
    assert_eq!(first, second);
    let stats = compiler.cache().stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));
}

#[rstest]
fn cache_key_is_the_trimmed_branch() {
    let mut compiler = XPathCompiler::new();
    compiler.compile("  div  ,p", ExpressionType::Css).unwrap();
    let mut keys: Vec<_> = compiler.compiled_cache().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, vec!["div".to_string(), "p".to_string()]);
}

#[rstest]
fn replaced_cache_entries_are_used_verbatim() {
    let mut compiler = XPathCompiler::new();
    let original = compiler.compile("div", ExpressionType::Css).unwrap();

    compiler.set_compiled_cache(HashMap::from([("div".to_string(), "//corrupted".to_string())]));
    assert_eq!(compiler.compile("div", ExpressionType::Css).unwrap(), "//corrupted");

    compiler.set_compiled_cache(HashMap::new());
    assert_eq!(compiler.compile("div", ExpressionType::Css).unwrap(), original);
}

#[rstest]
fn union_mixes_cached_and_fresh_branches() {
    let mut compiler = XPathCompiler::new();
    compiler.compile("a", ExpressionType::Css).unwrap();
    let xpath = compiler.compile("a, b", ExpressionType::Css).unwrap();
    assert_eq!(xpath, "//a|//b");
    assert_eq!(compiler.cache().stats().hits, 1);
}

#[rstest]
fn injected_cache_is_consulted() {
    let mut cache = CompilationCache::new();
    cache.insert("nav", "//nav[@role='navigation']");
    let mut compiler = XPathCompiler::with_cache(cache);
    assert_eq!(compiler.compile("nav", ExpressionType::Css).unwrap(), "//nav[@role='navigation']");
}

#[rstest]
fn persisted_cache_can_be_restored() {
    let mut compiler = XPathCompiler::new();
    compiler.compile("li:last-child", ExpressionType::Css).unwrap();
    let persisted = compiler.cache().to_json();

    let mut restored = XPathCompiler::new();
    restored.set_compiled_cache_json(&persisted).unwrap();
    assert_eq!(restored.compiled_cache().get("li:last-child").map(String::as_str), Some("//li[last()]"));
}

#[rstest]
fn non_mapping_persisted_cache_is_rejected() {
    let mut compiler = XPathCompiler::new();
    let err = compiler.set_compiled_cache_json(&json!(["//a"])).unwrap_err();
    assert!(matches!(err, SelectorError::InvalidArgument(_)));
}
