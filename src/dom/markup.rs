//! Regex helpers over fragment markup.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a\s*>").expect("anchor pattern"));
// Double-quoted, single-quoted or bare attribute values.
static HREF_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#).expect("href pattern")
});
static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#).expect("class pattern")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("ws pattern"));

/// An anchor found in markup: href, visible text and class tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
    pub classes: BTreeSet<String>,
}

/// Every `<a href=...>` in document order, whatever the quoting. Anchors
/// without href are skipped.
pub fn anchors(markup: &str) -> Vec<Anchor> {
    ANCHOR
        .captures_iter(markup)
        .filter_map(|caps| {
            let attributes = caps.get(1).map_or("", |m| m.as_str());
            let href = attribute_value(&HREF_ATTR, attributes)?.to_string();
            let classes = attribute_value(&CLASS_ATTR, attributes)
                .map(class_tokens)
                .unwrap_or_default();
            let text = text_content(caps.get(2).map_or("", |m| m.as_str()));
            Some(Anchor { href, text, classes })
        })
        .collect()
}

/// Number of elements carrying `class` among their class tokens.
pub fn count_class(markup: &str, class: &str) -> usize {
    CLASS_ATTR
        .captures_iter(markup)
        .filter(|caps| {
            quoted_or_bare(caps)
                .is_some_and(|value| value.split_whitespace().any(|token| token == class))
        })
        .count()
}

/// Visible text with tags removed and whitespace collapsed.
pub fn text_content(markup: &str) -> String {
    let stripped = TAG.replace_all(markup, " ");
    WHITESPACE.replace_all(stripped.trim(), " ").into_owned()
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn is_blank(markup: &str) -> bool {
    markup.trim().is_empty()
}

fn attribute_value<'a>(pattern: &Regex, attributes: &'a str) -> Option<&'a str> {
    let caps = pattern.captures(attributes)?;
    quoted_or_bare(&caps)
}

fn quoted_or_bare<'a>(caps: &regex::Captures<'a>) -> Option<&'a str> {
    (1..=3).find_map(|group| caps.get(group)).map(|m| m.as_str())
}

fn class_tokens(value: &str) -> BTreeSet<String> {
    value.split_whitespace().map(str::to_string).collect()
}
