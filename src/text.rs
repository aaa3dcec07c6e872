//! Text measurement utilities.
//!
//! Inner-text normalization, word counting, link density, token-based text
//! similarity, byline validation and HTML entity unescaping. These feed the
//! scoring and cleaning passes.

use crate::dom::{attr, NodeRef, Selection};
use crate::patterns::{
    HASH_URL, HTML_NAMED_ENTITY, HTML_NUMERIC_ENTITY, NORMALIZE, TOKENIZE,
};

/// Concatenated descendant text, trimmed. With `normalize`, interior runs
/// of two or more whitespace characters collapse to a single space.
#[must_use]
pub fn inner_text(node: &NodeRef, normalize: bool) -> String {
    let text = node.text();
    let trimmed = text.trim();
    if normalize {
        NORMALIZE.replace_all(trimmed, " ").to_string()
    } else {
        trimmed.to_string()
    }
}

/// Collapse whitespace runs and trim.
#[must_use]
pub fn normalize_spaces(text: &str) -> String {
    NORMALIZE.replace_all(text.trim(), " ").to_string()
}

/// Number of whitespace-separated words.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Fraction of an element's text that sits inside anchors. Anchors whose
/// `href` is a fragment reference count 0.3x; an element without text has
/// density 0.
#[must_use]
pub fn link_density(node: &NodeRef) -> f64 {
    let text_length = inner_text(node, true).chars().count();
    if text_length == 0 {
        return 0.0;
    }

    let mut link_length = 0.0;
    for link in Selection::from(node.clone()).select("a").nodes() {
        let href = attr(link, "href").unwrap_or_default();
        let coefficient = if HASH_URL.is_match(&href) { 0.3 } else { 1.0 };
        link_length += inner_text(link, true).chars().count() as f64 * coefficient;
    }

    link_length / text_length as f64
}

/// Token-overlap similarity: 1 minus the share of `b`'s tokens (by joined
/// length) that never occur in `a`. Case-folded, split on non-word runs.
#[must_use]
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let tokens_a: Vec<String> = TOKENIZE
        .split(&a.to_lowercase())
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect();
    let tokens_b: Vec<String> = TOKENIZE
        .split(&b.to_lowercase())
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let uniq_b: Vec<&str> = tokens_b
        .iter()
        .filter(|t| !tokens_a.contains(t))
        .map(String::as_str)
        .collect();

    let distance = uniq_b.join(" ").chars().count() as f64
        / tokens_b.join(" ").chars().count() as f64;
    1.0 - distance
}

/// Plausible author line: non-empty and under 100 characters once trimmed.
#[must_use]
pub fn is_valid_byline(text: &str) -> bool {
    let len = text.trim().chars().count();
    len > 0 && len < 100
}

/// Resolve numeric and basic named character references. Out-of-range or
/// surrogate code points become U+FFFD.
#[must_use]
pub fn unescape_html_entities(text: &str) -> String {
    let named = HTML_NAMED_ENTITY.replace_all(text, |caps: &regex::Captures| {
        match &caps[1] {
            "quot" => "\"",
            "amp" => "&",
            "apos" => "'",
            "lt" => "<",
            "gt" => ">",
            _ => "",
        }
        .to_string()
    });

    HTML_NUMERIC_ENTITY
        .replace_all(&named, |caps: &regex::Captures| {
            let value = caps.get(1).map_or_else(
                || u32::from_str_radix(&caps[2], 10),
                |hex| u32::from_str_radix(hex.as_str(), 16),
            );
            let code = match value {
                Ok(n) if n != 0 && n <= 0x0010_FFFF && !(0xD800..=0xDFFF).contains(&n) => n,
                _ => 0xFFFD,
            };
            char::from_u32(code).unwrap_or('\u{FFFD}').to_string()
        })
        .to_string()
}
