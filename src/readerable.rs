//! Quick readerability probe.
//!
//! Answers "does this page look like an article?" without running the full
//! extraction pipeline, by accumulating a score over sufficiently long,
//! visible paragraph-like nodes.

use std::collections::HashSet;

use crate::dom::{is_probably_visible, match_string, Document, NodeId, NodeRef, Selection};
use crate::patterns::{OK_MAYBE_ITS_A_CANDIDATE, UNLIKELY_CANDIDATES};

/// Thresholds for [`is_probably_readerable`].
#[derive(Debug, Clone)]
pub struct ReaderableOptions {
    /// Score to accumulate before answering yes.
    ///
    /// Default: `20.0`
    pub min_score: f64,

    /// Minimum text length for a node to contribute.
    ///
    /// Default: `140`
    pub min_content_length: usize,
}

impl Default for ReaderableOptions {
    fn default() -> Self {
        Self { min_score: 20.0, min_content_length: 140 }
    }
}

/// Decide whether a page is worth sending through extraction. Considers
/// `<p>`, `<pre>` and `<article>` nodes plus divs with `<br>` children,
/// skipping invisible and boilerplate-looking ones; each contributor adds
/// the square root of its text length beyond the minimum.
#[must_use]
pub fn is_probably_readerable(html: &str, options: &ReaderableOptions) -> bool {
    let doc = Document::from(html);

    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut nodes: Vec<NodeRef> = Vec::new();
    for node in doc.select("p, pre, article").nodes() {
        if seen.insert(node.id) {
            nodes.push(node.clone());
        }
    }
    for br in doc.select("div > br").nodes() {
        if let Some(parent) = br.parent() {
            if seen.insert(parent.id) {
                nodes.push(parent);
            }
        }
    }

    let mut score = 0.0;
    for node in nodes {
        if !is_probably_visible(&node) {
            continue;
        }

        let match_string = match_string(&node);
        if UNLIKELY_CANDIDATES.is_match(&match_string)
            && !OK_MAYBE_ITS_A_CANDIDATE.is_match(&match_string)
        {
            continue;
        }
        if Selection::from(node.clone()).is("li p") {
            continue;
        }

        let text_length = node.text().trim().chars().count();
        if text_length < options.min_content_length {
            continue;
        }

        score += ((text_length - options.min_content_length) as f64).sqrt();
        if score > options.min_score {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_PARAGRAPH: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, \
        sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim \
        veniam, quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo \
        consequat. Duis aute irure dolor in reprehenderit in voluptate velit esse cillum.";

    #[test]
    fn test_article_page_is_readerable() {
        let html = format!(
            "<html><body><article><p>{LONG_PARAGRAPH}</p><p>{LONG_PARAGRAPH}</p></article></body></html>"
        );
        assert!(is_probably_readerable(&html, &ReaderableOptions::default()));
    }

    #[test]
    fn test_navigation_page_is_not_readerable() {
        let html = "<html><body><nav><a href=\"/\">Home</a><a href=\"/about\">About</a></nav></body></html>";
        assert!(!is_probably_readerable(html, &ReaderableOptions::default()));
    }

    #[test]
    fn test_boilerplate_containers_ignored() {
        let html = format!(
            "<html><body><div class=\"sidebar\"><p>{LONG_PARAGRAPH}</p><p>{LONG_PARAGRAPH}</p></div></body></html>"
        );
        // The paragraphs themselves have no suspicious class, so they count
        assert!(is_probably_readerable(&html, &ReaderableOptions::default()));

        let hidden = format!(
            "<html><body><p class=\"comment\">{LONG_PARAGRAPH}</p><p class=\"comment\">{LONG_PARAGRAPH}</p></body></html>"
        );
        assert!(!is_probably_readerable(&hidden, &ReaderableOptions::default()));
    }

    #[test]
    fn test_invisible_content_ignored() {
        let html = format!(
            "<html><body><p style=\"display: none\">{LONG_PARAGRAPH}</p><p hidden>{LONG_PARAGRAPH}</p></body></html>"
        );
        assert!(!is_probably_readerable(&html, &ReaderableOptions::default()));
    }

    #[test]
    fn test_thresholds_are_tunable() {
        let html = format!("<html><body><p>{LONG_PARAGRAPH}</p></body></html>");
        let strict = ReaderableOptions { min_score: 1000.0, ..ReaderableOptions::default() };
        assert!(!is_probably_readerable(&html, &strict));

        let lenient = ReaderableOptions { min_score: 1.0, min_content_length: 50 };
        assert!(is_probably_readerable(&html, &lenient));
    }
}
