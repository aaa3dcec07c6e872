//! Metadata extraction module.
//!
//! Combines three sources into the article's metadata fields: JSON-LD
//! blocks, `<meta>` tags, and the `<title>` heuristic. JSON-LD wins, then
//! the Dublin Core / Open Graph / Weibo / Twitter / Parsely fallback chain,
//! then the title element itself.

pub(crate) mod json_ld;
pub(crate) mod meta_tags;

use dom_query::Document;

use crate::options::Options;
use crate::patterns::{
    TITLE_CUT_LEADING, TITLE_CUT_TRAILING, TITLE_HIERARCHICAL_SEPARATORS, TITLE_SEPARATOR,
    TITLE_SEPARATOR_CHARS,
};
use crate::text::{inner_text, normalize_spaces, unescape_html_entities, word_count};

/// Metadata gathered before content extraction begins.
#[derive(Debug, Clone, Default)]
pub(crate) struct Metadata {
    pub title: Option<String>,
    pub byline: Option<String>,
    pub excerpt: Option<String>,
    pub site_name: Option<String>,
    pub published_time: Option<String>,
}

/// Derive the most plausible article title from the `<title>` element,
/// peeling off site names around `|`, `-`, `/`, `>`, `»` or `: ` separators
/// and falling back to a lone `<h1>` for degenerate lengths.
pub(crate) fn article_title(doc: &Document) -> String {
    let orig_title = doc
        .select("title")
        .nodes()
        .first()
        .map(|n| inner_text(n, true))
        .unwrap_or_default();
    let mut cur_title = orig_title.clone();
    let mut had_hierarchical_separators = false;

    if TITLE_SEPARATOR.is_match(&cur_title) {
        had_hierarchical_separators = TITLE_HIERARCHICAL_SEPARATORS.is_match(&cur_title);
        cur_title = TITLE_CUT_TRAILING.replace(&orig_title, "$1").to_string();

        if word_count(&cur_title) < 3 {
            cur_title = TITLE_CUT_LEADING.replace(&orig_title, "$1").to_string();
        }
    } else if cur_title.contains(": ") {
        let heading_matches = doc
            .select("h1, h2")
            .nodes()
            .iter()
            .any(|h| inner_text(h, false) == cur_title.trim());

        if !heading_matches {
            if let Some(idx) = orig_title.rfind(':') {
                cur_title = orig_title[idx + 1..].to_string();

                if word_count(&cur_title) < 3 {
                    if let Some(first) = orig_title.find(':') {
                        cur_title = orig_title[first + 1..].to_string();
                    }
                } else if orig_title
                    .find(':')
                    .is_some_and(|first| word_count(&orig_title[..first]) > 5)
                {
                    cur_title = orig_title.clone();
                }
            }
        }
    } else if cur_title.chars().count() > 150 || cur_title.chars().count() < 15 {
        let h_ones = doc.select("h1");
        if h_ones.length() == 1 {
            if let Some(h) = h_ones.nodes().first() {
                cur_title = inner_text(h, true);
            }
        }
    }

    cur_title = normalize_spaces(&cur_title);

    // A short reduction is only trusted when the separator clearly carried a
    // site name; otherwise the original title stands.
    let cur_word_count = word_count(&cur_title);
    if cur_word_count <= 4
        && (!had_hierarchical_separators
            || cur_word_count
                != word_count(&TITLE_SEPARATOR_CHARS.replace_all(&orig_title, "")) - 1)
    {
        cur_title = orig_title;
    }

    cur_title
}

/// Assemble title, byline, excerpt, site name and published time from
/// JSON-LD and `<meta>` tags, with the title heuristic as the last resort.
pub(crate) fn get_article_metadata(doc: &Document, options: &Options) -> Metadata {
    let heuristic_title = article_title(doc);

    let jsonld = if options.disable_json_ld {
        json_ld::JsonLd::default()
    } else {
        json_ld::extract_json_ld(doc, options, &heuristic_title)
    };

    let values = meta_tags::collect_meta_values(doc);
    let pick = |keys: &[&str]| -> Option<String> {
        keys.iter().find_map(|key| values.get(*key).cloned())
    };

    let mut title = jsonld.title.or_else(|| {
        pick(&[
            "dc:title",
            "dcterm:title",
            "og:title",
            "weibo:article:title",
            "weibo:webpage:title",
            "title",
            "twitter:title",
            "parsely-title",
        ])
    });
    if title.is_none() && !heuristic_title.is_empty() {
        title = Some(heuristic_title);
    }

    let byline = jsonld
        .byline
        .or_else(|| pick(&["dc:creator", "dcterm:creator", "author", "parsely-author"]));

    let excerpt = jsonld.excerpt.or_else(|| {
        pick(&[
            "dc:description",
            "dcterm:description",
            "og:description",
            "weibo:article:description",
            "weibo:webpage:description",
            "description",
            "twitter:description",
        ])
    });

    let site_name = jsonld.site_name.or_else(|| pick(&["og:site_name"]));

    let published_time = jsonld
        .date_published
        .or_else(|| pick(&["article:published_time", "parsely-pub-date"]));

    let clean = |value: Option<String>| -> Option<String> {
        value
            .map(|v| unescape_html_entities(&v))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    Metadata {
        title: clean(title),
        byline: clean(byline),
        excerpt: clean(excerpt),
        site_name: clean(site_name),
        published_time: clean(published_time),
    }
}
