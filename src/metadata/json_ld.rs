//! JSON-LD Metadata Parsing
//!
//! Extracts article metadata from Schema.org JSON-LD blocks embedded in
//! `<script type="application/ld+json">`. Runs before script removal, since
//! that pass would destroy the payloads. Malformed JSON is logged and the
//! block skipped.

use dom_query::{Document, Selection};
use serde_json::Value;

use crate::options::Options;
use crate::patterns::{CDATA_WRAPPER, JSONLD_ARTICLE_TYPES, SCHEMA_ORG_CONTEXT};
use crate::text::text_similarity;

/// Fields recoverable from a JSON-LD article object.
#[derive(Debug, Clone, Default)]
pub(crate) struct JsonLd {
    pub title: Option<String>,
    pub byline: Option<String>,
    pub excerpt: Option<String>,
    pub site_name: Option<String>,
    pub date_published: Option<String>,
}

/// Scan the document's JSON-LD scripts and return the first Article-family
/// block's fields. `article_title` is the heuristic HTML title, used to
/// arbitrate between `name` and `headline`.
pub(crate) fn extract_json_ld(doc: &Document, options: &Options, article_title: &str) -> JsonLd {
    for script in doc.select(r#"script[type="application/ld+json"]"#).nodes() {
        let raw = Selection::from(script.clone()).text().to_string();
        let content = CDATA_WRAPPER.replace_all(&raw, "");

        let parsed: Value = match serde_json::from_str(&content) {
            Ok(v) => v,
            Err(err) => {
                if options.debug {
                    log::debug!("skipping malformed JSON-LD block: {err}");
                }
                continue;
            }
        };

        // The block must declare a schema.org context.
        let Some(context) = parsed.get("@context").and_then(Value::as_str) else {
            continue;
        };
        if !SCHEMA_ORG_CONTEXT.is_match(context.trim()) {
            continue;
        }

        // An untyped wrapper may carry the article inside @graph.
        let parsed = if parsed.get("@type").is_none() {
            match parsed.get("@graph").and_then(Value::as_array).and_then(|graph| {
                graph
                    .iter()
                    .find(|it| {
                        it.get("@type")
                            .and_then(Value::as_str)
                            .is_some_and(|t| JSONLD_ARTICLE_TYPES.is_match(t))
                    })
                    .cloned()
            }) {
                Some(entry) => entry,
                None => continue,
            }
        } else {
            parsed
        };

        let Some(article_type) = parsed.get("@type").and_then(Value::as_str) else {
            continue;
        };
        if !JSONLD_ARTICLE_TYPES.is_match(article_type) {
            continue;
        }

        return read_article_fields(&parsed, article_title);
    }

    JsonLd::default()
}

fn read_article_fields(parsed: &Value, article_title: &str) -> JsonLd {
    let mut metadata = JsonLd::default();

    let name = parsed.get("name").and_then(Value::as_str);
    let headline = parsed.get("headline").and_then(Value::as_str);
    metadata.title = match (name, headline) {
        (Some(name), Some(headline)) if name != headline => {
            // Both present and different: prefer whichever resembles the
            // page title, with name winning ties.
            let name_matches = text_similarity(article_title, name) > 0.75;
            let headline_matches = text_similarity(article_title, headline) > 0.75;
            if headline_matches && !name_matches {
                Some(headline.trim().to_string())
            } else {
                Some(name.trim().to_string())
            }
        }
        (Some(name), _) => Some(name.trim().to_string()),
        (None, Some(headline)) => Some(headline.trim().to_string()),
        (None, None) => None,
    };

    if let Some(author) = parsed.get("author") {
        if let Some(name) = author.get("name").and_then(Value::as_str) {
            metadata.byline = Some(name.trim().to_string());
        } else if let Some(authors) = author.as_array() {
            let names: Vec<String> = authors
                .iter()
                .filter_map(|a| a.get("name").and_then(Value::as_str))
                .map(|n| n.trim().to_string())
                .collect();
            if !names.is_empty() {
                metadata.byline = Some(names.join(", "));
            }
        }
    }

    if let Some(description) = parsed.get("description").and_then(Value::as_str) {
        metadata.excerpt = Some(description.trim().to_string());
    }
    if let Some(publisher) = parsed.get("publisher") {
        if let Some(name) = publisher.get("name").and_then(Value::as_str) {
            metadata.site_name = Some(name.trim().to_string());
        }
    }
    if let Some(date) = parsed.get("datePublished").and_then(Value::as_str) {
        metadata.date_published = Some(date.trim().to_string());
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> JsonLd {
        let doc = Document::from(html);
        extract_json_ld(&doc, &Options::default(), "")
    }

    #[test]
    fn test_simple_article() {
        let metadata = parse(
            r#"<html><head><script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@type": "Article",
                "name": "Test Article",
                "description": "A description.",
                "datePublished": "2024-01-15T10:30:00Z",
                "author": {"@type": "Person", "name": "John Doe"},
                "publisher": {"@type": "Organization", "name": "Example Press"}
            }
            </script></head><body></body></html>"#,
        );

        assert_eq!(metadata.title.as_deref(), Some("Test Article"));
        assert_eq!(metadata.byline.as_deref(), Some("John Doe"));
        assert_eq!(metadata.excerpt.as_deref(), Some("A description."));
        assert_eq!(metadata.site_name.as_deref(), Some("Example Press"));
        assert_eq!(metadata.date_published.as_deref(), Some("2024-01-15T10:30:00Z"));
    }

    #[test]
    fn test_requires_schema_org_context() {
        let metadata = parse(
            r#"<script type="application/ld+json">
            {"@context": "https://example.com", "@type": "Article", "name": "Nope"}
            </script>"#,
        );
        assert!(metadata.title.is_none());
    }

    #[test]
    fn test_rejects_non_article_types() {
        let metadata = parse(
            r#"<script type="application/ld+json">
            {"@context": "https://schema.org", "@type": "Organization", "name": "Nope"}
            </script>"#,
        );
        assert!(metadata.title.is_none());
    }

    #[test]
    fn test_graph_array() {
        let metadata = parse(
            r#"<script type="application/ld+json">
            {
                "@context": "http://schema.org/",
                "@graph": [
                    {"@type": "WebSite", "name": "Example Site"},
                    {"@type": "NewsArticle", "headline": "Breaking News"}
                ]
            }
            </script>"#,
        );
        assert_eq!(metadata.title.as_deref(), Some("Breaking News"));
    }

    #[test]
    fn test_author_array_joined() {
        let metadata = parse(
            r#"<script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@type": "Article",
                "name": "X",
                "author": [{"name": "Jane"}, {"name": "Joe"}, {"noname": true}]
            }
            </script>"#,
        );
        assert_eq!(metadata.byline.as_deref(), Some("Jane, Joe"));
    }

    #[test]
    fn test_title_similarity_prefers_name() {
        let doc = Document::from(
            r#"<script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@type": "NewsArticle",
                "name": "X",
                "headline": "Site — X"
            }
            </script>"#,
        );
        let metadata = extract_json_ld(&doc, &Options::default(), "X — Site");
        assert_eq!(metadata.title.as_deref(), Some("X"));
    }

    #[test]
    fn test_headline_wins_when_only_it_matches() {
        let doc = Document::from(
            r#"<script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@type": "NewsArticle",
                "name": "Promo blurb",
                "headline": "The Actual Story"
            }
            </script>"#,
        );
        let metadata = extract_json_ld(&doc, &Options::default(), "The Actual Story");
        assert_eq!(metadata.title.as_deref(), Some("The Actual Story"));
    }

    #[test]
    fn test_invalid_json_skipped() {
        let metadata = parse(
            r#"<script type="application/ld+json">{ not json }</script>
            <script type="application/ld+json">
            {"@context": "https://schema.org", "@type": "Article", "name": "Valid"}
            </script>"#,
        );
        assert_eq!(metadata.title.as_deref(), Some("Valid"));
    }

    #[test]
    fn test_cdata_wrapper_stripped() {
        let metadata = parse(
            r#"<script type="application/ld+json"><![CDATA[
            {"@context": "https://schema.org", "@type": "Article", "name": "Wrapped"}
            ]]></script>"#,
        );
        assert_eq!(metadata.title.as_deref(), Some("Wrapped"));
    }
}
