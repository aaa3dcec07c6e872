//! HTML Meta Tag Extraction
//!
//! Scans `<meta>` elements for the property/name vocabularies used by
//! Open Graph, Twitter cards, Dublin Core, Parsely and Weibo, and builds a
//! normalized key/value map the fallback chains read from.

use std::collections::HashMap;

use dom_query::{Document, Selection};

use crate::patterns::{META_NAME, META_PROPERTY};

/// Collect recognized meta values, keyed by normalized name: lowercased,
/// whitespace removed, dots converted to colons (`DC.title` → `dc:title`).
pub(crate) fn collect_meta_values(doc: &Document) -> HashMap<String, String> {
    let mut values = HashMap::new();

    for node in doc.select("meta").nodes() {
        let meta = Selection::from(node.clone());
        let name = meta.attr("name").map(|v| v.to_string());
        let property = meta.attr("property").map(|v| v.to_string());
        let Some(content) = meta.attr("content").map(|v| v.to_string()) else {
            continue;
        };
        if content.is_empty() {
            continue;
        }

        let mut matched = false;
        if let Some(property) = property {
            if let Some(m) = META_PROPERTY.find(&property) {
                matched = true;
                let key: String =
                    m.as_str().to_lowercase().chars().filter(|c| !c.is_whitespace()).collect();
                values.insert(key, content.trim().to_string());
            }
        }

        if !matched {
            if let Some(name) = name {
                if META_NAME.is_match(&name) {
                    let key: String = name
                        .to_lowercase()
                        .chars()
                        .filter(|c| !c.is_whitespace())
                        .map(|c| if c == '.' { ':' } else { c })
                        .collect();
                    values.insert(key, content.trim().to_string());
                }
            }
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(html: &str) -> HashMap<String, String> {
        collect_meta_values(&Document::from(html))
    }

    #[test]
    fn test_property_keys_normalized() {
        let values = collect(
            r#"<html><head>
            <meta property="og:title" content="OG Title">
            <meta property=" twitter : description " content="Tweet text">
            </head><body></body></html>"#,
        );

        assert_eq!(values.get("og:title").map(String::as_str), Some("OG Title"));
        assert_eq!(values.get("twitter:description").map(String::as_str), Some("Tweet text"));
    }

    #[test]
    fn test_name_keys_normalize_dots() {
        let values = collect(
            r#"<head>
            <meta name="DC.title" content="Dublin Title">
            <meta name="parsely-author" content="Jane">
            <meta name="weibo:article:title" content="Weibo Title">
            </head>"#,
        );

        assert_eq!(values.get("dc:title").map(String::as_str), Some("Dublin Title"));
        assert_eq!(values.get("parsely-author").map(String::as_str), Some("Jane"));
        assert_eq!(values.get("weibo:article:title").map(String::as_str), Some("Weibo Title"));
    }

    #[test]
    fn test_unrecognized_and_empty_are_skipped() {
        let values = collect(
            r#"<head>
            <meta name="viewport" content="width=device-width">
            <meta property="og:title" content="">
            <meta name="description">
            </head>"#,
        );

        assert!(values.is_empty());
    }

    #[test]
    fn test_property_wins_over_name_on_same_tag() {
        let values = collect(
            r#"<head>
            <meta property="og:description" name="description" content="shared">
            </head>"#,
        );

        assert_eq!(values.get("og:description").map(String::as_str), Some("shared"));
        assert!(!values.contains_key("description"));
    }

    #[test]
    fn test_bare_names_collected() {
        let values = collect(
            r#"<head>
            <meta name="author" content="Jane Doe">
            <meta name="description" content="About the page">
            <meta name="title" content="Page Title">
            </head>"#,
        );

        assert_eq!(values.get("author").map(String::as_str), Some("Jane Doe"));
        assert_eq!(values.get("description").map(String::as_str), Some("About the page"));
        assert_eq!(values.get("title").map(String::as_str), Some("Page Title"));
    }
}
