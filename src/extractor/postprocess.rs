//! Article post-processing.
//!
//! Runs on the wrapped article after a successful grab: relative URLs are
//! resolved against the caller's base URI, dead `javascript:` links are
//! flattened to their text, pointless nested wrappers collapse, and class
//! attributes are reduced to the preserved set.

use url::Url;

use crate::dom::{
    attr, escape_html_text, element_children, first_element_child, has_single_tag_inside,
    is_element_without_content, is_tag, next_element, remove_and_next, serialize_node, Document,
    NodeRef, Selection,
};
use crate::options::Options;
use crate::patterns::SRCSET_URL;

pub(crate) fn post_process(article: &Document, options: &Options) {
    let base = options
        .base_uri
        .as_deref()
        .and_then(|uri| Url::parse(uri).ok());

    fix_relative_uris(article, base.as_ref());
    simplify_nested_elements(article);

    if !options.keep_classes {
        if let Some(root) = article.select("body").nodes().first() {
            clean_classes(root, &options.classes_to_preserve);
        }
    }
}

fn to_absolute(uri: &str, base: &Url) -> Option<String> {
    // In-page references stay relative.
    if uri.starts_with('#') {
        return None;
    }
    base.join(uri).ok().map(String::from)
}

/// Resolve link and media URLs; replace `javascript:` links with their
/// text.
fn fix_relative_uris(article: &Document, base: Option<&Url>) {
    for link in collect(article, "a") {
        let Some(href) = attr(&link, "href") else { continue };

        if href.starts_with("javascript:") {
            let sel = Selection::from(link.clone());
            let children = crate::dom::child_nodes(&link);
            if children.len() == 1 && children[0].is_text() {
                sel.replace_with_html(escape_html_text(&children[0].text()).as_str());
            } else {
                let inner = sel.inner_html().to_string();
                sel.replace_with_html(format!("<span>{inner}</span>").as_str());
            }
        } else if let Some(base) = base {
            if let Some(absolute) = to_absolute(&href, base) {
                Selection::from(link).set_attr("href", &absolute);
            }
        }
    }

    let Some(base) = base else { return };

    for media in collect(article, "img, picture, figure, video, audio, source") {
        let sel = Selection::from(media.clone());

        if let Some(src) = attr(&media, "src") {
            if let Some(absolute) = to_absolute(&src, base) {
                sel.set_attr("src", &absolute);
            }
        }
        if let Some(poster) = attr(&media, "poster") {
            if let Some(absolute) = to_absolute(&poster, base) {
                sel.set_attr("poster", &absolute);
            }
        }
        if let Some(srcset) = attr(&media, "srcset") {
            let rewritten = SRCSET_URL.replace_all(&srcset, |caps: &regex::Captures| {
                let url = to_absolute(&caps[1], base).unwrap_or_else(|| caps[1].to_string());
                format!("{}{}{}", url, caps.get(2).map_or("", |m| m.as_str()), &caps[3])
            });
            sel.set_attr("srcset", &rewritten);
        }
    }
}

/// Unwrap div/section chains holding a single same-kind child and drop the
/// ones holding nothing, leaving the readability wrapper itself alone.
fn simplify_nested_elements(article: &Document) {
    let mut node_opt = article.select("body").nodes().first().cloned();

    while let Some(node) = node_opt {
        let is_wrapper_kind = is_tag(&node, "div") || is_tag(&node, "section");
        let is_reader_root = attr(&node, "id").unwrap_or_default().starts_with("readability");

        if node.parent().is_some() && is_wrapper_kind && !is_reader_root {
            if is_element_without_content(&node) {
                node_opt = remove_and_next(&node);
                continue;
            }
            if has_single_tag_inside(&node, "div") || has_single_tag_inside(&node, "section") {
                if let Some(child) = first_element_child(&node) {
                    let child_sel = Selection::from(child.clone());
                    for attribute in node.attrs() {
                        child_sel.set_attr(&attribute.name.local, &attribute.value);
                    }

                    let child_html = serialize_node(&child);
                    let prev = node.prev_sibling();
                    let parent = node.parent();
                    Selection::from(node).replace_with_html(child_html.as_str());

                    node_opt = match prev {
                        Some(p) => p.next_sibling(),
                        None => parent.and_then(|p| p.children_it(false).next()),
                    }
                    .filter(NodeRef::is_element);
                    continue;
                }
            }
        }

        node_opt = next_element(&node, false);
    }
}

/// Keep only the preserved classes, dropping empty class attributes.
fn clean_classes(node: &NodeRef, preserve: &[String]) {
    let sel = Selection::from(node.clone());
    if let Some(class) = sel.attr("class") {
        let kept: Vec<&str> = class
            .split_whitespace()
            .filter(|c| preserve.iter().any(|p| p == c))
            .collect();
        if kept.is_empty() {
            sel.remove_attr("class");
        } else {
            sel.set_attr("class", &kept.join(" "));
        }
    }

    for child in element_children(node) {
        clean_classes(&child, preserve);
    }
}

fn collect<'a>(article: &'a Document, selector: &str) -> Vec<NodeRef<'a>> {
    article.select(selector).nodes().iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_relative_urls_resolved() {
        let doc = Document::from(
            "<html><body>\
             <a id=\"rel\" href=\"/story/2\">next</a>\
             <a id=\"frag\" href=\"#notes\">notes</a>\
             <img id=\"img\" src=\"images/pic.png\">\
             <video id=\"vid\" poster=\"stills/frame.jpg\"></video>\
             </body></html>",
        );
        let options = Options {
            base_uri: Some("https://example.com/story/1".to_string()),
            ..Options::default()
        };

        post_process(&doc, &options);

        assert_eq!(doc.select("#rel").attr("href").as_deref(), Some("https://example.com/story/2"));
        // Fragment links stay in-page
        assert_eq!(doc.select("#frag").attr("href").as_deref(), Some("#notes"));
        assert_eq!(
            doc.select("#img").attr("src").as_deref(),
            Some("https://example.com/story/images/pic.png")
        );
        assert_eq!(
            doc.select("#vid").attr("poster").as_deref(),
            Some("https://example.com/story/stills/frame.jpg")
        );
    }

    #[test]
    fn test_srcset_entries_rewritten() {
        let doc = Document::from(
            "<html><body><img id=\"i\" srcset=\"a.jpg 1x, b/c.jpg 2x\"></body></html>",
        );
        let options = Options {
            base_uri: Some("https://example.com/post/".to_string()),
            ..Options::default()
        };

        post_process(&doc, &options);

        assert_eq!(
            doc.select("#i").attr("srcset").as_deref(),
            Some("https://example.com/post/a.jpg 1x, https://example.com/post/b/c.jpg 2x")
        );
    }

    #[test]
    fn test_javascript_link_flattened_to_text() {
        let doc = Document::from(
            "<html><body><p><a href=\"javascript:void(0)\">click me</a></p>\
             <p><a id=\"rich\" href=\"javascript:open()\"><b>bold</b> call</a></p></body></html>",
        );

        post_process(&doc, &Options::default());

        assert!(doc.select("a").is_empty());
        let html = doc.select("body").inner_html().to_string();
        assert!(html.contains("click me"));
        assert!(html.contains("<span><b>bold</b> call</span>"));
    }

    #[test]
    fn test_nested_wrappers_collapse() {
        let doc = Document::from(
            "<html><body>\
             <div id=\"readability-page-1\" class=\"page\">\
             <div data-keep=\"yes\"><div id=\"inner\"><p>text</p></div></div>\
             <section id=\"empty\"></section>\
             </div>\
             </body></html>",
        );

        post_process(&doc, &Options::default());

        // The chain collapsed to the inner div, which inherited the outer
        // wrapper's attributes
        let inner = doc.select("#inner");
        assert!(inner.exists());
        assert_eq!(inner.attr("data-keep").as_deref(), Some("yes"));
        assert!(doc.select("#empty").is_empty());
        // The reader wrapper itself is never collapsed
        assert!(doc.select("#readability-page-1").exists());
    }

    #[test]
    fn test_classes_cleaned_to_preserved_set() {
        let doc = Document::from(
            "<html><body>\
             <div id=\"w\" class=\"page extra\"><p class=\"lead fancy\">x</p></div>\
             </body></html>",
        );

        post_process(&doc, &Options::default());

        assert_eq!(doc.select("#w").attr("class").as_deref(), Some("page"));
        assert!(doc.select("p").attr("class").is_none());
    }

    #[test]
    fn test_keep_classes_leaves_everything() {
        let doc = Document::from(
            "<html><body><p class=\"lead fancy\">x</p></body></html>",
        );
        let options = Options { keep_classes: true, ..Options::default() };

        post_process(&doc, &options);

        assert_eq!(doc.select("p").attr("class").as_deref(), Some("lead fancy"));
    }
}
