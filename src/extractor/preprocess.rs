//! Document pre-pass transforms.
//!
//! Runs once before the scoring loop: comments, scripts, noscript and style
//! sheets are dropped, `<br><br>` chains become real paragraphs, and
//! presentational `<font>` elements turn into spans. The body snapshot
//! backing the retry ladder is taken after these transforms.

use crate::dom::{
    child_nodes, is_phrasing_content, is_tag, is_whitespace, next_non_whitespace, remove_node,
    serialize_node, set_tag_name, Document, NodeRef, Selection,
};

/// Apply the one-time transforms in order: node junk removal, `<br>` chain
/// replacement, font renaming.
pub(crate) fn prep_document(doc: &Document) {
    remove_comment_nodes(doc);
    doc.select("script, noscript, style").remove();
    replace_brs(doc);
    for font in collect_nodes(doc, "font") {
        set_tag_name(&font, "span");
    }
}

fn collect_nodes<'a>(doc: &'a Document, selector: &str) -> Vec<NodeRef<'a>> {
    doc.select(selector).nodes().iter().cloned().collect()
}

/// Drop every child node that is neither an element nor text: comments,
/// processing instructions and CDATA remnants.
fn remove_comment_nodes(doc: &Document) {
    for element in collect_nodes(doc, "*") {
        let junk: Vec<NodeRef> = child_nodes(&element)
            .into_iter()
            .filter(|c| !c.is_element() && !c.is_text())
            .collect();
        for node in junk {
            remove_node(&node);
        }
    }
}

/// Replace chains of two or more `<br>`s with a paragraph that absorbs the
/// phrasing content that follows, up to the next `<br><br>` or block
/// element.
pub(crate) fn replace_brs(doc: &Document) {
    for br in collect_nodes(doc, "br") {
        // A previous chain may have consumed this one already.
        if br.parent().is_none() {
            continue;
        }

        // Remove the rest of the chain, remembering whether one existed.
        let mut next_opt = br.next_sibling();
        let mut replaced = false;
        while let Some(next) = next_non_whitespace(next_opt) {
            if !is_tag(&next, "br") {
                break;
            }
            replaced = true;
            next_opt = next.next_sibling();
            remove_node(&next);
        }
        if !replaced {
            continue;
        }

        // The first <br> of the chain becomes the paragraph.
        set_tag_name(&br, "p");
        let p = br;

        // Pull following phrasing siblings into the paragraph until the
        // next chain or a block element.
        let mut pieces: Vec<(String, bool)> = Vec::new();
        let mut next = p.next_sibling();
        while let Some(sibling) = next {
            if is_tag(&sibling, "br") {
                if let Some(after) = next_non_whitespace(sibling.next_sibling()) {
                    if is_tag(&after, "br") {
                        break;
                    }
                }
            }
            if !is_phrasing_content(&sibling) {
                break;
            }
            next = sibling.next_sibling();
            pieces.push((serialize_node(&sibling), is_whitespace(&sibling)));
            remove_node(&sibling);
        }

        while pieces.last().is_some_and(|(_, ws)| *ws) {
            pieces.pop();
        }
        if !pieces.is_empty() {
            let inner: String = pieces.into_iter().map(|(html, _)| html).collect();
            Selection::from(p.clone()).set_html(inner.as_str());
        }

        if let Some(parent) = p.parent() {
            if is_tag(&parent, "p") {
                set_tag_name(&parent, "div");
            }
        }
    }
}
