//! DOM Operations Adapter
//!
//! Tree utilities built on the `dom_query` crate: the explicit depth-first
//! traversal step, ancestor walks, the structural predicates used by the
//! scorer and cleaner, and node serialization helpers.
//!
//! Traversal is modeled as `current -> (child? next-sibling?
//! ancestor-next-sibling?)` steps over `NodeRef`s, so the next pointer can
//! always be captured before the current node is removed or rewritten.

// Re-export core types for the rest of the crate
pub use dom_query::{Document, NodeId, NodeRef, Selection};

// Text accessors hand out StrTendril; re-export it so callers can name it
pub use tendril::StrTendril;

use crate::patterns::{
    DIV_TO_P_ELEMS, HAS_CONTENT, PHRASING_ELEMS, PHRASING_WHEN_CHILDREN_ARE,
    STYLE_DISPLAY_NONE, STYLE_VISIBILITY_HIDDEN, WHITESPACE,
};

// === Node Information ===

/// Get tag name (lowercase).
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    if !node.is_element() {
        return None;
    }
    node.node_name().map(|t| t.to_lowercase())
}

/// Check whether a node is an element with the given (lowercase) tag.
#[must_use]
pub fn is_tag(node: &NodeRef, tag: &str) -> bool {
    tag_name(node).is_some_and(|t| t == tag)
}

/// Get an attribute value.
#[must_use]
pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    Selection::from(node.clone()).attr(name).map(|v| v.to_string())
}

/// Class and id concatenated, the match string for class/id heuristics.
#[must_use]
pub fn match_string(node: &NodeRef) -> String {
    let sel = Selection::from(node.clone());
    let class = sel.attr("class").map(|v| v.to_string()).unwrap_or_default();
    let id = sel.attr("id").map(|v| v.to_string()).unwrap_or_default();
    format!("{class} {id}")
}

// === Tree Navigation ===

/// Direct element children, in document order.
#[must_use]
pub fn element_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children_it(false).filter(NodeRef::is_element).collect()
}

/// All child nodes (elements, text, comments), in document order.
#[must_use]
pub fn child_nodes<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children_it(false).collect()
}

/// First element child, skipping text and comment nodes.
#[must_use]
pub fn first_element_child<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    node.children_it(false).find(NodeRef::is_element)
}

/// Next element sibling, skipping text and comment nodes.
#[must_use]
pub fn next_element_sibling<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut sibling = node.next_sibling();
    while let Some(s) = sibling {
        if s.is_element() {
            return Some(s);
        }
        sibling = s.next_sibling();
    }
    None
}

/// Parent node, but only while it is an element.
#[must_use]
pub fn parent_element<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    node.parent().filter(NodeRef::is_element)
}

/// One step of the depth-first element traversal: first element child, then
/// next element sibling, then the nearest ancestor's next element sibling.
/// With `ignore_self_and_kids` the subtree of `node` is skipped.
#[must_use]
pub fn next_element<'a>(node: &NodeRef<'a>, ignore_self_and_kids: bool) -> Option<NodeRef<'a>> {
    if !ignore_self_and_kids {
        if let Some(child) = first_element_child(node) {
            return Some(child);
        }
    }
    if let Some(sibling) = next_element_sibling(node) {
        return Some(sibling);
    }
    let mut cur = parent_element(node);
    while let Some(p) = cur {
        if let Some(sibling) = next_element_sibling(&p) {
            return Some(sibling);
        }
        cur = parent_element(&p);
    }
    None
}

/// Capture the traversal successor (skipping the subtree), then unlink the
/// node.
#[must_use]
pub fn remove_and_next<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let next = next_element(node, true);
    remove_node(node);
    next
}

/// Unlink a node from the tree.
pub fn remove_node(node: &NodeRef) {
    Selection::from(node.clone()).remove();
}

/// Element ancestors, nearest first. `max_depth` of 0 means unlimited.
#[must_use]
pub fn node_ancestors<'a>(node: &NodeRef<'a>, max_depth: usize) -> Vec<NodeRef<'a>> {
    let mut ancestors = Vec::new();
    let mut cur = parent_element(node);
    while let Some(p) = cur {
        ancestors.push(p.clone());
        if max_depth > 0 && ancestors.len() == max_depth {
            break;
        }
        cur = parent_element(&p);
    }
    ancestors
}

/// Climb at most `max_depth` ancestors (negative = unlimited) looking for a
/// tag, optionally constrained by a filter.
pub fn has_ancestor_tag(
    node: &NodeRef,
    tag: &str,
    max_depth: i32,
    filter: Option<&dyn Fn(&NodeRef) -> bool>,
) -> bool {
    let mut depth = 0;
    let mut cur = node.parent();
    while let Some(p) = cur {
        if max_depth > 0 && depth > max_depth {
            return false;
        }
        if is_tag(&p, tag) && filter.is_none_or(|f| f(&p)) {
            return true;
        }
        depth += 1;
        cur = p.parent();
    }
    false
}

/// Starting at `node` itself, walk next siblings until something other than
/// a whitespace-only text node is found.
#[must_use]
pub fn next_non_whitespace<'a>(node: Option<NodeRef<'a>>) -> Option<NodeRef<'a>> {
    let mut cur = node;
    while let Some(n) = cur {
        if n.is_element() || !WHITESPACE.is_match(&n.text()) {
            return Some(n);
        }
        cur = n.next_sibling();
    }
    None
}

// === Structural Predicates ===

/// Whitespace filler: an all-whitespace text node or a `<br>`.
#[must_use]
pub fn is_whitespace(node: &NodeRef) -> bool {
    if node.is_text() {
        return WHITESPACE.is_match(&node.text());
    }
    is_tag(node, "br")
}

/// Phrasing (inline-level) content: text, an inline element, or an
/// `<a>`/`<del>`/`<ins>` whose children are all phrasing.
#[must_use]
pub fn is_phrasing_content(node: &NodeRef) -> bool {
    if node.is_text() {
        return true;
    }
    let Some(tag) = tag_name(node) else {
        return false;
    };
    if PHRASING_ELEMS.contains(&tag.as_str()) {
        return true;
    }
    PHRASING_WHEN_CHILDREN_ARE.contains(&tag.as_str())
        && node.children_it(false).all(|c| is_phrasing_content(&c))
}

/// No text and no children other than `<br>`/`<hr>` spacers.
#[must_use]
pub fn is_element_without_content(node: &NodeRef) -> bool {
    if !node.is_element() {
        return false;
    }
    if !node.text().trim().is_empty() {
        return false;
    }
    let children = element_children(node);
    children.is_empty()
        || children.len()
            == children.iter().filter(|c| is_tag(c, "br") || is_tag(c, "hr")).count()
}

/// Hidden-element test: modal/dialog markup, the `hidden` attribute, inline
/// `display:none`/`visibility:hidden`, or `aria-hidden` without the
/// `fallback-image` escape hatch.
#[must_use]
pub fn is_probably_visible(node: &NodeRef) -> bool {
    if attr(node, "aria-modal").as_deref() == Some("true") {
        return false;
    }
    if attr(node, "role").as_deref() == Some("dialog") {
        return false;
    }
    if attr(node, "hidden").is_some() {
        return false;
    }
    if let Some(style) = attr(node, "style") {
        if STYLE_DISPLAY_NONE.is_match(&style) || STYLE_VISIBILITY_HIDDEN.is_match(&style) {
            return false;
        }
    }
    if attr(node, "aria-hidden").as_deref() == Some("true") {
        let class = attr(node, "class").unwrap_or_default();
        if !class.contains("fallback-image") {
            return false;
        }
    }
    true
}

/// Exactly one element child with the given tag, and no text content next
/// to it.
#[must_use]
pub fn has_single_tag_inside(node: &NodeRef, tag: &str) -> bool {
    let children = element_children(node);
    if children.len() != 1 || !is_tag(&children[0], tag) {
        return false;
    }
    !node
        .children_it(false)
        .any(|c| c.is_text() && HAS_CONTENT.is_match(&c.text()))
}

/// Any block-level descendant.
#[must_use]
pub fn has_child_block_element(node: &NodeRef) -> bool {
    let selector = DIV_TO_P_ELEMS.join(", ");
    Selection::from(node.clone()).select(&selector).exists()
}

// === Serialization ===

/// Escape text-node data for re-embedding in markup.
#[must_use]
pub fn escape_html_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Serialize a single node back to markup. Elements round-trip through the
/// tree serializer; text is escaped; comments and other kinds vanish.
#[must_use]
pub fn serialize_node(node: &NodeRef) -> String {
    if node.is_element() {
        return Selection::from(node.clone()).html().to_string();
    }
    if node.is_text() {
        return escape_html_text(&node.text());
    }
    String::new()
}

/// Rename an element in place; attributes and children are preserved.
pub fn set_tag_name(node: &NodeRef, tag: &str) {
    Selection::from(node.clone()).rename(tag);
}
