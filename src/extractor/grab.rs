//! Candidate scoring and article assembly.
//!
//! The grab pass walks the prepared document, prunes nodes that cannot be
//! article content, scores paragraph containers by depth-discounted
//! propagation, promotes the best-scoring ancestor chain to top candidate,
//! and collects related siblings into the article container. A retry ladder
//! relaxes one heuristic flag per round, restoring the body snapshot in
//! between, and falls back to the longest attempt when every round comes up
//! short.

use std::collections::HashMap;

use crate::dom::{
    attr, element_children, first_element_child, has_ancestor_tag, has_child_block_element,
    has_single_tag_inside, is_element_without_content, is_probably_visible, is_tag, is_whitespace,
    match_string, next_element, node_ancestors, parent_element, remove_and_next, serialize_node,
    set_tag_name, Document, NodeId, NodeRef, Selection,
};
use crate::options::{Flags, Options};
use crate::patterns::{
    ALTER_TO_DIV_EXCEPTIONS, BYLINE, COMMAS, DEFAULT_TAGS_TO_SCORE, EMPTYABLE_TAGS,
    NEGATIVE_SCORE, OK_MAYBE_ITS_A_CANDIDATE, POSITIVE_SCORE, SENTENCE_END, UNLIKELY_CANDIDATES,
    UNLIKELY_ROLES,
};
use crate::text::{inner_text, is_valid_byline, link_density, text_similarity};

use super::prep::prep_article;

/// Propagated paragraph scores, keyed by arena node id.
type ContentScores = HashMap<NodeId, f64>;

/// One completed grab attempt: a standalone document whose body holds the
/// wrapped article subtree.
pub(crate) struct GrabResult {
    pub article: Document,
    pub text_length: usize,
    pub dir: Option<String>,
}

/// Run the scoring pipeline with the full flag set, relaxing one flag per
/// retry. Returns `None` when even the longest attempt is empty.
pub(crate) fn grab_article(
    doc: &Document,
    options: &Options,
    article_title: &str,
    article_byline: &mut Option<String>,
) -> Option<GrabResult> {
    let body = doc.select("body");
    if !body.exists() {
        return None;
    }
    let page_cache = body.inner_html().to_string();

    let mut flags = Flags::all();
    let mut attempts: Vec<GrabResult> = Vec::new();

    loop {
        let result = grab_once(doc, options, flags, article_title, article_byline);

        if result.text_length >= options.char_threshold {
            if options.debug {
                log::debug!("grabbed article with {} text chars", result.text_length);
            }
            return Some(result);
        }

        if options.debug {
            log::debug!(
                "attempt yielded {} chars (< {}), relaxing flags",
                result.text_length,
                options.char_threshold
            );
        }
        attempts.push(result);
        body.set_html(page_cache.as_str());

        if !flags.relax() {
            // Ladder exhausted: keep whichever attempt saw the most text.
            attempts.sort_by(|a, b| b.text_length.cmp(&a.text_length));
            let best = attempts.into_iter().next()?;
            if best.text_length == 0 {
                return None;
            }
            return Some(best);
        }
    }
}

fn grab_once(
    doc: &Document,
    options: &Options,
    flags: Flags,
    article_title: &str,
    article_byline: &mut Option<String>,
) -> GrabResult {
    let mut elements_to_score: Vec<NodeId> = Vec::new();

    // --- Pass 1: prune obvious noise and collect scorable elements ---
    let mut should_remove_title_header = true;
    let mut node_opt = doc.select("html").nodes().first().cloned();

    while let Some(node) = node_opt {
        let match_string = match_string(&node);

        if !is_probably_visible(&node) {
            node_opt = remove_and_next(&node);
            continue;
        }

        if check_byline(&node, &match_string, article_byline) {
            node_opt = remove_and_next(&node);
            continue;
        }

        if should_remove_title_header && header_duplicates_title(&node, article_title) {
            should_remove_title_header = false;
            node_opt = remove_and_next(&node);
            continue;
        }

        if flags.strip_unlikelys {
            if UNLIKELY_CANDIDATES.is_match(&match_string)
                && !OK_MAYBE_ITS_A_CANDIDATE.is_match(&match_string)
                && !has_ancestor_tag(&node, "table", -1, None)
                && !has_ancestor_tag(&node, "code", -1, None)
                && !is_tag(&node, "body")
                && !is_tag(&node, "a")
            {
                node_opt = remove_and_next(&node);
                continue;
            }
            if attr(&node, "role")
                .is_some_and(|role| UNLIKELY_ROLES.contains(&role.as_str()))
            {
                node_opt = remove_and_next(&node);
                continue;
            }
        }

        let Some(tag) = crate::dom::tag_name(&node) else {
            node_opt = next_element(&node, false);
            continue;
        };

        if EMPTYABLE_TAGS.contains(&tag.as_str()) && is_element_without_content(&node) {
            node_opt = remove_and_next(&node);
            continue;
        }

        if DEFAULT_TAGS_TO_SCORE.contains(&tag.as_str()) {
            elements_to_score.push(node.id);
        }

        if tag == "div" {
            wrap_phrasing_runs(&node);

            if has_single_tag_inside(&node, "p") && link_density(&node) < 0.25 {
                // The div is a pointless wrapper around one paragraph.
                if let Some(p) = unwrap_to_single_child(&node) {
                    elements_to_score.push(p.id);
                    node_opt = next_element(&p, false);
                    continue;
                }
            } else if !has_child_block_element(&node) {
                set_tag_name(&node, "p");
                elements_to_score.push(node.id);
            }
        }

        node_opt = next_element(&node, false);
    }

    // --- Pass 2: score paragraphs into their ancestors ---
    let mut scores: ContentScores = HashMap::new();
    let mut candidates: Vec<NodeId> = Vec::new();

    for &id in &elements_to_score {
        let Some(node) = doc.tree.get(&id) else { continue };
        if node.parent().is_none() {
            continue;
        }

        let text = inner_text(&node, true);
        if text.chars().count() < 25 {
            continue;
        }

        let ancestors = node_ancestors(&node, 5);
        if ancestors.is_empty() {
            continue;
        }

        let mut content_score = 1.0;
        content_score += (COMMAS.find_iter(&text).count() + 1) as f64;
        content_score += 3.0f64.min((text.chars().count() / 100) as f64);

        for (level, ancestor) in ancestors.iter().enumerate() {
            // Ancestors whose own parent is not an element (the root) are
            // beyond scoring.
            if parent_element(ancestor).is_none() {
                continue;
            }
            if !scores.contains_key(&ancestor.id) {
                scores.insert(ancestor.id, initialize_score(ancestor, flags));
                candidates.push(ancestor.id);
            }
            let divider = match level {
                0 => 1.0,
                1 => 2.0,
                l => (l * 3) as f64,
            };
            if let Some(score) = scores.get_mut(&ancestor.id) {
                *score += content_score / divider;
            }
        }
    }

    // --- Top candidate selection ---
    let mut top_candidates: Vec<NodeId> = Vec::new();
    for &id in &candidates {
        let Some(node) = doc.tree.get(&id) else { continue };
        let adjusted = scores.get(&id).copied().unwrap_or(0.0) * (1.0 - link_density(&node));
        scores.insert(id, adjusted);

        for slot in 0..options.nb_top_candidates {
            match top_candidates.get(slot) {
                None => {
                    top_candidates.push(id);
                    break;
                }
                Some(&existing) if adjusted > scores.get(&existing).copied().unwrap_or(0.0) => {
                    top_candidates.insert(slot, id);
                    if top_candidates.len() > options.nb_top_candidates {
                        top_candidates.pop();
                    }
                    break;
                }
                Some(_) => {}
            }
        }
    }

    let top_id = top_candidates.first().copied();
    let top_node = top_id.as_ref().and_then(|id| doc.tree.get(id));
    let body = doc.select("body");

    let needed_to_create =
        top_node.as_ref().is_none_or(|node| is_tag(node, "body"));

    let (article_inner, dir) = if needed_to_create {
        // No usable candidate: treat the whole body as the article.
        let inner = format!("<div>{}</div>", body.inner_html());
        let dir_nodes: Vec<NodeRef> = body
            .nodes()
            .first()
            .map(|b| {
                let mut list = vec![b.clone()];
                list.extend(node_ancestors(b, 0));
                list
            })
            .unwrap_or_default();
        (inner, first_dir_attribute(&dir_nodes))
    } else {
        #[allow(clippy::unwrap_used)] // guarded by needed_to_create above
        let mut top_candidate = top_node.unwrap();

        // Promote a shared ancestor when enough runner-up chains go
        // through it.
        let top_score = scores.get(&top_candidate.id).copied().unwrap_or(0.0);
        let alternative_ancestors: Vec<Vec<NodeId>> = top_candidates[1..]
            .iter()
            .filter(|&&id| {
                top_score > 0.0
                    && scores.get(&id).copied().unwrap_or(0.0) / top_score >= 0.75
            })
            .filter_map(|&id| doc.tree.get(&id))
            .map(|n| node_ancestors(&n, 0).iter().map(|a| a.id).collect())
            .collect();

        const MINIMUM_TOPCANDIDATES: usize = 3;
        if alternative_ancestors.len() >= MINIMUM_TOPCANDIDATES {
            let mut parent = parent_element(&top_candidate);
            while let Some(p) = parent {
                if is_tag(&p, "body") {
                    break;
                }
                let lists_containing = alternative_ancestors
                    .iter()
                    .filter(|list| list.contains(&p.id))
                    .count();
                if lists_containing >= MINIMUM_TOPCANDIDATES {
                    top_candidate = p;
                    break;
                }
                parent = parent_element(&p);
            }
        }
        if !scores.contains_key(&top_candidate.id) {
            scores.insert(top_candidate.id, initialize_score(&top_candidate, flags));
        }

        // Climb while parents hold comparable scores; content often lives
        // one level above the densest paragraph cluster.
        let mut parent = parent_element(&top_candidate);
        let mut last_score = scores.get(&top_candidate.id).copied().unwrap_or(0.0);
        let score_threshold = last_score / 3.0;
        while let Some(p) = parent {
            if is_tag(&p, "body") {
                break;
            }
            let Some(&parent_score) = scores.get(&p.id) else {
                parent = parent_element(&p);
                continue;
            };
            if parent_score < score_threshold {
                break;
            }
            if parent_score > last_score {
                top_candidate = p;
                break;
            }
            last_score = parent_score;
            parent = parent_element(&p);
        }

        // A lone child is interchangeable with its parent.
        let mut parent = parent_element(&top_candidate);
        while let Some(p) = parent {
            if is_tag(&p, "body") || element_children(&p).len() != 1 {
                break;
            }
            top_candidate = p;
            parent = parent_element(&top_candidate);
        }
        if !scores.contains_key(&top_candidate.id) {
            scores.insert(top_candidate.id, initialize_score(&top_candidate, flags));
        }

        // --- Sibling inclusion ---
        let top_score = scores.get(&top_candidate.id).copied().unwrap_or(0.0);
        let sibling_threshold = 10.0f64.max(top_score * 0.2);
        let candidate_class = attr(&top_candidate, "class").unwrap_or_default();
        let parent_of_top = parent_element(&top_candidate);

        let siblings = parent_of_top
            .as_ref()
            .map(element_children)
            .unwrap_or_else(|| vec![top_candidate.clone()]);

        let mut parts: Vec<String> = Vec::new();
        for sibling in siblings {
            let mut append = false;

            if sibling.id == top_candidate.id {
                append = true;
            } else {
                let mut content_bonus = 0.0;
                let sibling_class = attr(&sibling, "class").unwrap_or_default();
                if !candidate_class.is_empty() && sibling_class == candidate_class {
                    content_bonus += top_score * 0.2;
                }

                if scores
                    .get(&sibling.id)
                    .is_some_and(|s| s + content_bonus >= sibling_threshold)
                {
                    append = true;
                } else if is_tag(&sibling, "p") {
                    let density = link_density(&sibling);
                    let content = inner_text(&sibling, true);
                    let content_length = content.chars().count();

                    if content_length > 80 && density < 0.25 {
                        append = true;
                    } else if content_length < 80
                        && content_length > 0
                        && density == 0.0
                        && SENTENCE_END.is_match(&content)
                    {
                        append = true;
                    }
                }
            }

            if append {
                if !crate::dom::tag_name(&sibling)
                    .is_some_and(|t| ALTER_TO_DIV_EXCEPTIONS.contains(&t.as_str()))
                {
                    set_tag_name(&sibling, "div");
                }
                parts.push(serialize_node(&sibling));
            }
        }

        let mut dir_nodes: Vec<NodeRef> = Vec::new();
        if let Some(parent) = parent_of_top.clone() {
            dir_nodes.push(parent);
        }
        dir_nodes.push(top_candidate.clone());
        if let Some(parent) = parent_of_top {
            dir_nodes.extend(node_ancestors(&parent, 0));
        }

        (parts.concat(), first_dir_attribute(&dir_nodes))
    };

    // --- Prepare and wrap the collected subtree ---
    let article = Document::from(format!("<html><body>{article_inner}</body></html>").as_str());
    prep_article(&article, options, flags);

    let article_body = article.select("body");
    if needed_to_create {
        // The synthesized container itself becomes the page wrapper.
        if let Some(container) = article_body.nodes().first().and_then(first_element_child_of_body)
        {
            let sel = Selection::from(container);
            sel.set_attr("id", "readability-page-1");
            sel.set_attr("class", "page");
        }
    } else {
        let inner = article_body.inner_html().to_string();
        article_body.set_html(
            format!("<div id=\"readability-page-1\" class=\"page\">{inner}</div>").as_str(),
        );
    }

    let text_length = article_body
        .nodes()
        .first()
        .map(|b| inner_text(b, true).chars().count())
        .unwrap_or(0);

    GrabResult { article, text_length, dir }
}

fn first_element_child_of_body<'a>(body: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    first_element_child(body).filter(|c| is_tag(c, "div"))
}

/// First non-empty `dir` attribute along the candidate chain.
fn first_dir_attribute(nodes: &[NodeRef]) -> Option<String> {
    nodes
        .iter()
        .find_map(|n| attr(n, "dir").filter(|d| !d.is_empty()))
}

/// Tag-based starting score plus the class-weight adjustment.
pub(crate) fn initialize_score(node: &NodeRef, flags: Flags) -> f64 {
    let base = match crate::dom::tag_name(node).as_deref() {
        Some("div") => 5.0,
        Some("pre" | "td" | "blockquote") => 3.0,
        Some("address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form") => -3.0,
        Some("h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th") => -5.0,
        _ => 0.0,
    };
    base + class_weight(node, flags)
}

/// Class/id vocabulary adjustment: +-25 for each of class and id matching
/// the positive or negative pattern. Zero while WEIGHT_CLASSES is off.
pub(crate) fn class_weight(node: &NodeRef, flags: Flags) -> f64 {
    if !flags.weight_classes {
        return 0.0;
    }
    let mut weight = 0.0;

    if let Some(class) = attr(node, "class").filter(|c| !c.is_empty()) {
        if NEGATIVE_SCORE.is_match(&class) {
            weight -= 25.0;
        }
        if POSITIVE_SCORE.is_match(&class) {
            weight += 25.0;
        }
    }
    if let Some(id) = attr(node, "id").filter(|i| !i.is_empty()) {
        if NEGATIVE_SCORE.is_match(&id) {
            weight -= 25.0;
        }
        if POSITIVE_SCORE.is_match(&id) {
            weight += 25.0;
        }
    }

    weight
}

/// Record the first plausible byline and ask for the node's removal.
fn check_byline(node: &NodeRef, match_string: &str, article_byline: &mut Option<String>) -> bool {
    if article_byline.is_some() {
        return false;
    }

    let rel = attr(node, "rel");
    let itemprop = attr(node, "itemprop");
    let looks_like_byline = rel.as_deref() == Some("author")
        || itemprop.is_some_and(|v| v.contains("author"))
        || BYLINE.is_match(match_string);
    if !looks_like_byline {
        return false;
    }

    let text = inner_text(node, false);
    if is_valid_byline(&text) {
        *article_byline = Some(text.trim().to_string());
        return true;
    }
    false
}

/// H1/H2 repeating the article title.
fn header_duplicates_title(node: &NodeRef, article_title: &str) -> bool {
    if !is_tag(node, "h1") && !is_tag(node, "h2") {
        return false;
    }
    if article_title.is_empty() {
        return false;
    }
    text_similarity(article_title, &inner_text(node, false)) > 0.75
}

/// Wrap contiguous runs of phrasing children in synthesized paragraphs.
/// Whitespace ahead of a run stays outside; trailing whitespace is trimmed
/// when a run closes against a block element.
fn wrap_phrasing_runs(div: &NodeRef) {
    let children = crate::dom::child_nodes(div);
    let mut rebuilt = String::new();
    let mut run: Vec<(String, bool)> = Vec::new();
    let mut changed = false;

    let flush = |run: &mut Vec<(String, bool)>, rebuilt: &mut String, trim: bool| {
        if run.is_empty() {
            return false;
        }
        if trim {
            while run.last().is_some_and(|(_, ws)| *ws) {
                run.pop();
            }
        }
        rebuilt.push_str("<p>");
        for (html, _) in run.drain(..) {
            rebuilt.push_str(&html);
        }
        rebuilt.push_str("</p>");
        true
    };

    for child in &children {
        if crate::dom::is_phrasing_content(child) {
            if run.is_empty() && is_whitespace(child) {
                rebuilt.push_str(&serialize_node(child));
            } else {
                run.push((serialize_node(child), is_whitespace(child)));
            }
        } else {
            changed |= flush(&mut run, &mut rebuilt, true);
            rebuilt.push_str(&serialize_node(child));
        }
    }
    changed |= flush(&mut run, &mut rebuilt, false);

    if changed {
        Selection::from(div.clone()).set_html(rebuilt.as_str());
    }
}

/// Replace a wrapper with its only element child, returning the child's
/// replacement node.
fn unwrap_to_single_child<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let child = first_element_child(node)?;
    let child_html = serialize_node(&child);
    let prev = node.prev_sibling();
    let parent = node.parent()?;

    Selection::from(node.clone()).replace_with_html(child_html.as_str());

    let replacement = match prev {
        Some(p) => p.next_sibling(),
        None => parent.children_it(false).next(),
    };
    replacement.filter(NodeRef::is_element)
}
