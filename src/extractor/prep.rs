//! Article subtree preparation.
//!
//! Cleans the collected article before it is wrapped: presentational
//! attributes go away, data tables are classified and protected, lazy
//! images are repaired, and whole element families are removed outright or
//! judged by the conditional cleaner. Removal lists are walked in reverse
//! so inner elements are judged before the containers that hold them.

use std::collections::HashSet;

use regex::Regex;

use crate::dom::{
    attr, child_nodes, element_children, first_element_child, has_ancestor_tag,
    is_phrasing_content, is_tag, match_string, next_element, next_non_whitespace, remove_and_next,
    remove_node, serialize_node, set_tag_name, tag_name, Document, NodeId, NodeRef, Selection,
};
use crate::options::{Flags, Options};
use crate::patterns::{
    AD_WORDS, B64_DATA_URL, DIV_TO_P_ELEMS, EMBEDDED_NODES, IMG_EXTENSIONS, LAZY_SRCSET_VALUE,
    LAZY_SRC_VALUE, LOADING_WORDS, PRESENTATIONAL_ATTRIBUTES, SHARE_ELEMENTS,
    SIZE_ATTRIBUTE_ELEMS, VIDEOS,
};
use crate::text::{inner_text, link_density};

use super::grab::class_weight;

/// Clean the article subtree rooted at the document's body, in the fixed
/// pass order.
pub(crate) fn prep_article(article: &Document, options: &Options, flags: Flags) {
    let body = article.select("body");
    let Some(root) = body.nodes().first().cloned() else {
        return;
    };
    let video_regex = options.allowed_video_regex.clone().unwrap_or_else(|| VIDEOS.clone());

    clean_styles(&root);
    let data_tables = mark_data_tables(&body);
    fix_lazy_images(&body);

    clean_conditionally(&body, "form", options, flags, &data_tables, &video_regex);
    clean_conditionally(&body, "fieldset", options, flags, &data_tables, &video_regex);
    clean_tag(&body, "object", &video_regex);
    clean_tag(&body, "embed", &video_regex);
    clean_tag(&body, "footer", &video_regex);
    clean_tag(&body, "link", &video_regex);
    clean_tag(&body, "aside", &video_regex);

    // Share bars nested anywhere under the article's direct children.
    let share_threshold = options.char_threshold;
    for top_child in element_children(&root) {
        clean_matched_nodes(&top_child, &|node, match_string| {
            SHARE_ELEMENTS.is_match(match_string)
                && node.text().chars().count() < share_threshold
        });
    }

    clean_tag(&body, "iframe", &video_regex);
    clean_tag(&body, "input", &video_regex);
    clean_tag(&body, "textarea", &video_regex);
    clean_tag(&body, "select", &video_regex);
    clean_tag(&body, "button", &video_regex);
    clean_headers(&body, flags);

    clean_conditionally(&body, "table", options, flags, &data_tables, &video_regex);
    clean_conditionally(&body, "ul", options, flags, &data_tables, &video_regex);
    clean_conditionally(&body, "div", options, flags, &data_tables, &video_regex);

    for h1 in collect(&body, "h1") {
        set_tag_name(&h1, "h2");
    }

    remove_empty_paragraphs(&body);
    remove_br_before_paragraph(&body);
    collapse_single_cell_tables(&body);
}

fn collect<'a>(scope: &Selection<'a>, selector: &str) -> Vec<NodeRef<'a>> {
    scope.select(selector).nodes().iter().cloned().collect()
}

/// Strip presentational attributes recursively, leaving `<svg>` subtrees
/// untouched. `width`/`height` survive only where they are structural.
fn clean_styles(node: &NodeRef) {
    if is_tag(node, "svg") {
        return;
    }

    let sel = Selection::from(node.clone());
    for name in PRESENTATIONAL_ATTRIBUTES {
        sel.remove_attr(name);
    }
    if !tag_name(node).is_some_and(|t| SIZE_ATTRIBUTE_ELEMS.contains(&t.as_str())) {
        sel.remove_attr("width");
        sel.remove_attr("height");
    }

    for child in element_children(node) {
        clean_styles(&child);
    }
}

/// Classify every table as data or layout. Data tables and their contents
/// are exempt from conditional cleaning.
pub(crate) fn mark_data_tables(scope: &Selection) -> HashSet<NodeId> {
    let mut data_tables = HashSet::new();

    for table in scope.select("table").nodes() {
        if attr(table, "role").as_deref() == Some("presentation") {
            continue;
        }
        if attr(table, "datatable").as_deref() == Some("0") {
            continue;
        }
        if attr(table, "summary").is_some() {
            data_tables.insert(table.id);
            continue;
        }

        let sel = Selection::from(table.clone());
        let caption_has_element_child = sel
            .select("caption")
            .nodes()
            .iter()
            .any(|c| first_element_child(c).is_some());
        if caption_has_element_child {
            data_tables.insert(table.id);
            continue;
        }
        if sel.select("col, colgroup, tfoot, thead, th").exists() {
            data_tables.insert(table.id);
            continue;
        }
        if sel.select("table").exists() {
            continue;
        }

        let (rows, columns) = row_and_column_count(table);
        if rows == 1 || columns == 1 {
            continue;
        }
        if rows >= 10 || columns > 4 || rows * columns > 10 {
            data_tables.insert(table.id);
        }
    }

    data_tables
}

fn row_and_column_count(table: &NodeRef) -> (usize, usize) {
    let mut rows = 0;
    let mut columns = 0;

    for tr in Selection::from(table.clone()).select("tr").nodes() {
        let rowspan = attr(tr, "rowspan").and_then(|v| v.parse::<usize>().ok()).unwrap_or(1);
        rows += rowspan.max(1);

        let mut columns_in_row = 0;
        for td in Selection::from(tr.clone()).select("td").nodes() {
            let colspan = attr(td, "colspan").and_then(|v| v.parse::<usize>().ok()).unwrap_or(1);
            columns_in_row += colspan.max(1);
        }
        columns = columns.max(columns_in_row);
    }

    (rows, columns)
}

/// Recover image sources stashed in data attributes by lazy-loading
/// scripts, and drop tiny base64 placeholders that shadow a real source.
pub(crate) fn fix_lazy_images(scope: &Selection) {
    for elem in collect(scope, "img, picture, figure") {
        let sel = Selection::from(elem.clone());

        if let Some(src) = attr(&elem, "src") {
            if let Some(caps) = B64_DATA_URL.captures(&src) {
                if &caps[1] != "image/svg+xml" {
                    let has_real_image = elem.attrs().iter().any(|a| {
                        &*a.name.local != "src" && IMG_EXTENSIONS.is_match(&a.value)
                    });
                    if has_real_image {
                        let b64_start = caps.get(0).map_or(0, |m| m.end());
                        if src.len() - b64_start < 133 {
                            sel.remove_attr("src");
                        }
                    }
                }
            }
        }

        // An element with a usable source and no lazy marker is fine as-is.
        let has_src = attr(&elem, "src").is_some();
        let has_srcset = attr(&elem, "srcset").is_some_and(|v| v != "null");
        let class = attr(&elem, "class").unwrap_or_default();
        if (has_src || has_srcset) && !class.to_lowercase().contains("lazy") {
            continue;
        }

        for attribute in elem.attrs() {
            let name = &*attribute.name.local;
            if name == "src" || name == "srcset" || name == "alt" {
                continue;
            }
            let value = attribute.value.to_string();
            let copy_to = if LAZY_SRCSET_VALUE.is_match(&value) {
                Some("srcset")
            } else if LAZY_SRC_VALUE.is_match(&value) {
                Some("src")
            } else {
                None
            };
            let Some(copy_to) = copy_to else { continue };

            if is_tag(&elem, "img") || is_tag(&elem, "picture") {
                sel.set_attr(copy_to, &value);
            } else if is_tag(&elem, "figure") && !sel.select("img, picture").exists() {
                let escaped = value.replace('&', "&amp;").replace('"', "&quot;");
                sel.append_html(format!("<img {copy_to}=\"{escaped}\">").as_str());
            }
        }
    }
}

/// Remove every element of a tag family. Embed tags survive when any
/// attribute (or, for `<object>`, the inner HTML) matches the allowed
/// video pattern.
fn clean_tag(scope: &Selection, tag: &str, video_regex: &Regex) {
    let is_embed = matches!(tag, "object" | "embed" | "iframe");

    for node in collect(scope, tag).iter().rev() {
        if is_embed {
            let attribute_matches = node
                .attrs()
                .iter()
                .any(|a| video_regex.is_match(&a.value));
            if attribute_matches {
                continue;
            }
            if is_tag(node, "object")
                && video_regex.is_match(&Selection::from(node.clone()).inner_html())
            {
                continue;
            }
        }
        remove_node(node);
    }
}

/// Walk a subtree removing nodes the filter flags, capturing the traversal
/// successor before each removal.
fn clean_matched_nodes(root: &NodeRef, filter: &dyn Fn(&NodeRef, &str) -> bool) {
    let end_of_search = next_element(root, true).map(|n| n.id);
    let mut next = next_element(root, false);

    while let Some(node) = next {
        if end_of_search == Some(node.id) {
            break;
        }
        if filter(&node, &match_string(&node)) {
            next = remove_and_next(&node);
        } else {
            next = next_element(&node, false);
        }
    }
}

/// Drop headers whose class vocabulary marks them as chrome.
fn clean_headers(scope: &Selection, flags: Flags) {
    for header in collect(scope, "h1, h2").iter().rev() {
        if class_weight(header, flags) < 0.0 {
            remove_node(header);
        }
    }
}

/// Ratio of text inside descendant elements of the given tags to the
/// node's whole text.
fn text_density(node: &NodeRef, tags: &[&str]) -> f64 {
    let text_length = inner_text(node, true).chars().count();
    if text_length == 0 {
        return 0.0;
    }
    let selector = tags.join(", ");
    let children_length: usize = Selection::from(node.clone())
        .select(&selector)
        .nodes()
        .iter()
        .map(|c| inner_text(c, true).chars().count())
        .sum();
    children_length as f64 / text_length as f64
}

/// The conditional cleaner: judge forms, tables, lists and divs by their
/// shape and density, keeping anything protected by data tables, code
/// blocks or allowed embeds.
fn clean_conditionally(
    scope: &Selection,
    tag: &str,
    options: &Options,
    flags: Flags,
    data_tables: &HashSet<NodeId>,
    video_regex: &Regex,
) {
    if !flags.clean_conditionally {
        return;
    }

    for node in collect(scope, tag).iter().rev() {
        if should_remove_conditionally(node, tag, options, flags, data_tables, video_regex) {
            remove_node(node);
        }
    }
}

fn should_remove_conditionally(
    node: &NodeRef,
    tag: &str,
    options: &Options,
    flags: Flags,
    data_tables: &HashSet<NodeId>,
    video_regex: &Regex,
) -> bool {
    let is_data_table = |n: &NodeRef| data_tables.contains(&n.id);

    if tag == "table" && is_data_table(node) {
        return false;
    }
    if has_ancestor_tag(node, "table", -1, Some(&is_data_table)) {
        return false;
    }
    if has_ancestor_tag(node, "code", 3, None) {
        return false;
    }

    let sel = Selection::from(node.clone());
    if sel.select("table").nodes().iter().any(|t| data_tables.contains(&t.id)) {
        return false;
    }

    let weight = class_weight(node, flags);
    if weight < 0.0 {
        return true;
    }

    let text = inner_text(node, true);
    if text.matches(',').count() > 10 {
        return false;
    }

    // Few commas: look at the element's composition instead.
    let p_count = sel.select("p").length();
    let img_count = sel.select("img").length();
    let li_count = sel.select("li").length() as f64 - 100.0;
    let input_count = sel.select("input").length();
    let heading_density = text_density(node, &["h1", "h2", "h3", "h4", "h5", "h6"]);

    let mut embed_count = 0usize;
    for embed in sel.select("object, embed, iframe").nodes() {
        if embed.attrs().iter().any(|a| video_regex.is_match(&a.value)) {
            return false;
        }
        if is_tag(embed, "object")
            && video_regex.is_match(&Selection::from(embed.clone()).inner_html())
        {
            return false;
        }
        embed_count += 1;
    }

    if AD_WORDS.is_match(&text) || LOADING_WORDS.is_match(&text) {
        return true;
    }

    let is_list = tag == "ul" || tag == "ol" || {
        let list_text: usize = sel
            .select("ul, ol")
            .nodes()
            .iter()
            .map(|l| inner_text(l, true).chars().count())
            .sum();
        let total = text.chars().count();
        total > 0 && list_text as f64 / total as f64 > 0.9
    };
    let is_figure_child = has_ancestor_tag(node, "figure", 3, None);
    let content_length = text.chars().count();
    let density = link_density(node);

    let mut density_tags: Vec<&str> = vec!["span", "li", "td"];
    density_tags.extend_from_slice(DIV_TO_P_ELEMS);
    let flat_text_density = text_density(node, &density_tags);

    let have_to_remove = (!is_figure_child
        && img_count > 1
        && (p_count as f64 / img_count as f64) < 0.5)
        || (!is_list && li_count > p_count as f64)
        || (input_count as f64 > (p_count as f64 / 3.0).floor())
        || (!is_list
            && !is_figure_child
            && heading_density < 0.9
            && content_length < 25
            && (img_count == 0 || img_count > 2)
            && density > 0.0)
        || (!is_list && weight < 25.0 && density > 0.2 + options.link_density_modifier)
        || (weight >= 25.0 && density > 0.5 + options.link_density_modifier)
        || ((embed_count == 1 && content_length < 75) || embed_count > 1)
        || (img_count == 0 && flat_text_density == 0.0);

    if is_list && have_to_remove {
        // Image galleries marked up as lists survive when each item wraps
        // at most one thing and images pair 1:1 with items.
        for child in element_children(node) {
            if element_children(&child).len() > 1 {
                return true;
            }
        }
        let actual_li_count = sel.select("li").length();
        if img_count == actual_li_count {
            return false;
        }
        return true;
    }

    have_to_remove
}

/// Remove paragraphs with no text and no embedded media.
fn remove_empty_paragraphs(scope: &Selection) {
    let media_selector = EMBEDDED_NODES.join(", ");
    for p in collect(scope, "p").iter().rev() {
        let media = Selection::from(p.clone()).select(&media_selector).length();
        if media == 0 && inner_text(p, false).is_empty() {
            remove_node(p);
        }
    }
}

/// A `<br>` directly ahead of a paragraph is redundant.
fn remove_br_before_paragraph(scope: &Selection) {
    for br in collect(scope, "br") {
        if let Some(next) = next_non_whitespace(br.next_sibling()) {
            if is_tag(&next, "p") {
                remove_node(&br);
            }
        }
    }
}

/// Tables holding a single cell collapse to the cell's content.
fn collapse_single_cell_tables(scope: &Selection) {
    for table in collect(scope, "table") {
        let tbody = if crate::dom::has_single_tag_inside(&table, "tbody") {
            match first_element_child(&table) {
                Some(t) => t,
                None => continue,
            }
        } else {
            table.clone()
        };

        if !crate::dom::has_single_tag_inside(&tbody, "tr") {
            continue;
        }
        let Some(row) = first_element_child(&tbody) else { continue };
        if !crate::dom::has_single_tag_inside(&row, "td") {
            continue;
        }
        let Some(cell) = first_element_child(&row) else { continue };

        let all_phrasing = child_nodes(&cell).iter().all(is_phrasing_content);
        set_tag_name(&cell, if all_phrasing { "p" } else { "div" });
        let cell_html = serialize_node(&cell);
        Selection::from(table).replace_with_html(cell_html.as_str());
    }
}
