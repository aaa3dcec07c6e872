//! Result types for extraction output.
//!
//! This module defines the structured output from article extraction:
//! the cleaned content in HTML and text form plus document metadata.

use serde::Serialize;

/// Result of article extraction from an HTML document.
///
/// Every field is optional: metadata may be missing from the source, and
/// the content fields are `None` when extraction is disabled or fails
/// completely.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Article {
    /// Article title.
    pub title: Option<String>,

    /// Author line.
    pub byline: Option<String>,

    /// Text direction (`ltr`/`rtl`), taken from the `dir` attribute of the
    /// content or its ancestors.
    pub dir: Option<String>,

    /// Content language, from `<html lang>`.
    pub lang: Option<String>,

    /// Cleaned article HTML, wrapped in
    /// `<div id="readability-page-1" class="page">`.
    pub content: Option<String>,

    /// Flattened text of the article content.
    pub text_content: Option<String>,

    /// Length of `text_content` in characters.
    pub length: Option<usize>,

    /// Short description, from metadata or the first paragraph.
    pub excerpt: Option<String>,

    /// Name of the publishing site.
    pub site_name: Option<String>,

    /// Publication time as found in the source, unparsed.
    pub published_time: Option<String>,
}
