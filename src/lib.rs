//! # rs-readability
//!
//! Rust port of Readability - the reader-mode article extraction algorithm.
//!
//! This library takes an arbitrary, often messy, HTML document and pulls
//! out the primary readable article: its main textual body as cleaned HTML
//! and flattened text, plus title, byline, excerpt, site name, language,
//! direction and published time.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_readability::parse;
//!
//! let html = r#"<html><head><title>My Article</title></head>
//! <body><article>
//! <p>Main content with enough text to stand on its own, and then some more
//! of it, because short fragments are not worth extracting.</p>
//! </article></body></html>"#;
//!
//! let article = parse(html)?;
//! println!("Title: {:?}", article.title);
//! println!("Text: {:?}", article.text_content);
//! # Ok::<(), rs_readability::Error>(())
//! ```
//!
//! ## How it works
//!
//! - **Scoring**: paragraph-like elements are scored by text shape and the
//!   scores propagate to their ancestors with depth discounts; the best
//!   ancestor becomes the article candidate.
//! - **Sibling merge**: adjacent content that resembles the candidate is
//!   pulled in.
//! - **Cleaning**: boilerplate families (forms, share bars, link farms,
//!   layout tables) are stripped, conditionally or outright.
//! - **Retries**: when the result is too short, the pipeline relaxes one
//!   heuristic at a time and starts over from a snapshot.

mod error;
mod extractor;
mod metadata;
mod options;
mod result;

/// DOM tree utilities over `dom_query`.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Compiled heuristic patterns and tag-set constants.
pub mod patterns;

/// Quick readerability probe.
pub mod readerable;

/// Text measurement utilities.
pub mod text;

// Public API - re-exports
pub use error::{Error, Result};
pub use options::{Options, Serializer};
pub use readerable::ReaderableOptions;
pub use result::Article;

use dom_query::Document;

/// The article extractor.
///
/// Construct it over a parsed document, then call [`parse`](Self::parse)
/// once to run the pipeline. The document is consumed: extraction mutates
/// the tree in place.
///
/// # Example
///
/// ```rust
/// use rs_readability::{Options, Readability};
///
/// let html = "<html><body><article><p>Enough text to be an article, \
///             with several words and a full sentence to its name.</p></article></body></html>";
/// let readability = Readability::new(html, &Options::default())?;
/// let article = readability.parse()?;
/// # Ok::<(), rs_readability::Error>(())
/// ```
pub struct Readability {
    doc: Document,
    options: Options,
}

impl Readability {
    /// Parse the HTML into a document handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoDocument`] when the input is empty or
    /// whitespace-only.
    pub fn new(html: &str, options: &Options) -> Result<Self> {
        if html.trim().is_empty() {
            return Err(Error::NoDocument);
        }
        Ok(Self { doc: Document::from(html), options: options.clone() })
    }

    /// Run the extraction pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyElements`] when the document exceeds
    /// `max_elems_to_parse`. Every other failure mode is recoverable and
    /// produces an [`Article`] with `None` fields instead.
    pub fn parse(self) -> Result<Article> {
        extractor::run(&self.doc, &self.options)
    }
}

/// Extract the article from an HTML document using default options.
///
/// # Errors
///
/// See [`Readability::new`] and [`Readability::parse`].
///
/// # Example
///
/// ```rust
/// use rs_readability::parse;
///
/// let html = "<html><body><article><p>Body text long enough to keep, \
///             and a second clause for good measure.</p></article></body></html>";
/// let article = parse(html)?;
/// # Ok::<(), rs_readability::Error>(())
/// ```
pub fn parse(html: &str) -> Result<Article> {
    parse_with_options(html, &Options::default())
}

/// Extract the article from an HTML document with custom options.
///
/// # Errors
///
/// See [`Readability::new`] and [`Readability::parse`].
pub fn parse_with_options(html: &str, options: &Options) -> Result<Article> {
    Readability::new(html, options)?.parse()
}

/// Extract the article from raw HTML bytes, detecting the character
/// encoding from meta declarations first.
///
/// # Errors
///
/// See [`Readability::new`] and [`Readability::parse`].
///
/// # Example
///
/// ```rust
/// use rs_readability::parse_bytes;
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head>\
///              <body><article><p>Caf\xE9 culture, explored at length in an \
///              article about coffee.</p></article></body></html>";
/// let article = parse_bytes(html)?;
/// # Ok::<(), rs_readability::Error>(())
/// ```
pub fn parse_bytes(html: &[u8]) -> Result<Article> {
    parse_bytes_with_options(html, &Options::default())
}

/// Extract the article from raw HTML bytes with custom options.
///
/// # Errors
///
/// See [`Readability::new`] and [`Readability::parse`].
pub fn parse_bytes_with_options(html: &[u8], options: &Options) -> Result<Article> {
    let html = encoding::transcode_to_utf8(html);
    parse_with_options(&html, options)
}

/// Check whether a page looks like an article without extracting it.
#[must_use]
pub fn is_probably_readerable(html: &str, options: &ReaderableOptions) -> bool {
    readerable::is_probably_readerable(html, options)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(Readability::new("", &Options::default()), Err(Error::NoDocument)));
        assert!(matches!(Readability::new("   \n ", &Options::default()), Err(Error::NoDocument)));
    }

    #[test]
    fn test_parse_simple_article() {
        let html = "<html><head><title>A Perfectly Reasonable Headline Here</title></head><body><article>\
            <p>Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore.</p>\
            <p>Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo.</p>\
            </article></body></html>";
        let options = Options { char_threshold: 100, ..Options::default() };

        let article = parse_with_options(html, &options).unwrap();

        assert_eq!(article.title.as_deref(), Some("A Perfectly Reasonable Headline Here"));
        let content = article.content.unwrap();
        assert!(content.starts_with("<div id=\"readability-page-1\" class=\"page\">"));
        assert!(article.text_content.unwrap().contains("Lorem ipsum"));
        assert!(article.length.unwrap() > 100);
    }

    #[test]
    fn test_parse_bytes_decodes_charset() {
        let html: &[u8] = b"<html><head><meta charset=\"ISO-8859-1\"><title>T</title></head><body>\
            <p>Caf\xE9 stories, told over two long sentences of plain body text to pass the bar.</p>\
            </body></html>";
        let options = Options { char_threshold: 20, ..Options::default() };

        let article = parse_bytes_with_options(html, &options).unwrap();
        assert!(article.text_content.unwrap().contains("Caf\u{E9}"));
    }
}
