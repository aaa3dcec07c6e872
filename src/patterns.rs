//! Compiled regex patterns and tag-set constants for article extraction.
//!
//! All patterns are compiled once at startup using `LazyLock` for efficiency.
//! Patterns are organized by their purpose in the extraction pipeline.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Candidate Filtering Patterns
// =============================================================================

/// Matches class/id vocabulary of boilerplate containers (navigation, ads,
/// comments, social widgets). Nodes matching this are dropped while the
/// STRIP_UNLIKELYS flag is active.
pub static UNLIKELY_CANDIDATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)-ad-|ai2html|banner|breadcrumbs|combx|comment|community|cover-wrap|disqus|extra|footer|gdpr|header|legends|menu|related|remark|replies|rss|shoutbox|sidebar|skyscraper|social|sponsor|supplemental|ad-break|agegate|pagination|pager|popup|yom-remote",
    )
    .expect("UNLIKELY_CANDIDATES regex")
});

/// Counter-pattern to [`UNLIKELY_CANDIDATES`]: a node matching both is kept.
pub static OK_MAYBE_ITS_A_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)and|article|body|column|content|main|mathjax|shadow")
        .expect("OK_MAYBE_ITS_A_CANDIDATE regex")
});

/// Class/id names that raise an element's class weight.
pub static POSITIVE_SCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|h-entry|main|page|pagination|post|text|blog|story")
        .expect("POSITIVE_SCORE regex")
});

/// Class/id names that lower an element's class weight.
pub static NEGATIVE_SCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)-ad-|hidden|^hid$| hid$| hid |^hid |banner|combx|comment|com-|contact|footer|gdpr|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|widget",
    )
    .expect("NEGATIVE_SCORE regex")
});

/// Class/id names marking an author line.
pub static BYLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)byline|author|dateline|writtenby|p-author").expect("BYLINE regex")
});

/// Placeholder text left behind by ad slots.
pub static AD_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(ad(vertising|vertisement)?|pub(licité)?|werb(ung)?|广告|Реклама|Anzeige)$")
        .expect("AD_WORDS regex")
});

/// Placeholder text left behind by deferred-rendering frameworks.
pub static LOADING_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^((loading|正在加载|Загрузка|chargement|cargando)(…|\.\.\.)?)$")
        .expect("LOADING_WORDS regex")
});

/// Share buttons and share-bar containers.
pub static SHARE_ELEMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\b|_)(share|sharedaddy)(\b|_)").expect("SHARE_ELEMENTS regex")
});

/// Embed hosts that survive every cleaning pass. Used when the caller does
/// not supply `Options::allowed_video_regex`.
pub static VIDEOS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)//(www\.)?((dailymotion|youtube|youtube-nocookie|player\.vimeo|v\.qq)\.com|(archive|upload\.wikimedia)\.org|player\.twitch\.tv)",
    )
    .expect("VIDEOS regex")
});

// =============================================================================
// Text Measurement Patterns
// =============================================================================

/// Word-boundary tokenizer for text similarity.
pub static TOKENIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("TOKENIZE regex"));

/// Entirely-whitespace test for text nodes.
pub static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*$").expect("WHITESPACE regex"));

/// Text that carries actual content (does not end in whitespace).
pub static HAS_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S$").expect("HAS_CONTENT regex"));

/// Runs of two or more whitespace characters, collapsed during
/// normalization.
pub static NORMALIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("NORMALIZE regex"));

/// Comma characters counted during paragraph scoring, including the Arabic,
/// vertical-form, small-form and full-width variants.
pub static COMMAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[,\u{060C}\u{FE50}\u{FE10}\u{FE11}\u{2E41}\u{2E34}\u{2E32}\u{FF0C}]")
        .expect("COMMAS regex")
});

/// Sentence-final period for the short-paragraph sibling rule.
pub static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.( |$)").expect("SENTENCE_END regex"));

// =============================================================================
// URL Patterns
// =============================================================================

/// Fragment-only link target; such anchors count 0.3x in link density.
pub static HASH_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#.+").expect("HASH_URL regex"));

/// One `srcset` entry: URL, optional density/width descriptor, separator.
pub static SRCSET_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\S+)(\s+[\d.]+[xw])?(\s*(?:,|$))").expect("SRCSET_URL regex")
});

/// Inline base64 data URL; captures the mime type.
pub static B64_DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^data:\s*([^\s;,]+)\s*;\s*base64\s*,").expect("B64_DATA_URL regex")
});

/// Image file reference inside an arbitrary attribute value.
pub static IMG_EXTENSIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|webp)").expect("IMG_EXTENSIONS regex")
});

/// `srcset`-shaped attribute value: image URL followed by a descriptor.
pub static LAZY_SRCSET_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|webp)\s+\d").expect("LAZY_SRCSET_VALUE regex")
});

/// Single bare image URL attribute value.
pub static LAZY_SRC_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\S+\.(jpg|jpeg|png|webp)\S*\s*$").expect("LAZY_SRC_VALUE regex")
});

// =============================================================================
// Visibility Patterns
// =============================================================================

/// Inline style hiding an element.
pub static STYLE_DISPLAY_NONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)display\s*:\s*none").expect("STYLE_DISPLAY_NONE regex")
});

/// Inline style making an element invisible.
pub static STYLE_VISIBILITY_HIDDEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)visibility\s*:\s*hidden").expect("STYLE_VISIBILITY_HIDDEN regex")
});

// =============================================================================
// Metadata Patterns
// =============================================================================

/// Schema.org context URL required on JSON-LD blocks.
pub static SCHEMA_ORG_CONTEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://schema\.org/?$").expect("SCHEMA_ORG_CONTEXT regex")
});

/// Schema.org Article family accepted from JSON-LD `@type`.
pub static JSONLD_ARTICLE_TYPES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^Article|AdvertiserContentArticle|NewsArticle|AnalysisNewsArticle|AskPublicNewsArticle|BackgroundNewsArticle|OpinionNewsArticle|ReportageNewsArticle|ReviewNewsArticle|Report|SatiricalArticle|ScholarlyArticle|MedicalScholarlyArticle|SocialMediaPosting|BlogPosting|LiveBlogPosting|DiscussionForumPosting|TechArticle|APIReference$",
    )
    .expect("JSONLD_ARTICLE_TYPES regex")
});

/// CDATA wrapper sometimes found around JSON-LD payloads.
pub static CDATA_WRAPPER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*<!\[CDATA\[|\]\]>\s*$").expect("CDATA_WRAPPER regex")
});

/// `<meta property>` values worth collecting.
pub static META_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(article|dc|dcterm|og|twitter)\s*:\s*(author|creator|description|published_time|title|site_name)\s*")
        .expect("META_PROPERTY regex")
});

/// `<meta name>` values worth collecting.
pub static META_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:(dc|dcterm|og|twitter|parsely|weibo:(article|webpage))\s*[-\.:]\s*)?(author|creator|pub-date|description|title|site_name)\s*$")
        .expect("META_NAME regex")
});

/// Named HTML character references handled during unescaping.
pub static HTML_NAMED_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(quot|amp|apos|lt|gt);").expect("HTML_NAMED_ENTITY regex")
});

/// Numeric HTML character references, decimal or hex.
pub static HTML_NUMERIC_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)&#(?:x([0-9a-f]+)|([0-9]+));").expect("HTML_NUMERIC_ENTITY regex")
});

// =============================================================================
// Title Patterns
// =============================================================================

/// Hierarchical separator (` | `, ` - `, ` / `, ` > `, ` » `) inside a
/// `<title>`.
pub static TITLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" [\|\-\\/>»] ").expect("TITLE_SEPARATOR regex")
});

/// Keep the part before the final separator.
pub static TITLE_CUT_TRAILING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(.*)[\|\-\\/>»] .*").expect("TITLE_CUT_TRAILING regex")
});

/// Keep the part after the first separator.
pub static TITLE_CUT_LEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[^\|\-\\/>»]*[\|\-\\/>»](.*)").expect("TITLE_CUT_LEADING regex")
});

/// All separator characters, for the word-count revert check.
pub static TITLE_SEPARATOR_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\|\-\\/>»]+").expect("TITLE_SEPARATOR_CHARS regex")
});

/// Separators implying site hierarchy rather than a plain dash.
pub static TITLE_HIERARCHICAL_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" [\\/>»] ").expect("TITLE_HIERARCHICAL_SEPARATORS regex")
});

// =============================================================================
// Tag Sets
// =============================================================================

/// Elements collected for paragraph scoring.
pub const DEFAULT_TAGS_TO_SCORE: &[&str] =
    &["section", "h2", "h3", "h4", "h5", "h6", "p", "td", "pre"];

/// Block-level elements; a div containing any of these is not collapsed to
/// a paragraph.
pub const DIV_TO_P_ELEMS: &[&str] =
    &["blockquote", "dl", "div", "img", "ol", "p", "pre", "table", "ul"];

/// Sibling tags appended to the article without being renamed to `<div>`.
pub const ALTER_TO_DIV_EXCEPTIONS: &[&str] = &["div", "article", "section", "p"];

/// Attributes stripped from every element of the article.
pub const PRESENTATIONAL_ATTRIBUTES: &[&str] = &[
    "align", "background", "bgcolor", "border", "cellpadding", "cellspacing",
    "frame", "hspace", "rules", "style", "valign", "vspace",
];

/// Elements allowed to keep `width`/`height` attributes.
pub const SIZE_ATTRIBUTE_ELEMS: &[&str] = &["table", "th", "td", "hr", "pre"];

/// Elements that always count as phrasing content.
pub const PHRASING_ELEMS: &[&str] = &[
    "abbr", "audio", "b", "bdo", "br", "button", "cite", "code", "data",
    "datalist", "dfn", "em", "embed", "i", "img", "input", "kbd", "label",
    "mark", "math", "meter", "noscript", "object", "output", "progress", "q",
    "ruby", "samp", "script", "select", "small", "span", "strong", "sub",
    "sup", "textarea", "time", "var", "wbr",
];

/// Elements that are phrasing content when all of their children are.
pub const PHRASING_WHEN_CHILDREN_ARE: &[&str] = &["a", "del", "ins"];

/// ARIA roles removed during the pruning pass.
pub const UNLIKELY_ROLES: &[&str] =
    &["menu", "menubar", "complementary", "navigation", "alert", "alertdialog", "dialog"];

/// Media tags that keep an otherwise-empty paragraph alive.
pub const EMBEDDED_NODES: &[&str] = &["img", "embed", "object", "iframe"];

/// Structural tags removed when they carry no content.
pub const EMPTYABLE_TAGS: &[&str] =
    &["div", "section", "header", "h1", "h2", "h3", "h4", "h5", "h6"];
