//! Configuration options for article extraction.
//!
//! The `Options` struct controls extraction behavior: scoring breadth,
//! success thresholds, output shaping, and metadata toggles.

use dom_query::Selection;
use regex::Regex;

/// Serializer hook: turns the extracted article subtree into the final
/// content string. When unset, the subtree is serialized with `dom_query`.
pub type Serializer = fn(&Selection) -> String;

/// Configuration options for article extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use rs_readability::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     char_threshold: 250,
///     keep_classes: true,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Emit diagnostic logs through the `log` crate.
    ///
    /// Disabling this has no effect on extraction behavior.
    ///
    /// Default: `false`
    pub debug: bool,

    /// Abort parsing when the document has more elements than this.
    ///
    /// `0` means unlimited.
    ///
    /// Default: `0`
    pub max_elems_to_parse: usize,

    /// Number of top candidates tracked while scoring.
    ///
    /// Default: `5`
    pub nb_top_candidates: usize,

    /// Minimum text length (characters) of a successful extraction.
    ///
    /// Shorter results trigger a retry with a relaxed flag set.
    ///
    /// Default: `500`
    pub char_threshold: usize,

    /// Preserve all class attributes in the output HTML.
    ///
    /// Default: `false`
    pub keep_classes: bool,

    /// Class names kept when `keep_classes` is off.
    ///
    /// A user-supplied list replaces the built-in default.
    ///
    /// Default: `["page"]`
    pub classes_to_preserve: Vec<String>,

    /// Skip JSON-LD metadata extraction.
    ///
    /// Default: `false`
    pub disable_json_ld: bool,

    /// Custom serializer producing the final content string from the
    /// article subtree. `None` uses `dom_query` serialization.
    ///
    /// Default: `None`
    pub serializer: Option<Serializer>,

    /// Pattern recognizing embeds that must survive cleaning.
    ///
    /// `None` uses the built-in video host pattern.
    ///
    /// Default: `None`
    pub allowed_video_regex: Option<Regex>,

    /// Added to the link-density cutoffs in conditional cleaning.
    ///
    /// Positive values tolerate more links; negative values fewer.
    ///
    /// Default: `0.0`
    pub link_density_modifier: f64,

    /// Run content extraction.
    ///
    /// When `false`, only metadata is produced and `content`,
    /// `text_content`, `length` and `excerpt` are `None`.
    ///
    /// Default: `true`
    pub extraction: bool,

    /// Base URI for resolving `href`/`src`/`srcset` to absolute URLs.
    ///
    /// Default: `None`
    pub base_uri: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            debug: false,
            max_elems_to_parse: 0,
            nb_top_candidates: 5,
            char_threshold: 500,
            keep_classes: false,
            classes_to_preserve: vec!["page".to_string()],
            disable_json_ld: false,
            serializer: None,
            allowed_video_regex: None,
            link_density_modifier: 0.0,
            extraction: true,
            base_uri: None,
        }
    }
}

/// Heuristic toggles relaxed one at a time when extraction comes up short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Flags {
    /// Drop nodes whose class/id looks like boilerplate.
    pub strip_unlikelys: bool,
    /// Weigh class/id vocabulary into element scores.
    pub weight_classes: bool,
    /// Run the conditional cleaner on tables, lists and divs.
    pub clean_conditionally: bool,
}

impl Flags {
    pub fn all() -> Self {
        Self { strip_unlikelys: true, weight_classes: true, clean_conditionally: true }
    }

    /// Clears the next flag in the relaxation ladder. Returns `false` when
    /// every flag has already been cleared.
    pub fn relax(&mut self) -> bool {
        if self.strip_unlikelys {
            self.strip_unlikelys = false;
        } else if self.weight_classes {
            self.weight_classes = false;
        } else if self.clean_conditionally {
            self.clean_conditionally = false;
        } else {
            return false;
        }
        true
    }
}
